#![no_std]

#[cfg(feature = "std")]
extern crate std;

#[cfg(feature = "alloc")]
extern crate alloc;

mod allocator;
pub mod boxed;
mod buffer;
pub mod factory;
mod instrument;
pub mod record;

cfg_if::cfg_if! {
    if #[cfg(feature = "std")] {
        pub mod demo;
    }
}

pub use allocator::*;
pub use instrument::*;

use crate::record::LabelTooLong;

pub type AllocRes<T> = Result<T, AllocError>;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("allocation failed: {kind} ({msg:?})")]
pub struct AllocError {
    kind: AllocErrorKind,
    msg: Option<&'static str>,
}

impl AllocError {
    pub fn new(kind: AllocErrorKind) -> Self {
        Self { kind, msg: None }
    }

    pub fn with_message(kind: AllocErrorKind, msg: &'static str) -> Self {
        Self {
            kind,
            msg: Some(msg),
        }
    }

    pub fn kind(&self) -> AllocErrorKind {
        self.kind
    }

    pub fn message(&self) -> Option<&'static str> {
        self.msg
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocErrorKind {
    #[error("out of memory to allocate")]
    OOM,
    #[error("the allocator produced an invalid pointer")]
    InvalidPtr,
}

/// Everything that can go wrong while building a record.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Alloc(#[from] AllocError),
    #[error(transparent)]
    Label(#[from] LabelTooLong),
}
