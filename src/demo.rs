//! The lab program: one record per allocation strategy, printed in order.

use std::{
    io::{self, Write},
    ptr,
};

use tracing::debug;

use crate::{
    AllocError, Allocator, Error,
    boxed::Box,
    factory::{allocate_record, create_record},
    record::{Label, LabelTooLong, Record},
};

#[derive(thiserror::Error, Debug)]
pub enum DemoError {
    #[error(transparent)]
    Record(#[from] Error),
    #[error("could not write output: {0}")]
    Io(#[from] io::Error),
}

impl From<AllocError> for DemoError {
    fn from(err: AllocError) -> Self {
        Self::Record(err.into())
    }
}

impl From<LabelTooLong> for DemoError {
    fn from(err: LabelTooLong) -> Self {
        Self::Record(err.into())
    }
}

/// Builds the four records, writes one line for each and releases the two
/// that came from `alloc`.
///
/// Lines already written stay written when a later step fails.
pub fn run<A: Allocator, W: Write>(alloc: &A, out: &mut W) -> Result<(), DemoError> {
    let u1 = Record::new(1, Label::new("Mohamed")?, 3.1);
    debug!(address = ?ptr::from_ref(&u1), "u1 initialised on the stack");
    writeln!(out, "{u1}")?;

    let mut u2 = Record::default();
    u2.age = 21;
    u2.set_name("Ahmed")?;
    u2.gpa = 3.9;
    debug!(address = ?ptr::from_ref(&u2), "u2 assigned on the stack");
    writeln!(out, "{u2}")?;

    let mut u3 = allocate_record(alloc)?;
    u3.age = 15;
    u3.set_name("Omar")?;
    u3.gpa = 2.5;
    debug!(address = ?ptr::from_ref::<Record>(&u3), "u3 assigned through a handle");
    writeln!(out, "{u3}")?;

    let u4 = create_record(20, "Ahmed", 3.8, alloc)?;
    debug!(address = ?ptr::from_ref::<Record>(&u4), "u4 returned from the factory");
    writeln!(out, "{u4}")?;

    Box::release(u3);
    Box::release(u4);
    Ok(())
}
