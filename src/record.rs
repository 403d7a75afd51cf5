//! The record type and its bounded name label.

use core::{fmt, str};

use thiserror::Error;

/// UTF-8 bytes a [`Label`] can hold. Characters outside ASCII take more than
/// one byte each, so fewer of them fit.
pub const LABEL_CAPACITY: usize = 50;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("label of {len} bytes does not fit in {capacity}")]
pub struct LabelTooLong {
    pub len: usize,
    pub capacity: usize,
}

/// Text of at most [`LABEL_CAPACITY`] bytes (not characters), stored inline.
#[derive(Clone, Copy)]
pub struct Label {
    bytes: [u8; LABEL_CAPACITY],
    len: u8,
}

impl Label {
    pub const fn empty() -> Self {
        Self {
            bytes: [0; LABEL_CAPACITY],
            len: 0,
        }
    }

    /// Copies `text`, refusing anything whose UTF-8 encoding is longer than
    /// the capacity.
    pub fn new(text: &str) -> Result<Self, LabelTooLong> {
        if text.len() > LABEL_CAPACITY {
            return Err(LabelTooLong {
                len: text.len(),
                capacity: LABEL_CAPACITY,
            });
        }
        Ok(Self::copy_from(text))
    }

    /// Copies the longest prefix of `text` that fits without splitting a
    /// character.
    pub fn truncated(text: &str) -> Self {
        let mut end = text.len().min(LABEL_CAPACITY);
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        Self::copy_from(&text[..end])
    }

    fn copy_from(text: &str) -> Self {
        debug_assert!(text.len() <= LABEL_CAPACITY);
        let mut label = Self::empty();
        label.bytes[..text.len()].copy_from_slice(text.as_bytes());
        label.len = text.len() as u8;
        label
    }

    pub fn as_str(&self) -> &str {
        // SAFETY: only ever filled from whole `&str`s cut on char boundaries
        unsafe { str::from_utf8_unchecked(&self.bytes[..self.len as usize]) }
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub const fn capacity(&self) -> usize {
        LABEL_CAPACITY
    }
}

impl Default for Label {
    fn default() -> Self {
        Self::empty()
    }
}

impl TryFrom<&str> for Label {
    type Error = LabelTooLong;

    fn try_from(text: &str) -> Result<Self, Self::Error> {
        Self::new(text)
    }
}

impl AsRef<str> for Label {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq for Label {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Label {}

impl PartialEq<str> for Label {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Label {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

/// A student entry: age, name and grade point average.
///
/// `Default` is the empty state every field starts from before assignment.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    pub age: i32,
    pub name: Label,
    pub gpa: f64,
}

impl Record {
    pub const fn new(age: i32, name: Label, gpa: f64) -> Self {
        Self { age, name, gpa }
    }

    pub fn set_name(&mut self, name: &str) -> Result<(), LabelTooLong> {
        self.name = Label::new(name)?;
        Ok(())
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Age: {}, Name: {}, gpa: {:.6}", self.age, self.name, self.gpa)
    }
}
