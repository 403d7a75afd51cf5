//! Records placed in allocator storage.

use tracing::trace;

use crate::{AllocRes, Allocator, Error, boxed::Box, record::Record};

pub type RecordBox<'a, A> = Box<'a, Record, A>;

/// Requests storage for one record in the empty state. Fields are assigned
/// through the returned handle.
pub fn allocate_record<A: Allocator>(alloc: &A) -> AllocRes<RecordBox<'_, A>> {
    Box::new_default_in(alloc)
}

/// Allocates a record, assigns the given fields and hands ownership to the
/// caller.
///
/// If `name` does not fit, the storage is released before the error returns.
pub fn create_record<'a, A: Allocator>(
    age: i32,
    name: &str,
    gpa: f64,
    alloc: &'a A,
) -> Result<RecordBox<'a, A>, Error> {
    let mut record = allocate_record(alloc)?;
    record.age = age;
    record.set_name(name)?;
    record.gpa = gpa;
    trace!(age, name, gpa, "record created");
    Ok(record)
}
