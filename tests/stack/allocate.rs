use core::alloc::Layout;

use pretty_assertions::assert_eq;
use record_lifetimes::{AllocErrorKind, Allocator, StackArena, boxed::Box, record::Record};

#[test]
fn alloc_basic() {
    // room for two u64s wherever the inline buffer starts, not for a third
    let arena: StackArena<{ 2 * size_of::<u64>() + align_of::<u64>() - 1 }> = StackArena::new();
    let one = arena.allocate(Layout::new::<u64>()).unwrap();
    unsafe { one.cast::<u64>().as_ptr().write(42) };
    let two = arena.allocate(Layout::new::<u64>()).unwrap();
    unsafe { two.cast::<u64>().as_ptr().write(42) };
    assert_eq!(
        arena.allocate(Layout::new::<u64>()).unwrap_err().kind(),
        AllocErrorKind::OOM
    );
}

#[test]
fn allocations_are_aligned() {
    let arena: StackArena<64> = StackArena::new();
    let _byte = arena.allocate(Layout::new::<u8>()).unwrap();
    let wide = arena.allocate(Layout::new::<f64>()).unwrap();
    assert_eq!(wide.cast::<u8>().as_ptr().addr() % align_of::<f64>(), 0);
    assert!(arena.used() >= 1 + size_of::<f64>());
}

#[test]
fn zero_capacity_reports_exhaustion() {
    let arena: StackArena<0> = StackArena::new();
    let err = Box::new_in(Record::default(), &arena).unwrap_err();
    assert_eq!(err.kind(), AllocErrorKind::OOM);
    assert!(err.message().is_some());
}

#[test]
fn releasing_last_block_reclaims_space() {
    let arena: StackArena<128> = StackArena::new();
    let first = Box::new_in(1u64, &arena).unwrap();
    let used = arena.used();

    let second = Box::new_in(2u64, &arena).unwrap();
    assert_eq!(arena.used(), used + size_of::<u64>());
    Box::release(second);
    assert_eq!(arena.used(), used);

    assert_eq!(*first, 1);
    Box::release(first);
    assert!(arena.used() < used);
}

#[test]
fn records_fit_until_capacity() {
    const SLOTS: usize = 3;
    let arena: StackArena<{ SLOTS * size_of::<Record>() + align_of::<Record>() }> =
        StackArena::new();

    let held: Vec<_> = (0..SLOTS)
        .map(|age| Box::new_in(Record { age: age as i32, ..Record::default() }, &arena).unwrap())
        .collect();
    assert!(Box::new_in(Record::default(), &arena).is_err());

    for (age, record) in held.iter().enumerate() {
        assert_eq!(record.age, age as i32);
    }
}

#[test]
fn zeroed_allocation_clears_reused_space() {
    let arena: StackArena<{ size_of::<u64>() + align_of::<u64>() - 1 }> = StackArena::new();
    let dirty = Box::new_in(u64::MAX, &arena).unwrap();
    Box::release(dirty);

    let block = arena.allocate_zeroed(Layout::new::<u64>()).unwrap();
    assert_eq!(unsafe { block.cast::<u64>().as_ptr().read() }, 0);
}
