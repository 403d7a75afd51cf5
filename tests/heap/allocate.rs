use core::alloc::Layout;

use pretty_assertions::assert_eq;
use record_lifetimes::{
    AllocErrorKind, Allocator, HeapArena, SystemAllocator, boxed::Box, record::Record,
};

#[test]
fn heap_arena_basic() {
    let arena = HeapArena::new(32).unwrap();
    assert_eq!(arena.capacity(), 32);

    let a = Box::new_in(7u32, &arena).unwrap();
    let b = Box::new_in(9u64, &arena).unwrap();
    assert_eq!(*a + *b as u32, 16);
    assert!(arena.used() <= 32);
}

#[test]
fn heap_arena_exhaustion() {
    let arena = HeapArena::new(size_of::<Record>() - 1).unwrap();
    let err = Box::new_in(Record::default(), &arena).unwrap_err();
    assert_eq!(err.kind(), AllocErrorKind::OOM);
    assert_eq!(arena.used(), 0);
}

#[test]
fn heap_arena_reports_oversized_request() {
    for size in [isize::MAX as usize + 1, usize::MAX] {
        let err = HeapArena::new(size).err().unwrap();
        assert_eq!(err.kind(), AllocErrorKind::OOM);
    }
}

#[test]
fn empty_heap_arena() {
    let arena = HeapArena::new(0).unwrap();
    assert_eq!(arena.capacity(), 0);
    assert!(Box::new_in(1u8, &arena).is_err());
}

#[test]
fn system_allocation_roundtrip() {
    let alloc = SystemAllocator;
    let mut value = Box::new_in(Record::default(), &alloc).unwrap();
    value.age = 99;
    assert_eq!(Box::into_inner(value).age, 99);
}

#[test]
fn system_zero_sized_allocation_is_aligned() {
    let layout = Layout::from_size_align(0, 16).unwrap();
    let block = SystemAllocator.allocate(layout).unwrap();
    assert_eq!(block.len(), 0);
    assert_eq!(block.cast::<u8>().as_ptr().addr() % 16, 0);
    unsafe { SystemAllocator.deallocate(block.cast(), layout) };
}

#[test]
fn handles_from_different_allocators_compare_by_value() {
    let arena = HeapArena::new(64).unwrap();
    let system = SystemAllocator;
    let a = Box::new_in(5i32, &arena).unwrap();
    let b = Box::new_in(5i32, &system).unwrap();
    let c = Box::new_in(6i32, &system).unwrap();

    assert!(a == b);
    assert!(b < c);
    assert!(!std::ptr::eq(&*a, &*b));
    assert!(std::ptr::eq(Box::allocator(&a), &arena));
}

#[test]
fn dropping_a_handle_drops_its_value() {
    use std::rc::Rc;

    let shared = Rc::new(());
    let alloc = SystemAllocator;
    let held = Box::new_in(Rc::clone(&shared), &alloc).unwrap();
    assert_eq!(Rc::strong_count(&shared), 2);
    drop(held);
    assert_eq!(Rc::strong_count(&shared), 1);
}
