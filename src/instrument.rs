use core::{
    alloc::Layout,
    ptr::NonNull,
    sync::atomic::{AtomicUsize, Ordering},
};

use tracing::warn;

use crate::{AllocError, AllocErrorKind, AllocRes, Allocator};

/// Counts every allocation and release passing through `A`.
pub struct Tracked<A> {
    inner: A,
    allocations: AtomicUsize,
    releases: AtomicUsize,
}

impl<A: Allocator> Tracked<A> {
    pub fn new(inner: A) -> Self {
        Self {
            inner,
            allocations: AtomicUsize::new(0),
            releases: AtomicUsize::new(0),
        }
    }

    pub fn allocations(&self) -> usize {
        self.allocations.load(Ordering::Acquire)
    }

    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::Acquire)
    }

    /// Blocks handed out and not yet given back.
    pub fn outstanding(&self) -> usize {
        self.allocations() - self.releases()
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }
}

unsafe impl<A: Allocator> Allocator for Tracked<A> {
    fn allocate(&self, layout: Layout) -> AllocRes<NonNull<[u8]>> {
        let block = self.inner.allocate(layout)?;
        self.allocations.fetch_add(1, Ordering::AcqRel);
        Ok(block)
    }

    unsafe fn deallocate(&self, data: NonNull<u8>, layout: Layout) {
        unsafe { self.inner.deallocate(data, layout) };
        self.releases.fetch_add(1, Ordering::AcqRel);
    }
}

/// Grants at most a fixed number of allocations from `A`, then reports
/// exhaustion. Releasing does not restore the budget.
pub struct Limited<A> {
    inner: A,
    remaining: AtomicUsize,
}

impl<A: Allocator> Limited<A> {
    pub fn new(inner: A, allocations: usize) -> Self {
        Self {
            inner,
            remaining: AtomicUsize::new(allocations),
        }
    }

    pub fn remaining(&self) -> usize {
        self.remaining.load(Ordering::Acquire)
    }
}

unsafe impl<A: Allocator> Allocator for Limited<A> {
    fn allocate(&self, layout: Layout) -> AllocRes<NonNull<[u8]>> {
        if self
            .remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |left| left.checked_sub(1))
            .is_err()
        {
            warn!(size = layout.size(), "allocation limit reached");
            return Err(AllocError::with_message(
                AllocErrorKind::OOM,
                "allocation limit reached",
            ));
        }
        self.inner.allocate(layout)
    }

    unsafe fn deallocate(&self, data: NonNull<u8>, layout: Layout) {
        unsafe { self.inner.deallocate(data, layout) }
    }
}
