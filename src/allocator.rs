use core::{
    alloc::Layout,
    ptr::{self, NonNull},
    sync::atomic::{AtomicUsize, Ordering},
};

use tracing::{trace, warn};

use crate::{AllocError, AllocErrorKind, AllocRes, buffer::Buffer};
#[cfg(feature = "alloc")]
pub use heap_::*;
pub use stack_::*;

/// Source of storage for indirectly owned values.
///
/// Every block handed out by [`Allocator::allocate`] must be given back
/// through [`Allocator::deallocate`] exactly once. [`crate::boxed::Box`]
/// takes care of that for typed values.
///
/// # Safety
///
/// A successful `allocate` must return a block of at least `layout.size()`
/// bytes, aligned to `layout.align()`, valid for reads and writes and not
/// overlapping any other live block, until it is passed to `deallocate`.
/// [`Allocator::alloc_val`] and [`crate::boxed::Box`] write through the
/// block without checking it.
///
/// Implementing the trait therefore takes an `unsafe impl`:
///
/// ```compile_fail
/// use core::{alloc::Layout, ptr::NonNull};
/// use record_lifetimes::{AllocRes, Allocator};
///
/// struct Empty;
///
/// impl Allocator for Empty {
///     fn allocate(&self, _layout: Layout) -> AllocRes<NonNull<[u8]>> {
///         Ok(NonNull::slice_from_raw_parts(NonNull::dangling(), 0))
///     }
///
///     unsafe fn deallocate(&self, _data: NonNull<u8>, _layout: Layout) {}
/// }
/// ```
pub unsafe trait Allocator {
    fn allocate(&self, layout: Layout) -> AllocRes<NonNull<[u8]>>;

    /// # Safety
    ///
    /// `data` must have been returned by `allocate` on this allocator with the
    /// same `layout`, and must not have been deallocated already.
    unsafe fn deallocate(&self, data: NonNull<u8>, layout: Layout);

    fn allocate_zeroed(&self, layout: Layout) -> AllocRes<NonNull<[u8]>> {
        let block = self.allocate(layout)?;
        unsafe {
            block.cast::<u8>().as_ptr().write_bytes(0, layout.size());
        }
        Ok(block)
    }

    /// Moves `value` into freshly allocated storage.
    fn alloc_val<T>(&self, value: T) -> AllocRes<NonNull<T>> {
        let block = self.allocate(Layout::new::<T>())?;
        let thin = block.cast::<T>();
        unsafe { thin.as_ptr().write(value) };
        Ok(thin)
    }
}

pub(crate) struct ArenaAllocator<B: Buffer> {
    buf: B,
    next_free: AtomicUsize,
}

unsafe impl<B: Buffer> Allocator for ArenaAllocator<B> {
    fn allocate(&self, layout: Layout) -> AllocRes<NonNull<[u8]>> {
        let base = self.buf.as_mut_ptr();
        let start = loop {
            let cur = self.next_free.load(Ordering::Acquire);
            let misalign = base.addr().wrapping_add(cur) % layout.align();
            let pad = if misalign == 0 {
                0
            } else {
                layout.align() - misalign
            };
            let end = cur
                .checked_add(pad)
                .and_then(|start| start.checked_add(layout.size()));
            let end = match end {
                Some(end) if end <= self.buf.len() => end,
                _ => {
                    warn!(
                        size = layout.size(),
                        used = cur,
                        capacity = self.buf.len(),
                        "arena exhausted"
                    );
                    return Err(AllocError::with_message(
                        AllocErrorKind::OOM,
                        "Not enough memory in buffer",
                    ));
                }
            };

            if self
                .next_free
                .compare_exchange(cur, end, Ordering::AcqRel, Ordering::Relaxed)
                .is_ok()
            {
                break cur + pad;
            }
        };

        trace!(offset = start, size = layout.size(), "arena allocation");
        let block = unsafe { base.add(start) };
        let block = ptr::slice_from_raw_parts_mut(block, layout.size());

        NonNull::new(block).ok_or(AllocError::new(AllocErrorKind::InvalidPtr))
    }

    unsafe fn deallocate(&self, data: NonNull<u8>, layout: Layout) {
        let cur = self.next_free.load(Ordering::Acquire);
        if layout.size() > cur {
            return;
        }
        let last = cur - layout.size();
        let cur_ptr = unsafe { self.buf.as_ptr().add(last) };
        if cur_ptr == data.as_ptr().cast_const() {
            // most recent block, its space can be handed out again
            if self
                .next_free
                .compare_exchange(cur, last, Ordering::AcqRel, Ordering::Relaxed)
                .is_ok()
            {
                trace!(offset = last, size = layout.size(), "arena space reclaimed");
            }
        }
    }
}

impl<B: Buffer> ArenaAllocator<B> {
    pub(crate) fn new_in(buf: B) -> Self {
        Self {
            buf,
            next_free: AtomicUsize::new(0),
        }
    }

    pub(crate) fn used(&self) -> usize {
        self.next_free.load(Ordering::Acquire)
    }

    pub(crate) fn capacity(&self) -> usize {
        self.buf.len()
    }
}

#[cfg(feature = "alloc")]
mod heap_ {
    use crate::buffer::HeapBuf;

    use super::*;

    /// Bump arena over a single heap block.
    pub struct HeapArena(ArenaAllocator<HeapBuf>);

    unsafe impl Allocator for HeapArena {
        fn allocate(&self, layout: Layout) -> AllocRes<NonNull<[u8]>> {
            self.0.allocate(layout)
        }

        unsafe fn deallocate(&self, data: NonNull<u8>, layout: Layout) {
            unsafe { self.0.deallocate(data, layout) }
        }
    }

    impl HeapArena {
        /// Reserves `size` bytes up front. Fails instead of aborting when the
        /// global allocator cannot provide them.
        pub fn new(size: usize) -> AllocRes<Self> {
            let buf = HeapBuf::new(size).inspect_err(|_| {
                warn!(size, "heap arena could not reserve its block");
            })?;
            Ok(Self(ArenaAllocator::new_in(buf)))
        }

        /// Bytes handed out so far, alignment padding included.
        pub fn used(&self) -> usize {
            self.0.used()
        }

        pub fn capacity(&self) -> usize {
            self.0.capacity()
        }
    }

    /// The process-wide allocator, with every null result turned into an
    /// [`AllocError`] instead of an unusable pointer.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct SystemAllocator;

    unsafe impl Allocator for SystemAllocator {
        fn allocate(&self, layout: Layout) -> AllocRes<NonNull<[u8]>> {
            if layout.size() == 0 {
                let dangling = NonNull::new(ptr::without_provenance_mut::<u8>(layout.align()))
                    .ok_or(AllocError::new(AllocErrorKind::InvalidPtr))?;
                return Ok(NonNull::slice_from_raw_parts(dangling, 0));
            }

            let raw = unsafe { alloc::alloc::alloc(layout) };
            match NonNull::new(raw) {
                Some(block) => {
                    trace!(size = layout.size(), align = layout.align(), "system allocation");
                    Ok(NonNull::slice_from_raw_parts(block, layout.size()))
                }
                None => {
                    warn!(size = layout.size(), "system allocator returned null");
                    Err(AllocError::with_message(
                        AllocErrorKind::OOM,
                        "system allocator returned null",
                    ))
                }
            }
        }

        unsafe fn deallocate(&self, data: NonNull<u8>, layout: Layout) {
            if layout.size() != 0 {
                unsafe { alloc::alloc::dealloc(data.as_ptr(), layout) };
            }
        }
    }
}

mod stack_ {
    use crate::buffer::StackBuf;

    use super::*;

    /// Bump arena whose `N` bytes live inline, wherever the arena itself lives.
    ///
    /// Declared as a local, the storage sits in the caller's stack frame and
    /// handles borrowed from it cannot outlive that frame.
    pub struct StackArena<const N: usize>(ArenaAllocator<StackBuf<N>>);

    unsafe impl<const N: usize> Allocator for StackArena<N> {
        fn allocate(&self, layout: Layout) -> AllocRes<NonNull<[u8]>> {
            self.0.allocate(layout)
        }

        unsafe fn deallocate(&self, data: NonNull<u8>, layout: Layout) {
            unsafe { self.0.deallocate(data, layout) }
        }
    }

    impl<const N: usize> StackArena<N> {
        pub fn new() -> Self {
            Self(ArenaAllocator::new_in(StackBuf::new()))
        }

        pub fn used(&self) -> usize {
            self.0.used()
        }

        pub fn capacity(&self) -> usize {
            self.0.capacity()
        }
    }

    impl<const N: usize> Default for StackArena<N> {
        fn default() -> Self {
            Self::new()
        }
    }
}
