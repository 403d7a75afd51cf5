use core::cell::UnsafeCell;

#[cfg(feature = "alloc")]
pub(crate) use heap_::*;

/// Raw byte storage an arena hands out pieces of.
pub(crate) trait Buffer {
    fn as_ptr(&self) -> *const u8 {
        self.as_mut_ptr()
    }
    fn as_mut_ptr(&self) -> *mut u8;
    fn len(&self) -> usize;
}

pub(crate) struct StackBuf<const N: usize> {
    inner: UnsafeCell<[u8; N]>,
}

impl<const N: usize> StackBuf<N> {
    pub(crate) fn new() -> Self {
        Self {
            inner: UnsafeCell::new([0; N]),
        }
    }
}

impl<const N: usize> Buffer for StackBuf<N> {
    fn as_mut_ptr(&self) -> *mut u8 {
        self.inner.get() as *mut u8
    }

    fn len(&self) -> usize {
        N
    }
}

impl<const N: usize> Default for StackBuf<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "alloc")]
mod heap_ {
    use super::*;
    use core::{alloc::Layout, ptr::NonNull};

    use crate::{AllocError, AllocErrorKind, AllocRes};

    pub(crate) struct HeapBuf {
        ptr: NonNull<[u8]>,
    }

    impl Buffer for HeapBuf {
        fn as_mut_ptr(&self) -> *mut u8 {
            self.ptr.cast::<u8>().as_ptr()
        }

        fn len(&self) -> usize {
            self.ptr.len()
        }
    }

    impl HeapBuf {
        /// Requests `size` zeroed bytes from the global allocator.
        pub(crate) fn new(size: usize) -> AllocRes<Self> {
            let layout = Layout::array::<u8>(size).map_err(|_| {
                AllocError::with_message(AllocErrorKind::OOM, "buffer size exceeds isize::MAX")
            })?;
            let block = if size == 0 {
                NonNull::dangling()
            } else {
                let raw = unsafe { alloc::alloc::alloc_zeroed(layout) };
                NonNull::new(raw).ok_or(AllocError::with_message(
                    AllocErrorKind::OOM,
                    "system allocator returned null",
                ))?
            };
            Ok(Self {
                ptr: NonNull::slice_from_raw_parts(block, size),
            })
        }
    }

    impl Drop for HeapBuf {
        /// Frees the block only. Anything still placed inside it is not dropped.
        fn drop(&mut self) {
            let size = self.ptr.len();
            if size != 0 {
                // same layout `new` allocated with, which already validated it
                let layout = unsafe { Layout::from_size_align_unchecked(size, 1) };
                unsafe { alloc::alloc::dealloc(self.as_mut_ptr(), layout) };
            }
        }
    }
}
