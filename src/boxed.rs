//! Unique owning handle to a value placed by an [`Allocator`].

use core::{
    alloc::Layout,
    cmp::Ordering,
    fmt,
    marker::PhantomData,
    mem::ManuallyDrop,
    ops::{Deref, DerefMut},
    ptr::{self, NonNull},
};

use tracing::debug;

use crate::{AllocRes, Allocator};

/// Sole owner of one `T` living in storage granted by `A`.
///
/// The handle is neither `Copy` nor `Clone`. Ownership moves with the value,
/// and the storage goes back to the allocator exactly once: through
/// [`Box::release`], [`Box::into_inner`], or when the handle is dropped.
///
/// A released handle is gone:
///
/// ```compile_fail
/// use record_lifetimes::{boxed::Box, SystemAllocator};
///
/// let alloc = SystemAllocator;
/// let value = Box::new_in(7u32, &alloc).unwrap();
/// Box::release(value);
/// println!("{}", *value);
/// ```
///
/// and so cannot be released twice:
///
/// ```compile_fail
/// use record_lifetimes::{boxed::Box, SystemAllocator};
///
/// let alloc = SystemAllocator;
/// let value = Box::new_in(7u32, &alloc).unwrap();
/// Box::release(value);
/// Box::release(value);
/// ```
///
/// Nor can a handle outlive the allocator it came from:
///
/// ```compile_fail
/// use record_lifetimes::{boxed::Box, StackArena};
///
/// let escaped = {
///     let arena: StackArena<64> = StackArena::new();
///     Box::new_in(7u32, &arena).unwrap()
/// };
/// ```
pub struct Box<'a, T, A: Allocator> {
    ptr: NonNull<T>,
    alloc: &'a A,
    _owns: PhantomData<T>,
}

impl<'a, T, A: Allocator> Box<'a, T, A> {
    pub fn new_in(value: T, alloc: &'a A) -> AllocRes<Self> {
        alloc.alloc_val(value).map(|ptr| Self {
            ptr,
            alloc,
            _owns: PhantomData,
        })
    }

    /// Allocates storage holding `T::default()`.
    pub fn new_default_in(alloc: &'a A) -> AllocRes<Self>
    where
        T: Default,
    {
        Self::new_in(T::default(), alloc)
    }

    /// Drops the value and gives its storage back. Consumes the handle.
    pub fn release(b: Self) {
        debug!(address = ?b.ptr, "releasing handle");
        drop(b);
    }

    /// Moves the value out and gives the storage back.
    pub fn into_inner(b: Self) -> T {
        let b = ManuallyDrop::new(b);
        unsafe {
            let value = ptr::read(b.ptr.as_ptr());
            b.alloc.deallocate(b.ptr.cast(), Layout::new::<T>());
            value
        }
    }

    pub fn allocator(b: &Self) -> &'a A {
        b.alloc
    }
}

impl<T, A: Allocator> Drop for Box<'_, T, A> {
    fn drop(&mut self) {
        unsafe {
            ptr::drop_in_place(self.ptr.as_ptr());
            self.alloc.deallocate(self.ptr.cast(), Layout::new::<T>());
        }
    }
}

impl<'b, T: PartialEq, A: Allocator, B: Allocator> PartialEq<Box<'b, T, B>> for Box<'_, T, A> {
    #[inline]
    fn eq(&self, other: &Box<'b, T, B>) -> bool {
        PartialEq::eq(&**self, &**other)
    }
}

impl<T: Eq, A: Allocator> Eq for Box<'_, T, A> {}

impl<'b, T: PartialOrd, A: Allocator, B: Allocator> PartialOrd<Box<'b, T, B>> for Box<'_, T, A> {
    #[inline]
    fn partial_cmp(&self, other: &Box<'b, T, B>) -> Option<Ordering> {
        PartialOrd::partial_cmp(&**self, &**other)
    }
}

impl<T: fmt::Display, A: Allocator> fmt::Display for Box<'_, T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&**self, f)
    }
}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for Box<'_, T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}

impl<T, A: Allocator> fmt::Pointer for Box<'_, T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Pointer::fmt(&self.ptr, f)
    }
}

impl<T, A: Allocator> Deref for Box<'_, T, A> {
    type Target = T;

    fn deref(&self) -> &T {
        unsafe { self.ptr.as_ref() }
    }
}

impl<T, A: Allocator> DerefMut for Box<'_, T, A> {
    fn deref_mut(&mut self) -> &mut T {
        unsafe { self.ptr.as_mut() }
    }
}
