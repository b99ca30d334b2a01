use alloc::boxed::Box;
use core::{fmt, ptr::NonNull};

/// A deletion strategy: the policy a [`Unique`] invokes to release the object
/// it owns.
///
/// A [`Unique`] calls [`delete`](Delete::delete) at most once per owned
/// pointer, and never with a null pointer.
///
/// Strategies without state (such as [`DefaultDelete`]) are zero-sized and
/// add nothing to the size of the [`Unique`] holding them.
///
/// [`Unique`]: crate::Unique
pub trait Delete<T: ?Sized> {
    /// Releases the object behind `ptr`.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `ptr` refers to an object this strategy knows how to release, e.g.
    ///    for [`DefaultDelete`] one created by [`Box::into_raw`].
    /// 2. The caller is the unique owner of the object and does not use `ptr`
    ///    after this call.
    unsafe fn delete(&mut self, ptr: NonNull<T>);
}

/// The default deletion strategy: drops the object and frees its heap
/// allocation, exactly as dropping the [`Box`] it came from would.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DefaultDelete;

impl<T: ?Sized> Delete<T> for DefaultDelete {
    #[inline]
    unsafe fn delete(&mut self, ptr: NonNull<T>) {
        // SAFETY:
        // 1. The caller guarantees `ptr` came from `Box::into_raw`.
        // 2. The caller guarantees unique ownership, so reconstructing the box
        //    and dropping it releases the object exactly once.
        let boxed = unsafe {
            // @add-unsafe-context: Box
            Box::from_raw(ptr.as_ptr())
        };
        drop(boxed);
    }
}

/// A deletion strategy backed by a closure.
///
/// The closure receives the owned pointer and becomes responsible for
/// releasing it. It is called at most once per owned object.
///
/// # Examples
///
/// ```
/// use core::{cell::Cell, ptr::NonNull};
///
/// use rudiments::unique::{FnDelete, Unique};
///
/// let deleted = Cell::new(0);
/// {
///     let ptr = Box::into_raw(Box::new(5_u8));
///     let deleter = FnDelete(|ptr: NonNull<u8>| {
///         deleted.set(deleted.get() + 1);
///         // SAFETY: `ptr` came from `Box::into_raw` above.
///         drop(unsafe { Box::from_raw(ptr.as_ptr()) });
///     });
///     // SAFETY: The closure releases `Box`-allocated pointers.
///     let _owner = unsafe { Unique::from_raw_with(ptr, deleter) };
/// }
/// assert_eq!(deleted.get(), 1);
/// ```
#[derive(Clone, Copy, Default)]
pub struct FnDelete<F>(pub F);

impl<T: ?Sized, F: FnMut(NonNull<T>)> Delete<T> for FnDelete<F> {
    #[inline]
    unsafe fn delete(&mut self, ptr: NonNull<T>) {
        (self.0)(ptr);
    }
}

impl<F> fmt::Debug for FnDelete<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnDelete").finish_non_exhaustive()
    }
}
