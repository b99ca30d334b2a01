//! The allocator collaborator.
//!
//! Containers never talk to the global allocator directly. They hold an
//! [`Allocator`] by value and borrow it for every acquisition and release of
//! storage. Two allocator instances that compare equal promise that memory
//! obtained from one may be released through the other, which is what makes
//! handing a buffer from one container to another sound.

mod heap;

pub use self::heap::Heap;

use core::ptr::NonNull;

/// Typed storage provider for a container of `T`.
///
/// # Safety
///
/// Implementors must uphold the following:
///
/// 1. A pointer returned by [`allocate(count)`](Allocator::allocate) is
///    non-null, aligned for `T`, and valid for reads and writes of `count`
///    consecutive `T`s until it is passed to
///    [`deallocate`](Allocator::deallocate).
/// 2. If `a == b`, storage allocated by `a` may be deallocated by `b`.
/// 3. [`allocate`](Allocator::allocate) never returns storage that is
///    already handed out and not yet deallocated.
/// 4. A clone compares equal to the allocator it was cloned from.
pub unsafe trait Allocator<T>: Clone + PartialEq {
    /// Acquires uninitialized storage for `count` elements of type `T`.
    ///
    /// Failure to obtain memory is fatal and does not return.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `count > 0` and `T` is not a zero-sized type.
    /// 2. [`Layout::array::<T>(count)`](core::alloc::Layout::array) succeeds.
    unsafe fn allocate(&self, count: usize) -> NonNull<T>;

    /// Releases storage previously obtained from [`allocate`].
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `ptr` was returned by [`allocate`] on an allocator that compares
    ///    equal to `self`, called with exactly `count`.
    /// 2. `ptr` has not been deallocated since.
    /// 3. No live values remain in the storage, or the caller has accepted
    ///    that their destructors will not run.
    ///
    /// [`allocate`]: Allocator::allocate
    unsafe fn deallocate(&self, ptr: NonNull<T>, count: usize);
}
