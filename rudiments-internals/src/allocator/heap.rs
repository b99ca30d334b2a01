use alloc::alloc::{Layout, handle_alloc_error};
use core::ptr::NonNull;

use crate::allocator::Allocator;

/// Stateless allocator forwarding to the global allocator.
///
/// [`Heap`] carries no data, so every instance is interchangeable with every
/// other: `Heap == Heap` holds for any element type, and storage can move
/// freely between containers that use it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Heap;

impl Heap {
    /// Computes the layout for `count` elements of `T`.
    ///
    /// The [`Allocator`] contract makes the caller check this up front, so a
    /// failure here means that contract was broken.
    #[inline]
    fn layout_for<T>(count: usize) -> Layout {
        match Layout::array::<T>(count) {
            Ok(layout) => layout,
            Err(_) => layout_overflow(count),
        }
    }
}

/// Reports a layout that the allocator contract should have ruled out.
#[cold]
#[track_caller]
fn layout_overflow(count: usize) -> ! {
    panic!("allocation of {count} elements does not fit in a layout")
}

// SAFETY:
// 1. Memory comes from the global allocator with the layout of `[T; count]`,
//    which is non-null (checked below), aligned for `T`, and sized for `count`
//    elements.
// 2. `Heap` is a unit struct, so all instances compare equal and all of them
//    release through the same global allocator.
// 3. The global allocator never hands out live memory twice.
unsafe impl<T> Allocator<T> for Heap {
    #[inline]
    unsafe fn allocate(&self, count: usize) -> NonNull<T> {
        let layout = Self::layout_for::<T>(count);
        debug_assert!(layout.size() > 0);

        // SAFETY: The caller guarantees `count > 0` and that `T` is not
        // zero-sized, so `layout` has a non-zero size.
        let ptr = unsafe {
            // @add-unsafe-context: Layout
            alloc::alloc::alloc(layout)
        };

        match NonNull::new(ptr.cast::<T>()) {
            Some(ptr) => ptr,
            None => handle_alloc_error(layout),
        }
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<T>, count: usize) {
        let layout = Self::layout_for::<T>(count);

        // SAFETY:
        // 1. The caller guarantees `ptr` came from `allocate(count)` on an equal
        //    allocator, which for `Heap` means the global allocator with this
        //    exact layout.
        // 2. The caller guarantees `ptr` has not been released yet.
        unsafe {
            // @add-unsafe-context: Layout
            alloc::alloc::dealloc(ptr.as_ptr().cast::<u8>(), layout);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heap_instances_compare_equal() {
        assert_eq!(Heap, Heap);
        assert_eq!(Heap::default(), Heap);
        assert_eq!(core::mem::size_of::<Heap>(), 0);
    }

    #[test]
    fn test_heap_round_trip() {
        let heap = Heap;

        // SAFETY: `u64` is not zero-sized and 16 elements form a valid layout.
        let ptr: NonNull<u64> = unsafe { heap.allocate(16) };
        assert_eq!(ptr.as_ptr() as usize % core::mem::align_of::<u64>(), 0);

        for i in 0..16 {
            // SAFETY: `i < 16`, so the slot is inside the allocation.
            let slot = unsafe { ptr.as_ptr().add(i) };
            // SAFETY: The slot is valid for writes.
            unsafe { slot.write(i as u64 * 3) };
        }

        // SAFETY: `15 < 16`, so the slot is inside the allocation.
        let last = unsafe { ptr.as_ptr().add(15) };
        // SAFETY: Slot 15 was initialized above.
        let last = unsafe { last.read() };
        assert_eq!(last, 45);

        // SAFETY: `ptr` came from `allocate(16)` on `heap` and was not released.
        unsafe { heap.deallocate(ptr, 16) };
    }

    #[test]
    fn test_send_sync() {
        static_assertions::assert_impl_all!(Heap: Send, Sync, Copy);
    }
}
