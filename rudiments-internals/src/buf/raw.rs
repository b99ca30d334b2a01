//! The owned raw buffer type.
//!
//! This module encapsulates the `ptr`, `cap` and `alloc` fields of
//! [`RawBuf`], ensuring they are only visible within this module. This
//! visibility restriction guarantees the safety invariant: **a non-dangling
//! pointer always comes from `alloc.allocate(cap)`**.
//!
//! # Safety Invariant
//!
//! The fields can only be set by [`RawBuf::new_in`] (which owns nothing) and
//! [`RawBuf::relocate`] (which allocates through `alloc` and records the exact
//! capacity it asked for). The [`Drop`] implementation relies on this to hand
//! the storage back with the same count it was allocated with.

use core::{marker::PhantomData, mem, ptr::NonNull};

use crate::{
    allocator::{Allocator, Heap},
    buf::{CapacityOverflow, check_capacity},
};

/// An owned, contiguous and uninitialized slab of `T`.
///
/// [`RawBuf`] knows how many slots it owns but not which of them are live. It
/// never reads, writes or drops elements on its own; those operations are
/// left to the container wrapping it, which tracks the live prefix.
///
/// Zero-sized element types never touch the allocator: the capacity is kept
/// as a logical count and the pointer stays dangling.
pub struct RawBuf<T, A: Allocator<T> = Heap> {
    /// Pointer to the first slot
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. If `cap == 0` or `T` is zero-sized, the pointer is
    ///    [`NonNull::dangling`] and no storage is owned.
    /// 2. Otherwise the pointer was returned by `alloc.allocate(cap)` and has
    ///    not been deallocated.
    ptr: NonNull<T>,

    /// Number of slots owned
    ///
    /// # Safety
    ///
    /// 1. `cap <= MAX_CAPACITY`, and `cap` elements of `T` form a valid layout.
    cap: usize,

    /// Allocator the storage came from
    alloc: A,

    /// Marker to tell the compiler that we logically own values of type `T`
    _owns: PhantomData<T>,
}

impl<T, A: Allocator<T>> RawBuf<T, A> {
    /// Whether `T` occupies no memory.
    const IS_ZST: bool = mem::size_of::<T>() == 0;

    /// Creates an empty buffer that owns no storage.
    #[inline]
    #[must_use]
    pub const fn new_in(alloc: A) -> Self {
        Self {
            ptr: NonNull::dangling(),
            cap: 0,
            alloc,
            _owns: PhantomData,
        }
    }

    /// Creates a buffer with exactly `capacity` slots.
    ///
    /// Returns [`CapacityOverflow`] if `capacity` is above
    /// [`max_capacity_for::<T>()`](crate::max_capacity_for).
    #[inline]
    pub fn with_capacity_in(capacity: usize, alloc: A) -> Result<Self, CapacityOverflow> {
        let mut buf = Self::new_in(alloc);

        // SAFETY:
        // 1. `0 <= buf.cap`
        // 2. `0 <= capacity`
        // 3. The empty prefix is trivially initialized.
        unsafe {
            buf.relocate(0, capacity)?;
        }

        Ok(buf)
    }

    /// Returns the number of slots owned by this buffer.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// Returns a pointer to the first slot.
    ///
    /// The pointer is dangling when nothing is allocated.
    #[inline]
    #[must_use]
    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    /// Returns a mutable pointer to the first slot.
    ///
    /// The pointer is dangling when nothing is allocated.
    #[inline]
    #[must_use]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Returns the allocator the storage came from.
    #[inline]
    #[must_use]
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Returns whether storage owned by `other` could be released through
    /// this buffer's allocator, and vice versa.
    #[inline]
    #[must_use]
    pub fn is_compatible(&self, other: &Self) -> bool {
        self.alloc == other.alloc
    }

    /// Moves the buffer to fresh storage of exactly `new_cap` slots.
    ///
    /// The first `len` slots are transferred bitwise; the old storage is then
    /// released. Moving a value in Rust is a plain memory copy that cannot
    /// fail, so once the ceiling check has passed the whole operation either
    /// completes or aborts on allocation failure. When `new_cap` is zero all
    /// storage is released.
    ///
    /// Returns [`CapacityOverflow`] without touching the buffer if `new_cap`
    /// is above [`max_capacity_for::<T>()`](crate::max_capacity_for).
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `len <= self.capacity()`
    /// 2. `len <= new_cap`
    /// 3. Slots `[0, len)` hold initialized values. Slots past `len` are
    ///    treated as uninitialized and are not transferred.
    pub unsafe fn relocate(&mut self, len: usize, new_cap: usize) -> Result<(), CapacityOverflow> {
        debug_assert!(len <= self.cap);
        debug_assert!(len <= new_cap);

        check_capacity::<T>(new_cap)?;
        if new_cap == self.cap {
            return Ok(());
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(
            element = core::any::type_name::<T>(),
            len,
            old_capacity = self.cap,
            new_capacity = new_cap,
            "relocating buffer"
        );

        if Self::IS_ZST {
            self.cap = new_cap;
            return Ok(());
        }

        let new_ptr = if new_cap == 0 {
            NonNull::dangling()
        } else {
            // SAFETY:
            // 1. `new_cap > 0` and `T` is not zero-sized.
            // 2. `check_capacity` verified the layout above.
            unsafe {
                // @add-unsafe-context: Allocator
                self.alloc.allocate(new_cap)
            }
        };

        if len > 0 {
            // SAFETY:
            // 1. The source holds `len` initialized values (guaranteed by the
            //    caller) inside an allocation of `self.cap >= len` slots.
            // 2. The destination is a fresh allocation of `new_cap >= len` slots,
            //    so the ranges cannot overlap.
            unsafe {
                core::ptr::copy_nonoverlapping(self.ptr.as_ptr(), new_ptr.as_ptr(), len);
            }
        }

        let old_ptr = mem::replace(&mut self.ptr, new_ptr);
        let old_cap = mem::replace(&mut self.cap, new_cap);
        if old_cap > 0 {
            // SAFETY:
            // 1. `old_cap > 0` and `T` is not zero-sized, so by the type
            //    invariants `old_ptr` came from `self.alloc.allocate(old_cap)`.
            // 2. It is released exactly once here; the fields now describe the
            //    new storage.
            // 3. Its live values were copied out above and are now owned by the
            //    new storage.
            unsafe {
                // @add-unsafe-context: Allocator
                self.alloc.deallocate(old_ptr, old_cap);
            }
        }

        Ok(())
    }
}

impl<T, A: Allocator<T>> Drop for RawBuf<T, A> {
    #[inline]
    fn drop(&mut self) {
        if Self::IS_ZST || self.cap == 0 {
            return;
        }

        // SAFETY:
        // 1. By the type invariants the pointer came from
        //    `self.alloc.allocate(self.cap)`.
        // 2. We are in the drop function, so the storage is released exactly
        //    once and not used afterwards.
        // 3. The wrapping container drops its live values before this runs.
        unsafe {
            // @add-unsafe-context: Allocator
            self.alloc.deallocate(self.ptr, self.cap);
        }
    }
}

// SAFETY: A `RawBuf` owns its slots the same way a `Box<[T]>` does, so it may
// cross threads whenever the values and the allocator may.
unsafe impl<T: Send, A: Allocator<T> + Send> Send for RawBuf<T, A> {}

// SAFETY: Shared access to a `RawBuf` only hands out `*const T`, which is
// sound to share whenever `T` and the allocator can be shared.
unsafe impl<T: Sync, A: Allocator<T> + Sync> Sync for RawBuf<T, A> {}
