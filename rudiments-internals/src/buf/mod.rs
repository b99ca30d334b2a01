//! Capacity-tracked raw storage.
//!
//! This module encapsulates the fields of [`RawBuf`], ensuring the pointer,
//! capacity and allocator can only change together, inside [`raw`]. A
//! [`RawBuf`] tracks *allocated* slots only; which of them hold live values
//! is always the caller's business.

use core::{
    alloc::Layout,
    fmt,
    mem::{align_of, size_of},
};

mod raw;

pub use self::raw::RawBuf;

/// Largest number of elements any buffer may hold.
///
/// Requests above this ceiling are reported as [`CapacityOverflow`] instead
/// of being forwarded to the allocator.
pub const MAX_CAPACITY: usize = 1 << 30;

/// Returns the largest capacity a buffer of `T` may have.
///
/// This is [`MAX_CAPACITY`] unless `MAX_CAPACITY` elements of `T` would not
/// fit in a memory layout, in which case it is the largest count that does.
#[inline]
#[must_use]
pub const fn max_capacity_for<T>() -> usize {
    let size = size_of::<T>();
    if size == 0 {
        return MAX_CAPACITY;
    }
    let layout_max = (isize::MAX as usize - (align_of::<T>() - 1)) / size;
    if layout_max < MAX_CAPACITY {
        layout_max
    } else {
        MAX_CAPACITY
    }
}

/// A requested capacity was above the largest capacity for the element
/// type, see [`max_capacity_for`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CapacityOverflow {
    /// The capacity that was asked for.
    pub requested: usize,
    /// The largest capacity the element type allows.
    pub max: usize,
}

impl fmt::Display for CapacityOverflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "requested capacity {} exceeds the maximum of {} elements",
            self.requested, self.max
        )
    }
}

impl core::error::Error for CapacityOverflow {}

/// Checks that `capacity` elements of `T` are below the ceiling and form a
/// valid layout.
#[inline]
pub(crate) fn check_capacity<T>(capacity: usize) -> Result<(), CapacityOverflow> {
    let max = max_capacity_for::<T>();
    if capacity > max || Layout::array::<T>(capacity).is_err() {
        return Err(CapacityOverflow {
            requested: capacity,
            max,
        });
    }
    Ok(())
}
