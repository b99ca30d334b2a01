//! Error types returned by the checked operations of this crate.
//!
//! Every error is a small `Copy` value that is reported straight to the
//! caller. Nothing in this crate retries, suppresses or logs an error.

use rudiments_internals::CapacityOverflow;

/// A checked access asked for a position at or past the end.
///
/// Returned by [`DynArray::at`](crate::DynArray::at) and the bounds-checked
/// methods of [`StrSpan`](crate::StrSpan).
///
/// # Examples
///
/// ```
/// use rudiments::{DynArray, errors::OutOfRange};
///
/// let array = DynArray::from([1, 2, 3]);
/// assert_eq!(array.at(3), Err(OutOfRange { index: 3, len: 3 }));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, derive_more::Display, derive_more::Error)]
#[display("position {index} is out of range for length {len}")]
pub struct OutOfRange {
    /// The position that was asked for.
    pub index: usize,
    /// The number of valid positions at the time of the call.
    pub len: usize,
}

/// A requested capacity exceeds the largest capacity for the element type.
///
/// That limit is [`DynArray::max_size`](crate::DynArray::max_size), or less
/// when that many elements would not fit in a memory layout.
///
/// The container that reported it is left exactly as it was before the call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, derive_more::Display, derive_more::Error)]
#[display("requested capacity {requested} exceeds the maximum of {max} elements")]
pub struct LengthError {
    /// The capacity that was asked for.
    pub requested: usize,
    /// The largest capacity the element type allows.
    pub max: usize,
}

impl From<CapacityOverflow> for LengthError {
    #[inline]
    fn from(error: CapacityOverflow) -> Self {
        Self {
            requested: error.requested,
            max: error.max,
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            OutOfRange { index: 7, len: 2 }.to_string(),
            "position 7 is out of range for length 2"
        );
        assert_eq!(
            LengthError {
                requested: 9,
                max: 8
            }
            .to_string(),
            "requested capacity 9 exceeds the maximum of 8 elements"
        );
    }

    #[test]
    fn test_from_capacity_overflow() {
        let error = LengthError::from(CapacityOverflow {
            requested: 42,
            max: 40,
        });
        assert_eq!(error.requested, 42);
        assert_eq!(error.max, 40);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_layout_limit_is_reported() {
        use crate::DynArray;

        type Huge = [u8; 1 << 33];
        let max = rudiments_internals::max_capacity_for::<Huge>();
        let error = DynArray::<Huge>::try_with_capacity(max + 1).unwrap_err();
        assert_eq!(
            error,
            LengthError {
                requested: max + 1,
                max,
            }
        );
        assert!(error.max < rudiments_internals::MAX_CAPACITY);
        assert_eq!(
            error.to_string(),
            alloc::format!("requested capacity {} exceeds the maximum of {max} elements", max + 1)
        );
    }

    #[test]
    fn test_errors_are_errors() {
        static_assertions::assert_impl_all!(OutOfRange: core::error::Error, Send, Sync, Copy);
        static_assertions::assert_impl_all!(LengthError: core::error::Error, Send, Sync, Copy);
    }
}
