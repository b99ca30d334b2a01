use core::{fmt, iter::FusedIterator, slice};

use rudiments_internals::Allocator;

use crate::array::DynArray;

/// FIXME: Once rust-lang/rust#132922 gets resolved, we can make the `start`
/// and `end` fields unsafe fields and remove this module.
mod limit_field_access {
    use rudiments_internals::{Allocator, Heap, RawBuf};

    /// An iterator that moves the elements out of a
    /// [`DynArray`](crate::DynArray), front to back.
    ///
    /// Elements that are never yielded are dropped together with the
    /// iterator, and the storage is released through the array's allocator.
    pub struct IntoIter<T, A: Allocator<T> = Heap> {
        /// The storage taken from the array
        ///
        /// # Safety
        ///
        /// The following safety invariants are guaranteed to be upheld as long
        /// as this struct exists:
        ///
        /// 1. Slots `[start, end)` hold initialized values owned by this
        ///    iterator. All other slots are uninitialized.
        buf: RawBuf<T, A>,

        /// Index of the next element to yield from the front
        ///
        /// # Safety
        ///
        /// 1. `start <= end`
        start: usize,

        /// One past the index of the next element to yield from the back
        ///
        /// # Safety
        ///
        /// 1. `end <= buf.capacity()`
        end: usize,
    }

    impl<T, A: Allocator<T>> IntoIter<T, A> {
        /// Creates an iterator over the first `len` slots of `buf`.
        ///
        /// # Safety
        ///
        /// The caller must ensure:
        ///
        /// 1. `len <= buf.capacity()`
        /// 2. Slots `[0, len)` of `buf` hold initialized values, whose
        ///    ownership is transferred to the iterator.
        #[inline]
        pub(crate) unsafe fn new(buf: RawBuf<T, A>, len: usize) -> Self {
            // SAFETY: We must uphold the safety invariants of the fields:
            // 1. Guaranteed by the caller
            // 2. `0 <= len`
            // 3. Guaranteed by the caller
            Self {
                buf,
                start: 0,
                end: len,
            }
        }

        /// Returns the storage together with the remaining range.
        #[inline]
        pub(crate) fn parts(&self) -> (&RawBuf<T, A>, usize, usize) {
            (&self.buf, self.start, self.end)
        }

        /// Gives up ownership of the front element and returns its index, or
        /// `None` if nothing remains.
        ///
        /// The caller becomes responsible for the value in that slot.
        #[inline]
        pub(crate) fn advance_front(&mut self) -> Option<usize> {
            if self.start == self.end {
                return None;
            }

            // SAFETY: We must uphold the safety invariants of the fields:
            // 1. The slot leaves the owned range and is handed to the caller.
            // 2. `start < end` before the increment.
            let index = self.start;
            self.start += 1;
            Some(index)
        }

        /// Gives up ownership of the back element and returns its index, or
        /// `None` if nothing remains.
        ///
        /// The caller becomes responsible for the value in that slot.
        #[inline]
        pub(crate) fn advance_back(&mut self) -> Option<usize> {
            if self.start == self.end {
                return None;
            }

            // SAFETY: We must uphold the safety invariants of the fields:
            // 1. The slot leaves the owned range and is handed to the caller.
            // 2. `start < end` before the decrement.
            // 3. The decrement only lowers `end`.
            self.end -= 1;
            Some(self.end)
        }
    }
}

pub use self::limit_field_access::IntoIter;

impl<T, A: Allocator<T>> IntoIter<T, A> {
    /// Returns the elements that have not been yielded yet.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        let (buf, start, end) = self.parts();

        // SAFETY: `start <= end <= capacity`, so the offset stays within the
        // allocation.
        let first = unsafe { buf.as_ptr().add(start) };

        // SAFETY: Slots `[start, end)` are initialized and borrowed through
        // `self`.
        unsafe { slice::from_raw_parts(first, end - start) }
    }

    /// Reads the value out of `index` of a slot just given up by the
    /// iterator.
    #[inline]
    fn take_slot(&self, index: usize) -> T {
        let (buf, _, _) = self.parts();

        // SAFETY: The index came from `advance_front`/`advance_back`, so it is
        // within the allocation.
        let slot = unsafe { buf.as_ptr().add(index) };

        // SAFETY: The slot is initialized and no longer owned by the iterator,
        // so the value is read out exactly once.
        unsafe { slot.read() }
    }
}

impl<T, A: Allocator<T>> Iterator for IntoIter<T, A> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        let index = self.advance_front()?;
        Some(self.take_slot(index))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.as_slice().len();
        (len, Some(len))
    }
}

impl<T, A: Allocator<T>> DoubleEndedIterator for IntoIter<T, A> {
    #[inline]
    fn next_back(&mut self) -> Option<T> {
        let index = self.advance_back()?;
        Some(self.take_slot(index))
    }
}

impl<T, A: Allocator<T>> ExactSizeIterator for IntoIter<T, A> {}

impl<T, A: Allocator<T>> FusedIterator for IntoIter<T, A> {}

impl<T, A: Allocator<T>> Drop for IntoIter<T, A> {
    fn drop(&mut self) {
        while let Some(index) = self.advance_front() {
            drop(self.take_slot(index));
        }
    }
}

impl<T: fmt::Debug, A: Allocator<T>> fmt::Debug for IntoIter<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

impl<T, A: Allocator<T>> IntoIterator for DynArray<T, A> {
    type IntoIter = IntoIter<T, A>;
    type Item = T;

    #[inline]
    fn into_iter(self) -> IntoIter<T, A> {
        let (buf, len) = self.into_raw_parts();

        // SAFETY:
        // 1. `len <= capacity` by the invariants of the array.
        // 2. The first `len` slots were live and the array gave them up.
        unsafe { IntoIter::new(buf, len) }
    }
}

impl<'a, T, A: Allocator<T>> IntoIterator for &'a DynArray<T, A> {
    type IntoIter = slice::Iter<'a, T>;
    type Item = &'a T;

    #[inline]
    fn into_iter(self) -> slice::Iter<'a, T> {
        self.as_slice().iter()
    }
}

impl<'a, T, A: Allocator<T>> IntoIterator for &'a mut DynArray<T, A> {
    type IntoIter = slice::IterMut<'a, T>;
    type Item = &'a mut T;

    #[inline]
    fn into_iter(self) -> slice::IterMut<'a, T> {
        self.as_mut_slice().iter_mut()
    }
}
