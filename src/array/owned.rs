use core::{iter, ptr, slice};

use rudiments_internals::{Allocator, Heap, MAX_CAPACITY};

use crate::errors::{LengthError, OutOfRange};

/// FIXME: Once rust-lang/rust#132922 gets resolved, we can make the `len`
/// field an unsafe field and remove this module.
mod limit_field_access {
    use core::{mem::ManuallyDrop, ptr};

    use rudiments_internals::{Allocator, CapacityOverflow, Heap, RawBuf};

    use crate::errors::LengthError;

    /// A contiguous, growable array of `T` whose storage comes from an
    /// [`Allocator`].
    ///
    /// The first [`len`] slots of the storage hold live elements and the
    /// remaining `capacity - len` slots are allocated but uninitialized. The
    /// capacity never exceeds [`max_size`].
    ///
    /// Growth follows a fixed doubling policy: a full array with capacity
    /// `0` grows to `1`, otherwise to twice its capacity (or to exactly what
    /// is needed, if that is more).
    ///
    /// # Examples
    ///
    /// ```
    /// use rudiments::DynArray;
    ///
    /// let mut array = DynArray::from_elem(5, "x");
    /// array.push("y");
    /// assert_eq!(array, ["x", "x", "x", "x", "x", "y"]);
    /// assert!(array.capacity() >= 6);
    /// ```
    ///
    /// [`len`]: DynArray::len
    /// [`max_size`]: DynArray::max_size
    pub struct DynArray<T, A: Allocator<T> = Heap> {
        /// The owned storage
        ///
        /// # Safety
        ///
        /// The following safety invariants are guaranteed to be upheld as long
        /// as this struct exists:
        ///
        /// 1. Slots `[0, len)` hold initialized values owned by this array.
        buf: RawBuf<T, A>,

        /// Number of live elements
        ///
        /// # Safety
        ///
        /// 1. `len <= buf.capacity()`
        len: usize,
    }

    impl<T, A: Allocator<T>> DynArray<T, A> {
        /// Creates an empty array with zero capacity that allocates through
        /// `alloc`.
        #[inline]
        #[must_use]
        pub const fn new_in(alloc: A) -> Self {
            // SAFETY: We must uphold the safety invariants of the fields:
            // 1. There are no live slots.
            // 2. `0 <= 0`
            Self {
                buf: RawBuf::new_in(alloc),
                len: 0,
            }
        }

        /// Creates an empty array with room for exactly `capacity` elements.
        ///
        /// Returns [`LengthError`] if `capacity` exceeds
        /// [`max_size`](DynArray::max_size).
        #[inline]
        pub fn try_with_capacity_in(capacity: usize, alloc: A) -> Result<Self, LengthError> {
            let buf = RawBuf::with_capacity_in(capacity, alloc)?;

            // SAFETY: We must uphold the safety invariants of the fields:
            // 1. There are no live slots.
            // 2. `0 <= capacity`
            Ok(Self { buf, len: 0 })
        }

        /// Returns the number of live elements.
        #[inline]
        #[must_use]
        pub fn len(&self) -> usize {
            self.len
        }

        /// Returns the number of elements the array can hold without
        /// relocating.
        #[inline]
        #[must_use]
        pub fn capacity(&self) -> usize {
            self.buf.capacity()
        }

        /// Returns the allocator this array draws its storage from.
        #[inline]
        #[must_use]
        pub fn allocator(&self) -> &A {
            self.buf.allocator()
        }

        /// Returns a pointer to the first slot.
        ///
        /// The pointer is dangling when the capacity is zero, and is
        /// invalidated by any operation that relocates the storage.
        #[inline]
        #[must_use]
        pub fn as_ptr(&self) -> *const T {
            self.buf.as_ptr()
        }

        /// Returns a mutable pointer to the first slot.
        ///
        /// The pointer is dangling when the capacity is zero, and is
        /// invalidated by any operation that relocates the storage.
        #[inline]
        #[must_use]
        pub fn as_mut_ptr(&mut self) -> *mut T {
            self.buf.as_mut_ptr()
        }

        /// Sets the number of live elements.
        ///
        /// # Safety
        ///
        /// The caller must ensure:
        ///
        /// 1. `new_len <= self.capacity()`
        /// 2. Slots `[0, new_len)` hold initialized values, and any values
        ///    in slots `[new_len, old_len)` have been moved out or dropped.
        #[inline]
        pub(crate) unsafe fn set_len(&mut self, new_len: usize) {
            debug_assert!(new_len <= self.capacity());

            // SAFETY: We must uphold the safety invariants of the fields:
            // 1. Guaranteed by the caller
            // 2. Guaranteed by the caller
            self.len = new_len;
        }

        /// Moves the live elements to storage of exactly `new_cap` slots.
        ///
        /// `new_cap` is raised to the current length if it is smaller.
        #[inline]
        pub(crate) fn relocate(&mut self, new_cap: usize) -> Result<(), CapacityOverflow> {
            let new_cap = new_cap.max(self.len);

            // SAFETY:
            // 1. `self.len <= self.buf.capacity()` by the type invariants.
            // 2. `self.len <= new_cap` because of the `max` above.
            // 3. Slots `[0, self.len)` are initialized by the type invariants.
            unsafe { self.buf.relocate(self.len, new_cap) }
        }

        /// Takes the storage out of the array without dropping any element.
        ///
        /// The caller becomes responsible for the first `len` slots of the
        /// returned buffer.
        #[inline]
        pub(crate) fn into_raw_parts(self) -> (RawBuf<T, A>, usize) {
            let this = ManuallyDrop::new(self);
            let len = this.len;

            // SAFETY: `this` is never dropped, so the buffer is moved out
            // exactly once and the original copy is never touched again.
            let buf = unsafe { ptr::read(&this.buf) };

            (buf, len)
        }
    }

    impl<T, A: Allocator<T>> Drop for DynArray<T, A> {
        #[inline]
        fn drop(&mut self) {
            let live = ptr::slice_from_raw_parts_mut(self.buf.as_mut_ptr(), self.len);

            // SAFETY:
            // 1. By the type invariants the first `len` slots are initialized and
            //    owned by this array.
            // 2. We are in the drop function, so they are dropped exactly once and
            //    never used again. The buffer releases the storage afterwards.
            unsafe {
                ptr::drop_in_place(live);
            }
        }
    }
}

pub use self::limit_field_access::DynArray;

impl<T> DynArray<T> {
    /// Creates an empty array with zero capacity.
    ///
    /// Does not allocate.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self::new_in(Heap)
    }

    /// Creates an empty array with room for exactly `capacity` elements.
    ///
    /// Returns [`LengthError`] if `capacity` exceeds
    /// [`max_size`](DynArray::max_size).
    #[inline]
    pub fn try_with_capacity(capacity: usize) -> Result<Self, LengthError> {
        Self::try_with_capacity_in(capacity, Heap)
    }

    /// Creates an array of `count` default values; its capacity is exactly
    /// `count`.
    ///
    /// # Panics
    ///
    /// Panics if `count` exceeds [`max_size`](DynArray::max_size).
    #[inline]
    #[must_use]
    #[track_caller]
    pub fn with_default(count: usize) -> Self
    where
        T: Default,
    {
        Self::with_default_in(count, Heap)
    }

    /// Creates an array of `count` clones of `value`; its capacity is exactly
    /// `count`.
    ///
    /// # Panics
    ///
    /// Panics if `count` exceeds [`max_size`](DynArray::max_size).
    #[inline]
    #[must_use]
    #[track_caller]
    pub fn from_elem(count: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::from_elem_in(count, value, Heap)
    }

    /// Creates an array holding clones of the elements of `slice`; its
    /// capacity is exactly `slice.len()`.
    #[inline]
    #[must_use]
    #[track_caller]
    pub fn from_slice(slice: &[T]) -> Self
    where
        T: Clone,
    {
        Self::from_iter_in(slice.iter().cloned(), Heap)
    }
}

impl<T, A: Allocator<T>> DynArray<T, A> {
    /// Creates an array of `count` default values that allocates through
    /// `alloc`.
    ///
    /// # Panics
    ///
    /// Panics if `count` exceeds [`max_size`](DynArray::max_size).
    #[inline]
    #[must_use]
    #[track_caller]
    pub fn with_default_in(count: usize, alloc: A) -> Self
    where
        T: Default,
    {
        Self::from_iter_in(iter::repeat_with(T::default).take(count), alloc)
    }

    /// Creates an array of `count` clones of `value` that allocates through
    /// `alloc`.
    ///
    /// # Panics
    ///
    /// Panics if `count` exceeds [`max_size`](DynArray::max_size).
    #[inline]
    #[must_use]
    #[track_caller]
    pub fn from_elem_in(count: usize, value: T, alloc: A) -> Self
    where
        T: Clone,
    {
        Self::from_iter_in(iter::repeat_n(value, count), alloc)
    }

    /// Creates an array from the items of `iter`, allocating through `alloc`.
    /// The resulting capacity always equals the length.
    ///
    /// The storage is sized once up front from the iterator's size hint. An
    /// iterator whose hint does not pin down its length grows the array as
    /// it goes, and the storage is then shrunk to the final length.
    ///
    /// # Panics
    ///
    /// Panics if the iterator yields more than
    /// [`max_size`](DynArray::max_size) items.
    #[inline]
    #[must_use]
    #[track_caller]
    pub fn from_iter_in<I: IntoIterator<Item = T>>(iter: I, alloc: A) -> Self {
        let mut array = Self::new_in(alloc);
        array.append_iter(iter.into_iter());
        array.shrink_to_fit();
        array
    }

    /// Returns `true` if the array holds no elements.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the largest capacity an array can have,
    /// [`MAX_CAPACITY`](crate::allocator::MAX_CAPACITY).
    #[inline]
    #[must_use]
    pub const fn max_size(&self) -> usize {
        MAX_CAPACITY
    }

    /// Returns the live elements as a slice.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY:
        // 1. The pointer is non-null and aligned, dangling only when nothing is
        //    allocated, in which case `len == 0`.
        // 2. The first `len` slots are initialized and borrowed through `self`.
        unsafe { slice::from_raw_parts(self.as_ptr(), self.len()) }
    }

    /// Returns the live elements as a mutable slice.
    #[inline]
    #[must_use]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        let len = self.len();

        // SAFETY:
        // 1. The pointer is non-null and aligned, dangling only when nothing is
        //    allocated, in which case `len == 0`.
        // 2. The first `len` slots are initialized and exclusively borrowed
        //    through `self`.
        unsafe { slice::from_raw_parts_mut(self.as_mut_ptr(), len) }
    }

    /// Returns the element at `pos`, or [`OutOfRange`] if `pos >= len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rudiments::dyn_array;
    ///
    /// let array = dyn_array![10, 2];
    /// assert_eq!(array.at(1), Ok(&2));
    /// assert!(array.at(2).is_err());
    /// ```
    #[inline]
    pub fn at(&self, pos: usize) -> Result<&T, OutOfRange> {
        let len = self.len();
        self.as_slice()
            .get(pos)
            .ok_or(OutOfRange { index: pos, len })
    }

    /// Returns the element at `pos` mutably, or [`OutOfRange`] if
    /// `pos >= len`.
    #[inline]
    pub fn at_mut(&mut self, pos: usize) -> Result<&mut T, OutOfRange> {
        let len = self.len();
        self.as_mut_slice()
            .get_mut(pos)
            .ok_or(OutOfRange { index: pos, len })
    }

    /// Returns the first element, or `None` if the array is empty.
    #[inline]
    #[must_use]
    pub fn front(&self) -> Option<&T> {
        self.as_slice().first()
    }

    /// Returns the first element mutably, or `None` if the array is empty.
    #[inline]
    #[must_use]
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice().first_mut()
    }

    /// Returns the last element, or `None` if the array is empty.
    #[inline]
    #[must_use]
    pub fn back(&self) -> Option<&T> {
        self.as_slice().last()
    }

    /// Returns the last element mutably, or `None` if the array is empty.
    #[inline]
    #[must_use]
    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice().last_mut()
    }

    /// Grows the capacity to exactly `new_cap` if it is currently smaller.
    ///
    /// Does nothing when `new_cap <= capacity`. Otherwise the elements are
    /// moved to fresh storage and every pointer into the array is
    /// invalidated. The length never changes.
    ///
    /// # Errors
    ///
    /// Returns [`LengthError`] if `new_cap` exceeds
    /// [`max_size`](DynArray::max_size). The array is left exactly as it was.
    ///
    /// # Examples
    ///
    /// ```
    /// use rudiments::DynArray;
    ///
    /// let mut array = DynArray::<u8>::new();
    /// array.reserve(10).unwrap();
    /// assert_eq!(array.capacity(), 10);
    /// assert!(array.reserve(array.max_size() + 1).is_err());
    /// assert_eq!(array.capacity(), 10);
    /// ```
    #[inline]
    pub fn reserve(&mut self, new_cap: usize) -> Result<(), LengthError> {
        if new_cap <= self.capacity() {
            return Ok(());
        }
        self.relocate(new_cap)?;
        Ok(())
    }

    /// Drops the unused capacity.
    ///
    /// An empty array releases its storage entirely. Calling this twice in a
    /// row is the same as calling it once.
    #[inline]
    pub fn shrink_to_fit(&mut self) {
        let len = self.len();
        if len != self.capacity() {
            self.relocate_or_panic(len);
        }
    }

    /// Appends `value` and returns a reference to it.
    ///
    /// If the array is full, the capacity grows first following the doubling
    /// policy (`0 -> 1`, then `n -> 2n`).
    ///
    /// # Panics
    ///
    /// Panics if the array already holds [`max_size`](DynArray::max_size)
    /// elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use rudiments::DynArray;
    ///
    /// let mut array = DynArray::new();
    /// let capacities: Vec<usize> = (0..3)
    ///     .map(|i| {
    ///         array.push(i);
    ///         array.capacity()
    ///     })
    ///     .collect();
    /// assert_eq!(capacities, [1, 2, 4]);
    /// ```
    #[inline]
    #[track_caller]
    pub fn push(&mut self, value: T) -> &mut T {
        self.grow_for(1);
        let len = self.len();

        // SAFETY: `len < capacity` after `grow_for(1)`.
        let slot = unsafe { self.as_mut_ptr().add(len) };

        // SAFETY: The slot is allocated and uninitialized.
        unsafe { slot.write(value) };

        // SAFETY:
        // 1. `len + 1 <= capacity`
        // 2. The new slot was initialized above.
        unsafe { self.set_len(len + 1) };

        // SAFETY: The slot is initialized and exclusively borrowed through `self`.
        unsafe { &mut *slot }
    }

    /// Makes room for one more element, then appends the value produced by
    /// `make` and returns a reference to it.
    ///
    /// If `make` panics the array keeps its elements, though its capacity
    /// may have grown.
    ///
    /// # Panics
    ///
    /// Panics if the array already holds [`max_size`](DynArray::max_size)
    /// elements.
    #[inline]
    #[track_caller]
    pub fn push_with<F: FnOnce() -> T>(&mut self, make: F) -> &mut T {
        self.grow_for(1);
        self.push(make())
    }

    /// Removes the last element and returns it, or `None` if the array is
    /// empty. The capacity is unchanged.
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        let new_len = self.len().checked_sub(1)?;

        // SAFETY:
        // 1. `new_len < len <= capacity`
        // 2. The value in the last slot is read out right below.
        unsafe { self.set_len(new_len) };

        // SAFETY: `new_len` is within the allocation.
        let slot = unsafe { self.as_ptr().add(new_len) };

        // SAFETY: The slot was initialized and is no longer considered live.
        Some(unsafe { slot.read() })
    }

    /// Drops every element past the first `len`. Does nothing if the array is
    /// not longer than `len`. The capacity is unchanged.
    #[inline]
    pub fn truncate(&mut self, len: usize) {
        let old_len = self.len();
        if len >= old_len {
            return;
        }

        // SAFETY:
        // 1. `len < old_len <= capacity`
        // 2. The values in `[len, old_len)` are dropped right below.
        unsafe { self.set_len(len) };

        // SAFETY: `len` is within the allocation.
        let tail_start = unsafe { self.as_mut_ptr().add(len) };
        let tail = ptr::slice_from_raw_parts_mut(tail_start, old_len - len);

        // SAFETY: The tail was initialized and is no longer considered live, so
        // its values are dropped exactly once.
        unsafe { ptr::drop_in_place(tail) };
    }

    /// Drops every element. The capacity is unchanged.
    #[inline]
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Exchanges the storage, length, capacity and allocator of `self` and
    /// `other`. No element is touched.
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        core::mem::swap(self, other);
    }

    /// Moves the whole array out, leaving `self` empty with zero capacity.
    ///
    /// # Examples
    ///
    /// ```
    /// use rudiments::dyn_array;
    ///
    /// let mut a = dyn_array![1, 2, 3];
    /// let b = a.take();
    /// assert_eq!((a.len(), a.capacity()), (0, 0));
    /// assert_eq!(b, [1, 2, 3]);
    /// ```
    #[inline]
    #[must_use = "use `clear` to drop the elements in place"]
    pub fn take(&mut self) -> Self {
        let alloc = self.allocator().clone();
        core::mem::replace(self, Self::new_in(alloc))
    }

    /// Replaces the contents of `self` with those of `source`, leaving
    /// `source` empty with zero capacity.
    ///
    /// When the allocators compare equal the storage changes hands as a
    /// whole. Otherwise the elements are moved one by one into storage from
    /// `self`'s allocator and `source`'s storage is released through its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use rudiments::dyn_array;
    ///
    /// let mut a = dyn_array![1];
    /// let mut b = dyn_array![4, 5, 6];
    /// a.move_from(&mut b);
    /// assert_eq!(a, [4, 5, 6]);
    /// assert_eq!((b.len(), b.capacity()), (0, 0));
    /// ```
    #[track_caller]
    pub fn move_from(&mut self, source: &mut Self) {
        if self.allocator() == source.allocator() {
            *self = source.take();
            return;
        }

        let count = source.len();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            element = core::any::type_name::<T>(),
            count,
            "allocators differ, moving elements one by one"
        );

        self.clear();
        if count > self.capacity() {
            self.relocate_or_panic(count);
        }

        // SAFETY:
        // 1. `source` has `count` initialized slots.
        // 2. `self` has at least `count` slots after the relocation above.
        // 3. The two arrays own distinct storage.
        unsafe {
            ptr::copy_nonoverlapping(source.as_ptr(), self.as_mut_ptr(), count);
        }

        // SAFETY:
        // 1. `0 <= capacity`
        // 2. The values were moved out above.
        unsafe { source.set_len(0) };

        // SAFETY:
        // 1. `count <= capacity`
        // 2. The first `count` slots were initialized above.
        unsafe { self.set_len(count) };

        source.shrink_to_fit();
    }

    /// Inserts `value` before position `pos`, shifting every later element
    /// one slot to the right, and returns a reference to it.
    ///
    /// # Panics
    ///
    /// Panics if `pos > len`, or if the array already holds
    /// [`max_size`](DynArray::max_size) elements.
    #[inline]
    #[track_caller]
    pub fn insert(&mut self, pos: usize, value: T) -> &mut T {
        let len = self.len();
        if pos > len {
            insert_out_of_range(pos, len);
        }
        self.grow_for(1);

        // SAFETY: `pos <= len < capacity` after `grow_for(1)`.
        let slot = unsafe { self.as_mut_ptr().add(pos) };
        if pos < len {
            // SAFETY: `pos + 1 <= len < capacity`.
            let dst = unsafe { slot.add(1) };

            // SAFETY: Both ranges lie within the allocation since `len + 1 <=
            // capacity`. `ptr::copy` allows them to overlap.
            unsafe {
                ptr::copy(slot, dst, len - pos);
            }
        }

        // SAFETY: The slot was vacated above (or was never initialized).
        unsafe { slot.write(value) };

        // SAFETY:
        // 1. `len + 1 <= capacity`
        // 2. Slots `[0, len + 1)` are initialized after the shift and write.
        unsafe { self.set_len(len + 1) };

        // SAFETY: The slot is initialized and exclusively borrowed through `self`.
        unsafe { &mut *slot }
    }

    /// Inserts `count` clones of `value` before position `pos`.
    ///
    /// Inserting zero elements leaves the array untouched, including its
    /// storage.
    ///
    /// # Panics
    ///
    /// Panics if `pos > len`, or if the result would exceed
    /// [`max_size`](DynArray::max_size) elements.
    #[inline]
    #[track_caller]
    pub fn insert_n(&mut self, pos: usize, count: usize, value: T)
    where
        T: Clone,
    {
        self.insert_iter(pos, iter::repeat_n(value, count));
    }

    /// Inserts the items of `iter` before position `pos`, keeping their
    /// order, and returns how many were inserted.
    ///
    /// The capacity grows at most once for the iterator's lower size bound,
    /// then as needed. An empty iterator leaves the array untouched,
    /// including its storage.
    ///
    /// If the iterator panics the array keeps exactly its previous elements,
    /// though its capacity may have grown.
    ///
    /// # Panics
    ///
    /// Panics if `pos > len`, or if the result would exceed
    /// [`max_size`](DynArray::max_size) elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use rudiments::dyn_array;
    ///
    /// let mut array = dyn_array![1, 5];
    /// assert_eq!(array.insert_iter(1, 2..5), 3);
    /// assert_eq!(array, [1, 2, 3, 4, 5]);
    /// ```
    #[track_caller]
    pub fn insert_iter<I: IntoIterator<Item = T>>(&mut self, pos: usize, iter: I) -> usize {
        let len = self.len();
        if pos > len {
            insert_out_of_range(pos, len);
        }

        let mut guard = TruncateOnUnwind {
            array: &mut *self,
            keep: len,
        };
        guard.array.append_iter(iter.into_iter());
        guard.keep = guard.array.len();
        drop(guard);

        let inserted = self.len() - len;
        if inserted > 0 && pos < len {
            self.as_mut_slice()[pos..].rotate_right(inserted);
        }
        inserted
    }

    /// Appends the items of `iter`, reserving its lower size bound first.
    #[track_caller]
    pub(crate) fn append_iter<I: Iterator<Item = T>>(&mut self, iter: I) {
        let (lower, _) = iter.size_hint();
        if lower > 0 {
            self.grow_for(lower);
        }
        for value in iter {
            self.push(value);
        }
    }

    /// Makes room for `additional` more elements using the doubling policy.
    #[inline]
    #[track_caller]
    fn grow_for(&mut self, additional: usize) {
        let len = self.len();
        let cap = self.capacity();
        if additional <= cap - len {
            return;
        }

        let required = match len.checked_add(additional) {
            Some(required) if required <= MAX_CAPACITY => required,
            _ => capacity_overflow(),
        };
        let doubled = if cap == 0 { 1 } else { cap.saturating_mul(2) };
        self.relocate_or_panic(required.max(doubled).min(MAX_CAPACITY));
    }

    #[inline]
    #[track_caller]
    fn relocate_or_panic(&mut self, new_cap: usize) {
        if self.relocate(new_cap).is_err() {
            capacity_overflow();
        }
    }
}

/// Truncates the array back to `keep` elements when dropped.
struct TruncateOnUnwind<'a, T, A: Allocator<T>> {
    /// The array being appended to
    array: &'a mut DynArray<T, A>,
    /// The length to restore
    keep: usize,
}

impl<T, A: Allocator<T>> Drop for TruncateOnUnwind<'_, T, A> {
    #[inline]
    fn drop(&mut self) {
        self.array.truncate(self.keep);
    }
}

#[cold]
#[track_caller]
fn capacity_overflow() -> ! {
    panic!("capacity overflow")
}

#[cold]
#[track_caller]
fn insert_out_of_range(pos: usize, len: usize) -> ! {
    panic!("{}", OutOfRange { index: pos, len })
}

#[cfg(test)]
mod tests {
    use alloc::{rc::Rc, string::String, vec::Vec};
    use core::cell::Cell;

    use super::*;

    #[derive(Clone)]
    struct DropCounter(Rc<Cell<usize>>);

    impl Drop for DropCounter {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn test_dyn_array_size() {
        assert_eq!(
            core::mem::size_of::<DynArray<u64>>(),
            3 * core::mem::size_of::<usize>()
        );
    }

    #[test]
    fn test_push_doubles_from_one() {
        let mut array = DynArray::new();
        let mut capacities = Vec::new();
        for i in 0..9 {
            array.push(i);
            capacities.push(array.capacity());
        }
        assert_eq!(capacities, [1, 2, 4, 4, 8, 8, 8, 8, 16]);
        assert_eq!(array.as_slice(), &[0, 1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_push_returns_new_element() {
        let mut array = DynArray::new();
        *array.push(String::from("a")) += "b";
        assert_eq!(array.as_slice(), &[String::from("ab")]);
    }

    #[test]
    fn test_pop_keeps_capacity() {
        let mut array = DynArray::from_slice(&[1, 2, 3]);
        assert_eq!(array.pop(), Some(3));
        assert_eq!(array.pop(), Some(2));
        assert_eq!(array.pop(), Some(1));
        assert_eq!(array.pop(), None);
        assert_eq!(array.capacity(), 3);
    }

    #[test]
    fn test_sized_constructors_are_exact() {
        let filled = DynArray::from_elem(4, 'z');
        assert_eq!((filled.len(), filled.capacity()), (4, 4));

        let defaults = DynArray::<u16>::with_default(3);
        assert_eq!(defaults.as_slice(), &[0, 0, 0]);
        assert_eq!(defaults.capacity(), 3);

        let empty = DynArray::from_elem(0, 'z');
        assert_eq!(empty.capacity(), 0);
    }

    #[test]
    fn test_insert_shifts_tail() {
        let mut array = DynArray::from_slice(&[1, 2, 4]);
        assert_eq!(*array.insert(2, 3), 3);
        array.insert(0, 0);
        array.insert(5, 5);
        assert_eq!(array.as_slice(), &[0, 1, 2, 3, 4, 5]);
    }

    #[test]
    #[should_panic(expected = "position 4 is out of range for length 3")]
    fn test_insert_past_end_panics() {
        let mut array = DynArray::from_slice(&[1, 2, 3]);
        array.insert(4, 0);
    }

    #[test]
    fn test_insert_n_grows_once() {
        let mut array = DynArray::from_slice(&[1, 2]);
        array.insert_n(1, 5, 9);
        assert_eq!(array.as_slice(), &[1, 9, 9, 9, 9, 9, 2]);
        assert_eq!(array.capacity(), 7);
    }

    #[test]
    fn test_empty_insert_is_noop() {
        let mut array = DynArray::from_slice(&[1, 2, 3]);
        let before = (array.len(), array.capacity(), array.as_ptr());
        for pos in 0..=3 {
            array.insert_n(pos, 0, 7);
            assert_eq!(array.insert_iter(pos, core::iter::empty()), 0);
            assert_eq!((array.len(), array.capacity(), array.as_ptr()), before);
            assert_eq!(array.as_slice(), &[1, 2, 3]);
        }
    }

    #[test]
    fn test_truncate_and_clear_drop_elements() {
        let drops = Rc::new(Cell::new(0));
        let mut array = DynArray::from_elem(4, DropCounter(drops.clone()));
        assert_eq!(drops.get(), 0);

        array.truncate(6);
        assert_eq!(drops.get(), 0);
        array.truncate(1);
        assert_eq!(drops.get(), 3);
        array.clear();
        assert_eq!(drops.get(), 4);
        assert_eq!(array.capacity(), 4);
    }

    #[test]
    fn test_shrink_to_fit() {
        let mut array = DynArray::try_with_capacity(8).unwrap();
        array.push(1_u8);
        array.shrink_to_fit();
        assert_eq!(array.capacity(), 1);
        array.shrink_to_fit();
        assert_eq!(array.capacity(), 1);

        array.clear();
        array.shrink_to_fit();
        assert_eq!(array.capacity(), 0);
    }

    #[test]
    fn test_reserve_rejects_ceiling() {
        let mut array = DynArray::from_slice(&[1_u32, 2]);
        let ptr = array.as_ptr();
        assert_eq!(
            array.reserve(MAX_CAPACITY + 1),
            Err(LengthError {
                requested: MAX_CAPACITY + 1,
                max: MAX_CAPACITY
            })
        );
        assert_eq!(array.as_ptr(), ptr);
        assert_eq!(array.capacity(), 2);

        array.reserve(1).unwrap();
        assert_eq!(array.capacity(), 2);
    }

    #[test]
    fn test_zero_sized_elements() {
        let mut array = DynArray::new();
        for _ in 0..100 {
            array.push(());
        }
        array.insert(50, ());
        assert_eq!(array.len(), 101);
        assert_eq!(array.pop(), Some(()));
        assert_eq!(array.capacity(), 128);
    }

    #[test]
    fn test_send_sync() {
        static_assertions::assert_impl_all!(DynArray<String>: Send, Sync);
        static_assertions::assert_not_impl_any!(DynArray<Rc<u8>>: Send, Sync);
    }
}
