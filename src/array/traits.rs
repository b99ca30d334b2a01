use core::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    ops::{Deref, DerefMut},
};

use rudiments_internals::{Allocator, Heap};

use crate::array::DynArray;

impl<T, A: Allocator<T>> Deref for DynArray<T, A> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, A: Allocator<T>> DerefMut for DynArray<T, A> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, A: Allocator<T>> AsRef<[T]> for DynArray<T, A> {
    #[inline]
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, A: Allocator<T>> AsMut<[T]> for DynArray<T, A> {
    #[inline]
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

/// Deep-copies the live elements into storage from a clone of the source's
/// allocator. The copy has no spare capacity.
impl<T: Clone, A: Allocator<T>> Clone for DynArray<T, A> {
    #[inline]
    fn clone(&self) -> Self {
        Self::from_iter_in(self.iter().cloned(), self.allocator().clone())
    }
}

impl<T, A: Allocator<T> + Default> Default for DynArray<T, A> {
    #[inline]
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<T: fmt::Debug, A: Allocator<T>> fmt::Debug for DynArray<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_slice(), f)
    }
}

impl<T, U, A, B> PartialEq<DynArray<U, B>> for DynArray<T, A>
where
    T: PartialEq<U>,
    A: Allocator<T>,
    B: Allocator<U>,
{
    #[inline]
    fn eq(&self, other: &DynArray<U, B>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T, U, A: Allocator<T>> PartialEq<[U]> for DynArray<T, A>
where
    T: PartialEq<U>,
{
    #[inline]
    fn eq(&self, other: &[U]) -> bool {
        self.as_slice() == other
    }
}

impl<T, U, A: Allocator<T>> PartialEq<&[U]> for DynArray<T, A>
where
    T: PartialEq<U>,
{
    #[inline]
    fn eq(&self, other: &&[U]) -> bool {
        self.as_slice() == *other
    }
}

impl<T, U, A: Allocator<T>, const N: usize> PartialEq<[U; N]> for DynArray<T, A>
where
    T: PartialEq<U>,
{
    #[inline]
    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == other
    }
}

impl<T: Eq, A: Allocator<T>> Eq for DynArray<T, A> {}

/// Lexicographic, like slices.
impl<T: PartialOrd, A: Allocator<T>> PartialOrd for DynArray<T, A> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.as_slice().partial_cmp(other.as_slice())
    }
}

/// Lexicographic, like slices.
impl<T: Ord, A: Allocator<T>> Ord for DynArray<T, A> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl<T: Hash, A: Allocator<T>> Hash for DynArray<T, A> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        Hash::hash(self.as_slice(), state);
    }
}

impl<T> FromIterator<T> for DynArray<T> {
    #[inline]
    #[track_caller]
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_iter_in(iter, Heap)
    }
}

impl<T, A: Allocator<T>> Extend<T> for DynArray<T, A> {
    #[inline]
    #[track_caller]
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.append_iter(iter.into_iter());
    }
}

impl<'a, T: Copy + 'a, A: Allocator<T>> Extend<&'a T> for DynArray<T, A> {
    #[inline]
    #[track_caller]
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.append_iter(iter.into_iter().copied());
    }
}

impl<T, const N: usize> From<[T; N]> for DynArray<T> {
    #[inline]
    #[track_caller]
    fn from(values: [T; N]) -> Self {
        Self::from_iter_in(values, Heap)
    }
}

impl<T: Clone> From<&[T]> for DynArray<T> {
    #[inline]
    #[track_caller]
    fn from(values: &[T]) -> Self {
        Self::from_slice(values)
    }
}
