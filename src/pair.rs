//! A two-element product type with named fields.

use core::{
    cmp::Ordering,
    hash::{Hash, Hasher},
};

/// Two values stored side by side, accessed as `first` and `second`.
///
/// Pairs compare lexicographically: by `first`, then by `second`. Pairs of
/// different element types compare whenever their elements do.
///
/// # Examples
///
/// ```
/// use rudiments::{Pair, pair::make_pair};
///
/// let p = make_pair(1, "one");
/// assert_eq!(p.first, 1);
/// assert!(p < Pair::new(1, "two"));
///
/// let widened: Pair<i64, &str> = p.convert();
/// assert_eq!(widened, Pair::from((1_i64, "one")));
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, derive_more::From)]
pub struct Pair<A, B> {
    /// The first element.
    pub first: A,
    /// The second element.
    pub second: B,
}

impl<A, B> Pair<A, B> {
    /// Creates a pair from its two elements.
    #[inline]
    #[must_use]
    pub const fn new(first: A, second: B) -> Self {
        Self { first, second }
    }

    /// Splits the pair into a tuple.
    #[inline]
    #[must_use]
    pub fn into_tuple(self) -> (A, B) {
        (self.first, self.second)
    }

    /// Borrows both elements.
    #[inline]
    #[must_use]
    pub const fn as_ref(&self) -> Pair<&A, &B> {
        Pair::new(&self.first, &self.second)
    }

    /// Converts each element into another type.
    #[inline]
    #[must_use]
    pub fn convert<C: From<A>, D: From<B>>(self) -> Pair<C, D> {
        Pair::new(C::from(self.first), D::from(self.second))
    }

    /// Exchanges both elements with those of `other`.
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        core::mem::swap(self, other);
    }
}

/// Creates a [`Pair`], inferring the element types from the arguments.
#[inline]
#[must_use]
pub const fn make_pair<A, B>(first: A, second: B) -> Pair<A, B> {
    Pair::new(first, second)
}

impl<A, B, C, D> PartialEq<Pair<C, D>> for Pair<A, B>
where
    A: PartialEq<C>,
    B: PartialEq<D>,
{
    #[inline]
    fn eq(&self, other: &Pair<C, D>) -> bool {
        self.first == other.first && self.second == other.second
    }
}

impl<A, B, C, D> PartialOrd<Pair<C, D>> for Pair<A, B>
where
    A: PartialOrd<C>,
    B: PartialOrd<D>,
{
    #[inline]
    fn partial_cmp(&self, other: &Pair<C, D>) -> Option<Ordering> {
        match self.first.partial_cmp(&other.first)? {
            Ordering::Equal => self.second.partial_cmp(&other.second),
            ordering => Some(ordering),
        }
    }
}

impl<A: Ord, B: Ord> Ord for Pair<A, B> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.first
            .cmp(&other.first)
            .then_with(|| self.second.cmp(&other.second))
    }
}

impl<A: Hash, B: Hash> Hash for Pair<A, B> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.first.hash(state);
        self.second.hash(state);
    }
}
