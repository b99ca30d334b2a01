//! Exclusive-ownership pointers.
//!
//! A [`Unique`] owns at most one heap object and releases it through a
//! pluggable deletion strategy ([`Delete`]) when it goes out of scope. It
//! cannot be copied; ownership moves with the value, is exchanged with
//! [`Unique::swap`], or is handed back to the caller with
//! [`Unique::release`].
//!
//! # Strategies
//!
//! - [`DefaultDelete`] drops the object and frees its allocation the way a
//!   [`Box`](alloc::boxed::Box) would. It is zero-sized.
//! - [`FnDelete`] wraps a closure.
//! - Any type implementing [`Delete`] can be used, including ones that carry
//!   state. A stateful strategy is stored inline and moves with the pointer.
//!
//! # Converting moves
//!
//! A `Unique<T, D>` converts to a `Unique<dyn Trait, D>` whenever `T:
//! Trait` and `D` can release both, via [`unsize::CoerceUnsize`]. See the
//! [`coerce`] module.

pub mod coerce;
mod delete;
mod owned;

pub use self::{
    delete::{DefaultDelete, Delete, FnDelete},
    owned::{Null, Unique},
};

/// Moves `value` to the heap and returns its exclusive owner.
///
/// The value is fully constructed before the allocation, so either both
/// succeed and the result owns the object, or nothing is leaked.
///
/// # Examples
///
/// ```
/// use rudiments::make_unique;
///
/// let p = make_unique(String::from("foo"));
/// assert_eq!(*p, "foo");
/// ```
#[inline]
#[must_use]
pub fn make_unique<T>(value: T) -> Unique<T> {
    Unique::new(value)
}
