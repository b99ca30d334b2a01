//! Allocator-aware growable arrays.
//!
//! [`DynArray`] owns a contiguous buffer obtained from an
//! [`Allocator`](crate::allocator::Allocator). The buffer holds `len` live
//! elements followed by `capacity - len` uninitialized slots, and `capacity`
//! never exceeds [`MAX_CAPACITY`](crate::allocator::MAX_CAPACITY).
//!
//! # Guarantees
//!
//! - Relocating the buffer (in [`reserve`], [`shrink_to_fit`] and growth)
//!   moves every element bitwise. Moves cannot fail, so a relocation either
//!   completes or leaves the array exactly as it was.
//! - [`insert_n`] and [`insert_iter`] build the new elements behind the
//!   existing ones before rotating them into place. If producing an element
//!   panics, the array keeps exactly its previous elements.
//! - Inserting zero elements never touches the storage.
//!
//! # Errors and panics
//!
//! Checked accesses ([`at`]) and explicit capacity requests ([`reserve`])
//! report failures as values. Operations that grow implicitly panic with
//! "capacity overflow" when the ceiling would be exceeded.
//!
//! [`reserve`]: DynArray::reserve
//! [`shrink_to_fit`]: DynArray::shrink_to_fit
//! [`insert_n`]: DynArray::insert_n
//! [`insert_iter`]: DynArray::insert_iter
//! [`at`]: DynArray::at

mod iter;
mod owned;
mod traits;

pub use self::{iter::IntoIter, owned::DynArray};
