#![cfg_attr(not(doc), no_std)]
#![deny(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    clippy::as_ptr_cast_mut,
    clippy::ptr_as_ptr,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
// Extra checks on nightly
#![cfg_attr(nightly_extra_checks, feature(rustdoc_missing_doc_code_examples))]
#![cfg_attr(nightly_extra_checks, forbid(rustdoc::missing_doc_code_examples))]
// Make docs.rs generate better docs
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Allocator-aware growable arrays and exclusive-ownership pointers.
//!
//! ## Overview
//!
//! This crate provides the two containers at the heart of most programs,
//! built from raw storage up:
//!
//! - **[`DynArray`]**: a contiguous, growable array that draws its storage
//!   from an [`Allocator`](allocator::Allocator) held by value.
//! - **[`Unique`]**: a pointer that exclusively owns one heap object and
//!   releases it through a pluggable deletion strategy.
//!
//! Two small value types round out the vocabulary: [`Pair`] and
//! [`StrSpan`], a borrowed span of byte characters. Optional values are
//! plain [`Option`]s.
//!
//! ## Quick Example
//!
//! ```
//! use rudiments::{DynArray, dyn_array, make_unique};
//!
//! let mut names = dyn_array!["ada", "grace"];
//! names.insert(1, "barbara");
//! assert_eq!(names, ["ada", "barbara", "grace"]);
//! assert!(names.at(3).is_err());
//!
//! let owner = make_unique(DynArray::from_slice(&names[..2]));
//! assert_eq!(owner.len(), 2);
//! ```
//!
//! ## Ownership Rules
//!
//! - A [`DynArray`] owns its elements and its storage. Moving out of it with
//!   [`DynArray::take`] or [`DynArray::move_from`] leaves the source with
//!   length and capacity `0`.
//! - A [`Unique`] owns at most one object. The deletion strategy runs exactly
//!   once per owned object unless ownership is handed back with
//!   [`Unique::release`].
//! - Neither type is ever implicitly duplicated. A [`DynArray`] can be cloned
//!   explicitly; a [`Unique`] cannot be cloned at all.
//!
//! ## Errors
//!
//! Checked operations return the small error values in [`errors`]. Growth
//! that cannot report an error in its signature panics with
//! "capacity overflow" once the ceiling of
//! [`MAX_CAPACITY`](allocator::MAX_CAPACITY) elements would be exceeded.
//! Failure to obtain memory from the allocator is fatal.
//!
//! ## Features
//!
//! - `tracing`: emit [`tracing`](https://docs.rs/tracing) events when a
//!   buffer is relocated and when [`DynArray::move_from`] has to move
//!   elements one by one. Disabled by default.
//!
//! For the storage layer, see the [`rudiments-internals`] crate.
//!
//! [`rudiments-internals`]: rudiments_internals

extern crate alloc;

pub mod array;
pub mod errors;
pub mod pair;
pub mod prelude;
pub mod str_span;
pub mod unique;

mod macros;

pub use self::{
    array::DynArray,
    pair::Pair,
    str_span::StrSpan,
    unique::{Unique, make_unique},
};

pub mod allocator {
    //! The allocator collaborator and the capacity ceiling.
    //!
    //! Every [`DynArray`](crate::DynArray) holds an [`Allocator`] by value.
    //! [`Heap`], the default, is stateless and every instance compares equal
    //! to every other, so storage can always change hands between arrays
    //! using it.
    //!
    //! # Examples
    //!
    //! ```
    //! use rudiments::{DynArray, allocator::Heap};
    //!
    //! let mut a = DynArray::new_in(Heap);
    //! a.push(1);
    //! assert_eq!(a.allocator(), &Heap);
    //! ```

    pub use rudiments_internals::{Allocator, Heap, MAX_CAPACITY};
}
