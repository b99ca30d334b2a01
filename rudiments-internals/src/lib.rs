#![no_std]
#![forbid(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::missing_docs_in_private_items,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
#![allow(rustdoc::private_intra_doc_links)]
//! Internal implementation crate for [`rudiments`].
//!
//! # Overview
//!
//! This crate contains the low-level storage primitives and unsafe operations
//! that power the containers in [`rudiments`]. It deals in uninitialized
//! memory only: it never decides which slots hold live values, and it never
//! runs element destructors.
//!
//! **This crate is an implementation detail.** No semantic versioning
//! guarantees are provided. Users should depend on the [`rudiments`] crate,
//! not this one.
//!
//! # Architecture
//!
//! - **[`allocator`]**: The allocator collaborator
//!   - [`Allocator`]: Typed `allocate(n)` / `deallocate(ptr, n)` plus an
//!     equality relation deciding whether two instances can free each other's
//!     storage
//!   - [`Heap`]: Stateless allocator backed by the global allocator; any two
//!     instances compare equal
//!
//! - **[`buf`]**: Capacity-tracked storage
//!   - [`RawBuf`]: An owned, contiguous, uninitialized slab of `T` obtained
//!     from an [`Allocator`]
//!   - [`CapacityOverflow`]: Raised when a requested capacity is above
//!     [`MAX_CAPACITY`] or is not representable as a memory layout; carries
//!     the per-type maximum from [`max_capacity_for`]
//!
//! # Safety Strategy
//!
//! - **Module-based encapsulation**: The pointer, capacity and allocator of a
//!   [`RawBuf`] are private to [`buf::raw`], so the invariant "the pointer
//!   came from this allocator with exactly this capacity" can be checked by
//!   reading a single file.
//! - **Callers own liveness**: Methods that read, write or relocate slots are
//!   `unsafe` and state exactly which prefix of the buffer the caller promises
//!   is initialized.
//!
//! [`rudiments`]: https://docs.rs/rudiments/latest/rudiments/
//! [`RawBuf`]: buf::RawBuf
//! [`CapacityOverflow`]: buf::CapacityOverflow
//! [`MAX_CAPACITY`]: buf::MAX_CAPACITY
//! [`max_capacity_for`]: buf::max_capacity_for
//! [`Allocator`]: allocator::Allocator
//! [`Heap`]: allocator::Heap

extern crate alloc;

pub mod allocator;
pub mod buf;

pub use allocator::{Allocator, Heap};
pub use buf::{CapacityOverflow, MAX_CAPACITY, RawBuf, max_capacity_for};
