//! Commonly used items for convenient importing.
//!
//! ```rust
//! use rudiments::prelude::*;
//!
//! let mut array: DynArray<Unique<str>> = DynArray::new();
//! array.push(Unique::from(Box::<str>::from("boxed")));
//! assert_eq!(&*array[0], "boxed");
//! ```

pub use crate::{
    DynArray, Pair, StrSpan, Unique, dyn_array,
    errors::{LengthError, OutOfRange},
    make_unique,
};
