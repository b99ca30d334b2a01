//! Converting moves from a [`Unique`] of a concrete type to a [`Unique`] of a
//! trait object it implements.
//!
//! The conversion goes through [`unsize::CoerceUnsize`], which keeps the
//! owned pointer and the deletion strategy and only widens the pointer with
//! the target's metadata. An empty [`Unique`] converts to an empty one.
//!
//! ```
//! use core::fmt::Display;
//!
//! use rudiments::{Unique, make_unique};
//! use unsize::CoerceUnsize;
//!
//! let concrete = make_unique(42_u8);
//! let erased: Unique<dyn Display> = concrete.unsize(unsize::Coercion!(to dyn Display));
//! assert_eq!(format!("{}", &*erased), "42");
//! ```

use core::ptr::{self, NonNull};

use crate::unique::{Delete, Unique};

// SAFETY: `replace_ptr` hands the unsized pointer back together with the
// same strategy and ownership; the address is unchanged and `D` knows how
// to release the object through either pointer type.
unsafe impl<T, U: ?Sized, D: Delete<T> + Delete<U>> unsize::CoerciblePtr<U> for Unique<T, D> {
    type Pointee = T;
    type Output = Unique<U, D>;

    #[inline]
    fn as_sized_ptr(&mut self) -> *mut T {
        self.get().map_or(ptr::null_mut(), NonNull::as_ptr)
    }

    #[inline]
    unsafe fn replace_ptr(self, new: *mut U) -> Unique<U, D> {
        let (_, deleter) = self.into_parts();

        // SAFETY:
        // 1. `new` is the pointer returned by `as_sized_ptr` with added
        //    metadata, so it refers to the same live object (or is null), and
        //    `D` implements `Delete<U>`.
        // 2. Ownership moves from the consumed `self`.
        unsafe { Unique::from_parts(NonNull::new(new), deleter) }
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use core::cell::Cell;

    use unsize::CoerceUnsize;

    use crate::unique::Unique;

    trait Animal {
        fn legs(&self) -> u32;
    }

    struct Dog {
        drops: Rc<Cell<usize>>,
    }

    impl Animal for Dog {
        fn legs(&self) -> u32 {
            4
        }
    }

    impl Drop for Dog {
        fn drop(&mut self) {
            self.drops.set(self.drops.get() + 1);
        }
    }

    #[test]
    fn test_coerce_keeps_address_and_drops_once() {
        let drops = Rc::new(Cell::new(0));
        let dog = Unique::new(Dog {
            drops: drops.clone(),
        });
        let address = dog.get().map(|ptr| ptr.as_ptr().cast::<()>());

        let animal: Unique<dyn Animal> = dog.unsize(unsize::Coercion!(to dyn Animal));
        assert_eq!(animal.get().map(|ptr| ptr.as_ptr().cast::<()>()), address);
        assert_eq!(animal.legs(), 4);
        assert_eq!(drops.get(), 0);

        drop(animal);
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn test_coerce_empty_stays_empty() {
        let empty = Unique::<Dog>::null();
        let animal: Unique<dyn Animal> = empty.unsize(unsize::Coercion!(to dyn Animal));
        assert!(animal.is_null());
    }
}
