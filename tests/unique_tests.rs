//! Integration tests for `Unique`.
//!
//! - `test_move_transfers_ownership`: Moving out leaves the source null and
//!   the destination owning the original address
//! - `test_deletion_runs_exactly_once`: A counting strategy across reset,
//!   move and swap
//! - `test_release_suppresses_deletion`
//! - `test_reset_order`: The new pointer is in place before the old one is
//!   deleted
//! - `test_stateless_strategy_is_free`: Layout of `Unique` with stateless and
//!   stateful strategies
//! - `test_comparisons_follow_addresses`
//! - `test_trait_object_conversion`
//! - `test_boxed_slices`

use std::{
    cell::{Cell, RefCell},
    collections::HashSet,
    fmt::Debug,
    mem::size_of,
    ptr::NonNull,
    rc::Rc,
};

use rudiments::{
    Unique, make_unique,
    unique::{DefaultDelete, Delete, FnDelete, Null},
};
use unsize::CoerceUnsize;

/// Deletes boxed values and counts how often it was invoked.
#[derive(Clone, Debug, Default)]
struct CountingDelete {
    calls: Rc<Cell<usize>>,
}

impl<T: ?Sized> Delete<T> for CountingDelete {
    unsafe fn delete(&mut self, ptr: NonNull<T>) {
        self.calls.set(self.calls.get() + 1);
        // SAFETY: Tests only give this strategy pointers from `Box::into_raw`.
        drop(unsafe { Box::from_raw(ptr.as_ptr()) });
    }
}

fn counted<T>(value: T, deleter: &CountingDelete) -> Unique<T, CountingDelete> {
    // SAFETY: The pointer comes straight from `Box::into_raw`.
    unsafe { Unique::from_raw_with(Box::into_raw(Box::new(value)), deleter.clone()) }
}

#[test]
fn test_move_transfers_ownership() {
    let deleter = CountingDelete::default();
    let mut p = counted(String::from("obj"), &deleter);
    let address = p.get();
    assert!(address.is_some());

    let q = std::mem::replace(&mut p, Unique::null_with(deleter.clone()));
    assert_eq!(p.get(), None);
    assert_eq!(q.get(), address);
    assert_eq!(deleter.calls.get(), 0);

    drop(q);
    assert_eq!(deleter.calls.get(), 1);
    drop(p);
    assert_eq!(deleter.calls.get(), 1);
}

#[test]
fn test_deletion_runs_exactly_once() {
    let deleter = CountingDelete::default();
    {
        let mut a = counted(1_u64, &deleter);
        let mut b = counted(2_u64, &deleter);

        a.swap(&mut b);
        assert_eq!((*a, *b), (2, 1));
        assert_eq!(deleter.calls.get(), 0);

        let moved = b;
        b = Unique::null_with(deleter.clone());
        assert!(b.is_null());
        drop(moved);
        assert_eq!(deleter.calls.get(), 1);

        a.reset();
        a.reset();
        assert_eq!(deleter.calls.get(), 2);
    }
    assert_eq!(deleter.calls.get(), 2);
}

#[test]
fn test_release_suppresses_deletion() {
    let deleter = CountingDelete::default();
    let mut p = counted(String::from("kept"), &deleter);
    let raw = p.release().unwrap();
    drop(p);
    assert_eq!(deleter.calls.get(), 0);

    // SAFETY: Ownership of `raw` was released to this test.
    let value = unsafe { Box::from_raw(raw.as_ptr()) };
    assert_eq!(*value, "kept");
}

#[test]
fn test_reset_order() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let observed = Rc::new(Cell::new(None));

    struct Logged {
        name: &'static str,
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl Drop for Logged {
        fn drop(&mut self) {
            self.log.borrow_mut().push(self.name);
        }
    }

    let snapshot = observed.clone();
    let deleter = FnDelete(move |ptr: NonNull<Logged>| {
        snapshot.set(Some(ptr));
        // SAFETY: Every pointer given to this strategy comes from `Box::into_raw`.
        drop(unsafe { Box::from_raw(ptr.as_ptr()) });
    });
    let old = Box::into_raw(Box::new(Logged {
        name: "old",
        log: log.clone(),
    }));
    let new = Box::into_raw(Box::new(Logged {
        name: "new",
        log: log.clone(),
    }));

    // SAFETY: Both pointers are fresh boxes released by the strategy above.
    let mut p = unsafe { Unique::from_raw_with(old, deleter) };
    // SAFETY: `new` is a fresh box distinct from the owned one.
    unsafe { p.reset_to(new) };

    assert_eq!(observed.get().map(NonNull::as_ptr), Some(old));
    assert_eq!(p.get().map(NonNull::as_ptr), Some(new));
    assert_eq!(*log.borrow(), ["old"]);

    drop(p);
    assert_eq!(*log.borrow(), ["old", "new"]);
}

#[test]
fn test_stateless_strategy_is_free() {
    assert_eq!(size_of::<Unique<u8>>(), size_of::<*mut u8>());
    assert_eq!(size_of::<Unique<u8, DefaultDelete>>(), size_of::<*mut u8>());
    assert_eq!(size_of::<Unique<dyn Debug>>(), size_of::<*mut dyn Debug>());
    assert_eq!(
        size_of::<Unique<u8, FnDelete<fn(NonNull<u8>)>>>(),
        size_of::<*mut u8>() + size_of::<fn(NonNull<u8>)>()
    );
    assert_eq!(
        size_of::<Unique<u8, CountingDelete>>(),
        size_of::<*mut u8>() + size_of::<CountingDelete>()
    );
}

#[test]
fn test_comparisons_follow_addresses() {
    let a = make_unique(1);
    let b = make_unique(1);
    let empty = Unique::<i32>::null();

    assert_ne!(a, b);
    assert_eq!(a, a);
    assert!(empty == Null);
    assert!(a != Null);
    assert!(empty < a && empty < b);
    assert_eq!(a < b, a.get().unwrap().as_ptr() < b.get().unwrap().as_ptr());

    let set: HashSet<Unique<i32>> = [a, b, empty].into_iter().collect();
    assert_eq!(set.len(), 3);
    assert!(set.contains(&Unique::null()));
}

#[test]
fn test_trait_object_conversion() {
    let deleter = CountingDelete::default();
    let concrete = counted(vec![1, 2, 3], &deleter);
    let erased: Unique<dyn Debug, CountingDelete> =
        concrete.unsize(unsize::Coercion!(to dyn Debug));

    assert_eq!(format!("{erased:?}"), "Unique([1, 2, 3])");
    drop(erased);
    assert_eq!(deleter.calls.get(), 1);
}

#[test]
fn test_boxed_slices() {
    let p: Unique<[String]> = Unique::from(vec![String::from("a"), String::from("b")].into_boxed_slice());
    assert_eq!(p.len(), 2);
    assert_eq!(p[1], "b");

    let boxed = p.into_box().unwrap();
    assert_eq!(&*boxed, ["a", "b"]);
}
