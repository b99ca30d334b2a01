use alloc::boxed::Box;
use core::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    mem::MaybeUninit,
    ops::{Deref, DerefMut},
    ptr::{self, NonNull},
};

use crate::unique::{DefaultDelete, Delete};

/// FIXME: Once rust-lang/rust#132922 gets resolved, we can make the `ptr`
/// field an unsafe field and remove this module.
mod limit_field_access {
    use core::{marker::PhantomData, mem::ManuallyDrop, ptr::NonNull};

    use crate::unique::{DefaultDelete, Delete};

    /// An exclusive-ownership pointer: owns at most one heap object together
    /// with the strategy used to release it.
    ///
    /// At most one [`Unique`] observes a given non-null pointer as owned at a
    /// time. Ownership moves with the value (a moved-from binding can no
    /// longer be used) or leaves explicitly through [`release`]. A [`Unique`]
    /// is never [`Clone`].
    ///
    /// When it goes out of scope the deletion strategy is invoked on the owned
    /// pointer, if there is one, exactly once.
    ///
    /// # Layout
    ///
    /// With a stateless strategy such as [`DefaultDelete`] a [`Unique<T>`] is
    /// exactly one pointer wide. A strategy carrying state adds its own size.
    ///
    /// ```
    /// use rudiments::Unique;
    ///
    /// assert_eq!(size_of::<Unique<String>>(), size_of::<*mut String>());
    /// assert_eq!(size_of::<Option<Unique<String>>>(), 2 * size_of::<usize>());
    /// ```
    ///
    /// # Examples
    ///
    /// ```
    /// use rudiments::{Unique, make_unique};
    ///
    /// let mut p = make_unique(String::from("foo"));
    /// assert_eq!(*p, "foo");
    ///
    /// let raw = p.get();
    /// let q = core::mem::take(&mut p);
    /// assert!(p.is_null());
    /// assert_eq!(q.get(), raw);
    /// ```
    ///
    /// [`release`]: Unique::release
    pub struct Unique<T: ?Sized, D: Delete<T> = DefaultDelete> {
        /// The owned pointer, or `None` when empty
        ///
        /// # Safety
        ///
        /// The following safety invariants are guaranteed to be upheld as long
        /// as this struct exists:
        ///
        /// 1. If `Some`, the pointee is a live object that `deleter` is able to
        ///    release.
        /// 2. If `Some`, no other owner considers itself responsible for
        ///    releasing the pointee.
        ptr: Option<NonNull<T>>,

        /// The strategy invoked on `ptr` when ownership ends
        deleter: D,

        /// Marker to tell the compiler that we logically own a `T`
        _owns: PhantomData<T>,
    }

    impl<T: ?Sized, D: Delete<T>> Unique<T, D> {
        /// Creates a [`Unique`] from an optional owned pointer and a
        /// strategy.
        ///
        /// # Safety
        ///
        /// The caller must ensure:
        ///
        /// 1. If `ptr` is `Some`, the pointee is a live object that `deleter`
        ///    is able to release.
        /// 2. If `ptr` is `Some`, ownership of the pointee is transferred to
        ///    the returned value.
        #[inline]
        #[must_use]
        pub(crate) const unsafe fn from_parts(ptr: Option<NonNull<T>>, deleter: D) -> Self {
            // SAFETY: We must uphold the safety invariants of the ptr field:
            // 1. Guaranteed by the caller
            // 2. Guaranteed by the caller
            Self {
                ptr,
                deleter,
                _owns: PhantomData,
            }
        }

        /// Consumes the [`Unique`] without running the strategy and returns
        /// its parts. The caller becomes responsible for the pointer.
        #[inline]
        #[must_use]
        pub(crate) fn into_parts(self) -> (Option<NonNull<T>>, D) {
            let this = ManuallyDrop::new(self);
            let ptr = this.ptr;

            // SAFETY: `this` is never dropped, so the strategy is moved out
            // exactly once and the original copy is never touched again.
            let deleter = unsafe { core::ptr::read(&this.deleter) };

            (ptr, deleter)
        }

        /// Returns the owned pointer without affecting ownership.
        ///
        /// Returns `None` when nothing is owned.
        #[inline]
        #[must_use]
        pub fn get(&self) -> Option<NonNull<T>> {
            self.ptr
        }

        /// Returns a reference to the deletion strategy.
        #[inline]
        #[must_use]
        pub fn deleter(&self) -> &D {
            &self.deleter
        }

        /// Returns a mutable reference to the deletion strategy.
        #[inline]
        #[must_use]
        pub fn deleter_mut(&mut self) -> &mut D {
            &mut self.deleter
        }

        /// Gives up ownership without releasing the object.
        ///
        /// Returns the previously owned pointer, which the caller is now
        /// responsible for, and leaves `self` empty. Returns `None` if `self`
        /// was already empty.
        ///
        /// # Examples
        ///
        /// ```
        /// use rudiments::make_unique;
        ///
        /// let mut p = make_unique(7_u32);
        /// let raw = p.release().unwrap();
        /// assert!(p.is_null());
        ///
        /// // SAFETY: `raw` came from the default strategy, i.e. a `Box`.
        /// let boxed = unsafe { Box::from_raw(raw.as_ptr()) };
        /// assert_eq!(*boxed, 7);
        /// ```
        #[inline]
        #[must_use = "the released pointer must be freed by the caller"]
        pub fn release(&mut self) -> Option<NonNull<T>> {
            // SAFETY: We must uphold the safety invariants of the ptr field:
            // 1. Trivially upheld by `None`
            // 2. Trivially upheld by `None`; the caller takes over the old pointer
            self.ptr.take()
        }

        /// Replaces the owned pointer with `ptr` and then, only after the new
        /// pointer is in place, releases the old one if there was one.
        ///
        /// Passing `None` empties the [`Unique`].
        ///
        /// # Safety
        ///
        /// The caller must ensure:
        ///
        /// 1. If `ptr` is `Some`, the pointee is a live object that the
        ///    strategy of `self` is able to release.
        /// 2. If `ptr` is `Some`, ownership of the pointee is transferred to
        ///    `self`, and it is not the pointer `self` already owns.
        #[inline]
        pub unsafe fn reset_raw(&mut self, ptr: Option<NonNull<T>>) {
            // SAFETY: We must uphold the safety invariants of the ptr field:
            // 1. Guaranteed by the caller
            // 2. Guaranteed by the caller
            let old = core::mem::replace(&mut self.ptr, ptr);

            if let Some(old) = old {
                // SAFETY:
                // 1. By the type invariants the strategy is able to release `old`.
                // 2. `old` has been swapped out of `self`, so no owner remains and it
                //    is not used afterwards.
                unsafe {
                    // @add-unsafe-context: Delete
                    self.deleter.delete(old);
                }
            }
        }

        /// Exchanges the owned pointers and strategies of `self` and `other`.
        ///
        /// Nothing is released.
        #[inline]
        pub fn swap(&mut self, other: &mut Self) {
            // SAFETY: We must uphold the safety invariants of the ptr field:
            // 1. Upheld, as each pointer moves together with its strategy.
            // 2. Upheld, as ownership is exchanged, not duplicated.
            core::mem::swap(&mut self.ptr, &mut other.ptr);
            core::mem::swap(&mut self.deleter, &mut other.deleter);
        }
    }

    impl<T: ?Sized, D: Delete<T>> Drop for Unique<T, D> {
        #[inline]
        fn drop(&mut self) {
            if let Some(ptr) = self.ptr.take() {
                // SAFETY:
                // 1. By the type invariants the strategy is able to release `ptr`.
                // 2. We are in the drop function, so `ptr` has no other owner and is
                //    not used afterwards.
                unsafe {
                    // @add-unsafe-context: Delete
                    self.deleter.delete(ptr);
                }
            }
        }
    }
}

pub use self::limit_field_access::Unique;

impl<T> Unique<T> {
    /// Moves `value` to the heap and takes ownership of it.
    ///
    /// The value is fully constructed before any allocation happens, so there
    /// is never a moment where a pointer exists without an owner.
    #[inline]
    #[must_use]
    pub fn new(value: T) -> Self {
        Self::from(Box::new(value))
    }

    /// Allocates uninitialized heap storage for a `T`.
    ///
    /// Use [`Unique::assume_init`] once the value has been written.
    ///
    /// # Examples
    ///
    /// ```
    /// use rudiments::Unique;
    ///
    /// let mut p = Unique::<u64>::new_uninit();
    /// p.write(9);
    /// // SAFETY: The value was written above.
    /// let p = unsafe { p.assume_init() };
    /// assert_eq!(*p, 9);
    /// ```
    #[inline]
    #[must_use]
    pub fn new_uninit() -> Unique<MaybeUninit<T>> {
        Unique::from(Box::<T>::new_uninit())
    }
}

impl<T> Unique<MaybeUninit<T>> {
    /// Converts to an owner of an initialized `T`.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. If `self` owns storage, a valid `T` has been written to it.
    #[inline]
    #[must_use]
    pub unsafe fn assume_init(self) -> Unique<T> {
        let (ptr, deleter) = self.into_parts();

        // SAFETY:
        // 1. `MaybeUninit<T>` has the layout of `T`, and the caller guarantees
        //    the value is initialized, so the box allocation now holds a live `T`
        //    that `DefaultDelete` can release.
        // 2. Ownership moves from the consumed `self`.
        unsafe { Unique::from_parts(ptr.map(NonNull::cast::<T>), deleter) }
    }
}

impl<T: ?Sized> Unique<T> {
    /// Converts back into a [`Box`], or `None` if nothing is owned.
    #[inline]
    #[must_use]
    pub fn into_box(self) -> Option<Box<T>> {
        let (ptr, DefaultDelete) = self.into_parts();
        let ptr = ptr?;

        // SAFETY: Pointers released by `DefaultDelete` come from
        // `Box::into_raw`, and ownership moves from the consumed `self`.
        Some(unsafe { Box::from_raw(ptr.as_ptr()) })
    }
}

impl<T: ?Sized, D: Delete<T>> Unique<T, D> {
    /// Creates an empty [`Unique`] with a default-constructed strategy.
    #[inline]
    #[must_use]
    pub fn null() -> Self
    where
        D: Default,
    {
        Self::null_with(D::default())
    }

    /// Creates an empty [`Unique`] holding `deleter`.
    #[inline]
    #[must_use]
    pub const fn null_with(deleter: D) -> Self {
        // SAFETY: `None` carries no ownership.
        unsafe { Self::from_parts(None, deleter) }
    }

    /// Takes ownership of `ptr` with a default-constructed strategy. A null
    /// `ptr` yields an empty [`Unique`].
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. If `ptr` is non-null, it refers to a live object that `D::default()`
    ///    is able to release (for [`DefaultDelete`]: one created by
    ///    [`Box::into_raw`]).
    /// 2. If `ptr` is non-null, no other owner will release it.
    #[inline]
    #[must_use]
    pub unsafe fn from_raw(ptr: *mut T) -> Self
    where
        D: Default,
    {
        // SAFETY: Guaranteed by the caller.
        unsafe { Self::from_raw_with(ptr, D::default()) }
    }

    /// Takes ownership of `ptr`, to be released with `deleter`. A null `ptr`
    /// yields an empty [`Unique`].
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. If `ptr` is non-null, it refers to a live object that `deleter` is
    ///    able to release.
    /// 2. If `ptr` is non-null, no other owner will release it.
    #[inline]
    #[must_use]
    pub unsafe fn from_raw_with(ptr: *mut T, deleter: D) -> Self {
        // SAFETY: Guaranteed by the caller.
        unsafe { Self::from_parts(NonNull::new(ptr), deleter) }
    }

    /// Returns `true` if nothing is owned.
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.get().is_none()
    }

    /// Returns a shared reference to the owned object, or `None` if empty.
    #[inline]
    #[must_use]
    pub fn as_ref(&self) -> Option<&T> {
        let ptr = self.get()?;

        // SAFETY: The type invariants guarantee the pointee is live, and the
        // borrow of `self` keeps it from being released or mutated.
        Some(unsafe { ptr.as_ref() })
    }

    /// Returns a mutable reference to the owned object, or `None` if empty.
    #[inline]
    #[must_use]
    pub fn as_mut(&mut self) -> Option<&mut T> {
        let mut ptr = self.get()?;

        // SAFETY: The type invariants guarantee the pointee is live and
        // exclusively owned by `self`, which is mutably borrowed.
        Some(unsafe { ptr.as_mut() })
    }

    /// Releases the owned object, if any, leaving `self` empty.
    #[inline]
    pub fn reset(&mut self) {
        // SAFETY: `None` carries no ownership.
        unsafe { self.reset_raw(None) }
    }

    /// Releases the owned object, if any, and takes ownership of `ptr`
    /// instead. The new pointer is stored before the old one is released.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. If `ptr` is non-null, it refers to a live object that the strategy
    ///    of `self` is able to release.
    /// 2. If `ptr` is non-null, no other owner will release it, and it is not
    ///    the pointer `self` already owns.
    #[inline]
    pub unsafe fn reset_to(&mut self, ptr: *mut T) {
        // SAFETY: Guaranteed by the caller.
        unsafe { self.reset_raw(NonNull::new(ptr)) }
    }

    /// Returns the address of the owned object, or null.
    #[inline]
    fn addr(&self) -> *const () {
        self.get()
            .map_or(ptr::null(), |ptr| ptr.as_ptr().cast_const().cast::<()>())
    }
}

impl<T: ?Sized> From<Box<T>> for Unique<T> {
    #[inline]
    fn from(boxed: Box<T>) -> Self {
        let ptr = NonNull::from(Box::leak(boxed));

        // SAFETY:
        // 1. A leaked box is a live object that `DefaultDelete` can release.
        // 2. The box was consumed, so there is no other owner.
        unsafe { Self::from_parts(Some(ptr), DefaultDelete) }
    }
}

impl<T: ?Sized, D: Delete<T> + Default> Default for Unique<T, D> {
    #[inline]
    fn default() -> Self {
        Self::null()
    }
}

impl<T: ?Sized, D: Delete<T>> Deref for Unique<T, D> {
    type Target = T;

    /// # Panics
    ///
    /// Panics if nothing is owned.
    #[inline]
    #[track_caller]
    fn deref(&self) -> &T {
        match self.as_ref() {
            Some(value) => value,
            None => null_deref(),
        }
    }
}

impl<T: ?Sized, D: Delete<T>> DerefMut for Unique<T, D> {
    /// # Panics
    ///
    /// Panics if nothing is owned.
    #[inline]
    #[track_caller]
    fn deref_mut(&mut self) -> &mut T {
        match self.as_mut() {
            Some(value) => value,
            None => null_deref(),
        }
    }
}

#[cold]
#[track_caller]
fn null_deref() -> ! {
    panic!("dereferenced an empty Unique")
}

/// The null pointer literal, for comparing against a [`Unique`] directly.
///
/// An empty [`Unique`] compares equal to [`Null`]; any owned pointer
/// compares greater.
///
/// ```
/// use rudiments::{Unique, make_unique, unique::Null};
///
/// let empty = Unique::<u8>::null();
/// let full = make_unique(1_u8);
/// assert!(empty == Null && Null == empty);
/// assert!(full != Null && full > Null);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Null;

impl<T: ?Sized, D: Delete<T>, U: ?Sized, E: Delete<U>> PartialEq<Unique<U, E>> for Unique<T, D> {
    #[inline]
    fn eq(&self, other: &Unique<U, E>) -> bool {
        self.addr() == other.addr()
    }
}

impl<T: ?Sized, D: Delete<T>> Eq for Unique<T, D> {}

impl<T: ?Sized, D: Delete<T>, U: ?Sized, E: Delete<U>> PartialOrd<Unique<U, E>>
    for Unique<T, D>
{
    #[inline]
    fn partial_cmp(&self, other: &Unique<U, E>) -> Option<Ordering> {
        Some(self.addr().cmp(&other.addr()))
    }
}

impl<T: ?Sized, D: Delete<T>> Ord for Unique<T, D> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.addr().cmp(&other.addr())
    }
}

impl<T: ?Sized, D: Delete<T>> PartialEq<Null> for Unique<T, D> {
    #[inline]
    fn eq(&self, _: &Null) -> bool {
        self.is_null()
    }
}

impl<T: ?Sized, D: Delete<T>> PartialEq<Unique<T, D>> for Null {
    #[inline]
    fn eq(&self, other: &Unique<T, D>) -> bool {
        other.is_null()
    }
}

impl<T: ?Sized, D: Delete<T>> PartialOrd<Null> for Unique<T, D> {
    #[inline]
    fn partial_cmp(&self, _: &Null) -> Option<Ordering> {
        Some(self.addr().cmp(&ptr::null()))
    }
}

impl<T: ?Sized, D: Delete<T>> PartialOrd<Unique<T, D>> for Null {
    #[inline]
    fn partial_cmp(&self, other: &Unique<T, D>) -> Option<Ordering> {
        Some(ptr::null::<()>().cmp(&other.addr()))
    }
}

impl<T: ?Sized, D: Delete<T>> Hash for Unique<T, D> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

impl<T: ?Sized, D: Delete<T>> fmt::Pointer for Unique<T, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Pointer::fmt(&self.addr(), f)
    }
}

impl<T: ?Sized + fmt::Debug, D: Delete<T>> fmt::Debug for Unique<T, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_ref() {
            Some(value) => f.debug_tuple("Unique").field(&value).finish(),
            None => f.write_str("Unique(null)"),
        }
    }
}

// SAFETY: A `Unique` owns its object like a `Box` does, so it may cross
// threads whenever the object and the strategy may.
unsafe impl<T: ?Sized + Send, D: Delete<T> + Send> Send for Unique<T, D> {}

// SAFETY: Shared access only hands out `&T` and `&D`.
unsafe impl<T: ?Sized + Sync, D: Delete<T> + Sync> Sync for Unique<T, D> {}

#[cfg(test)]
mod tests {
    use alloc::{format, string::String, vec::Vec};
    use core::cell::Cell;

    use super::*;

    struct CountingDelete<'a> {
        count: &'a Cell<usize>,
    }

    impl Delete<String> for CountingDelete<'_> {
        unsafe fn delete(&mut self, ptr: NonNull<String>) {
            self.count.set(self.count.get() + 1);
            // SAFETY: Tests only hand this strategy pointers from `Box::into_raw`.
            drop(unsafe { Box::from_raw(ptr.as_ptr()) });
        }
    }

    fn boxed(value: &str) -> *mut String {
        Box::into_raw(Box::new(String::from(value)))
    }

    #[test]
    fn test_unique_size() {
        assert_eq!(
            core::mem::size_of::<Unique<String>>(),
            core::mem::size_of::<*mut String>()
        );
        assert_eq!(
            core::mem::size_of::<Unique<[u8]>>(),
            core::mem::size_of::<*mut [u8]>()
        );
        assert_eq!(
            core::mem::size_of::<Unique<String, CountingDelete<'_>>>(),
            core::mem::size_of::<*mut String>() + core::mem::size_of::<CountingDelete<'_>>()
        );
    }

    #[test]
    fn test_reset_swaps_in_before_deleting() {
        let count = Cell::new(0);
        // SAFETY: `boxed` hands out `Box::into_raw` pointers.
        let mut p = unsafe { Unique::from_raw_with(boxed("old"), CountingDelete { count: &count }) };

        let new_raw = boxed("new");
        // SAFETY: `new_raw` is a fresh box, distinct from the owned one.
        unsafe { p.reset_to(new_raw) };

        assert_eq!(count.get(), 1);
        assert_eq!(p.get().map(NonNull::as_ptr), Some(new_raw));
        assert_eq!(*p, "new");

        drop(p);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_release_suppresses_delete() {
        let count = Cell::new(0);
        let raw = boxed("kept");
        {
            // SAFETY: `raw` is a fresh box.
            let mut p = unsafe { Unique::from_raw_with(raw, CountingDelete { count: &count }) };
            assert_eq!(p.release().map(NonNull::as_ptr), Some(raw));
            assert!(p.is_null());
            assert!(p.release().is_none());
        }
        assert_eq!(count.get(), 0);

        // SAFETY: Ownership of `raw` was released to us above.
        drop(unsafe { Box::from_raw(raw) });
    }

    #[test]
    fn test_swap_exchanges_pointer_and_strategy() {
        let left_count = Cell::new(0);
        let right_count = Cell::new(0);
        // SAFETY: Both pointers are fresh boxes.
        let mut left =
            unsafe { Unique::from_raw_with(boxed("left"), CountingDelete { count: &left_count }) };
        // SAFETY: Both pointers are fresh boxes.
        let mut right = unsafe {
            Unique::from_raw_with(boxed("right"), CountingDelete {
                count: &right_count,
            })
        };

        left.swap(&mut right);
        assert_eq!(*left, "right");
        assert_eq!(*right, "left");
        assert_eq!(left_count.get() + right_count.get(), 0);

        drop(left);
        assert_eq!(right_count.get(), 1);
        assert_eq!(left_count.get(), 0);
    }

    #[test]
    fn test_null_comparisons() {
        let empty = Unique::<String>::null();
        let full = Unique::new(String::from("x"));

        assert!(empty == Null);
        assert!(Null == empty);
        assert!(full != Null);
        assert!(Null != full);
        assert_eq!(empty.partial_cmp(&Null), Some(Ordering::Equal));
        assert_eq!(Null.partial_cmp(&full), Some(Ordering::Less));
        assert_eq!(empty, Unique::<String>::default());
    }

    #[test]
    fn test_ordering_follows_addresses() {
        let values: Vec<Unique<u32>> = (0..4).map(Unique::new).collect();
        for a in &values {
            for b in &values {
                let expected = a.get().map(NonNull::as_ptr).cmp(&b.get().map(NonNull::as_ptr));
                assert_eq!(a.cmp(b), expected);
            }
        }
    }

    #[test]
    fn test_box_round_trip() {
        let p = Unique::from(Box::new(3_i16));
        let raw = p.get();
        let boxed = p.into_box().unwrap();
        assert_eq!(NonNull::from(&*boxed), raw.unwrap());
        assert!(Unique::<i16>::null().into_box().is_none());
    }

    #[test]
    fn test_debug() {
        assert_eq!(format!("{:?}", Unique::new(5)), "Unique(5)");
        assert_eq!(format!("{:?}", Unique::<i32>::null()), "Unique(null)");
    }

    #[test]
    #[should_panic(expected = "dereferenced an empty Unique")]
    fn test_deref_null_panics() {
        let p = Unique::<u8>::null();
        let _value: u8 = *p;
    }

    #[test]
    fn test_send_sync() {
        static_assertions::assert_impl_all!(Unique<String>: Send, Sync);
        static_assertions::assert_not_impl_any!(Unique<core::cell::Cell<u8>>: Sync);
        static_assertions::assert_not_impl_any!(Unique<String>: Clone, Copy);
    }
}
