/// Creates a [`DynArray`](crate::DynArray) from a list of elements.
///
/// There are two forms of this macro, mirroring [`vec!`]:
///
/// - A list of elements. The array holds exactly these elements, in order,
///   and its capacity equals their count.
/// - An element and a count, separated by a semicolon. The element is
///   cloned `count` times, so it must implement [`Clone`].
///
/// A two-element list is always a list: `dyn_array![10, 2]` holds the
/// elements `10` and `2`, while `dyn_array![10; 2]` holds `10` twice.
///
/// [`vec!`]: std::vec!
///
/// # Examples
///
/// ```
/// use rudiments::dyn_array;
///
/// let list = dyn_array![10, 2];
/// assert_eq!(list.len(), 2);
/// assert_eq!((list[0], list[1]), (10, 2));
///
/// let filled = dyn_array!["x"; 3];
/// assert_eq!(filled, ["x", "x", "x"]);
///
/// let empty: rudiments::DynArray<u8> = dyn_array![];
/// assert_eq!(empty.capacity(), 0);
/// ```
#[macro_export]
macro_rules! dyn_array {
    () => {
        $crate::DynArray::new()
    };
    ($elem:expr; $count:expr) => {
        $crate::DynArray::from_elem($count, $elem)
    };
    ($($elem:expr),+ $(,)?) => {
        $crate::DynArray::from([$($elem),+])
    };
}
