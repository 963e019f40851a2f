/// A zero-based position in the order of an [`OrderedMap`](crate::OrderedMap).
///
/// Indexing a map by `Position` addresses the slot at that position, while indexing
/// by a key reference looks the key up.
///
/// # Examples
///
/// ```
/// use dual_map::{OrderedMap, Position};
///
/// let mut map = OrderedMap::new();
/// map.set_value("b", 20);
/// map.set_value("a", 10);
///
/// assert_eq!(map[Position(0)], 20);
/// assert_eq!(map[&"a"], 10);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Position(pub usize);
