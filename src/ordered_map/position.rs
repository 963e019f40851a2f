use core::ops::{Index, IndexMut};

use super::OrderedMap;
use crate::Position;

/// Indexes into the map by position.
///
/// # Panics
///
/// Panics if the position is out of bounds.
///
/// # Examples
///
/// ```
/// use dual_map::{OrderedMap, Position};
///
/// let mut map = OrderedMap::new();
/// map.set_value("b", 2);
/// map.set_value("a", 1);
///
/// assert_eq!(map[Position(0)], 2);
/// ```
impl<K, V> Index<Position> for OrderedMap<K, V> {
    type Output = V;

    fn index(&self, position: Position) -> &Self::Output {
        self.get_value_at(position.0).expect("index out of bounds")
    }
}

/// Mutably indexes into the map by position.
///
/// Assigning through the index replaces a value in place and does not change the
/// map's version.
///
/// # Panics
///
/// Panics if the position is out of bounds.
///
/// # Examples
///
/// ```
/// use dual_map::{OrderedMap, Position};
///
/// let mut map = OrderedMap::from([("a", 1), ("b", 2)]);
/// map[Position(1)] = 5;
///
/// assert_eq!(map.get(&"b"), Some(&5));
/// ```
impl<K, V> IndexMut<Position> for OrderedMap<K, V> {
    fn index_mut(&mut self, position: Position) -> &mut Self::Output {
        self.get_value_at_mut(position.0).expect("index out of bounds")
    }
}
