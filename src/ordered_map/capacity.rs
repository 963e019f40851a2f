use core::hash::Hash;

use super::OrderedMap;
use crate::Diagnostics;
use crate::raw::RawOrderedMap;

impl<K, V> OrderedMap<K, V> {
    /// Creates an empty map with capacity for at least `capacity` slots.
    ///
    /// # Examples
    ///
    /// ```
    /// use dual_map::OrderedMap;
    ///
    /// let map: OrderedMap<i32, i32> = OrderedMap::with_capacity(32);
    /// assert!(map.is_empty());
    /// assert!(map.capacity() >= 32);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        OrderedMap {
            raw: RawOrderedMap::with_capacity(capacity),
            version: 0,
            diagnostics: Diagnostics::default(),
            diagnostics_suppressed: false,
        }
    }

    /// Returns the number of slots the map can hold without reallocating.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }
}

impl<K: Hash + Eq, V> OrderedMap<K, V> {
    /// Reserves capacity for at least `additional` more slots.
    ///
    /// Reserving is not a structural mutation.
    ///
    /// # Examples
    ///
    /// ```
    /// use dual_map::OrderedMap;
    ///
    /// let mut map: OrderedMap<&str, i32> = OrderedMap::new();
    /// map.reserve(10);
    /// assert!(map.capacity() >= 10);
    /// assert_eq!(map.version(), 0);
    /// ```
    pub fn reserve(&mut self, additional: usize) {
        self.raw.reserve(additional);
    }

    /// Shrinks the capacity of the map as much as possible.
    pub fn shrink_to_fit(&mut self) {
        self.raw.shrink_to_fit();
    }
}
