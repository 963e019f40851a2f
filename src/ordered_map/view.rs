use core::borrow::Borrow;
use core::fmt;
use core::hash::Hash;
use core::ops::Index;

use super::{Keys, OrderedMap, Values};
use crate::{Cursor, Error, OrderedSequence, Result, SequenceMut};

/// A read-only, ordered view of the key slots of an [`OrderedMap`].
///
/// This `struct` is created by the [`keys`] method on [`OrderedMap`]. It borrows the
/// map and holds nothing else, so it is `Copy` and cannot outlive the map.
///
/// Slots loaded without a key appear as `None`.
///
/// # Examples
///
/// ```
/// use dual_map::OrderedMap;
///
/// let map = OrderedMap::from([("a", 1), ("b", 2)]);
/// let keys = map.keys();
///
/// assert_eq!(keys.len(), 2);
/// assert_eq!(keys[1], Some("b"));
/// assert!(keys.contains("a"));
/// ```
///
/// [`keys`]: OrderedMap::keys
pub struct KeysView<'a, K, V> {
    map: &'a OrderedMap<K, V>,
}

/// A read-only, ordered view of the values of an [`OrderedMap`].
///
/// This `struct` is created by the [`values`] method on [`OrderedMap`]. It borrows
/// the map and holds nothing else, so it is `Copy` and cannot outlive the map.
///
/// # Examples
///
/// ```
/// use dual_map::OrderedMap;
///
/// let map = OrderedMap::from([("a", 1), ("b", 2)]);
/// let values = map.values();
///
/// assert_eq!(values[0], 1);
/// assert!(values.contains(&2));
/// ```
///
/// [`values`]: OrderedMap::values
pub struct ValuesView<'a, K, V> {
    map: &'a OrderedMap<K, V>,
}

impl<'a, K, V> KeysView<'a, K, V> {
    pub(super) const fn new(map: &'a OrderedMap<K, V>) -> Self {
        KeysView { map }
    }

    /// Returns the number of key slots.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if there are no key slots.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns the key slot at `position`, or `None` if out of bounds.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<Option<&'a K>> {
        self.map.raw.key_slot(position).map(Option::as_ref)
    }

    /// Returns the key slot at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `position >= len`.
    pub fn key_at(&self, position: usize) -> Result<Option<&'a K>> {
        let map: &'a OrderedMap<K, V> = self.map;
        map.get_key_at(position)
    }

    /// Returns `true` if `key` is reachable in the map.
    ///
    /// Uses the map's index, so slots that hold a duplicated key without being
    /// reachable do not count.
    ///
    /// # Complexity
    ///
    /// O(1)
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q> + Hash + Eq,
        Q: ?Sized + Hash + Eq,
    {
        self.map.contains_key(key)
    }

    /// Gets an iterator over the key slots, in order.
    pub fn iter(&self) -> Keys<'a, K> {
        Keys {
            inner: self.map.raw.key_slots().iter(),
        }
    }

    /// Creates a [`Cursor`] over the key slots, bound to the map's current version.
    #[must_use]
    pub const fn cursor(&self) -> Cursor {
        self.map.cursor()
    }
}

impl<'a, K, V> ValuesView<'a, K, V> {
    pub(super) const fn new(map: &'a OrderedMap<K, V>) -> Self {
        ValuesView { map }
    }

    /// Returns the number of values.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if there are no values.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns the value at `position`, or `None` if out of bounds.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&'a V> {
        self.map.raw.value(position)
    }

    /// Returns the value at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `position >= len`.
    pub fn value_at(&self, position: usize) -> Result<&'a V> {
        let map: &'a OrderedMap<K, V> = self.map;
        map.get_value_at(position)
    }

    /// Returns `true` if any slot holds a value equal to `value`.
    ///
    /// Values are not indexed, so this scans every slot.
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn contains(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.map.raw.values().contains(value)
    }

    /// Gets an iterator over the values, in order.
    pub fn iter(&self) -> Values<'a, V> {
        Values {
            inner: self.map.raw.values().iter(),
        }
    }

    /// Creates a [`Cursor`] over the values, bound to the map's current version.
    #[must_use]
    pub const fn cursor(&self) -> Cursor {
        self.map.cursor()
    }
}

impl<K, V> Clone for KeysView<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for KeysView<'_, K, V> {}

impl<K, V> Clone for ValuesView<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for ValuesView<'_, K, V> {}

impl<K: fmt::Debug, V> fmt::Debug for KeysView<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<K, V: fmt::Debug> fmt::Debug for ValuesView<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// # Panics
///
/// Panics if `position` is out of bounds.
impl<K, V> Index<usize> for KeysView<'_, K, V> {
    type Output = Option<K>;

    fn index(&self, position: usize) -> &Option<K> {
        self.map.raw.key_slot(position).expect("index out of bounds")
    }
}

/// # Panics
///
/// Panics if `position` is out of bounds.
impl<K, V> Index<usize> for ValuesView<'_, K, V> {
    type Output = V;

    fn index(&self, position: usize) -> &V {
        self.map.raw.value(position).expect("index out of bounds")
    }
}

impl<'a, K, V> IntoIterator for KeysView<'a, K, V> {
    type Item = Option<&'a K>;
    type IntoIter = Keys<'a, K>;

    fn into_iter(self) -> Keys<'a, K> {
        self.iter()
    }
}

impl<'a, K, V> IntoIterator for ValuesView<'a, K, V> {
    type Item = &'a V;
    type IntoIter = Values<'a, V>;

    fn into_iter(self) -> Values<'a, V> {
        self.iter()
    }
}

impl<'a, K, V> OrderedSequence for KeysView<'a, K, V> {
    fn len(&self) -> usize {
        self.map.len()
    }

    fn item_at(&self, position: usize) -> Option<Option<&'a K>> {
        self.get(position)
    }

    fn version(&self) -> u64 {
        self.map.version()
    }
}

impl<'a, K, V> OrderedSequence for ValuesView<'a, K, V> {
    fn len(&self) -> usize {
        self.map.len()
    }

    fn item_at(&self, position: usize) -> Option<&'a V> {
        self.get(position)
    }

    fn version(&self) -> u64 {
        self.map.version()
    }
}

/// Every method fails with [`Error::ReadOnly`].
impl<K, V> SequenceMut for KeysView<'_, K, V> {
    type Item = K;
    type Removed = K;

    fn try_push(&mut self, _: K) -> Result<()> {
        Err(Error::ReadOnly)
    }

    fn try_insert(&mut self, _: usize, _: K) -> Result<()> {
        Err(Error::ReadOnly)
    }

    fn try_remove_at(&mut self, _: usize) -> Result<K> {
        Err(Error::ReadOnly)
    }

    fn try_set(&mut self, _: usize, _: K) -> Result<()> {
        Err(Error::ReadOnly)
    }

    fn try_clear(&mut self) -> Result<()> {
        Err(Error::ReadOnly)
    }
}

/// Every method fails with [`Error::ReadOnly`].
impl<K, V> SequenceMut for ValuesView<'_, K, V> {
    type Item = V;
    type Removed = V;

    fn try_push(&mut self, _: V) -> Result<()> {
        Err(Error::ReadOnly)
    }

    fn try_insert(&mut self, _: usize, _: V) -> Result<()> {
        Err(Error::ReadOnly)
    }

    fn try_remove_at(&mut self, _: usize) -> Result<V> {
        Err(Error::ReadOnly)
    }

    fn try_set(&mut self, _: usize, _: V) -> Result<()> {
        Err(Error::ReadOnly)
    }

    fn try_clear(&mut self) -> Result<()> {
        Err(Error::ReadOnly)
    }
}
