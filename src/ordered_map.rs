use core::borrow::Borrow;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::ops::Index;
use core::slice;

use alloc::vec;

use crate::raw::RawOrderedMap;
use crate::{Cursor, Diagnostics, Error, OrderedSequence, Result, SequenceMut};

mod capacity;
mod position;
mod reconcile;
mod view;

pub use crate::Position;
pub use view::{KeysView, ValuesView};

/// An ordered map addressable both by unique key and by position.
///
/// Entries keep the order in which they were placed: [`set_value`] appends new keys
/// at the end, [`insert_at`] places them at an explicit position, and [`move_index`]
/// reorders them. Every entry can be reached by its zero-based position, and every
/// key by an O(1) hash lookup.
///
/// Keys must implement [`Hash`] and [`Eq`] for lookups, and [`Clone`] because the
/// lookup index keeps its own copy of each key. It is a logic error for a key to be
/// modified in such a way that its hash or equality changes while it is in the map.
///
/// # Positions and slots
///
/// The map is a sequence of *slots*, each holding an optional key and a value. Slots
/// created through the mutation API always hold a key that is unique in the map.
/// Slots loaded from persisted data with [`from_persisted`] or [`load`] may instead
/// hold no key, or repeat the key of an earlier slot; such slots stay visible by
/// position but are never reachable by key, and are reported through
/// [`diagnostics`]. For this reason positional accessors and iterators yield keys as
/// `Option<&K>`.
///
/// # Versioning
///
/// Every structural mutation (adding a new key, removing, clearing, moving, loading)
/// increments the map's [`version`]. Replacing the value of an existing entry does
/// not. [`Cursor`]s compare this version on every step and refuse to continue once it
/// changed.
///
/// # Examples
///
/// ```
/// use dual_map::{OrderedMap, Position};
///
/// let mut layers = OrderedMap::new();
///
/// layers.set_value("background", 0.2);
/// layers.set_value("foreground", 1.0);
/// layers.insert_at(1, "midground", 0.5).unwrap();
///
/// // Lookup by key.
/// assert_eq!(layers.get("midground"), Some(&0.5));
/// assert_eq!(layers.index_of("foreground"), Some(2));
///
/// // Lookup by position.
/// assert_eq!(layers.get_key_at(0), Ok(Some(&"background")));
/// assert_eq!(layers[Position(1)], 0.5);
///
/// // Reorder: move the foreground to the front.
/// layers.move_index(2, 0).unwrap();
/// let order: Vec<_> = layers.keys().iter().flatten().copied().collect();
/// assert_eq!(order, ["foreground", "background", "midground"]);
/// ```
///
/// [`set_value`]: OrderedMap::set_value
/// [`insert_at`]: OrderedMap::insert_at
/// [`move_index`]: OrderedMap::move_index
/// [`from_persisted`]: OrderedMap::from_persisted
/// [`load`]: OrderedMap::load
/// [`diagnostics`]: OrderedMap::diagnostics
/// [`version`]: OrderedMap::version
#[derive(Clone)]
pub struct OrderedMap<K, V> {
    raw: RawOrderedMap<K, V>,
    version: u64,
    diagnostics: Diagnostics<K>,
    diagnostics_suppressed: bool,
}

/// An iterator over the slots of an `OrderedMap`, in order.
///
/// This `struct` is created by the [`iter`] method on [`OrderedMap`]. See its
/// documentation for more.
///
/// # Examples
///
/// ```
/// use dual_map::OrderedMap;
///
/// let map = OrderedMap::from([(1, "a"), (2, "b")]);
/// let mut iter = map.iter();
/// assert_eq!(iter.next(), Some((Some(&1), &"a")));
/// assert_eq!(iter.next_back(), Some((Some(&2), &"b")));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`iter`]: OrderedMap::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, V> {
    keys: slice::Iter<'a, Option<K>>,
    values: slice::Iter<'a, V>,
}

/// A mutable iterator over the slots of an `OrderedMap`, in order.
///
/// This `struct` is created by the [`iter_mut`] method on [`OrderedMap`].
///
/// [`iter_mut`]: OrderedMap::iter_mut
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IterMut<'a, K, V> {
    keys: slice::Iter<'a, Option<K>>,
    values: slice::IterMut<'a, V>,
}

/// An owning iterator over the slots of an `OrderedMap`, in order.
///
/// This `struct` is created by the [`into_iter`] method on [`OrderedMap`]
/// (provided by the [`IntoIterator`] trait).
///
/// [`into_iter`]: IntoIterator::into_iter
pub struct IntoIter<K, V> {
    keys: vec::IntoIter<Option<K>>,
    values: vec::IntoIter<V>,
}

/// An iterator over the key slots of an `OrderedMap`, in order.
///
/// This `struct` is created by [`KeysView::iter`].
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Keys<'a, K> {
    inner: slice::Iter<'a, Option<K>>,
}

/// An iterator over the values of an `OrderedMap`, in order.
///
/// This `struct` is created by [`ValuesView::iter`].
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Values<'a, V> {
    inner: slice::Iter<'a, V>,
}

/// A mutable iterator over the values of an `OrderedMap`, in order.
///
/// This `struct` is created by the [`values_mut`] method on [`OrderedMap`].
///
/// [`values_mut`]: OrderedMap::values_mut
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct ValuesMut<'a, V> {
    inner: slice::IterMut<'a, V>,
}

impl<K, V> OrderedMap<K, V> {
    /// Makes a new, empty `OrderedMap`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dual_map::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// map.set_value(1, "a");
    /// ```
    #[must_use]
    pub fn new() -> OrderedMap<K, V> {
        OrderedMap {
            raw: RawOrderedMap::new(),
            version: 0,
            diagnostics: Diagnostics::default(),
            diagnostics_suppressed: false,
        }
    }

    /// Returns the number of slots in the map, including slots that are only reachable
    /// by position.
    ///
    /// # Complexity
    ///
    /// O(1)
    ///
    /// # Examples
    ///
    /// ```
    /// use dual_map::OrderedMap;
    ///
    /// let mut a = OrderedMap::new();
    /// assert_eq!(a.len(), 0);
    /// a.set_value(1, "a");
    /// assert_eq!(a.len(), 1);
    /// ```
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the map contains no slots.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the structural version of the map.
    ///
    /// The version starts at zero and increases by one on every structural mutation.
    /// It is not part of the persisted form.
    ///
    /// # Examples
    ///
    /// ```
    /// use dual_map::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// map.set_value("a", 1);
    /// assert_eq!(map.version(), 1);
    ///
    /// // Replacing a value is not structural.
    /// map.set_value("a", 2);
    /// assert_eq!(map.version(), 1);
    /// ```
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    fn bump_version(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    const fn out_of_range(&self, index: usize) -> Error {
        Error::IndexOutOfRange {
            index,
            len: self.raw.len(),
        }
    }

    /// Returns the key in slot `position`, which is `None` for a slot loaded without
    /// a key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `position >= len`.
    ///
    /// # Complexity
    ///
    /// O(1)
    ///
    /// # Examples
    ///
    /// ```
    /// use dual_map::{Error, OrderedMap};
    ///
    /// let map = OrderedMap::from([("a", 1)]);
    /// assert_eq!(map.get_key_at(0), Ok(Some(&"a")));
    /// assert_eq!(map.get_key_at(1), Err(Error::IndexOutOfRange { index: 1, len: 1 }));
    /// ```
    pub fn get_key_at(&self, position: usize) -> Result<Option<&K>> {
        self.raw
            .key_slot(position)
            .map(Option::as_ref)
            .ok_or_else(|| self.out_of_range(position))
    }

    /// Returns the value in slot `position`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `position >= len`.
    ///
    /// # Complexity
    ///
    /// O(1)
    pub fn get_value_at(&self, position: usize) -> Result<&V> {
        self.raw.value(position).ok_or_else(|| self.out_of_range(position))
    }

    /// Returns a mutable reference to the value in slot `position`.
    ///
    /// Writing through the reference is not a structural mutation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `position >= len`.
    pub fn get_value_at_mut(&mut self, position: usize) -> Result<&mut V> {
        let len = self.raw.len();
        self.raw
            .value_mut(position)
            .ok_or(Error::IndexOutOfRange { index: position, len })
    }

    /// Replaces the value in slot `position` and returns the old value.
    ///
    /// This is not a structural mutation; cursors stay valid.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `position >= len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dual_map::OrderedMap;
    ///
    /// let mut map = OrderedMap::from([("a", 1)]);
    /// let version = map.version();
    /// assert_eq!(map.set_value_at(0, 10), Ok(1));
    /// assert_eq!(map.get("a"), Some(&10));
    /// assert_eq!(map.version(), version);
    /// ```
    pub fn set_value_at(&mut self, position: usize, value: V) -> Result<V> {
        if position >= self.raw.len() {
            return Err(self.out_of_range(position));
        }
        Ok(self.raw.replace_value(position, value))
    }

    /// Returns the key slot and value at `position`, or `None` if out of bounds.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn get_index(&self, position: usize) -> Option<(Option<&K>, &V)> {
        Some((self.raw.key_slot(position)?.as_ref(), self.raw.value(position)?))
    }

    /// Returns the key slots and values as two positionally aligned slices.
    ///
    /// This is the persisted shape of the map, borrowed.
    #[must_use]
    pub fn as_slices(&self) -> (&[Option<K>], &[V]) {
        (self.raw.key_slots(), self.raw.values())
    }

    /// Returns the findings of the last [`load`](OrderedMap::load) or
    /// [`from_persisted`](OrderedMap::from_persisted).
    ///
    /// Findings are not recomputed by later mutations.
    #[must_use]
    pub const fn diagnostics(&self) -> &Diagnostics<K> {
        &self.diagnostics
    }

    /// Returns `true` if diagnostic findings should not be displayed.
    #[must_use]
    pub const fn diagnostics_suppressed(&self) -> bool {
        self.diagnostics_suppressed
    }

    /// Suppresses or re-enables the display of diagnostic findings.
    ///
    /// While suppressed, loading emits no warning events. Findings are still
    /// computed and available from [`diagnostics`](OrderedMap::diagnostics).
    pub fn set_diagnostics_suppressed(&mut self, suppressed: bool) {
        self.diagnostics_suppressed = suppressed;
    }

    /// Clears the map, removing all slots.
    ///
    /// This is a structural mutation, even if the map was already empty.
    ///
    /// # Complexity
    ///
    /// O(n)
    ///
    /// # Examples
    ///
    /// ```
    /// use dual_map::OrderedMap;
    ///
    /// let mut a = OrderedMap::new();
    /// a.set_value(1, "a");
    /// a.clear();
    /// assert!(a.is_empty());
    /// assert_eq!(a.version(), 2);
    /// ```
    pub fn clear(&mut self) {
        tracing::trace!(len = self.raw.len(), "clearing map");
        self.raw.clear();
        self.bump_version();
    }

    /// Gets an iterator over the slots of the map, in order.
    ///
    /// # Examples
    ///
    /// ```
    /// use dual_map::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// map.set_value(3, "c");
    /// map.set_value(2, "b");
    /// map.set_value(1, "a");
    ///
    /// for (key, value) in map.iter() {
    ///     println!("{key:?}: {value}");
    /// }
    ///
    /// let (first_key, first_value) = map.iter().next().unwrap();
    /// assert_eq!((first_key, *first_value), (Some(&3), "c"));
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            keys: self.raw.key_slots().iter(),
            values: self.raw.values().iter(),
        }
    }

    /// Gets a mutable iterator over the slots of the map, in order.
    ///
    /// Keys are yielded as shared references; only values can be modified.
    ///
    /// # Examples
    ///
    /// ```
    /// use dual_map::OrderedMap;
    ///
    /// let mut map = OrderedMap::from([("a", 1), ("b", 2), ("c", 3)]);
    ///
    /// for (key, value) in map.iter_mut() {
    ///     if key != Some(&"a") {
    ///         *value += 10;
    ///     }
    /// }
    /// assert_eq!(map.values().iter().copied().collect::<Vec<_>>(), [1, 12, 13]);
    /// ```
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        let (keys, values) = self.raw.slots_mut();
        IterMut {
            keys: keys.iter(),
            values: values.iter_mut(),
        }
    }

    /// Returns a read-only view of the key slots.
    ///
    /// # Examples
    ///
    /// ```
    /// use dual_map::OrderedMap;
    ///
    /// let map = OrderedMap::from([(2, "b"), (1, "a")]);
    /// let keys: Vec<_> = map.keys().iter().flatten().copied().collect();
    /// assert_eq!(keys, [2, 1]);
    /// ```
    pub const fn keys(&self) -> KeysView<'_, K, V> {
        KeysView::new(self)
    }

    /// Returns a read-only view of the values.
    ///
    /// # Examples
    ///
    /// ```
    /// use dual_map::OrderedMap;
    ///
    /// let map = OrderedMap::from([(1, "hello"), (2, "goodbye")]);
    /// let values: Vec<_> = map.values().iter().copied().collect();
    /// assert_eq!(values, ["hello", "goodbye"]);
    /// ```
    pub const fn values(&self) -> ValuesView<'_, K, V> {
        ValuesView::new(self)
    }

    /// Gets a mutable iterator over the values of the map, in order.
    ///
    /// # Examples
    ///
    /// ```
    /// use dual_map::OrderedMap;
    ///
    /// let mut map = OrderedMap::from([(1, String::from("hello")), (2, String::from("goodbye"))]);
    /// for value in map.values_mut() {
    ///     value.push('!');
    /// }
    /// assert_eq!(map[&1], "hello!");
    /// ```
    pub fn values_mut(&mut self) -> ValuesMut<'_, V> {
        ValuesMut {
            inner: self.raw.values_mut().iter_mut(),
        }
    }

    /// Creates a [`Cursor`] over the map's slots, bound to the current version.
    pub const fn cursor(&self) -> Cursor {
        Cursor::new(self.version)
    }
}

impl<K: Hash + Eq, V> OrderedMap<K, V> {
    /// Returns the position of `key`, or `None` if the key is not reachable.
    ///
    /// # Complexity
    ///
    /// O(1)
    ///
    /// # Examples
    ///
    /// ```
    /// use dual_map::OrderedMap;
    ///
    /// let map = OrderedMap::from([("x", 10), ("y", 20)]);
    /// assert_eq!(map.index_of("y"), Some(1));
    /// assert_eq!(map.index_of("z"), None);
    /// ```
    pub fn index_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.raw.position_of(key)
    }

    /// Returns `true` if `key` is reachable in the map.
    ///
    /// # Complexity
    ///
    /// O(1)
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.raw.position_of(key).is_some()
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, but [`Hash`] and
    /// [`Eq`] on the borrowed form *must* match those for the key type.
    ///
    /// # Complexity
    ///
    /// O(1)
    ///
    /// # Examples
    ///
    /// ```
    /// use dual_map::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// map.set_value(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), None);
    /// ```
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.raw.position_of(key).and_then(|position| self.raw.value(position))
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// Writing through the reference is not a structural mutation.
    ///
    /// # Examples
    ///
    /// ```
    /// use dual_map::OrderedMap;
    ///
    /// let mut map = OrderedMap::from([(1, "a")]);
    /// if let Some(x) = map.get_mut(&1) {
    ///     *x = "b";
    /// }
    /// assert_eq!(map[&1], "b");
    /// ```
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let position = self.raw.position_of(key)?;
        self.raw.value_mut(position)
    }

    /// Returns the stored key and value for the supplied key.
    ///
    /// # Examples
    ///
    /// ```
    /// use dual_map::OrderedMap;
    ///
    /// let map = OrderedMap::from([(String::from("a"), 1)]);
    /// assert_eq!(map.get_key_value("a"), Some((&String::from("a"), &1)));
    /// assert_eq!(map.get_key_value("b"), None);
    /// ```
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let (_, key, value) = self.get_full(key)?;
        Some((key, value))
    }

    /// Returns the position, stored key and value for the supplied key.
    ///
    /// # Examples
    ///
    /// ```
    /// use dual_map::OrderedMap;
    ///
    /// let map = OrderedMap::from([("a", 1), ("b", 2)]);
    /// assert_eq!(map.get_full("b"), Some((1, &"b", &2)));
    /// assert_eq!(map.get_full("c"), None);
    /// ```
    pub fn get_full<Q>(&self, key: &Q) -> Option<(usize, &K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let (key, position) = self.raw.position_key_of(key)?;
        Some((position, key, self.raw.value(position)?))
    }

    /// Inserts or updates the value for `key`.
    ///
    /// If `key` is already reachable, its value is replaced in place, the old value
    /// is returned and the version is left unchanged. Otherwise the entry is appended
    /// at the end, `None` is returned and the version is incremented.
    ///
    /// # Complexity
    ///
    /// O(1) amortized
    ///
    /// # Examples
    ///
    /// ```
    /// use dual_map::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// assert_eq!(map.set_value(37, "a"), None);
    /// assert_eq!(map.set_value(37, "b"), Some("a"));
    /// assert_eq!(map[&37], "b");
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn set_value(&mut self, key: K, value: V) -> Option<V>
    where
        K: Clone,
    {
        if let Some(position) = self.raw.position_of(&key) {
            Some(self.raw.replace_value(position, value))
        } else {
            self.raw.push(key, value);
            self.bump_version();
            None
        }
    }

    /// Like [`set_value`](OrderedMap::set_value), for a key that may be missing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NullKey`] if `key` is `None`. The map is not modified.
    pub fn set_slot(&mut self, key: Option<K>, value: V) -> Result<Option<V>>
    where
        K: Clone,
    {
        let key = key.ok_or(Error::NullKey)?;
        Ok(self.set_value(key, value))
    }

    /// Inserts a new entry at `position`, shifting the slots at and after it one
    /// position later.
    ///
    /// # Errors
    ///
    /// * [`Error::IndexOutOfRange`] if `position > len`.
    /// * [`Error::DuplicateKey`] if `key` is already reachable.
    ///
    /// The map is not modified on error.
    ///
    /// # Complexity
    ///
    /// O(n - position)
    ///
    /// # Examples
    ///
    /// ```
    /// use dual_map::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// map.insert_at(0, "x", 10).unwrap();
    /// map.insert_at(0, "y", 20).unwrap();
    ///
    /// assert_eq!(map.get_value_at(0), Ok(&20));
    /// assert_eq!(map.get_value_at(1), Ok(&10));
    /// assert_eq!(map.index_of("x"), Some(1));
    /// assert!(map.insert_at(0, "x", 30).is_err());
    /// ```
    pub fn insert_at(&mut self, position: usize, key: K, value: V) -> Result<()>
    where
        K: Clone,
    {
        if position > self.raw.len() {
            return Err(self.out_of_range(position));
        }
        if let Some(index) = self.raw.position_of(&key) {
            return Err(Error::DuplicateKey { index });
        }

        self.raw.insert(position, key, value);
        self.bump_version();
        Ok(())
    }

    /// Like [`insert_at`](OrderedMap::insert_at), for a key that may be missing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NullKey`] if `key` is `None`, otherwise the errors of
    /// [`insert_at`](OrderedMap::insert_at).
    pub fn insert_slot_at(&mut self, position: usize, key: Option<K>, value: V) -> Result<()>
    where
        K: Clone,
    {
        let key = key.ok_or(Error::NullKey)?;
        self.insert_at(position, key, value)
    }

    /// Replaces slot `position` with `key` and `value`, returning the previous key
    /// slot and value.
    ///
    /// If `key` is already the live key of that slot only the value is replaced, which
    /// is not a structural mutation. Otherwise the slot is re-keyed and the version is
    /// incremented; the old key, if it was reachable, no longer is.
    ///
    /// # Errors
    ///
    /// * [`Error::IndexOutOfRange`] if `position >= len`.
    /// * [`Error::DuplicateKey`] if `key` is reachable at another position.
    ///
    /// # Examples
    ///
    /// ```
    /// use dual_map::OrderedMap;
    ///
    /// let mut map = OrderedMap::from([("a", 1), ("b", 2)]);
    /// assert_eq!(map.replace_at(0, "c", 3), Ok((Some("a"), 1)));
    /// assert_eq!(map.index_of("c"), Some(0));
    /// assert!(!map.contains_key("a"));
    /// assert!(map.replace_at(0, "b", 4).is_err());
    /// ```
    pub fn replace_at(&mut self, position: usize, key: K, value: V) -> Result<(Option<K>, V)>
    where
        K: Clone,
    {
        if position >= self.raw.len() {
            return Err(self.out_of_range(position));
        }
        match self.raw.position_of(&key) {
            Some(index) if index == position => Ok((Some(key), self.raw.replace_value(position, value))),
            Some(index) => Err(Error::DuplicateKey { index }),
            None => {
                let old = self.raw.replace_slot(position, key, value);
                self.bump_version();
                Ok(old)
            }
        }
    }

    /// Removes the slot at `position`, shifting later slots one position earlier, and
    /// returns its key slot and value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `position >= len`.
    ///
    /// # Complexity
    ///
    /// O(n - position)
    ///
    /// # Examples
    ///
    /// ```
    /// use dual_map::OrderedMap;
    ///
    /// let mut map = OrderedMap::from([("a", 1), ("b", 2), ("c", 3)]);
    /// assert_eq!(map.remove_at(0), Ok((Some("a"), 1)));
    /// assert_eq!(map.index_of("c"), Some(1));
    /// assert!(map.remove_at(2).is_err());
    /// ```
    pub fn remove_at(&mut self, position: usize) -> Result<(Option<K>, V)> {
        if position >= self.raw.len() {
            return Err(self.out_of_range(position));
        }

        let removed = self.raw.remove(position);
        self.bump_version();
        Ok(removed)
    }

    /// Removes `key` from the map, returning its value, or `None` if the key was not
    /// reachable. Removing an absent key does not change the version.
    ///
    /// # Complexity
    ///
    /// O(n - position)
    ///
    /// # Examples
    ///
    /// ```
    /// use dual_map::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// map.set_value(1, "a");
    /// assert_eq!(map.remove_key(&1), Some("a"));
    /// assert_eq!(map.remove_key(&1), None);
    /// ```
    pub fn remove_key<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let position = self.raw.position_of(key)?;
        let (_, value) = self.raw.remove(position);
        self.bump_version();
        Some(value)
    }

    /// Moves the slot at `from` to position `to`, shifting the slots in between.
    ///
    /// Equivalent to removing the slot and re-inserting it at `to`, except that the
    /// version is incremented exactly once, including when `from == to`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if either position is `>= len`. The map is
    /// not modified on error.
    ///
    /// # Complexity
    ///
    /// O(|from - to|)
    ///
    /// # Examples
    ///
    /// ```
    /// use dual_map::OrderedMap;
    ///
    /// let mut map = OrderedMap::from([("a", 1), ("b", 2), ("c", 3)]);
    /// map.move_index(0, 2).unwrap();
    /// assert_eq!(map.get_key_at(2), Ok(Some(&"a")));
    /// assert_eq!(map.index_of("b"), Some(0));
    /// ```
    pub fn move_index(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.raw.len();
        if from >= len {
            return Err(self.out_of_range(from));
        }
        if to >= len {
            return Err(self.out_of_range(to));
        }

        tracing::trace!(from, to, "moving slot");
        self.raw.move_slot(from, to);
        self.bump_version();
        Ok(())
    }
}

impl<K: Hash, V: Hash> Hash for OrderedMap<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for (k, v) in self {
            k.hash(state);
            v.hash(state);
        }
    }
}

/// Maps are equal when they hold the same key slots and values in the same order.
/// Versions, diagnostics and the suppression flag are not compared.
impl<K: PartialEq, V: PartialEq> PartialEq for OrderedMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slices() == other.as_slices()
    }
}

impl<K: Eq, V: Eq> Eq for OrderedMap<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for OrderedMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        OrderedMap::new()
    }
}

impl<K: Hash + Eq + Clone, V> FromIterator<(K, V)> for OrderedMap<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = OrderedMap::new();
        map.extend(iter);
        map
    }
}

impl<K: Hash + Eq + Clone, V> Extend<(K, V)> for OrderedMap<K, V> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.set_value(k, v);
        }
    }
}

/// Upserts copies of borrowed pairs.
///
/// # Examples
///
/// ```
/// use dual_map::OrderedMap;
///
/// let mut map = OrderedMap::from([(1, 10), (2, 20)]);
/// let source = [(3, 30), (1, 11)];
///
/// map.extend(source.iter().map(|(k, v)| (k, v)));
/// assert_eq!(map.iter().map(|(k, v)| (k.copied(), *v)).collect::<Vec<_>>(), [
///     (Some(1), 11),
///     (Some(2), 20),
///     (Some(3), 30),
/// ]);
/// ```
impl<'a, K: Hash + Eq + Copy, V: Copy> Extend<(&'a K, &'a V)> for OrderedMap<K, V> {
    fn extend<T: IntoIterator<Item = (&'a K, &'a V)>>(&mut self, iter: T) {
        for (&k, &v) in iter {
            self.set_value(k, v);
        }
    }
}

impl<'a, K, V> IntoIterator for &'a OrderedMap<K, V> {
    type Item = (Option<&'a K>, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<'a, K, V> IntoIterator for &'a mut OrderedMap<K, V> {
    type Item = (Option<&'a K>, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> IterMut<'a, K, V> {
        self.iter_mut()
    }
}

impl<K, V> IntoIterator for OrderedMap<K, V> {
    type Item = (Option<K>, V);
    type IntoIter = IntoIter<K, V>;

    /// Gets an owning iterator over the slots of the map, in order.
    ///
    /// # Examples
    ///
    /// ```
    /// use dual_map::OrderedMap;
    ///
    /// let map = OrderedMap::from([(2, "b"), (1, "a")]);
    /// let mut iter = map.into_iter();
    /// assert_eq!(iter.next(), Some((Some(2), "b")));
    /// assert_eq!(iter.next_back(), Some((Some(1), "a")));
    /// ```
    fn into_iter(self) -> IntoIter<K, V> {
        let (keys, values) = self.raw.into_slots();
        IntoIter {
            keys: keys.into_iter(),
            values: values.into_iter(),
        }
    }
}

impl<K, Q, V> Index<&Q> for OrderedMap<K, V>
where
    K: Borrow<Q> + Hash + Eq,
    Q: ?Sized + Hash + Eq,
{
    type Output = V;

    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K: Hash + Eq + Clone, V, const N: usize> From<[(K, V); N]> for OrderedMap<K, V> {
    fn from(arr: [(K, V); N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<'a, K, V> OrderedSequence for &'a OrderedMap<K, V> {
    fn len(&self) -> usize {
        self.raw.len()
    }

    fn item_at(&self, position: usize) -> Option<(Option<&'a K>, &'a V)> {
        let map: &'a OrderedMap<K, V> = *self;
        map.get_index(position)
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// The map as a mutable list of `(key, value)` entries.
///
/// Unlike [`set_value`](OrderedMap::set_value), [`try_push`](SequenceMut::try_push)
/// never updates an existing entry: it fails with [`Error::DuplicateKey`].
impl<K: Hash + Eq + Clone, V> SequenceMut for OrderedMap<K, V> {
    type Item = (K, V);
    type Removed = (Option<K>, V);

    fn try_push(&mut self, (key, value): (K, V)) -> Result<()> {
        self.insert_at(self.len(), key, value)
    }

    fn try_insert(&mut self, position: usize, (key, value): (K, V)) -> Result<()> {
        self.insert_at(position, key, value)
    }

    fn try_remove_at(&mut self, position: usize) -> Result<(Option<K>, V)> {
        self.remove_at(position)
    }

    fn try_set(&mut self, position: usize, (key, value): (K, V)) -> Result<()> {
        self.replace_at(position, key, value).map(drop)
    }

    fn try_clear(&mut self) -> Result<()> {
        self.clear();
        Ok(())
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (Option<&'a K>, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        Some((self.keys.next()?.as_ref(), self.values.next()?))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.values.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        Some((self.keys.next_back()?.as_ref(), self.values.next_back()?))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    fn len(&self) -> usize {
        self.values.len()
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            keys: self.keys.clone(),
            values: self.values.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<K, V> Default for Iter<'_, K, V> {
    /// Creates an empty `Iter`.
    ///
    /// ```
    /// # use dual_map::ordered_map::Iter;
    /// let iter: Iter<'_, u8, u8> = Default::default();
    /// assert_eq!(iter.len(), 0);
    /// ```
    fn default() -> Self {
        Iter {
            keys: slice::Iter::default(),
            values: slice::Iter::default(),
        }
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (Option<&'a K>, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        Some((self.keys.next()?.as_ref(), self.values.next()?))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.values.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IterMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        Some((self.keys.next_back()?.as_ref(), self.values.next_back()?))
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {
    fn len(&self) -> usize {
        self.values.len()
    }
}

impl<K, V> FusedIterator for IterMut<'_, K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for IterMut<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterMut").field("remaining", &self.values.len()).finish()
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (Option<K>, V);

    fn next(&mut self) -> Option<Self::Item> {
        Some((self.keys.next()?, self.values.next()?))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.values.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        Some((self.keys.next_back()?, self.values.next_back()?))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {
    fn len(&self) -> usize {
        self.values.len()
    }
}

impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for IntoIter<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.keys.as_slice().iter().zip(self.values.as_slice()))
            .finish()
    }
}

impl<'a, K> Iterator for Keys<'a, K> {
    type Item = Option<&'a K>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(Option::as_ref)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K> DoubleEndedIterator for Keys<'_, K> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(Option::as_ref)
    }
}

impl<K> ExactSizeIterator for Keys<'_, K> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K> FusedIterator for Keys<'_, K> {}

impl<K> Clone for Keys<'_, K> {
    fn clone(&self) -> Self {
        Keys {
            inner: self.inner.clone(),
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for Keys<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<K> Default for Keys<'_, K> {
    fn default() -> Self {
        Keys {
            inner: slice::Iter::default(),
        }
    }
}

impl<'a, V> Iterator for Values<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }

    fn last(mut self) -> Option<Self::Item> {
        self.next_back()
    }
}

impl<V> DoubleEndedIterator for Values<'_, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<V> ExactSizeIterator for Values<'_, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<V> FusedIterator for Values<'_, V> {}

impl<V> Clone for Values<'_, V> {
    fn clone(&self) -> Self {
        Values {
            inner: self.inner.clone(),
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for Values<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<V> Default for Values<'_, V> {
    fn default() -> Self {
        Values {
            inner: slice::Iter::default(),
        }
    }
}

impl<'a, V> Iterator for ValuesMut<'a, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }

    fn last(mut self) -> Option<Self::Item> {
        self.next_back()
    }
}

impl<V> DoubleEndedIterator for ValuesMut<'_, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<V> ExactSizeIterator for ValuesMut<'_, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<V> FusedIterator for ValuesMut<'_, V> {}

impl<V: fmt::Debug> fmt::Debug for ValuesMut<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.as_slice()).finish()
    }
}

impl<V> Default for ValuesMut<'_, V> {
    fn default() -> Self {
        ValuesMut {
            inner: slice::IterMut::default(),
        }
    }
}
