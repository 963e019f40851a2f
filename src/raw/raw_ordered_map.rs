use alloc::vec::Vec;
use core::borrow::Borrow;
use core::hash::Hash;
use core::ops::Range;

use hashbrown::HashMap;
use smallvec::SmallVec;

/// The parallel-slot storage backing `OrderedMap`.
///
/// Slot `i` is the pair `(keys[i], values[i])`. A slot is *live* when its key is
/// `Some(k)` and `index[k] == i`; any other slot is *dead* and only reachable by
/// position. Dead slots are produced by reconciling persisted data and are never
/// promoted to live by a later mutation.
#[derive(Clone)]
pub(crate) struct RawOrderedMap<K, V> {
    /// Key slots, in order.
    keys: Vec<Option<K>>,
    /// Values, positionally aligned with `keys`.
    values: Vec<V>,
    /// Key to position, for live slots only.
    index: HashMap<K, usize>,
}

/// Buffer of slot positions whose index entries must be rewritten.
type Relocations = SmallVec<[usize; 16]>;

/// Rewrites the index entries of live slots in `range` after the slots were shifted.
///
/// `old_position` maps a slot's current position to the position it held before the
/// shift. All live slots are identified against the untouched index first and only
/// then rewritten, so a live slot moving onto the old position of one of its own dead
/// duplicates can never be mistaken for that duplicate.
fn relocate<K, F>(keys: &[Option<K>], index: &mut HashMap<K, usize>, range: Range<usize>, old_position: F)
where
    K: Hash + Eq,
    F: Fn(usize) -> usize,
{
    let live: Relocations = range
        .filter(|&position| {
            keys[position].as_ref().is_some_and(|key| index.get(key) == Some(&old_position(position)))
        })
        .collect();

    for position in live {
        if let Some(key) = &keys[position]
            && let Some(slot) = index.get_mut(key)
        {
            *slot = position;
        }
    }
}

impl<K, V> RawOrderedMap<K, V> {
    /// Creates a new, empty map.
    pub(crate) fn new() -> Self {
        Self {
            keys: Vec::new(),
            values: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Creates a new map able to hold `capacity` slots without reallocating.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            keys: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Returns the number of slots, live or dead.
    pub(crate) const fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if there are no slots.
    pub(crate) const fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns the number of slots reachable by key.
    pub(crate) fn live_len(&self) -> usize {
        self.index.len()
    }

    /// Returns the slot capacity.
    pub(crate) fn capacity(&self) -> usize {
        self.keys.capacity().min(self.values.capacity())
    }

    pub(crate) fn key_slots(&self) -> &[Option<K>] {
        &self.keys
    }

    pub(crate) fn values(&self) -> &[V] {
        &self.values
    }

    pub(crate) fn values_mut(&mut self) -> &mut [V] {
        &mut self.values
    }

    /// Returns the key slots alongside mutable values.
    pub(crate) fn slots_mut(&mut self) -> (&[Option<K>], &mut [V]) {
        (&self.keys, &mut self.values)
    }

    /// Returns the key slot at `position`, or `None` if out of bounds.
    pub(crate) fn key_slot(&self, position: usize) -> Option<&Option<K>> {
        self.keys.get(position)
    }

    pub(crate) fn value(&self, position: usize) -> Option<&V> {
        self.values.get(position)
    }

    pub(crate) fn value_mut(&mut self, position: usize) -> Option<&mut V> {
        self.values.get_mut(position)
    }

    /// Splits the map into its key and value slots, discarding the index.
    pub(crate) fn into_slots(self) -> (Vec<Option<K>>, Vec<V>) {
        (self.keys, self.values)
    }

    /// Removes every slot.
    pub(crate) fn clear(&mut self) {
        self.keys.clear();
        self.values.clear();
        self.index.clear();
    }

    /// Replaces the value in slot `position`, returning the old one.
    ///
    /// # Panics
    ///
    /// Panics if `position` is out of bounds.
    pub(crate) fn replace_value(&mut self, position: usize, value: V) -> V {
        core::mem::replace(&mut self.values[position], value)
    }
}

impl<K: Hash + Eq, V> RawOrderedMap<K, V> {
    /// Reserves room for at least `additional` more slots.
    pub(crate) fn reserve(&mut self, additional: usize) {
        self.keys.reserve(additional);
        self.values.reserve(additional);
        self.index.reserve(additional);
    }

    /// Shrinks every buffer as much as possible.
    pub(crate) fn shrink_to_fit(&mut self) {
        self.keys.shrink_to_fit();
        self.values.shrink_to_fit();
        self.index.shrink_to_fit();
    }

    /// Returns the position of the live slot holding `key`.
    pub(crate) fn position_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.index.get(key).copied()
    }

    /// Returns the stored key and position of the live slot holding `key`.
    pub(crate) fn position_key_of<Q>(&self, key: &Q) -> Option<(&K, usize)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.index.get_key_value(key).map(|(key, &position)| (key, position))
    }

    /// Builds a map from persisted slots of equal length.
    ///
    /// The first slot for each key becomes live. `rejected` is called, in position
    /// order, for every slot that stays dead: with `None` for a missing key, or with
    /// the key for a later duplicate.
    pub(crate) fn from_slots<F>(keys: Vec<Option<K>>, values: Vec<V>, mut rejected: F) -> Self
    where
        K: Clone,
        F: FnMut(usize, Option<&K>),
    {
        debug_assert_eq!(keys.len(), values.len());

        let mut index = HashMap::with_capacity(keys.len());
        for (position, slot) in keys.iter().enumerate() {
            match slot {
                None => rejected(position, None),
                Some(key) if index.contains_key(key) => rejected(position, Some(key)),
                Some(key) => {
                    index.insert(key.clone(), position);
                }
            }
        }

        Self { keys, values, index }
    }

    /// Appends a slot for `key`, which must not be live.
    pub(crate) fn push(&mut self, key: K, value: V)
    where
        K: Clone,
    {
        debug_assert!(!self.index.contains_key(&key));
        self.index.insert(key.clone(), self.keys.len());
        self.keys.push(Some(key));
        self.values.push(value);
    }

    /// Inserts a slot for `key` at `position`, shifting later slots back by one.
    ///
    /// `key` must not be live and `position` must be at most `len`.
    pub(crate) fn insert(&mut self, position: usize, key: K, value: V)
    where
        K: Clone,
    {
        debug_assert!(position <= self.keys.len());
        debug_assert!(!self.index.contains_key(&key));

        self.keys.insert(position, Some(key.clone()));
        self.values.insert(position, value);
        relocate(&self.keys, &mut self.index, position + 1..self.keys.len(), |p| p - 1);
        self.index.insert(key, position);
    }

    /// Removes the slot at `position`, shifting later slots forward by one.
    ///
    /// `position` must be in bounds.
    pub(crate) fn remove(&mut self, position: usize) -> (Option<K>, V) {
        let key = self.keys.remove(position);
        let value = self.values.remove(position);

        if let Some(key) = &key
            && self.index.get(key) == Some(&position)
        {
            self.index.remove(key);
        }
        relocate(&self.keys, &mut self.index, position..self.keys.len(), |p| p + 1);

        (key, value)
    }

    /// Moves the slot at `from` to `to`, shifting the slots in between.
    ///
    /// Both positions must be in bounds.
    pub(crate) fn move_slot(&mut self, from: usize, to: usize) {
        use core::cmp::Ordering;

        match from.cmp(&to) {
            Ordering::Less => {
                self.keys[from..=to].rotate_left(1);
                self.values[from..=to].rotate_left(1);
                relocate(&self.keys, &mut self.index, from..to + 1, |p| if p == to { from } else { p + 1 });
            }
            Ordering::Greater => {
                self.keys[to..=from].rotate_right(1);
                self.values[to..=from].rotate_right(1);
                relocate(&self.keys, &mut self.index, to..from + 1, |p| if p == to { from } else { p - 1 });
            }
            Ordering::Equal => {}
        }
    }

    /// Replaces slot `position` with a live slot for `key`.
    ///
    /// `key` must not be live anywhere but `position`, and `position` must be in bounds.
    pub(crate) fn replace_slot(&mut self, position: usize, key: K, value: V) -> (Option<K>, V)
    where
        K: Clone,
    {
        if let Some(old) = &self.keys[position]
            && self.index.get(old) == Some(&position)
        {
            self.index.remove(old);
        }
        self.index.insert(key.clone(), position);

        let old_key = core::mem::replace(&mut self.keys[position], Some(key));
        let old_value = core::mem::replace(&mut self.values[position], value);
        (old_key, old_value)
    }
}
