use crate::{Cursor, Result};

/// An ordered, countable, positionally indexable and iterable sequence.
///
/// Implemented by `&OrderedMap` (yielding entries), [`KeysView`](crate::KeysView)
/// (yielding key slots) and [`ValuesView`](crate::ValuesView) (yielding values). All
/// three are cheap `Copy` handles onto the same map, so a [`Cursor`] created from one
/// can be driven by passing a fresh handle on every step.
///
/// # Examples
///
/// ```
/// use dual_map::{OrderedMap, OrderedSequence};
///
/// fn describe<S: OrderedSequence>(seq: S) -> usize {
///     seq.len()
/// }
///
/// let map = OrderedMap::from([("a", 1), ("b", 2)]);
/// assert_eq!(describe(&map), 2);
/// assert_eq!(describe(map.keys()), 2);
/// assert_eq!(map.values().item_at(1), Some(&2));
/// ```
pub trait OrderedSequence: Copy + IntoIterator {
    /// Returns the number of elements.
    fn len(&self) -> usize;

    /// Returns `true` if there are no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the element at `position`, or `None` if out of bounds.
    fn item_at(&self, position: usize) -> Option<Self::Item>;

    /// Returns the structural version of the underlying map.
    fn version(&self) -> u64;

    /// Creates a cursor positioned before the first element.
    fn cursor(&self) -> Cursor {
        Cursor::new(self.version())
    }
}

/// The mutable-list calling surface hosts program against.
///
/// [`OrderedMap`](crate::OrderedMap) implements it over its entries. The read-only
/// views implement it too, so they can be handed to code written against this trait,
/// but every method on a view returns [`Error::ReadOnly`](crate::Error::ReadOnly) and
/// leaves the map untouched.
pub trait SequenceMut {
    /// Element accepted by the mutating methods.
    type Item;
    /// Element handed back by [`try_remove_at`](SequenceMut::try_remove_at).
    type Removed;

    /// Appends `item` at the end.
    ///
    /// # Errors
    ///
    /// Implementation-defined; see the implementing type.
    fn try_push(&mut self, item: Self::Item) -> Result<()>;

    /// Inserts `item` at `position`, shifting later elements back.
    ///
    /// # Errors
    ///
    /// Implementation-defined; see the implementing type.
    fn try_insert(&mut self, position: usize, item: Self::Item) -> Result<()>;

    /// Removes and returns the element at `position`.
    ///
    /// # Errors
    ///
    /// Implementation-defined; see the implementing type.
    fn try_remove_at(&mut self, position: usize) -> Result<Self::Removed>;

    /// Replaces the element at `position`.
    ///
    /// # Errors
    ///
    /// Implementation-defined; see the implementing type.
    fn try_set(&mut self, position: usize, item: Self::Item) -> Result<()>;

    /// Removes every element.
    ///
    /// # Errors
    ///
    /// Implementation-defined; see the implementing type.
    fn try_clear(&mut self) -> Result<()>;
}
