use crate::{Error, OrderedSequence, Result};

/// Where a [`Cursor`] is in its enumeration.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum CursorState {
    /// Before the first element. No element is current.
    Created,
    /// On the element at the given position.
    At(usize),
    /// Past the last element. No element is current.
    Ended,
}

/// A versioned enumerator over an [`OrderedSequence`].
///
/// A cursor captures the map's structural version when it is created and holds no
/// reference to the map; it is driven by passing the sequence on every call. Any
/// structural mutation of the map after the cursor was created (inserting a new key,
/// removing, clearing, moving, loading, even a plain append) makes the next
/// [`advance`](Cursor::advance) or [`reset`](Cursor::reset) fail with
/// [`Error::VersionMismatch`]. Replacing the value of an existing key is not
/// structural and does not invalidate the cursor.
///
/// A cursor must be driven by the map it was created from, through any of its
/// sequences. Driving it with another map is a logic error: the result is unspecified
/// but memory safe.
///
/// # Examples
///
/// ```
/// use dual_map::{CursorState, Error, OrderedMap};
///
/// let mut map = OrderedMap::from([("a", 1), ("b", 2)]);
///
/// let mut cursor = map.cursor();
/// assert_eq!(cursor.advance(&map), Ok(Some((Some(&"a"), &1))));
/// assert_eq!(cursor.state(), CursorState::At(0));
///
/// // Value replacement keeps the cursor valid.
/// map.set_value("b", 20);
/// assert_eq!(cursor.advance(&map), Ok(Some((Some(&"b"), &20))));
/// assert_eq!(cursor.advance(&map), Ok(None));
/// assert_eq!(cursor.state(), CursorState::Ended);
///
/// // Appending a key does not.
/// map.set_value("c", 3);
/// assert!(matches!(cursor.reset(&map), Err(Error::VersionMismatch { .. })));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Cursor {
    version: u64,
    state: CursorState,
}

impl Cursor {
    pub(crate) const fn new(version: u64) -> Self {
        Self {
            version,
            state: CursorState::Created,
        }
    }

    /// Returns the cursor's state.
    #[must_use]
    pub const fn state(&self) -> CursorState {
        self.state
    }

    /// Returns the position of the current element, or `None` before the first and
    /// after the last element.
    #[must_use]
    pub const fn position(&self) -> Option<usize> {
        match self.state {
            CursorState::At(position) => Some(position),
            CursorState::Created | CursorState::Ended => None,
        }
    }

    /// Returns the structural version this cursor is bound to.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    fn validate<S: OrderedSequence>(&self, seq: &S) -> Result<()> {
        let found = seq.version();
        if found == self.version {
            Ok(())
        } else {
            Err(Error::VersionMismatch {
                expected: self.version,
                found,
            })
        }
    }

    /// Moves to the next element and returns it, or returns `Ok(None)` once the end
    /// is reached. Advancing an ended cursor keeps returning `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::VersionMismatch`] if the map was structurally modified since
    /// the cursor was created or last reset. The cursor is left unchanged.
    pub fn advance<S: OrderedSequence>(&mut self, seq: S) -> Result<Option<S::Item>> {
        self.validate(&seq)?;

        let next = match self.state {
            CursorState::Created => 0,
            CursorState::At(position) => position + 1,
            CursorState::Ended => return Ok(None),
        };

        if next < seq.len() {
            self.state = CursorState::At(next);
            Ok(seq.item_at(next))
        } else {
            self.state = CursorState::Ended;
            Ok(None)
        }
    }

    /// Returns the cursor to [`CursorState::Created`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::VersionMismatch`] if the map was structurally modified since
    /// the cursor was created or last reset. A cursor is never rebound to a newer
    /// version; create a new one instead.
    pub fn reset<S: OrderedSequence>(&mut self, seq: S) -> Result<()> {
        self.validate(&seq)?;
        self.state = CursorState::Created;
        Ok(())
    }

    /// Returns the current element.
    ///
    /// Returns `None` in [`CursorState::Created`] and [`CursorState::Ended`]. This
    /// read does not check the version: it observes whatever now sits at the
    /// cursor's position, or `None` if that position is out of bounds.
    pub fn current<S: OrderedSequence>(&self, seq: S) -> Option<S::Item> {
        self.position().and_then(|position| seq.item_at(position))
    }
}
