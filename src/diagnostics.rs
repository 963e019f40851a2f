use alloc::vec::Vec;
use core::borrow::Borrow;
use core::fmt;
use core::hash::Hash;

use hashbrown::HashSet;

/// The key and value sequences of a persisted map had different lengths.
///
/// The surplus of the longer sequence is dropped when the map is loaded.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct LengthMismatch {
    /// Number of persisted keys.
    pub keys: usize,
    /// Number of persisted values.
    pub values: usize,
}

impl LengthMismatch {
    /// Returns the number of slots that were kept.
    #[must_use]
    pub const fn effective_len(&self) -> usize {
        if self.keys < self.values { self.keys } else { self.values }
    }
}

/// Data-integrity findings from the last time a map was loaded from its persisted form.
///
/// Findings never cause a load to fail. They describe the persisted data as it was
/// loaded and are not updated by later mutations of the map.
///
/// # Examples
///
/// ```
/// use dual_map::{OrderedMap, Persisted};
///
/// let map = OrderedMap::from_persisted(Persisted {
///     keys: vec![Some("a"), None, Some("a")],
///     values: vec![1, 2, 3],
/// });
///
/// let diagnostics = map.diagnostics();
/// assert!(diagnostics.is_duplicate("a"));
/// assert_eq!(diagnostics.invalid_entries(), [1]);
/// assert_eq!(diagnostics.duplicate_entries(), [2]);
/// assert!(!diagnostics.is_clean());
/// ```
#[derive(Clone)]
pub struct Diagnostics<K> {
    pub(crate) duplicate_keys: HashSet<K>,
    pub(crate) duplicate_entries: Vec<usize>,
    pub(crate) invalid_entries: Vec<usize>,
    pub(crate) length_mismatch: Option<LengthMismatch>,
}

impl<K> Diagnostics<K> {
    /// Keys that appeared more than once, in no particular order. Only the first
    /// occurrence of each is reachable by key.
    pub fn duplicate_keys(&self) -> impl ExactSizeIterator<Item = &K> {
        self.duplicate_keys.iter()
    }

    /// Positions of the later occurrences of duplicated keys, in ascending order.
    #[must_use]
    pub fn duplicate_entries(&self) -> &[usize] {
        &self.duplicate_entries
    }

    /// Positions of slots that had no key, in ascending order.
    #[must_use]
    pub fn invalid_entries(&self) -> &[usize] {
        &self.invalid_entries
    }

    /// Set when the persisted key and value sequences differed in length.
    #[must_use]
    pub const fn length_mismatch(&self) -> Option<LengthMismatch> {
        self.length_mismatch
    }

    /// Returns `true` if the persisted data had no integrity problems.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.duplicate_keys.is_empty() && self.invalid_entries.is_empty() && self.length_mismatch.is_none()
    }

    /// Returns `true` if `key` was found more than once.
    pub fn is_duplicate<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q> + Hash + Eq,
        Q: ?Sized + Hash + Eq,
    {
        self.duplicate_keys.contains(key)
    }

    /// Emits one warning event per kind of finding.
    pub(crate) fn report(&self) {
        if let Some(mismatch) = self.length_mismatch {
            tracing::warn!(
                keys = mismatch.keys,
                values = mismatch.values,
                "persisted key and value sequences differ in length; keeping the first {}",
                mismatch.effective_len()
            );
        }
        if !self.invalid_entries.is_empty() {
            tracing::warn!(
                count = self.invalid_entries.len(),
                "persisted entries without a key at positions {:?} are only reachable by position",
                self.invalid_entries
            );
        }
        if !self.duplicate_keys.is_empty() {
            tracing::warn!(
                keys = self.duplicate_keys.len(),
                entries = self.duplicate_entries.len(),
                "persisted entries at positions {:?} repeat an earlier key and are only reachable by position",
                self.duplicate_entries
            );
        }
    }
}

impl<K> Default for Diagnostics<K> {
    fn default() -> Self {
        Self {
            duplicate_keys: HashSet::new(),
            duplicate_entries: Vec::new(),
            invalid_entries: Vec::new(),
            length_mismatch: None,
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for Diagnostics<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics")
            .field("duplicate_keys", &self.duplicate_keys)
            .field("duplicate_entries", &self.duplicate_entries)
            .field("invalid_entries", &self.invalid_entries)
            .field("length_mismatch", &self.length_mismatch)
            .finish()
    }
}
