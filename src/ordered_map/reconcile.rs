use alloc::vec::Vec;
use core::hash::Hash;

use super::OrderedMap;
use crate::raw::RawOrderedMap;
use crate::{Diagnostics, LengthMismatch, Persisted};

/// Rebuilds slots and diagnostics from possibly malformed persisted sequences.
fn reconcile<K, V>(persisted: Persisted<K, V>) -> (RawOrderedMap<K, V>, Diagnostics<K>)
where
    K: Hash + Eq + Clone,
{
    let Persisted { mut keys, mut values } = persisted;
    let mut diagnostics = Diagnostics::default();

    if keys.len() != values.len() {
        let mismatch = LengthMismatch {
            keys: keys.len(),
            values: values.len(),
        };
        keys.truncate(mismatch.effective_len());
        values.truncate(mismatch.effective_len());
        diagnostics.length_mismatch = Some(mismatch);
    }

    let raw = RawOrderedMap::from_slots(keys, values, |position, key| match key {
        None => diagnostics.invalid_entries.push(position),
        Some(key) => {
            diagnostics.duplicate_keys.insert(key.clone());
            diagnostics.duplicate_entries.push(position);
        }
    });

    tracing::debug!(
        entries = raw.len(),
        live = raw.live_len(),
        invalid = diagnostics.invalid_entries.len(),
        duplicates = diagnostics.duplicate_entries.len(),
        length_mismatch = diagnostics.length_mismatch.is_some(),
        "reconciled persisted map"
    );

    (raw, diagnostics)
}

impl<K: Hash + Eq + Clone, V> OrderedMap<K, V> {
    /// Builds a map from its persisted form.
    ///
    /// Malformed input never fails. If the sequences differ in length the surplus of
    /// the longer one is dropped. A slot without a key, or whose key already appeared
    /// at an earlier position, is kept in place but is only reachable by position.
    /// Every such finding is recorded in [`diagnostics`](OrderedMap::diagnostics) and
    /// logged as a warning.
    ///
    /// The new map starts at version 0.
    ///
    /// Findings are always reported as `tracing` warnings, since a new map has no
    /// suppression flag set yet. This includes maps built by deserialization. To load
    /// without warnings, call [`load`](OrderedMap::load) on a map with
    /// [`set_diagnostics_suppressed(true)`](OrderedMap::set_diagnostics_suppressed).
    ///
    /// # Examples
    ///
    /// ```
    /// use dual_map::{OrderedMap, Persisted};
    ///
    /// let map = OrderedMap::from_persisted(Persisted {
    ///     keys: vec![None, Some("b"), Some("b")],
    ///     values: vec![1, 2, 3, 4],
    /// });
    ///
    /// assert_eq!(map.len(), 3);
    /// assert_eq!(map.get_key_at(0), Ok(None));
    /// assert_eq!(map.index_of("b"), Some(1));
    /// assert_eq!(map["b"], 2);
    /// assert_eq!(map.get_value_at(2), Ok(&3));
    /// assert!(map.diagnostics().length_mismatch().is_some());
    /// ```
    #[must_use]
    pub fn from_persisted(persisted: Persisted<K, V>) -> Self {
        let (raw, diagnostics) = reconcile(persisted);
        diagnostics.report();
        OrderedMap {
            raw,
            version: 0,
            diagnostics,
            diagnostics_suppressed: false,
        }
    }

    /// Replaces the contents of the map with its persisted form.
    ///
    /// Reconciles exactly like [`from_persisted`](OrderedMap::from_persisted). The
    /// previous diagnostics are discarded and the suppression flag is kept. Loading is
    /// a structural mutation and invalidates every outstanding cursor.
    ///
    /// # Examples
    ///
    /// ```
    /// use dual_map::{OrderedMap, Persisted};
    ///
    /// let mut map = OrderedMap::from([("stale", 0)]);
    /// let cursor = map.cursor();
    ///
    /// map.load(Persisted {
    ///     keys: vec![Some("a"), Some("b")],
    ///     values: vec![1, 2],
    /// });
    ///
    /// assert_eq!(map.index_of("stale"), None);
    /// assert_eq!(map.index_of("b"), Some(1));
    /// assert!(map.diagnostics().is_clean());
    /// assert_ne!(cursor.version(), map.version());
    /// ```
    pub fn load(&mut self, persisted: Persisted<K, V>) {
        let (raw, diagnostics) = reconcile(persisted);
        if !self.diagnostics_suppressed {
            diagnostics.report();
        }
        self.raw = raw;
        self.diagnostics = diagnostics;
        self.bump_version();
    }

    /// Returns the persisted form of the map: both slot sequences, in order,
    /// including slots only reachable by position.
    ///
    /// # Examples
    ///
    /// ```
    /// use dual_map::{OrderedMap, Persisted};
    ///
    /// let map = OrderedMap::from([("a", 1), ("b", 2)]);
    /// assert_eq!(
    ///     map.to_persisted(),
    ///     Persisted { keys: vec![Some("a"), Some("b")], values: vec![1, 2] }
    /// );
    /// ```
    #[must_use]
    pub fn to_persisted(&self) -> Persisted<K, V>
    where
        V: Clone,
    {
        let (keys, values) = self.as_slices();
        Persisted {
            keys: keys.to_vec(),
            values: values.to_vec(),
        }
    }
}

impl<K, V> OrderedMap<K, V> {
    /// Converts the map into its persisted form without cloning.
    #[must_use]
    pub fn into_persisted(self) -> Persisted<K, V> {
        let (keys, values): (Vec<Option<K>>, Vec<V>) = self.raw.into_slots();
        Persisted { keys, values }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::Error;
    use pretty_assertions::assert_eq;

    fn persisted<const N: usize, const M: usize>(
        keys: [Option<&'static str>; N],
        values: [i32; M],
    ) -> Persisted<&'static str, i32> {
        Persisted {
            keys: keys.to_vec(),
            values: values.to_vec(),
        }
    }

    #[test]
    fn well_formed_input_matches_sequential_inserts() {
        let loaded = OrderedMap::from_persisted(persisted([Some("a"), Some("b")], [1, 2]));

        let mut built = OrderedMap::new();
        built.insert_at(0, "a", 1).unwrap();
        built.insert_at(1, "b", 2).unwrap();

        assert_eq!(loaded, built);
        assert_eq!(loaded.version(), 0);
        assert!(loaded.diagnostics().is_clean());
    }

    #[test]
    fn first_duplicate_wins() {
        let map = OrderedMap::from_persisted(persisted([Some("a"), Some("a")], [1, 2]));

        assert_eq!(map.len(), 2);
        assert_eq!(map.index_of("a"), Some(0));
        assert_eq!(map.get("a"), Some(&1));
        assert_eq!(map.get_value_at(1), Ok(&2));
        assert!(map.diagnostics().is_duplicate("a"));
        assert_eq!(map.diagnostics().duplicate_entries(), [1]);
    }

    #[test]
    fn null_keys_stay_positional() {
        let map = OrderedMap::from_persisted(persisted([None, Some("b")], [1, 2]));

        assert_eq!(map.get_key_at(0), Ok(None));
        assert_eq!(map.get_value_at(0), Ok(&1));
        assert_eq!(map.index_of("b"), Some(1));
        assert_eq!(map.diagnostics().invalid_entries(), [0]);
        assert!(map.diagnostics().duplicate_keys().len() == 0);
    }

    #[test]
    fn length_mismatch_keeps_the_shorter_prefix() {
        let short_values = OrderedMap::from_persisted(persisted([Some("a"), Some("b"), Some("c")], [1]));
        assert_eq!(short_values.len(), 1);
        assert_eq!(short_values.index_of("b"), None);
        assert_eq!(
            short_values.diagnostics().length_mismatch(),
            Some(LengthMismatch { keys: 3, values: 1 })
        );

        let short_keys = OrderedMap::from_persisted(persisted([Some("a")], [1, 2, 3]));
        assert_eq!(short_keys.len(), 1);
        assert_eq!(short_keys.as_slices(), ([Some("a")].as_slice(), [1].as_slice()));
    }

    #[test]
    fn load_discards_previous_state_and_bumps_version() {
        let mut map = OrderedMap::from_persisted(persisted([None, Some("x"), Some("x")], [1, 2, 3]));
        map.set_diagnostics_suppressed(true);
        let mut cursor = map.cursor();
        let version = map.version();

        map.load(persisted([Some("y")], [9]));

        assert_eq!(map.version(), version + 1);
        assert!(map.diagnostics().is_clean());
        assert!(map.diagnostics_suppressed());
        assert_eq!(map.index_of("x"), None);
        assert_eq!(map.get("y"), Some(&9));
        assert!(matches!(cursor.advance(&map), Err(Error::VersionMismatch { .. })));
    }

    #[test]
    fn diagnostics_are_not_updated_by_later_mutations() {
        let mut map = OrderedMap::from_persisted(persisted([Some("a"), Some("a"), None], [1, 2, 3]));

        map.remove_at(1).unwrap();
        map.remove_at(1).unwrap();
        map.clear();

        assert!(map.diagnostics().is_duplicate("a"));
        assert_eq!(map.diagnostics().invalid_entries(), [2]);
    }

    #[test]
    fn dead_slots_are_never_promoted() {
        let mut map = OrderedMap::from_persisted(persisted([Some("a"), Some("a")], [1, 2]));

        assert_eq!(map.remove_key("a"), Some(1));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get_key_at(0), Ok(Some(&"a")));
        assert_eq!(map.index_of("a"), None);

        map.set_value("a", 3);
        assert_eq!(map.index_of("a"), Some(1));
        assert_eq!(map.as_slices().1, [2, 3]);
    }

    #[test]
    fn persisted_form_round_trips_dead_slots() {
        let input = persisted([None, Some("b"), Some("b")], [1, 2, 3]);
        let map = OrderedMap::from_persisted(input.clone());

        assert_eq!(map.to_persisted(), input);
        assert_eq!(map.into_persisted(), input);
    }

    #[test]
    fn empty_input_yields_an_empty_clean_map() {
        let map: OrderedMap<&str, i32> = OrderedMap::from_persisted(Persisted::default());

        assert!(map.is_empty());
        assert!(map.diagnostics().is_clean());
        assert_eq!(map.keys().len(), 0);
        assert_eq!(map.values().iter().count(), 0);
    }
}
