use alloc::vec::Vec;

#[cfg(feature = "serde")]
use core::hash::Hash;

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[cfg(feature = "serde")]
use crate::OrderedMap;

/// The external form of an [`OrderedMap`](crate::OrderedMap): two parallel sequences.
///
/// Nothing about a `Persisted` value is validated. The sequences may differ in length
/// and may contain missing or repeated keys; loading reconciles them and records what
/// it found in [`Diagnostics`](crate::Diagnostics). Versions and diagnostics are
/// never part of the persisted form.
///
/// With the `serde` feature, both fields default to empty when absent.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Persisted<K, V> {
    /// Key slots, in order. `None` marks a slot without a key.
    #[cfg_attr(feature = "serde", serde(default = "Vec::new"))]
    pub keys: Vec<Option<K>>,
    /// Values, in order.
    #[cfg_attr(feature = "serde", serde(default = "Vec::new"))]
    pub values: Vec<V>,
}

impl<K, V> Default for Persisted<K, V> {
    fn default() -> Self {
        Persisted {
            keys: Vec::new(),
            values: Vec::new(),
        }
    }
}

/// Borrowed twin of [`Persisted`], so serializing a map never clones it.
#[cfg(feature = "serde")]
#[derive(Serialize)]
#[serde(rename = "Persisted")]
struct PersistedRef<'a, K, V> {
    keys: &'a [Option<K>],
    values: &'a [V],
}

/// Serializes the map in its persisted form, including slots only reachable by
/// position.
#[cfg(feature = "serde")]
impl<K: Serialize, V: Serialize> Serialize for OrderedMap<K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let (keys, values) = self.as_slices();
        PersistedRef { keys, values }.serialize(serializer)
    }
}

/// Deserializes the persisted form and reconciles it. Missing keys, repeated keys
/// and mismatched lengths are recorded in the map's diagnostics instead of failing.
#[cfg(feature = "serde")]
impl<'de, K, V> Deserialize<'de> for OrderedMap<K, V>
where
    K: Deserialize<'de> + Hash + Eq + Clone,
    V: Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Persisted::deserialize(deserializer).map(OrderedMap::from_persisted)
    }
}
