use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use dual_map::{Error, LengthMismatch, OrderedMap, Persisted};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

/// Keys drawn from a small range, with frequent gaps, so that both missing and
/// repeated keys are common.
fn key_slot_strategy() -> impl Strategy<Value = Option<u8>> {
    prop_oneof![
        1 => Just(None),
        4 => (0u8..24).prop_map(Some),
    ]
}

fn persisted_strategy() -> impl Strategy<Value = Persisted<u8, i32>> {
    (
        proptest::collection::vec(key_slot_strategy(), 0..120),
        proptest::collection::vec(any::<i32>(), 0..120),
    )
        .prop_map(|(keys, values)| Persisted { keys, values })
}

// ─── Reconciliation against a first-occurrence model ─────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Reconciling arbitrary input keeps the shorter prefix verbatim, indexes the
    /// first occurrence of each key and reports every other slot.
    #[test]
    fn reconcile_matches_first_occurrence_model(input in persisted_strategy()) {
        let map = OrderedMap::from_persisted(input.clone());
        let len = input.keys.len().min(input.values.len());

        let mut first: HashMap<u8, usize> = HashMap::new();
        let mut duplicates = HashSet::new();
        let mut duplicate_entries = Vec::new();
        let mut invalid_entries = Vec::new();
        for (position, slot) in input.keys[..len].iter().enumerate() {
            match slot {
                None => invalid_entries.push(position),
                Some(key) if first.contains_key(key) => {
                    duplicates.insert(*key);
                    duplicate_entries.push(position);
                }
                Some(key) => {
                    first.insert(*key, position);
                }
            }
        }

        prop_assert_eq!(map.len(), len);
        prop_assert_eq!(map.version(), 0);
        for (key, position) in &first {
            prop_assert_eq!(map.index_of(key), Some(*position));
            prop_assert_eq!(map.get(key), Some(&input.values[*position]));
        }
        for key in 0u8..24 {
            prop_assert_eq!(map.contains_key(&key), first.contains_key(&key));
        }

        let diagnostics = map.diagnostics();
        prop_assert_eq!(diagnostics.duplicate_keys().copied().collect::<HashSet<u8>>(), duplicates);
        prop_assert_eq!(diagnostics.duplicate_entries(), duplicate_entries.as_slice());
        prop_assert_eq!(diagnostics.invalid_entries(), invalid_entries.as_slice());
        prop_assert_eq!(
            diagnostics.length_mismatch().is_some(),
            input.keys.len() != input.values.len()
        );

        let saved = map.into_persisted();
        prop_assert_eq!(&saved.keys[..], &input.keys[..len]);
        prop_assert_eq!(&saved.values[..], &input.values[..len]);
    }

    /// After reconciliation, explicit mutations keep every live key at its position.
    #[test]
    fn mutations_after_reconcile_keep_index_consistent(
        input in persisted_strategy(),
        moves in proptest::collection::vec((0usize..120, 0usize..120), 0..40),
        removals in proptest::collection::vec(0usize..120, 0..20),
    ) {
        let mut map = OrderedMap::from_persisted(input);

        for (from, to) in moves {
            let _ = map.move_index(from, to);
        }
        for position in removals {
            let _ = map.remove_at(position);
        }

        for position in 0..map.len() {
            if let Ok(Some(key)) = map.get_key_at(position)
                && let Some(live) = map.index_of(key)
            {
                prop_assert_eq!(map.get_key_at(live), Ok(Some(key)));
            }
        }
        let live = (0..map.len())
            .filter(|&position| {
                map.get_key_at(position)
                    .ok()
                    .flatten()
                    .is_some_and(|key| map.index_of(key) == Some(position))
            })
            .count();
        let reachable: HashSet<u8> = (0..map.len())
            .filter_map(|position| map.get_key_at(position).ok().flatten().copied())
            .filter(|key| map.contains_key(key))
            .collect();
        prop_assert_eq!(live, reachable.len());
    }
}

// ─── Worked examples ─────────────────────────────────────────────────────────

#[test]
fn well_formed_input_is_observationally_equal_to_inserts() {
    let loaded = OrderedMap::from_persisted(Persisted {
        keys: vec![Some("a"), Some("b")],
        values: vec![1, 2],
    });

    let mut built = OrderedMap::new();
    built.insert_at(0, "a", 1).unwrap();
    built.insert_at(1, "b", 2).unwrap();

    assert_eq!(loaded, built);
    assert_eq!(loaded.index_of("a"), built.index_of("a"));
    assert_eq!(loaded.index_of("b"), built.index_of("b"));
    assert!(loaded.diagnostics().is_clean());
}

#[test]
fn duplicate_keys_keep_the_first_mapping() {
    let map = OrderedMap::from_persisted(Persisted {
        keys: vec![Some("a"), Some("a")],
        values: vec![1, 2],
    });

    assert_eq!(map.len(), 2);
    assert_eq!(map.index_of("a"), Some(0));
    assert_eq!(map["a"], 1);
    assert_eq!(map.diagnostics().duplicate_keys().collect::<Vec<_>>(), [&"a"]);
}

#[test]
fn null_keys_are_positional_only() {
    let map = OrderedMap::from_persisted(Persisted {
        keys: vec![None, Some("b")],
        values: vec![1, 2],
    });

    assert_eq!(map.get_key_at(0), Ok(None));
    assert!(!map.keys().contains("a"));
    assert_eq!(map.diagnostics().invalid_entries(), [0]);
    assert_eq!(map.index_of("b"), Some(1));
}

#[test]
fn mismatched_lengths_are_reported_not_raised() {
    let map = OrderedMap::from_persisted(Persisted {
        keys: vec![Some(1), Some(2)],
        values: vec!["one"],
    });

    assert_eq!(map.len(), 1);
    assert_eq!(map.diagnostics().length_mismatch(), Some(LengthMismatch { keys: 2, values: 1 }));
    assert_eq!(map.get_value_at(1), Err(Error::IndexOutOfRange { index: 1, len: 1 }));
}

#[test]
fn explicit_mutations_still_reject_what_reconciliation_tolerates() {
    let mut map = OrderedMap::from_persisted(Persisted {
        keys: vec![None, Some("a"), Some("a")],
        values: vec![0, 1, 2],
    });

    assert_eq!(map.insert_at(0, "a", 9), Err(Error::DuplicateKey { index: 1 }));
    assert_eq!(map.insert_slot_at(0, None, 9), Err(Error::NullKey));
    assert_eq!(map.len(), 3);
}

#[test]
fn shifting_a_live_key_past_its_dead_duplicate() {
    let mut map = OrderedMap::from_persisted(Persisted {
        keys: vec![Some("a"), Some("a"), Some("b")],
        values: vec![1, 2, 3],
    });

    map.insert_at(0, "z", 0).unwrap();
    assert_eq!(map.index_of("a"), Some(1));
    assert_eq!(map.index_of("b"), Some(3));

    map.move_index(1, 3).unwrap();
    assert_eq!(map.as_slices().0, [Some("z"), Some("a"), Some("b"), Some("a")]);
    assert_eq!(map.index_of("a"), Some(3));
    assert_eq!(map["a"], 1);
    assert_eq!(map.index_of("b"), Some(2));

    map.remove_at(1).unwrap();
    assert_eq!(map.index_of("a"), Some(2));
    assert_eq!(map["a"], 1);
}

#[test]
fn suppression_only_gates_reporting() {
    let mut map: OrderedMap<&str, i32> = OrderedMap::new();
    map.set_diagnostics_suppressed(true);

    map.load(Persisted {
        keys: vec![Some("a"), None, Some("a")],
        values: vec![1, 2, 3],
    });

    assert!(map.diagnostics_suppressed());
    assert!(map.diagnostics().is_duplicate("a"));
    assert_eq!(map.diagnostics().invalid_entries(), [1]);
    assert_eq!(map.diagnostics().duplicate_entries(), [2]);
}

/// Counts `WARN` events seen while installed.
#[derive(Clone, Default)]
struct WarnCounter(Arc<AtomicUsize>);

impl WarnCounter {
    fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl<S: Subscriber> Layer<S> for WarnCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::WARN {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

fn warnings_during(f: impl FnOnce()) -> usize {
    let counter = WarnCounter::default();
    let subscriber = tracing_subscriber::registry().with(counter.clone());
    tracing::subscriber::with_default(subscriber, f);
    counter.count()
}

fn malformed() -> Persisted<&'static str, i32> {
    Persisted {
        keys: vec![Some("a"), None, Some("a"), Some("b")],
        values: vec![1, 2, 3],
    }
}

#[test]
fn load_warns_once_per_finding_kind() {
    let mut map = OrderedMap::new();
    assert_eq!(warnings_during(|| map.load(malformed())), 3);
    assert_eq!(warnings_during(|| map.load(Persisted { keys: vec![Some("a")], values: vec![1] })), 0);
}

#[test]
fn suppressed_load_emits_no_warnings() {
    let mut map = OrderedMap::new();
    map.set_diagnostics_suppressed(true);

    assert_eq!(warnings_during(|| map.load(malformed())), 0);
    assert!(!map.diagnostics().is_clean());

    map.set_diagnostics_suppressed(false);
    assert_eq!(warnings_during(|| map.load(malformed())), 3);
}

#[test]
fn from_persisted_always_warns() {
    assert_eq!(warnings_during(|| drop(OrderedMap::from_persisted(malformed()))), 3);
}

#[test]
fn runtime_upserts_do_not_touch_diagnostics() {
    let mut map = OrderedMap::from_persisted(Persisted {
        keys: vec![Some("a")],
        values: vec![1],
    });

    map.set_value("b", 2);
    assert_eq!(map.insert_at(0, "b", 3), Err(Error::DuplicateKey { index: 1 }));

    assert!(map.diagnostics().is_clean());
}
