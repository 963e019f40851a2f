use dual_map::{Cursor, CursorState, Error, OrderedMap, OrderedSequence, Persisted};
use proptest::prelude::*;

fn sample() -> OrderedMap<&'static str, i32> {
    OrderedMap::from([("a", 1), ("b", 2), ("c", 3)])
}

fn assert_invalidated(cursor: &mut Cursor, map: &OrderedMap<&'static str, i32>) {
    assert!(matches!(cursor.advance(map), Err(Error::VersionMismatch { .. })));
    assert!(matches!(cursor.reset(map), Err(Error::VersionMismatch { .. })));
    assert!(matches!(cursor.advance(map.keys()), Err(Error::VersionMismatch { .. })));
}

// ─── Full enumeration ────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// Driving a cursor to the end visits exactly the slots `iter` yields.
    #[test]
    fn cursor_visits_every_slot_in_order(entries in proptest::collection::vec((any::<u16>(), any::<i32>()), 0..200)) {
        let map: OrderedMap<u16, i32> = entries.into_iter().collect();

        let mut cursor = map.cursor();
        let mut visited = Vec::new();
        while let Some(entry) = cursor.advance(&map).unwrap() {
            visited.push(entry);
            prop_assert_eq!(cursor.position(), Some(visited.len() - 1));
        }

        prop_assert_eq!(visited, map.iter().collect::<Vec<_>>());
        prop_assert_eq!(cursor.state(), CursorState::Ended);
    }
}

// ─── Strict invalidation ─────────────────────────────────────────────────────

#[test]
fn insert_at_invalidates() {
    let mut map = sample();
    let mut cursor = map.cursor();
    map.insert_at(1, "z", 26).unwrap();
    assert_invalidated(&mut cursor, &map);
}

#[test]
fn remove_at_invalidates() {
    let mut map = sample();
    let mut cursor = map.cursor();
    cursor.advance(&map).unwrap();
    map.remove_at(2).unwrap();
    assert_invalidated(&mut cursor, &map);
}

#[test]
fn clear_invalidates() {
    let mut map = sample();
    let mut cursor = map.cursor();
    map.clear();
    assert_invalidated(&mut cursor, &map);
}

#[test]
fn move_invalidates_even_in_place() {
    let mut map = sample();
    let mut cursor = map.cursor();
    map.move_index(1, 1).unwrap();
    assert_invalidated(&mut cursor, &map);
}

#[test]
fn append_invalidates_even_after_the_end() {
    let mut map = sample();
    let mut cursor = map.cursor();
    while cursor.advance(&map).unwrap().is_some() {}

    map.set_value("d", 4);
    assert_invalidated(&mut cursor, &map);
}

#[test]
fn load_invalidates() {
    let mut map = sample();
    let mut cursor = map.cursor();
    map.load(Persisted {
        keys: vec![Some("a")],
        values: vec![1],
    });
    assert_invalidated(&mut cursor, &map);
}

#[test]
fn value_writes_do_not_invalidate() {
    let mut map = sample();
    let mut cursor = map.cursor();
    assert_eq!(cursor.advance(&map), Ok(Some((Some(&"a"), &1))));

    map.set_value("b", 20);
    *map.get_mut("c").unwrap() = 30;
    map.set_value_at(0, 10).unwrap();

    assert_eq!(cursor.current(&map), Some((Some(&"a"), &10)));
    assert_eq!(cursor.advance(&map), Ok(Some((Some(&"b"), &20))));
    assert_eq!(cursor.advance(map.values()), Ok(Some(&30)));
    assert_eq!(cursor.advance(&map), Ok(None));
}

#[test]
fn failed_operations_do_not_invalidate() {
    let mut map = sample();
    let mut cursor = map.cursor();

    assert!(map.insert_at(0, "a", 0).is_err());
    assert!(map.remove_at(9).is_err());
    assert!(map.move_index(0, 9).is_err());
    assert_eq!(map.remove_key("zz"), None);

    assert_eq!(cursor.advance(&map), Ok(Some((Some(&"a"), &1))));
}

// ─── Current element ─────────────────────────────────────────────────────────

#[test]
fn current_is_none_outside_the_sequence() {
    let map = sample();
    let mut cursor = map.values().cursor();

    assert_eq!(cursor.current(map.values()), None);
    while cursor.advance(map.values()).unwrap().is_some() {}
    assert_eq!(cursor.state(), CursorState::Ended);
    assert_eq!(cursor.current(map.values()), None);
}

#[test]
fn cursors_from_any_sequence_share_the_version() {
    let map = sample();
    assert_eq!(map.cursor().version(), map.version());
    assert_eq!(map.keys().cursor().version(), map.version());
    assert_eq!(map.values().cursor().version(), map.version());
    assert_eq!(OrderedSequence::cursor(&&map), map.cursor());
}
