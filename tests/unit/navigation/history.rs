use super::*;

fn history() -> History {
    History::new("/", Params::new())
}

#[test]
fn push_advances_and_allocates_fresh_keys() {
    let mut h = history();
    let k0 = h.current().key;
    let k1 = h.push("/a", Params::new()).key;
    let k2 = h.push("/b", Params::new()).key;
    assert!(k0 < k1 && k1 < k2);
    assert_eq!(h.index(), 2);
    assert_eq!(h.current().pathname, "/b");
    assert_eq!(h.previous().map(|e| e.pathname.as_str()), Some("/a"));
}

#[test]
fn push_after_back_discards_forward_entries() {
    let mut h = history();
    h.push("/a", Params::new());
    h.push("/b", Params::new());
    h.back().unwrap();
    h.push("/c", Params::new());
    let paths: Vec<_> = h.entries().iter().map(|e| e.pathname.as_str()).collect();
    assert_eq!(paths, ["/", "/a", "/c"]);
    assert_eq!(h.current().index, 2);
}

#[test]
fn replace_keeps_position_but_changes_key() {
    let mut h = history();
    h.push("/a", Params::new());
    let before = h.current().key;
    h.replace("/b", Params::new());
    assert_eq!(h.len(), 2);
    assert_eq!(h.current().pathname, "/b");
    assert_ne!(h.current().key, before);
}

#[test]
fn back_at_start_is_invalid_state() {
    let mut h = history();
    assert!(!h.can_go_back());
    assert!(matches!(h.back(), Err(RouterError::InvalidState(_))));
}

#[test]
fn traverse_to_known_and_unknown_keys() {
    let mut h = history();
    let root = h.current().key;
    h.push("/a", Params::new());
    assert_eq!(h.traverse_to(root).unwrap().pathname, "/");
    assert_eq!(h.index(), 0);
    assert!(h.traverse_to(EntryKey(99)).is_err());
    assert_eq!(h.index(), 0);
}

#[test]
fn snapshot_restore_keeps_key_allocation_monotonic() {
    let mut h = history();
    h.push("/a", Params::new());
    h.set_state(serde_json::json!({"scroll": 10}));
    let json = h.to_json().unwrap();

    let mut restored = History::from_json(&json).unwrap();
    assert_eq!(restored.entries(), h.entries());
    assert_eq!(restored.current().state["scroll"], 10);
    let k = restored.push("/b", Params::new()).key;
    assert!(h.entries().iter().all(|e| e.key < k));
}

#[test]
fn restore_rejects_inconsistent_snapshots() {
    let bad = HistorySnapshot {
        entries: Vec::new(),
        index: 0,
        next_key: 0,
    };
    assert!(History::restore(bad).is_err());

    let mut snap = history().snapshot();
    snap.index = 3;
    assert!(History::restore(snap).is_err());
}
