//! Integration test: key movement under membership changes.
//!
//! Rebuilding a ring with one more (or one fewer) node must move only the
//! keys that land on the changed node's arcs, far fewer than `hash % n`.

use chash_integration_tests::{modulo_moved_fraction, sample_keys};
use chash_ring::{Blake3Hasher, Ring};

/// {A,B,C} -> {A,B,C,D}: close to 1/4 of keys move, never close to all.
#[test]
fn test_adding_node_moves_about_a_quarter() {
    let keys = sample_keys(10_000);
    let old = Ring::new(160, ["A", "B", "C"]);
    let new = Ring::new(160, ["A", "B", "C", "D"]);

    let moved = Ring::moved_fraction(&old, &new, &keys);
    assert!(
        (0.08..=0.75).contains(&moved),
        "moved fraction {moved:.3} not near 0.25"
    );

    let naive = modulo_moved_fraction(&keys, 3, 4);
    assert!(
        moved < naive,
        "ring moved {moved:.3}, no better than modulo hashing ({naive:.3})"
    );
}

#[test]
fn test_adding_node_moves_keys_only_to_it() {
    let keys = sample_keys(10_000);
    let old = Ring::new(160, ["A", "B", "C"]);
    let new = Ring::new(160, ["A", "B", "C", "D"]);

    let moves = Ring::diff(&old, &new, &keys);
    assert!(!moves.is_empty());
    assert!(
        moves.iter().all(|m| m.to.as_deref() == Some("D")),
        "a key moved between existing nodes"
    );
    assert_eq!(
        new.distribution(&keys).get("D").copied(),
        Some(moves.len()),
        "D should own exactly the moved keys"
    );
}

#[test]
fn test_removing_node_moves_only_its_keys() {
    let keys = sample_keys(10_000);
    let before = Ring::new(100, ["A", "B", "C", "D"]);
    let after = Ring::new(100, ["A", "B", "D"]);

    for m in Ring::diff(&before, &after, &keys) {
        assert_eq!(m.from.as_deref(), Some("C"), "{} moved off a surviving node", m.key);
    }
}

#[test]
fn test_adding_node_blake3() {
    let keys = sample_keys(10_000);
    let old = Ring::with_hasher(Blake3Hasher, 160, ["A", "B", "C"]);
    let new = Ring::with_hasher(Blake3Hasher, 160, ["A", "B", "C", "D"]);

    let moved = Ring::moved_fraction(&old, &new, &keys);
    assert!(
        (0.1..=0.5).contains(&moved),
        "blake3 moved fraction {moved:.3} not near 0.25"
    );
}
