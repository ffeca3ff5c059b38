use crate::{PrefixMap, TreeMap};

use proptest::prelude::*;
use std::collections::BTreeMap;

#[derive(Clone, Debug)]
enum MapOp {
    Insert(u16, u64),
    Remove(u16),
    Get(u16),
}

// A narrow keyspace so inserts, replacements, and removals collide often.
fn map_ops() -> impl Strategy<Value = Vec<MapOp>> {
    let key = 0u16..64;
    let op = prop_oneof![
        50 => (key.clone(), any::<u64>()).prop_map(|(k, v)| MapOp::Insert(k, v)),
        25 => key.clone().prop_map(MapOp::Remove),
        25 => key.prop_map(MapOp::Get),
    ];
    prop::collection::vec(op, 0..=2000)
}

#[derive(Clone, Debug)]
enum TrieOp {
    Insert(String, u64),
    Remove(String),
    Get(String),
    StartsWith(String),
}

// Mixed-case letters from a small alphabet plus characters the trie skips.
fn trie_key() -> impl Strategy<Value = String> + Clone {
    proptest::string::string_regex("[a-dA-D!-]{0,10}")
        .expect("valid key regex")
        .boxed()
}

fn trie_ops() -> impl Strategy<Value = Vec<TrieOp>> {
    let key = trie_key();
    let op = prop_oneof![
        50 => (key.clone(), any::<u64>()).prop_map(|(k, v)| TrieOp::Insert(k, v)),
        25 => key.clone().prop_map(TrieOp::Remove),
        15 => key.clone().prop_map(TrieOp::Get),
        10 => key.prop_map(TrieOp::StartsWith),
    ];
    prop::collection::vec(op, 0..=2000)
}

/// The key as the trie sees it: lowercase letters only.
fn normalize(key: &str) -> String {
    key.chars()
        .filter(char::is_ascii_alphabetic)
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_tree_map_matches_btree_map(ops in map_ops()) {
        let mut map: TreeMap<u16, u64> = TreeMap::new();
        let mut model: BTreeMap<u16, u64> = BTreeMap::new();

        for op in ops {
            match op {
                MapOp::Insert(key, value) => {
                    prop_assert_eq!(map.insert(key, value), model.insert(key, value));
                }
                MapOp::Remove(key) => {
                    prop_assert_eq!(map.remove(&key), model.remove(&key));
                }
                MapOp::Get(key) => {
                    prop_assert_eq!(map.get(&key), model.get(&key));
                }
            }
            prop_assert_eq!(map.len(), model.len());
        }

        map.check_invariants();
        let mut entries = Vec::new();
        map.for_each(|k, v| entries.push((*k, *v)));
        let expected: Vec<(u16, u64)> = model.iter().map(|(k, v)| (*k, *v)).collect();
        prop_assert_eq!(entries, expected);
    }

    #[test]
    fn prop_prefix_map_matches_btree_map(ops in trie_ops()) {
        let mut trie: PrefixMap<u64> = PrefixMap::new();
        let mut model: BTreeMap<String, u64> = BTreeMap::new();

        for op in ops {
            match op {
                TrieOp::Insert(key, value) => {
                    prop_assert_eq!(trie.insert(&key, value), model.insert(normalize(&key), value));
                }
                TrieOp::Remove(key) => {
                    prop_assert_eq!(trie.remove(&key), model.remove(&normalize(&key)));
                }
                TrieOp::Get(key) => {
                    prop_assert_eq!(trie.get(&key), model.get(&normalize(&key)));
                    prop_assert_eq!(trie.contains(&key), model.contains_key(&normalize(&key)));
                }
                TrieOp::StartsWith(key) => {
                    let prefix = normalize(&key);
                    let expected = model.keys().any(|k| k.starts_with(&prefix));
                    prop_assert_eq!(trie.starts_with(&key), expected);
                }
            }
            prop_assert_eq!(trie.len(), model.len());
        }

        trie.check_invariants();
        for (key, value) in &model {
            prop_assert_eq!(trie.get(key), Some(value));
        }
    }

    // Pruning must reclaim every node once the last key is gone, no matter
    // how the key sets overlap.
    #[test]
    fn prop_prefix_map_drains_to_empty(keys in prop::collection::vec(trie_key(), 0..=64)) {
        let mut trie: PrefixMap<usize> = PrefixMap::new();
        for (i, key) in keys.iter().enumerate() {
            trie.insert(key, i);
        }
        trie.check_invariants();

        for key in &keys {
            trie.remove(key);
            trie.check_invariants();
        }

        prop_assert!(trie.is_empty());
        prop_assert_eq!(trie.node_count(), 0);
    }
}
