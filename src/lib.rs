//! # treekit
//!
//! Classic tree-backed associative containers:
//!
//! - [`TreeMap`]: an unbalanced binary search tree mapping unique,
//!   totally ordered keys to values, with an injectable comparator.
//! - [`PrefixMap`]: a 26-ary trie mapping lowercase-letter key sequences
//!   to values, with prefix queries and path compaction on removal.
//!
//! Both containers own their entries through ordinary tree-shaped `Box`
//! ownership, report "created vs replaced" and "removed vs absent" outcomes
//! as `Option` results, and never recurse on tree height or key length:
//! every walk, including teardown, runs on an explicit stack.
//!
//! ## Example
//!
//! ```rust
//! use treekit::{PrefixMap, TreeMap};
//!
//! let mut map: TreeMap<&str, u64> = TreeMap::new();
//! map.insert("hello", 1);
//! map.insert("world", 2);
//! assert_eq!(map.get(&"hello"), Some(&1));
//!
//! let mut trie: PrefixMap<u64> = PrefixMap::new();
//! trie.insert("hello", 1);
//! assert!(trie.starts_with("he"));
//! assert!(!trie.contains("he"));
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bst;
pub mod trie;

pub use bst::{CmpFn, Comparator, Natural, TreeMap};
pub use trie::PrefixMap;

#[cfg(test)]
mod proptests;
