//! A prefix map (trie) over lowercase-letter key sequences.
//!
//! Keys are folded to the 26-letter alphabet: ASCII letters map to a child
//! slot case-insensitively and every other character is silently skipped, so
//! `"c++"` and `"C"` address the same entry. Removal compacts the tree by
//! pruning chains of nodes left both non-terminal and childless.

use std::fmt;
use std::mem;

use smallvec::SmallVec;

const ALPHABET: usize = 26;

/// Inline capacity for removal paths; longer keys spill to the heap.
const PATH_INLINE: usize = 32;

/// Maps a key byte to its child slot, folding case and skipping non-letters.
#[inline]
fn letter_index(byte: u8) -> Option<usize> {
    match byte.to_ascii_lowercase() {
        b @ b'a'..=b'z' => Some((b - b'a') as usize),
        _ => None,
    }
}

struct Node<V> {
    children: [Option<Box<Node<V>>>; ALPHABET],
    /// `Some` marks a terminal node: a complete key ends here.
    value: Option<V>,
}

impl<V> Node<V> {
    fn new() -> Self {
        Node {
            children: std::array::from_fn(|_| None),
            value: None,
        }
    }

    #[inline]
    fn child_count(&self) -> usize {
        self.children.iter().filter(|child| child.is_some()).count()
    }
}

/// A 26-ary prefix map over lowercase-letter key sequences.
///
/// # Example
///
/// ```rust
/// let mut trie: treekit::PrefixMap<&str> = treekit::PrefixMap::new();
///
/// trie.insert("hello", "world");
/// trie.insert("help", "me");
///
/// assert_eq!(trie.get("hello"), Some(&"world"));
/// assert!(trie.starts_with("hel"));
/// assert!(!trie.contains("hel"));
///
/// assert_eq!(trie.remove("help"), Some("me"));
/// assert!(trie.contains("hello"));
/// ```
pub struct PrefixMap<V> {
    /// Always present; never pruned. Carries a value only for keys that
    /// normalize to the empty path.
    root: Box<Node<V>>,
    len: usize,
}

impl<V> PrefixMap<V> {
    /// Creates an empty prefix map.
    pub fn new() -> Self {
        PrefixMap {
            root: Box::new(Node::new()),
            len: 0,
        }
    }

    /// Returns the number of stored keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Checks if the map is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Inserts a key, returning the previous value if the key was already
    /// present (the stored-key count is unchanged in that case).
    ///
    /// Intermediate nodes are created lazily along the key's path. A key
    /// without any ASCII letters addresses the root node itself.
    pub fn insert(&mut self, key: &str, value: V) -> Option<V> {
        let mut cur = &mut self.root;
        for idx in key.bytes().filter_map(letter_index) {
            cur = cur.children[idx].get_or_insert_with(|| Box::new(Node::new()));
        }
        let old = cur.value.replace(value);
        if old.is_none() {
            self.len += 1;
        }
        old
    }

    /// Walks the key's path, returning the node it ends at, if the whole
    /// path exists.
    fn descend(&self, key: &str) -> Option<&Node<V>> {
        let mut cur = &*self.root;
        for idx in key.bytes().filter_map(letter_index) {
            cur = cur.children[idx].as_deref()?;
        }
        Some(cur)
    }

    /// Returns a reference to the value for the given key, or `None` if the
    /// exact key is not stored.
    pub fn get(&self, key: &str) -> Option<&V> {
        self.descend(key)?.value.as_ref()
    }

    /// Returns a mutable reference to the value for the given key, allowing
    /// update in place.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let mut cur = &mut *self.root;
        for idx in key.bytes().filter_map(letter_index) {
            cur = cur.children[idx].as_deref_mut()?;
        }
        cur.value.as_mut()
    }

    /// Checks if the exact key is stored.
    ///
    /// A key that is only a strict prefix of stored keys is not itself
    /// contained; see [`starts_with`](Self::starts_with).
    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Checks if at least one stored key has the given prefix (including
    /// the prefix itself, if stored).
    #[inline]
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.descend(prefix).is_some()
    }

    /// Removes a key, returning its value, or `None` if the exact key is
    /// not stored.
    ///
    /// After the terminal slot is cleared, the recorded path is compacted
    /// bottom-up: every ancestor left both non-terminal and childless is
    /// unlinked and freed. Compaction stops at the first ancestor that is
    /// still terminal or still has another child, and never touches the
    /// root. The recorded path is sized to the key, so arbitrarily long
    /// keys compact fully.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let path: SmallVec<[u8; PATH_INLINE]> = key
            .bytes()
            .filter_map(letter_index)
            .map(|idx| idx as u8)
            .collect();

        // First pass: confirm the key is present, find the deepest ancestor
        // that survives compaction (the root, a terminal node, or a branch
        // point), and note whether the final node itself stays alive.
        let mut cut = 0usize;
        let final_has_children;
        {
            let mut cur = &*self.root;
            for (depth, &idx) in path.iter().enumerate() {
                if depth > 0 && (cur.value.is_some() || cur.child_count() > 1) {
                    cut = depth;
                }
                cur = cur.children[idx as usize].as_deref()?;
            }
            cur.value.as_ref()?;
            final_has_children = cur.child_count() > 0;
        }

        self.len -= 1;

        if path.is_empty() || final_has_children {
            // The final node survives: clear its terminal slot in place.
            let mut cur = &mut *self.root;
            for &idx in &path {
                cur = cur.children[idx as usize]
                    .as_deref_mut()
                    .expect("path verified above");
            }
            return cur.value.take();
        }

        // The final node dies. Everything below the surviving ancestor is a
        // single-child chain of non-terminal nodes ending at the final node,
        // so detach it there and tear it down iteratively, recovering the
        // value on the way.
        let mut cur = &mut *self.root;
        for &idx in &path[..cut] {
            cur = cur.children[idx as usize]
                .as_deref_mut()
                .expect("path verified above");
        }
        let mut chain = cur.children[path[cut] as usize].take();
        let mut value = None;
        while let Some(mut node) = chain {
            if let Some(v) = node.value.take() {
                value = Some(v);
            }
            chain = node.children.iter_mut().find_map(|child| child.take());
        }
        debug_assert!(value.is_some(), "verified terminal node must yield a value");
        value
    }

    /// Removes all keys from the map.
    ///
    /// Teardown is post-order (children before parent) on an explicit stack.
    pub fn clear(&mut self) {
        let root = mem::replace(&mut *self.root, Node::new());
        let mut stack: Vec<Box<Node<V>>> = root.children.into_iter().flatten().collect();
        while let Some(node) = stack.pop() {
            stack.extend(node.children.into_iter().flatten());
        }
        self.len = 0;
    }
}

impl<V> Drop for PrefixMap<V> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<V> Default for PrefixMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for PrefixMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrefixMap").field("len", &self.len).finish()
    }
}

#[cfg(test)]
impl<V> PrefixMap<V> {
    /// Asserts the structural invariants: no reachable non-root node is
    /// simultaneously non-terminal and childless, and `len` matches the
    /// terminal node count.
    pub(crate) fn check_invariants(&self) {
        let mut terminals = usize::from(self.root.value.is_some());
        let mut stack: Vec<&Node<V>> = self
            .root
            .children
            .iter()
            .filter_map(|child| child.as_deref())
            .collect();
        while let Some(node) = stack.pop() {
            assert!(
                node.value.is_some() || node.child_count() > 0,
                "reachable non-root node must be terminal or have children"
            );
            terminals += usize::from(node.value.is_some());
            stack.extend(node.children.iter().filter_map(|child| child.as_deref()));
        }
        assert_eq!(terminals, self.len, "len must match terminal node count");
    }

    /// Number of reachable nodes, root excluded.
    pub(crate) fn node_count(&self) -> usize {
        let mut count = 0usize;
        let mut stack: Vec<&Node<V>> = self
            .root
            .children
            .iter()
            .filter_map(|child| child.as_deref())
            .collect();
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter().filter_map(|child| child.as_deref()));
        }
        count
    }
}
