//! An ordered map based on an unbalanced binary search tree.
//!
//! The tree is keyed by an injected [`Comparator`]; [`Natural`] (the
//! default) delegates to `Ord`. No rebalancing is performed, so tree height
//! is unbounded under adversarial insertion order. All walks, including
//! teardown, are iterative with explicit stacks, so a degenerate tree can
//! never exhaust the call stack.

use std::cmp::Ordering;
use std::fmt;
use std::mem;

/// A total order over keys, injected at map construction.
///
/// The behavior of a [`TreeMap`] is unspecified (but memory-safe) if the
/// comparator is not a total order, or if a key's ordering relative to any
/// other key changes while the key is in the map.
pub trait Comparator<K: ?Sized> {
    /// Compares two keys.
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

/// The natural order of keys via their `Ord` implementation.
#[derive(Clone, Copy, Debug, Default)]
pub struct Natural;

impl<K: Ord + ?Sized> Comparator<K> for Natural {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

/// Adapter turning a comparison closure into a [`Comparator`].
///
/// # Example
///
/// ```rust
/// use std::cmp::Ordering;
/// use treekit::{CmpFn, TreeMap};
///
/// let reverse = CmpFn(|a: &i32, b: &i32| b.cmp(a));
/// let mut map = TreeMap::with_cmp(reverse);
/// map.insert(1, "a");
/// map.insert(2, "b");
///
/// let mut keys = Vec::new();
/// map.for_each(|k, _| keys.push(*k));
/// assert_eq!(keys, [2, 1]);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct CmpFn<F>(pub F);

impl<K: ?Sized, F: Fn(&K, &K) -> Ordering> Comparator<K> for CmpFn<F> {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        (self.0)(a, b)
    }
}

type Link<K, V> = Option<Box<Node<K, V>>>;

struct Node<K, V> {
    key: K,
    value: V,
    left: Link<K, V>,
    right: Link<K, V>,
}

impl<K, V> Node<K, V> {
    fn leaf(key: K, value: V) -> Box<Self> {
        Box::new(Node {
            key,
            value,
            left: None,
            right: None,
        })
    }
}

/// An ordered map based on an unbalanced binary search tree.
///
/// # Example
///
/// ```rust
/// let mut map: treekit::TreeMap<&str, u32> = treekit::TreeMap::new();
///
/// map.insert("b", 2);
/// map.insert("a", 1);
///
/// assert_eq!(map.get(&"a"), Some(&1));
/// assert_eq!(map.remove(&"b"), Some(2));
/// assert_eq!(map.len(), 1);
/// ```
pub struct TreeMap<K, V, C = Natural> {
    root: Link<K, V>,
    cmp: C,
    len: usize,
}

impl<K: Ord, V> TreeMap<K, V> {
    /// Creates an empty map ordered by the keys' natural order.
    pub fn new() -> Self {
        Self::with_cmp(Natural)
    }
}

impl<K, V, C> TreeMap<K, V, C> {
    /// Returns the number of entries in the map.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Checks if the map is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns a reference to the map's comparator.
    #[inline]
    pub fn cmp(&self) -> &C {
        &self.cmp
    }

    /// Removes all entries from the map.
    ///
    /// Teardown is post-order (children before parent) on an explicit stack.
    pub fn clear(&mut self) {
        let mut stack: Vec<Box<Node<K, V>>> = Vec::new();
        stack.extend(self.root.take());
        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
        }
        self.len = 0;
    }

    /// Visits every entry in ascending key order.
    ///
    /// The callback receives borrowed key/value pairs; the map cannot be
    /// mutated during the traversal.
    pub fn for_each<F: FnMut(&K, &V)>(&self, mut visit: F) {
        let mut stack: Vec<&Node<K, V>> = Vec::new();
        let mut cur = self.root.as_deref();
        while cur.is_some() || !stack.is_empty() {
            while let Some(node) = cur {
                stack.push(node);
                cur = node.left.as_deref();
            }
            let node = stack.pop().expect("stack non-empty");
            visit(&node.key, &node.value);
            cur = node.right.as_deref();
        }
    }
}

impl<K, V, C: Comparator<K>> TreeMap<K, V, C> {
    /// Creates an empty map ordered by the given comparator.
    pub fn with_cmp(cmp: C) -> Self {
        TreeMap {
            root: None,
            cmp,
            len: 0,
        }
    }

    /// Inserts an entry, returning the previous value if the key was
    /// already present.
    ///
    /// On a match both the stored key and value are replaced in place (the
    /// old key is dropped); otherwise a new leaf is linked where the search
    /// fell off the tree. Never rebalances.
    ///
    /// # Example
    ///
    /// ```rust
    /// let mut map = treekit::TreeMap::new();
    /// assert_eq!(map.insert(1, "a"), None);
    /// assert_eq!(map.insert(1, "b"), Some("a"));
    /// assert_eq!(map.get(&1), Some(&"b"));
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let mut link = &mut self.root;
        loop {
            match link {
                Some(node) => match self.cmp.compare(&key, &node.key) {
                    Ordering::Less => link = &mut node.left,
                    Ordering::Greater => link = &mut node.right,
                    Ordering::Equal => {
                        node.key = key;
                        return Some(mem::replace(&mut node.value, value));
                    }
                },
                None => {
                    *link = Some(Node::leaf(key, value));
                    self.len += 1;
                    return None;
                }
            }
        }
    }

    /// Returns a reference to the value for the given key, or `None` if the
    /// map does not contain the key.
    pub fn get(&self, key: &K) -> Option<&V> {
        let mut cur = self.root.as_deref();
        while let Some(node) = cur {
            match self.cmp.compare(key, &node.key) {
                Ordering::Less => cur = node.left.as_deref(),
                Ordering::Greater => cur = node.right.as_deref(),
                Ordering::Equal => return Some(&node.value),
            }
        }
        None
    }

    /// Returns a mutable reference to the value for the given key, allowing
    /// update in place.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let cmp = &self.cmp;
        let mut cur = self.root.as_deref_mut();
        while let Some(node) = cur {
            match cmp.compare(key, &node.key) {
                Ordering::Less => cur = node.left.as_deref_mut(),
                Ordering::Greater => cur = node.right.as_deref_mut(),
                Ordering::Equal => return Some(&mut node.value),
            }
        }
        None
    }

    /// Checks if the map contains the given key.
    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Removes the entry for the given key, returning its value, or `None`
    /// if the map does not contain the key.
    ///
    /// A node with at most one child is spliced out directly. A node with
    /// two children instead receives its in-order successor's key and value
    /// (the leftmost entry of its right subtree), and the successor's node
    /// is the one unlinked, so exactly one node is freed per call.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let mut link = &mut self.root;
        loop {
            // Compared through a shared reborrow so no borrow of `*link` is
            // live once the loop exits and `unlink` takes over the slot.
            let ord = match link.as_deref() {
                None => return None,
                Some(node) => self.cmp.compare(key, &node.key),
            };
            if ord == Ordering::Equal {
                break;
            }
            let node = link.as_mut().expect("slot checked above");
            link = match ord {
                Ordering::Less => &mut node.left,
                _ => &mut node.right,
            };
        }
        let value = unlink(link);
        self.len -= 1;
        Some(value)
    }
}

/// Unlinks the node in `link`, which the caller guarantees is occupied, and
/// returns its value.
fn unlink<K, V>(link: &mut Link<K, V>) -> V {
    if let Some(node) = link {
        if node.left.is_some() && node.right.is_some() {
            let succ = detach_min(&mut node.right);
            node.key = succ.key;
            return mem::replace(&mut node.value, succ.value);
        }
    }
    let mut node = link.take().expect("caller guarantees an occupied slot");
    *link = if node.left.is_some() {
        node.left.take()
    } else {
        node.right.take()
    };
    node.value
}

/// Detaches the minimum node of the non-empty subtree in `link`, splicing
/// its right child (if any) into its place.
fn detach_min<K, V>(link: &mut Link<K, V>) -> Box<Node<K, V>> {
    let mut cur = link;
    // The advance re-derives the borrow each step, leaving `*cur` free for
    // the take-and-splice below.
    while cur.as_ref().map_or(false, |node| node.left.is_some()) {
        cur = &mut cur.as_mut().expect("loop condition checked the slot").left;
    }
    let mut min = cur.take().expect("caller guarantees a non-empty subtree");
    *cur = min.right.take();
    min
}

impl<K, V, C> Drop for TreeMap<K, V, C> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<K, V, C: Comparator<K> + Default> Default for TreeMap<K, V, C> {
    fn default() -> Self {
        Self::with_cmp(C::default())
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for TreeMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries = f.debug_map();
        self.for_each(|key, value| {
            entries.entry(key, value);
        });
        entries.finish()
    }
}

impl<K, V, C: Comparator<K>> Extend<(K, V)> for TreeMap<K, V, C> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V, C: Comparator<K> + Default> FromIterator<(K, V)> for TreeMap<K, V, C> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

#[cfg(test)]
impl<K, V, C: Comparator<K>> TreeMap<K, V, C> {
    /// Asserts the structural invariants: a strictly ascending in-order walk
    /// and a `len` matching the reachable node count.
    pub(crate) fn check_invariants(&self) {
        let mut stack: Vec<&Node<K, V>> = Vec::new();
        let mut cur = self.root.as_deref();
        let mut prev: Option<&K> = None;
        let mut count = 0usize;
        while cur.is_some() || !stack.is_empty() {
            while let Some(node) = cur {
                stack.push(node);
                cur = node.left.as_deref();
            }
            let node = stack.pop().expect("stack non-empty");
            if let Some(prev) = prev {
                assert_eq!(
                    self.cmp.compare(prev, &node.key),
                    Ordering::Less,
                    "in-order walk must ascend strictly"
                );
            }
            prev = Some(&node.key);
            count += 1;
            cur = node.right.as_deref();
        }
        assert_eq!(count, self.len, "len must match reachable node count");
    }
}
