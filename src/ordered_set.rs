//! Ordered set backed by a randomized treap.
//!
//! Nodes live in a [`Slab`] arena and refer to each other by index, so the
//! parent back-links never fight child ownership. Priorities come from a
//! [`SmallRng`]; the tree is a max-heap on priority and a binary search tree
//! on the caller's strict-less relation.
//!
//! Handles returned by [`OrderedSet::add`], [`OrderedSet::lower_bound`] and
//! friends stay valid until the element they point at is removed.

use std::fmt;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use slab::Slab;

/// Handle to a live element of an [`OrderedSet`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug)]
struct Node<T> {
    data: T,
    left: Option<usize>,
    right: Option<usize>,
    parent: Option<usize>,
    priority: u32,
}

/// Strict-less relation used by [`OrderedSet::new`].
pub fn natural_less<T: Ord>(a: &T, b: &T) -> bool {
    a < b
}

/// A randomized balanced binary search tree.
///
/// Equal elements (neither less than the other) are kept; they iterate in
/// insertion order.
pub struct OrderedSet<T, L = fn(&T, &T) -> bool>
where
    L: Fn(&T, &T) -> bool,
{
    nodes: Slab<Node<T>>,
    root: Option<usize>,
    less: L,
    rng: SmallRng,
}

impl<T: Ord> OrderedSet<T> {
    /// Create a set ordered by `T`'s `Ord` implementation.
    #[must_use]
    pub fn new() -> Self {
        Self::with_less(natural_less::<T> as fn(&T, &T) -> bool)
    }
}

impl<T: Ord> Default for OrderedSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, L> OrderedSet<T, L>
where
    L: Fn(&T, &T) -> bool,
{
    /// Create a set ordered by `less`.
    #[must_use]
    pub fn with_less(less: L) -> Self {
        Self {
            nodes: Slab::new(),
            root: None,
            less,
            rng: SmallRng::from_rng(&mut rand::rng()),
        }
    }

    /// Create a set with a deterministic priority sequence.
    #[must_use]
    pub fn with_less_and_seed(less: L, seed: u64) -> Self {
        Self {
            nodes: Slab::new(),
            root: None,
            less,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    /// Insert `data` and return its handle. Expected O(log n).
    pub fn add(&mut self, data: T) -> NodeId {
        let priority = self.rng.random::<u32>();
        let mut parent = None;
        let mut go_left = false;
        let mut cursor = self.root;
        while let Some(index) = cursor {
            parent = Some(index);
            let node = &self.nodes[index];
            go_left = (self.less)(&data, &node.data);
            cursor = if go_left { node.left } else { node.right };
        }

        let index = self.nodes.insert(Node {
            data,
            left: None,
            right: None,
            parent,
            priority,
        });
        match parent {
            None => self.root = Some(index),
            Some(p) if go_left => self.nodes[p].left = Some(index),
            Some(p) => self.nodes[p].right = Some(index),
        }

        while let Some(p) = self.nodes[index].parent {
            if self.nodes[p].priority >= priority {
                break;
            }
            self.rotate_up(index);
        }
        NodeId(index)
    }

    /// Remove one element equal to `data`. Returns `false` if none exists.
    pub fn remove(&mut self, data: &T) -> bool {
        match self.find(data) {
            Some(id) => {
                self.remove_node(id);
                true
            }
            None => false,
        }
    }

    /// Remove the element behind `id` and return it.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not refer to a live element.
    pub fn remove_node(&mut self, id: NodeId) -> T {
        let index = id.0;
        assert!(self.nodes.contains(index), "stale ordered set node");

        // Sink the node until it has at most one child, always lifting the
        // child with the higher priority.
        loop {
            let node = &self.nodes[index];
            let lift = match (node.left, node.right) {
                (Some(l), Some(r)) => {
                    if self.nodes[l].priority >= self.nodes[r].priority {
                        l
                    } else {
                        r
                    }
                }
                _ => break,
            };
            self.rotate_up(lift);
        }

        let node = &self.nodes[index];
        let child = node.left.or(node.right);
        let parent = node.parent;
        if let Some(c) = child {
            self.nodes[c].parent = parent;
        }
        self.replace_child(parent, index, child);
        self.nodes.remove(index).data
    }

    /// Find an element equal to `data` under the ordering.
    #[must_use]
    pub fn find(&self, data: &T) -> Option<NodeId> {
        let found = self.lower_bound(data)?;
        if (self.less)(data, &self.nodes[found.0].data) {
            None
        } else {
            Some(found)
        }
    }

    /// First element that is not less than `data`.
    #[must_use]
    pub fn lower_bound(&self, data: &T) -> Option<NodeId> {
        let mut found = None;
        let mut cursor = self.root;
        while let Some(index) = cursor {
            let node = &self.nodes[index];
            if (self.less)(&node.data, data) {
                cursor = node.right;
            } else {
                found = Some(index);
                cursor = node.left;
            }
        }
        found.map(NodeId)
    }

    /// Smallest element.
    ///
    /// # Panics
    ///
    /// Panics if the set is empty.
    #[must_use]
    pub fn min(&self) -> &T {
        match self.first() {
            Some(id) => self.value(id),
            None => panic!("ordered set is empty"),
        }
    }

    /// Largest element.
    ///
    /// # Panics
    ///
    /// Panics if the set is empty.
    #[must_use]
    pub fn max(&self) -> &T {
        match self.last() {
            Some(id) => self.value(id),
            None => panic!("ordered set is empty"),
        }
    }

    #[must_use]
    pub fn first(&self) -> Option<NodeId> {
        self.root.map(|root| NodeId(self.leftmost(root)))
    }

    #[must_use]
    pub fn last(&self) -> Option<NodeId> {
        self.root.map(|root| NodeId(self.rightmost(root)))
    }

    /// In-order successor of `id`.
    #[must_use]
    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        let mut index = id.0;
        if let Some(right) = self.nodes[index].right {
            return Some(NodeId(self.leftmost(right)));
        }
        while let Some(parent) = self.nodes[index].parent {
            if self.nodes[parent].left == Some(index) {
                return Some(NodeId(parent));
            }
            index = parent;
        }
        None
    }

    /// In-order predecessor of `id`.
    #[must_use]
    pub fn previous(&self, id: NodeId) -> Option<NodeId> {
        let mut index = id.0;
        if let Some(left) = self.nodes[index].left {
            return Some(NodeId(self.rightmost(left)));
        }
        while let Some(parent) = self.nodes[index].parent {
            if self.nodes[parent].right == Some(index) {
                return Some(NodeId(parent));
            }
            index = parent;
        }
        None
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.nodes.get(id.0).map(|node| &node.data)
    }

    /// Element behind `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not refer to a live element.
    #[must_use]
    pub fn value(&self, id: NodeId) -> &T {
        &self.nodes[id.0].data
    }

    /// Mutable access to the element behind `id`.
    ///
    /// The caller must not move the element past its neighbours under the
    /// ordering; [`OrderedSet::assert_invariants`] checks this.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not refer to a live element.
    pub fn value_mut(&mut self, id: NodeId) -> &mut T {
        &mut self.nodes[id.0].data
    }

    /// Elements in ascending order.
    pub fn values(&self) -> Values<'_, T, L> {
        Values {
            set: self,
            cursor: self.first(),
        }
    }

    /// Elements from `id` onward, in ascending order.
    pub fn values_from(&self, id: NodeId) -> Values<'_, T, L> {
        Values {
            set: self,
            cursor: Some(id),
        }
    }

    /// Verify the heap, ordering, parent-link and size invariants.
    ///
    /// # Panics
    ///
    /// Panics describing the first violated invariant.
    pub fn assert_invariants(&self) {
        let Some(root) = self.root else {
            assert!(self.nodes.is_empty(), "empty tree with live nodes");
            return;
        };
        assert_eq!(self.nodes[root].parent, None, "root has a parent");
        let mut count = 0;
        let mut stack = vec![root];
        while let Some(index) = stack.pop() {
            count += 1;
            let node = &self.nodes[index];
            for child in [node.left, node.right].into_iter().flatten() {
                let child_node = &self.nodes[child];
                assert_eq!(child_node.parent, Some(index), "tree is broken");
                assert!(
                    child_node.priority <= node.priority,
                    "heap order violated"
                );
                stack.push(child);
            }
        }
        assert_eq!(count, self.nodes.len(), "unreachable nodes in arena");

        let mut cursor = self.first();
        while let Some(id) = cursor {
            let next = self.next(id);
            if let Some(next) = next {
                assert!(
                    !(self.less)(self.value(next), self.value(id)),
                    "in-order sequence is not sorted"
                );
            }
            cursor = next;
        }
    }

    fn leftmost(&self, mut index: usize) -> usize {
        while let Some(left) = self.nodes[index].left {
            index = left;
        }
        index
    }

    fn rightmost(&self, mut index: usize) -> usize {
        while let Some(right) = self.nodes[index].right {
            index = right;
        }
        index
    }

    /// Point `parent`'s link at `old` to `new`, or the root if `parent` is none.
    fn replace_child(&mut self, parent: Option<usize>, old: usize, new: Option<usize>) {
        match parent {
            None => self.root = new,
            Some(p) => {
                let node = &mut self.nodes[p];
                if node.left == Some(old) {
                    node.left = new;
                } else if node.right == Some(old) {
                    node.right = new;
                } else {
                    panic!("tree is broken");
                }
            }
        }
    }

    /// Rotate `index` above its parent.
    fn rotate_up(&mut self, index: usize) {
        let Some(parent) = self.nodes[index].parent else {
            panic!("tree is broken");
        };
        let grand = self.nodes[parent].parent;

        if self.nodes[parent].left == Some(index) {
            let inner = self.nodes[index].right;
            self.nodes[parent].left = inner;
            if let Some(i) = inner {
                self.nodes[i].parent = Some(parent);
            }
            self.nodes[index].right = Some(parent);
        } else if self.nodes[parent].right == Some(index) {
            let inner = self.nodes[index].left;
            self.nodes[parent].right = inner;
            if let Some(i) = inner {
                self.nodes[i].parent = Some(parent);
            }
            self.nodes[index].left = Some(parent);
        } else {
            panic!("tree is broken");
        }

        self.nodes[parent].parent = Some(index);
        self.nodes[index].parent = grand;
        self.replace_child(grand, parent, Some(index));
    }
}

impl<T: fmt::Debug, L> fmt::Debug for OrderedSet<T, L>
where
    L: Fn(&T, &T) -> bool,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.values()).finish()
    }
}

/// Ascending iterator over an [`OrderedSet`].
pub struct Values<'a, T, L>
where
    L: Fn(&T, &T) -> bool,
{
    set: &'a OrderedSet<T, L>,
    cursor: Option<NodeId>,
}

impl<'a, T, L> Iterator for Values<'a, T, L>
where
    L: Fn(&T, &T) -> bool,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        self.cursor = self.set.next(id);
        Some(self.set.value(id))
    }
}
