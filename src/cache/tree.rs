//! Splay Tree Module
//!
//! Self-adjusting binary search tree backing the cache index.
//!
//! Nodes live in an arena (`Vec` of slots) and link to each other through
//! [`NodeId`] indices. The tree is the only owner of node memory: erasing a
//! key releases its slot in the same call that unlinks it, and the slot is
//! recycled by the next insert.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::mem;

use crate::cache::node::{Node, NodeId};

// == Splay Tree ==
/// Arena-backed splay tree ordered by key.
#[derive(Debug)]
pub(crate) struct SplayTree<K, V> {
    /// Node storage; `None` marks a free slot
    slots: Vec<Option<Node<K, V>>>,
    /// Indices of free slots, reused before the arena grows
    free: Vec<usize>,
    /// Current root, `None` for an empty tree
    root: Option<NodeId>,
    /// Number of live nodes
    len: usize,
}

impl<K, V> Default for SplayTree<K, V> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: None,
            len: 0,
        }
    }
}

impl<K: Ord, V> SplayTree<K, V> {
    // == Constructor ==
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when the tree holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Handle of the current root.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Key stored at the root.
    pub fn root_key(&self) -> Option<&K> {
        self.root.map(|id| &self.node(id).key)
    }

    /// Borrows a live node.
    ///
    /// # Panics
    /// Panics if `id` refers to a released slot. Ids only escape the tree
    /// for live nodes, so this indicates a bookkeeping bug.
    pub fn node(&self, id: NodeId) -> &Node<K, V> {
        self.slots[id.0].as_ref().expect("dangling node id")
    }

    /// Borrows a node if `id` names a live slot.
    pub fn try_node(&self, id: NodeId) -> Option<&Node<K, V>> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    /// Mutably borrows a live node. Same panic contract as [`Self::node`].
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        self.slots[id.0].as_mut().expect("dangling node id")
    }

    fn key_of<Q>(&self, id: NodeId) -> &Q
    where
        K: Borrow<Q>,
        Q: ?Sized,
    {
        self.node(id).key.borrow()
    }

    fn alloc(&mut self, node: Node<K, V>) -> NodeId {
        self.len += 1;
        match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(node);
                NodeId(index)
            }
            None => {
                self.slots.push(Some(node));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    fn release(&mut self, id: NodeId) -> Node<K, V> {
        let node = self.slots[id.0].take().expect("dangling node id");
        self.free.push(id.0);
        self.len -= 1;
        node
    }

    // == Rotations ==
    /// Lifts the left child of `x` above it and returns the new subtree root.
    ///
    /// A node without a left child is returned unchanged.
    pub(crate) fn rotate_right(&mut self, x: NodeId) -> NodeId {
        let Some(y) = self.node(x).left else {
            return x;
        };
        let inner = self.node(y).right;
        self.node_mut(x).left = inner;
        self.node_mut(y).right = Some(x);
        y
    }

    /// Mirror of [`Self::rotate_right`].
    pub(crate) fn rotate_left(&mut self, x: NodeId) -> NodeId {
        let Some(y) = self.node(x).right else {
            return x;
        };
        let inner = self.node(y).left;
        self.node_mut(x).right = inner;
        self.node_mut(y).left = Some(x);
        y
    }

    // == Splay ==
    /// Restructures the subtree rooted at `node` so that the node holding
    /// `key`, or the last node on its search path, becomes the subtree root.
    /// Returns that new root.
    ///
    /// Top-down: nodes passed on the way down are peeled into a left tree
    /// (keys below `key`) and a right tree (keys above it), then reattached
    /// under the final node. A straight two-step descent (zig-zig) rotates
    /// first; a bent one (zig-zag) is two single links.
    pub(crate) fn splay<Q>(&mut self, node: NodeId, key: &Q) -> NodeId
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut t = node;
        // (root, attachment point) of each assembly tree
        let mut left: Option<(NodeId, NodeId)> = None;
        let mut right: Option<(NodeId, NodeId)> = None;

        loop {
            match key.cmp(self.key_of(t)) {
                Ordering::Equal => break,
                Ordering::Less => {
                    let Some(mut child) = self.node(t).left else {
                        break;
                    };
                    if key.cmp(self.key_of(child)) == Ordering::Less {
                        t = self.rotate_right(t);
                        match self.node(t).left {
                            Some(next) => child = next,
                            None => break,
                        }
                    }
                    self.link_right(&mut right, t);
                    t = child;
                }
                Ordering::Greater => {
                    let Some(mut child) = self.node(t).right else {
                        break;
                    };
                    if key.cmp(self.key_of(child)) == Ordering::Greater {
                        t = self.rotate_left(t);
                        match self.node(t).right {
                            Some(next) => child = next,
                            None => break,
                        }
                    }
                    self.link_left(&mut left, t);
                    t = child;
                }
            }
        }

        if let Some((root, max)) = left {
            let rest = self.node(t).left;
            self.node_mut(max).right = rest;
            self.node_mut(t).left = Some(root);
        }
        if let Some((root, min)) = right {
            let rest = self.node(t).right;
            self.node_mut(min).left = rest;
            self.node_mut(t).right = Some(root);
        }
        t
    }

    /// Hangs `t` off the right spine of the left assembly tree.
    fn link_left(&mut self, left: &mut Option<(NodeId, NodeId)>, t: NodeId) {
        match left {
            None => *left = Some((t, t)),
            Some((_, max)) => {
                self.node_mut(*max).right = Some(t);
                *max = t;
            }
        }
    }

    /// Hangs `t` off the left spine of the right assembly tree.
    fn link_right(&mut self, right: &mut Option<(NodeId, NodeId)>, t: NodeId) {
        match right {
            None => *right = Some((t, t)),
            Some((_, min)) => {
                self.node_mut(*min).left = Some(t);
                *min = t;
            }
        }
    }

    /// Splays the whole tree on `key` and returns the root if it holds `key`.
    pub fn access<Q>(&mut self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let root = self.splay(self.root?, key);
        self.root = Some(root);
        (self.key_of::<Q>(root) == key).then_some(root)
    }

    // == Find ==
    /// Plain descent from `node` without restructuring.
    ///
    /// Returns the node holding `key`, or the node where the search ran out
    /// of children. Callers compare the returned key to tell hit from miss.
    pub fn find<Q>(&self, node: Option<NodeId>, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = node?;
        loop {
            let n = self.node(current);
            let next = match key.cmp(n.key.borrow()) {
                Ordering::Equal => return Some(current),
                Ordering::Less => n.left,
                Ordering::Greater => n.right,
            };
            match next {
                Some(next) => current = next,
                None => return Some(current),
            }
        }
    }

    // == Insert ==
    /// Inserts or updates `key`, leaving it at the root.
    ///
    /// Returns the key's node and, for an update, the value it replaced.
    pub fn insert(&mut self, key: K, value: V, tick: u64) -> (NodeId, Option<V>) {
        let Some(root) = self.root else {
            let id = self.alloc(Node::new(key, value, tick));
            self.root = Some(id);
            return (id, None);
        };

        let root = self.splay(root, &key);
        self.root = Some(root);

        let mut fresh = Node::new(key, value, tick);
        match fresh.key.cmp(&self.node(root).key) {
            Ordering::Equal => {
                let node = self.node_mut(root);
                node.touch(tick);
                let old = mem::replace(&mut node.value, fresh.value);
                return (root, Some(old));
            }
            Ordering::Less => {
                fresh.left = self.node_mut(root).left.take();
                fresh.right = Some(root);
            }
            Ordering::Greater => {
                fresh.right = self.node_mut(root).right.take();
                fresh.left = Some(root);
            }
        }

        let id = self.alloc(fresh);
        self.root = Some(id);
        (id, None)
    }

    // == Erase ==
    /// Removes `key` and releases its node, returning the stored pair.
    ///
    /// An absent key leaves the tree as splaying left it and returns `None`.
    pub fn erase<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let target = self.access(key)?;
        let (left, right) = {
            let node = self.node(target);
            (node.left, node.right)
        };

        self.root = match left {
            None => right,
            Some(left) => {
                // Every key on the left is smaller, so this lifts the maximum,
                // which has no right child.
                let max = self.splay(left, key);
                self.node_mut(max).right = right;
                Some(max)
            }
        };

        let node = self.release(target);
        Some((node.key, node.value))
    }

    // == Least Recent ==
    /// Scans every node for the smallest `last_touch`.
    ///
    /// O(n): the tree is ordered by key, not recency. Ties go to the
    /// leftmost node in key order.
    pub fn least_recent(&self) -> Option<NodeId> {
        let mut best: Option<(NodeId, u64)> = None;
        let mut stack = Vec::new();
        let mut cursor = self.root;

        while cursor.is_some() || !stack.is_empty() {
            while let Some(id) = cursor {
                stack.push(id);
                cursor = self.node(id).left;
            }
            let Some(id) = stack.pop() else { break };
            let node = self.node(id);
            if best.map_or(true, |(_, touch)| node.last_touch < touch) {
                best = Some((id, node.last_touch));
            }
            cursor = node.right;
        }

        best.map(|(id, _)| id)
    }

    // == Iteration ==
    /// In-order iterator over `(key, value)` pairs.
    pub fn iter(&self) -> Iter<'_, K, V> {
        let mut iter = Iter {
            tree: self,
            stack: Vec::new(),
        };
        iter.push_left(self.root);
        iter
    }

    /// Drops every node.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.root = None;
        self.len = 0;
    }

    /// Longest root-to-leaf path, counted in nodes.
    #[cfg(test)]
    pub fn height(&self) -> usize {
        let mut deepest = 0;
        let mut stack: Vec<(NodeId, usize)> = self.root.map(|id| (id, 1)).into_iter().collect();
        while let Some((id, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            let node = self.node(id);
            stack.extend(node.left.map(|c| (c, depth + 1)));
            stack.extend(node.right.map(|c| (c, depth + 1)));
        }
        deepest
    }
}

// == Iterator ==
/// Borrowing in-order iterator returned by [`SplayTree::iter`].
pub struct Iter<'a, K, V> {
    tree: &'a SplayTree<K, V>,
    stack: Vec<NodeId>,
}

impl<'a, K: Ord, V> Iter<'a, K, V> {
    fn push_left(&mut self, mut cursor: Option<NodeId>) {
        while let Some(id) = cursor {
            self.stack.push(id);
            cursor = self.tree.node(id).left;
        }
    }
}

impl<'a, K: Ord, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let tree = self.tree;
        let node = tree.node(id);
        self.push_left(node.right);
        Some((&node.key, &node.value))
    }
}
