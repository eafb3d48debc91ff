//! Tree Node Module
//!
//! Defines a single cache entry as it lives inside the splay tree arena.

// == Node Id ==
/// Stable handle to a slot in the tree arena.
///
/// A node keeps its slot for its whole life: rotations rewrite child links,
/// never slots, so a `NodeId` stays valid until the node is erased.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(pub(crate) usize);

impl NodeId {
    /// Returns the raw arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

// == Node ==
/// One cached key-value pair plus its tree links.
#[derive(Debug, Clone)]
pub(crate) struct Node<K, V> {
    /// The ordering key
    pub(crate) key: K,
    /// The stored value
    pub(crate) value: V,
    /// Logical timestamp of the last successful access
    pub(crate) last_touch: u64,
    /// Subtree of strictly smaller keys
    pub(crate) left: Option<NodeId>,
    /// Subtree of strictly greater keys
    pub(crate) right: Option<NodeId>,
}

impl<K, V> Node<K, V> {
    // == Constructor ==
    /// Creates a detached leaf node.
    pub fn new(key: K, value: V, last_touch: u64) -> Self {
        Self {
            key,
            value,
            last_touch,
            left: None,
            right: None,
        }
    }

    // == Touch ==
    /// Replaces the recency stamp.
    pub fn touch(&mut self, tick: u64) {
        self.last_touch = tick;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_creation() {
        let node = Node::new("k".to_string(), "v".to_string(), 7);

        assert_eq!(node.key, "k");
        assert_eq!(node.value, "v");
        assert_eq!(node.last_touch, 7);
        assert_eq!(node.left, None);
        assert_eq!(node.right, None);
    }

    #[test]
    fn test_node_touch() {
        let mut node = Node::new(1, "one", 1);
        node.touch(9);
        assert_eq!(node.last_touch, 9);
    }

    #[test]
    fn test_node_id_index() {
        let mut node = Node::new(1, (), 0);
        node.right = Some(NodeId(3));
        assert_eq!(node.right.map(NodeId::index), Some(3));
    }
}
