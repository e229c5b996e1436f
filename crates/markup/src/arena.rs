//! Arena-based tree storage
//!
//! All nodes of one builder session live in a single `Vec<Node>`:
//! - No Rc/Arc, no reference cycles: parent/child links are u32 indices
//! - Ids are assigned in creation order and never reused (nothing is
//!   ever deleted; a tree dies with its arena)
//! - Nodes stored sequentially, cache-friendly
//!
//! ## Memory Layout
//!
//! ```text
//! Arena: Vec<Node>
//!        [Node0][Node1][Node2]...
//!         ↑ 4-byte index, not 8-byte pointer
//! ```

use crate::error::{MarkupError, Result};
use crate::types::{Node, NodeId};

#[derive(Debug, Clone)]
pub struct NodeArena {
    /// All nodes stored sequentially
    nodes: Vec<Node>,

    /// Root node ID (if set)
    root_id: Option<NodeId>,
}

impl NodeArena {
    /// Create a new empty arena
    pub fn new() -> Self {
        Self {
            nodes: Vec::with_capacity(64), // Typical builder trees are small
            root_id: None,
        }
    }

    /// Create arena with specific capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            root_id: None,
        }
    }

    /// Create a node owned by this arena, returns its ID
    pub fn alloc(&mut self, parent_id: Option<NodeId>) -> NodeId {
        let node_id = self.nodes.len() as NodeId;
        self.nodes.push(Node::new(node_id, parent_id));
        node_id
    }

    /// Get node by ID (immutable)
    pub fn get(&self, node_id: NodeId) -> Result<&Node> {
        self.nodes
            .get(node_id as usize)
            .ok_or(MarkupError::NodeNotFound(node_id))
    }

    /// Get node by ID (mutable)
    pub fn get_mut(&mut self, node_id: NodeId) -> Result<&mut Node> {
        self.nodes
            .get_mut(node_id as usize)
            .ok_or(MarkupError::NodeNotFound(node_id))
    }

    /// Set root node
    pub fn set_root(&mut self, node_id: NodeId) -> Result<()> {
        // Verify node exists
        self.get(node_id)?;
        self.root_id = Some(node_id);
        Ok(())
    }

    /// Get root node ID
    pub fn root_id(&self) -> Option<NodeId> {
        self.root_id
    }

    /// Get root node
    pub fn root(&self) -> Result<&Node> {
        let root_id = self.root_id.ok_or(MarkupError::RootNotSet)?;
        self.get(root_id)
    }

    /// Total number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if arena is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterator over all nodes, in creation order
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Get parent of a node
    pub fn parent(&self, node_id: NodeId) -> Result<Option<&Node>> {
        let node = self.get(node_id)?;
        match node.parent_id {
            Some(parent_id) => Ok(Some(self.get(parent_id)?)),
            None => Ok(None),
        }
    }

    /// Get the closed children of a node, in close order
    pub fn children(&self, node_id: NodeId) -> Result<Vec<&Node>> {
        let node = self.get(node_id)?;
        node.children_ids
            .iter()
            .map(|&child_id| self.get(child_id))
            .collect()
    }
}

impl Default for NodeArena {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arena_basic() {
        let mut arena = NodeArena::new();

        let id = arena.alloc(None);
        assert_eq!(id, 0);

        let node = arena.get(id).unwrap();
        assert_eq!(node.tag, "div");
        assert_eq!(node.parent_id, None);
    }

    #[test]
    fn test_ids_follow_creation_order() {
        let mut arena = NodeArena::new();
        let root = arena.alloc(None);
        let a = arena.alloc(Some(root));
        let b = arena.alloc(Some(a));

        assert_eq!((root, a, b), (0, 1, 2));
        let ids: Vec<NodeId> = arena.iter().map(|n| n.node_id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_missing_node_is_an_error() {
        let arena = NodeArena::new();
        assert!(matches!(arena.get(7), Err(MarkupError::NodeNotFound(7))));
    }

    #[test]
    fn test_parent_lookup() {
        let mut arena = NodeArena::new();
        let root = arena.alloc(None);
        let child = arena.alloc(Some(root));

        assert!(arena.parent(root).unwrap().is_none());
        assert_eq!(arena.parent(child).unwrap().unwrap().node_id, root);
    }

    #[test]
    fn test_children_registry_only_after_close() {
        let mut arena = NodeArena::new();
        let root = arena.alloc(None);
        let child = arena.alloc(Some(root));

        // An open child is not in the registry yet.
        assert!(arena.children(root).unwrap().is_empty());

        if let Ok(node) = arena.get_mut(root) {
            node.register_child(child);
        }
        let children = arena.children(root).unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].node_id, child);
    }

    #[test]
    fn test_root_tracking() {
        let mut arena = NodeArena::new();
        assert!(arena.root().is_err());

        let root = arena.alloc(None);
        arena.set_root(root).unwrap();
        assert_eq!(arena.root_id(), Some(root));
        assert_eq!(arena.root().unwrap().node_id, root);
    }
}
