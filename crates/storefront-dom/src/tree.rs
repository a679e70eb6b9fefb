//! DOM Tree (arena-based allocation)

use crate::{DomError, ElementData, Node, NodeId};

/// Arena-based DOM tree
///
/// Slot 0 always holds the document node. Removed nodes stay in the arena
/// (detached) so ids held elsewhere never dangle.
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self { nodes: vec![Node::document()] }
    }

    /// Document node
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Element data for `id`, if it is an element
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(Node::as_element)
    }

    /// Mutable element data for `id`
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id).and_then(Node::as_element_mut)
    }

    /// Check whether `id` is an element with the given tag
    pub fn is_tag(&self, id: NodeId, tag: &str) -> bool {
        self.element(id).is_some_and(|e| e.is(tag))
    }

    /// Number of nodes in the arena
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the arena holds only the document node
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(Node::element(tag))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(Node::text(content))
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Append `child` as the last child of `parent`, detaching it first
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if self.get(parent).is_none() {
            return Err(DomError::NotFound(parent));
        }
        if self.get(child).is_none() || child == NodeId::ROOT {
            return Err(DomError::NotFound(child));
        }
        if self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }

        self.detach(child);

        let last = self.nodes[parent.index()].last_child;
        {
            let node = &mut self.nodes[child.index()];
            node.parent = parent;
            node.prev_sibling = last;
            node.next_sibling = NodeId::NONE;
        }
        if last.is_valid() {
            self.nodes[last.index()].next_sibling = child;
        } else {
            self.nodes[parent.index()].first_child = child;
        }
        self.nodes[parent.index()].last_child = child;
        Ok(())
    }

    /// Remove `child` from `parent`; false if it is not a child
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        match self.get(child) {
            Some(node) if node.parent == parent && parent.is_valid() => {
                self.detach(child);
                true
            }
            _ => false,
        }
    }

    /// Unlink a node from its parent and siblings
    pub fn detach(&mut self, id: NodeId) {
        let Some(node) = self.get(id) else { return };
        let (parent, prev, next) = (node.parent, node.prev_sibling, node.next_sibling);
        if !parent.is_valid() {
            return;
        }

        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = next;
        } else {
            self.nodes[parent.index()].first_child = next;
        }
        if next.is_valid() {
            self.nodes[next.index()].prev_sibling = prev;
        } else {
            self.nodes[parent.index()].last_child = prev;
        }

        let node = &mut self.nodes[id.index()];
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
    }

    /// Parent of a node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).map(|n| n.parent).filter(|p| p.is_valid())
    }

    /// Child ids in order
    pub fn children(&self, id: NodeId) -> Children<'_> {
        let next = self.get(id).map_or(NodeId::NONE, |n| n.first_child);
        Children { tree: self, next }
    }

    /// Element children in order
    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id).filter(move |&c| self.element(c).is_some())
    }

    /// Next sibling that is an element
    pub fn next_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let mut cur = self.get(id)?.next_sibling;
        while cur.is_valid() {
            if self.element(cur).is_some() {
                return Some(cur);
            }
            cur = self.nodes[cur.index()].next_sibling;
        }
        None
    }

    /// Ancestors from parent up to the topmost node
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors { tree: self, next: self.parent(id).unwrap_or(NodeId::NONE) }
    }

    /// Descendants of `id` in tree order (pre-order), excluding `id`
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let first = self.get(id).map_or(NodeId::NONE, |n| n.first_child);
        Descendants { tree: self, root: id, next: first }
    }

    /// Check whether `ancestor` is `node` or one of its ancestors
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        node == ancestor || self.ancestors(node).any(|a| a == ancestor)
    }

    /// Check whether the node is attached to the document
    pub fn is_connected(&self, id: NodeId) -> bool {
        id == NodeId::ROOT || self.ancestors(id).any(|a| a == NodeId::ROOT)
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over a node's children
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if !self.next.is_valid() {
            return None;
        }
        let cur = self.next;
        self.next = self.tree.nodes[cur.index()].next_sibling;
        Some(cur)
    }
}

/// Iterator over a node's ancestors
pub struct Ancestors<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if !self.next.is_valid() {
            return None;
        }
        let cur = self.next;
        self.next = self.tree.nodes[cur.index()].parent;
        Some(cur)
    }
}

/// Pre-order iterator bounded to a subtree
pub struct Descendants<'a> {
    tree: &'a DomTree,
    root: NodeId,
    next: NodeId,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if !self.next.is_valid() {
            return None;
        }
        let cur = self.next;
        let node = &self.tree.nodes[cur.index()];

        self.next = if node.first_child.is_valid() {
            node.first_child
        } else {
            // Climb until a node with a next sibling, without leaving the subtree
            let mut climb = cur;
            loop {
                if climb == self.root {
                    break NodeId::NONE;
                }
                let n = &self.tree.nodes[climb.index()];
                if n.next_sibling.is_valid() {
                    break n.next_sibling;
                }
                climb = n.parent;
                if !climb.is_valid() || climb == self.root {
                    break NodeId::NONE;
                }
            }
        };
        Some(cur)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (DomTree, NodeId, NodeId, NodeId, NodeId) {
        // root > div > (p > span), ul
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let p = tree.create_element("p");
        let span = tree.create_element("span");
        let ul = tree.create_element("ul");
        tree.append_child(tree.root(), div).unwrap();
        tree.append_child(div, p).unwrap();
        tree.append_child(p, span).unwrap();
        tree.append_child(div, ul).unwrap();
        (tree, div, p, span, ul)
    }

    #[test]
    fn test_descendants_tree_order() {
        let (tree, div, p, span, ul) = sample();
        let all: Vec<_> = tree.descendants(tree.root()).collect();
        assert_eq!(all, vec![div, p, span, ul]);

        let under_p: Vec<_> = tree.descendants(p).collect();
        assert_eq!(under_p, vec![span]);
    }

    #[test]
    fn test_descendants_stop_at_subtree() {
        let (tree, _div, p, _span, _ul) = sample();
        // p's subtree must not leak into its sibling ul
        assert_eq!(tree.descendants(p).count(), 1);
    }

    #[test]
    fn test_detach_and_reappend() {
        let (mut tree, div, p, _span, ul) = sample();
        tree.append_child(div, p).unwrap();
        let order: Vec<_> = tree.children(div).collect();
        assert_eq!(order, vec![ul, p]);

        assert!(tree.remove_child(div, ul));
        assert!(!tree.remove_child(div, ul));
        assert_eq!(tree.children(div).collect::<Vec<_>>(), vec![p]);
        assert!(!tree.is_connected(ul));
    }

    #[test]
    fn test_cycle_rejected() {
        let (mut tree, div, p, _span, _ul) = sample();
        assert!(matches!(
            tree.append_child(p, div),
            Err(DomError::HierarchyRequest { .. })
        ));
    }

    #[test]
    fn test_next_element_sibling_skips_text() {
        let mut tree = DomTree::new();
        let a = tree.create_element("summary");
        let t = tree.create_text("\n");
        let b = tree.create_element("div");
        tree.append_child(tree.root(), a).unwrap();
        tree.append_child(tree.root(), t).unwrap();
        tree.append_child(tree.root(), b).unwrap();
        assert_eq!(tree.next_element_sibling(a), Some(b));
        assert_eq!(tree.next_element_sibling(b), None);
    }
}
