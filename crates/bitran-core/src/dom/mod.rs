//! Arena-backed node tree.
//!
//! Every node lives in a [`Dom`] and is addressed by a [`NodeId`]. Groups own
//! an ordered child list; each child keeps a non-owning back-link to its
//! parent that only the group operations below ever update.
//!
//! ## Modules
//!
//! - [`node`]: node kinds, element payloads and parse data
//! - [`walk`]: descendant, ancestor and sibling traversal
//! - [`trace`]: human readable ancestry and subtree dumps

pub mod node;
pub mod trace;
pub mod walk;

use std::ops::Index;

use thiserror::Error;

pub use node::{ElementNode, ElementRole, ErrorNode, GroupKind, Node, NodeId, ParseData};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomError {
    #[error("node {0} does not exist in this tree")]
    UnknownNode(NodeId),
    #[error("node {0} is not a group")]
    NotAGroup(NodeId),
    #[error("node {0} has no parent group")]
    Detached(NodeId),
    #[error("nodes {0} and {1} are not in the same group")]
    NotSiblings(NodeId, NodeId),
    #[error("node {0} cannot be inserted into itself or its own descendant")]
    Cycle(NodeId),
}

#[derive(Debug)]
struct Slot {
    node: Node,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Owns every node of one document.
///
/// Detached nodes stay allocated until the tree is dropped.
#[derive(Debug)]
pub struct Dom {
    slots: Vec<Slot>,
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom {
    /// Creates a tree holding only an empty root group.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: vec![Slot {
                node: Node::Group(GroupKind::Root),
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of allocated nodes, attached or not.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.slots.len()
    }

    /// True when the root group has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots[0].children.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        id.0 < self.slots.len()
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.0).map(|slot| &slot.node)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots.get_mut(id.0).map(|slot| &mut slot.node)
    }

    #[must_use]
    pub fn element(&self, id: NodeId) -> Option<&ElementNode> {
        self.get(id)?.as_element()
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementNode> {
        match self.get_mut(id)? {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slots.get(id.0)?.parent
    }

    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.slots
            .get(id.0)
            .map_or(&[], |slot| slot.children.as_slice())
    }

    /// Position of `id` among its parent's children.
    #[must_use]
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|child| *child == id)
    }

    /// Allocates a detached node.
    pub fn create(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.slots.len());
        self.slots.push(Slot {
            node,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Allocates a group. With an `owner` the group is appended to the owner's
    /// children, which is how an element holds nested content.
    pub fn create_group(&mut self, kind: GroupKind, owner: Option<NodeId>) -> Result<NodeId, DomError> {
        if let Some(owner) = owner {
            self.check(owner)?;
        }
        let id = self.create(Node::Group(kind));
        if let Some(owner) = owner {
            self.slots[id.0].parent = Some(owner);
            self.slots[owner.0].children.push(id);
        }
        Ok(id)
    }

    /// Swaps the payload of `id` for `node`, detaching every child first.
    /// The node keeps its place in its parent.
    pub fn reset(&mut self, id: NodeId, node: Node) -> Result<Node, DomError> {
        self.check(id)?;
        for child in std::mem::take(&mut self.slots[id.0].children) {
            self.slots[child.0].parent = None;
        }
        Ok(std::mem::replace(&mut self.slots[id.0].node, node))
    }

    pub fn set_nodes(
        &mut self,
        group: NodeId,
        nodes: impl IntoIterator<Item = NodeId>,
    ) -> Result<(), DomError> {
        self.clear(group)?;
        self.append(group, nodes)
    }

    pub fn clear(&mut self, group: NodeId) -> Result<(), DomError> {
        self.check_group(group)?;
        for child in std::mem::take(&mut self.slots[group.0].children) {
            self.slots[child.0].parent = None;
        }
        Ok(())
    }

    pub fn append(
        &mut self,
        group: NodeId,
        nodes: impl IntoIterator<Item = NodeId>,
    ) -> Result<(), DomError> {
        let index = self.children(group).len();
        self.insert_at(group, index, nodes)
    }

    pub fn prepend(
        &mut self,
        group: NodeId,
        nodes: impl IntoIterator<Item = NodeId>,
    ) -> Result<(), DomError> {
        self.insert_at(group, 0, nodes)
    }

    /// Inserts `nodes` right before `anchor` in the anchor's group.
    pub fn before(
        &mut self,
        anchor: NodeId,
        nodes: impl IntoIterator<Item = NodeId>,
    ) -> Result<(), DomError> {
        let (group, index) = self.position(anchor)?;
        self.insert_at(group, index, nodes)
    }

    /// Inserts `nodes` right after `anchor` in the anchor's group.
    pub fn after(
        &mut self,
        anchor: NodeId,
        nodes: impl IntoIterator<Item = NodeId>,
    ) -> Result<(), DomError> {
        let (group, index) = self.position(anchor)?;
        self.insert_at(group, index + 1, nodes)
    }

    /// Puts `nodes` where `target` was and detaches `target`.
    pub fn replace(
        &mut self,
        target: NodeId,
        nodes: impl IntoIterator<Item = NodeId>,
    ) -> Result<(), DomError> {
        let (group, index) = self.position(target)?;
        self.detach(target)?;
        self.insert_at(group, index, nodes)
    }

    pub fn swap(&mut self, a: NodeId, b: NodeId) -> Result<(), DomError> {
        let (group_a, index_a) = self.position(a)?;
        let (group_b, index_b) = self.position(b)?;
        if group_a != group_b {
            return Err(DomError::NotSiblings(a, b));
        }
        self.slots[group_a.0].children.swap(index_a, index_b);
        Ok(())
    }

    /// Moves `node` so it sits directly before `anchor`.
    pub fn move_before(&mut self, node: NodeId, anchor: NodeId) -> Result<(), DomError> {
        self.move_next_to(node, anchor, 0)
    }

    /// Moves `node` so it sits directly after `anchor`.
    pub fn move_after(&mut self, node: NodeId, anchor: NodeId) -> Result<(), DomError> {
        self.move_next_to(node, anchor, 1)
    }

    /// Removes `node` from its parent. A no-op for nodes without a parent.
    pub fn detach(&mut self, node: NodeId) -> Result<(), DomError> {
        self.check(node)?;
        if let Some(parent) = self.slots[node.0].parent.take() {
            self.slots[parent.0].children.retain(|child| *child != node);
        }
        Ok(())
    }

    fn move_next_to(&mut self, node: NodeId, anchor: NodeId, offset: usize) -> Result<(), DomError> {
        if node == anchor {
            return Ok(());
        }
        let (group, _) = self.position(node)?;
        let (anchor_group, _) = self.position(anchor)?;
        if group != anchor_group {
            return Err(DomError::NotSiblings(node, anchor));
        }
        let children = &mut self.slots[group.0].children;
        children.retain(|child| *child != node);
        let index = children
            .iter()
            .position(|child| *child == anchor)
            .ok_or(DomError::NotSiblings(node, anchor))?;
        children.insert(index + offset, node);
        Ok(())
    }

    fn insert_at(
        &mut self,
        group: NodeId,
        mut index: usize,
        nodes: impl IntoIterator<Item = NodeId>,
    ) -> Result<(), DomError> {
        self.check_group(group)?;
        for node in nodes {
            self.check(node)?;
            if node == group || self.is_ancestor(node, group) {
                return Err(DomError::Cycle(node));
            }
            if self.parent(node) == Some(group)
                && let Some(current) = self.index_of(node)
                && current < index
            {
                index -= 1;
            }
            self.detach(node)?;
            let children = &mut self.slots[group.0].children;
            let at = index.min(children.len());
            children.insert(at, node);
            self.slots[node.0].parent = Some(group);
            index = at + 1;
        }
        Ok(())
    }

    fn is_ancestor(&self, candidate: NodeId, of: NodeId) -> bool {
        let mut current = self.parent(of);
        while let Some(id) = current {
            if id == candidate {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    fn position(&self, node: NodeId) -> Result<(NodeId, usize), DomError> {
        self.check(node)?;
        let parent = self.parent(node).ok_or(DomError::Detached(node))?;
        let index = self.index_of(node).ok_or(DomError::Detached(node))?;
        Ok((parent, index))
    }

    fn check(&self, id: NodeId) -> Result<(), DomError> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(DomError::UnknownNode(id))
        }
    }

    fn check_group(&self, id: NodeId) -> Result<(), DomError> {
        match self.get(id) {
            Some(Node::Group(_)) => Ok(()),
            Some(_) => Err(DomError::NotAGroup(id)),
            None => Err(DomError::UnknownNode(id)),
        }
    }
}

impl Index<NodeId> for Dom {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.slots[id.0].node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text(dom: &mut Dom, name: &str) -> NodeId {
        dom.create(Node::Element(ElementNode::inliner(name)))
    }

    fn names(dom: &Dom, group: NodeId) -> Vec<String> {
        dom.children(group).iter().map(|id| dom[*id].label()).collect()
    }

    #[test]
    fn new_tree_has_empty_root() {
        let dom = Dom::new();
        assert!(dom.is_empty());
        assert_eq!(dom[dom.root()].group_kind(), Some(GroupKind::Root));
        assert_eq!(dom.parent(dom.root()), None);
    }

    #[test]
    fn append_sets_parent_links() {
        let mut dom = Dom::new();
        let root = dom.root();
        let a = text(&mut dom, "a");
        let b = text(&mut dom, "b");
        dom.append(root, [a, b]).unwrap();

        assert_eq!(dom.children(root), &[a, b]);
        assert_eq!(dom.parent(a), Some(root));
        assert_eq!(dom.index_of(b), Some(1));
    }

    #[test]
    fn insert_moves_node_between_groups() {
        let mut dom = Dom::new();
        let root = dom.root();
        let other = dom.create(Node::Group(GroupKind::Inliners));
        let a = text(&mut dom, "a");
        dom.append(root, [a]).unwrap();
        dom.append(other, [a]).unwrap();

        assert!(dom.children(root).is_empty());
        assert_eq!(dom.parent(a), Some(other));
    }

    #[test]
    fn prepend_before_after() {
        let mut dom = Dom::new();
        let root = dom.root();
        let [a, b, c, d] = ["a", "b", "c", "d"].map(|name| text(&mut dom, name));
        dom.append(root, [b]).unwrap();
        dom.prepend(root, [a]).unwrap();
        dom.after(b, [d]).unwrap();
        dom.before(d, [c]).unwrap();

        assert_eq!(names(&dom, root), ["a", "b", "c", "d"]);
    }

    #[test]
    fn reinserting_within_same_group_keeps_order_sane() {
        let mut dom = Dom::new();
        let root = dom.root();
        let [a, b, c] = ["a", "b", "c"].map(|name| text(&mut dom, name));
        dom.append(root, [a, b, c]).unwrap();
        dom.after(c, [a]).unwrap();

        assert_eq!(names(&dom, root), ["b", "c", "a"]);
    }

    #[test]
    fn replace_and_swap() {
        let mut dom = Dom::new();
        let root = dom.root();
        let [a, b, c, x] = ["a", "b", "c", "x"].map(|name| text(&mut dom, name));
        dom.append(root, [a, b, c]).unwrap();

        dom.replace(b, [x]).unwrap();
        assert_eq!(names(&dom, root), ["a", "x", "c"]);
        assert_eq!(dom.parent(b), None);

        dom.swap(a, c).unwrap();
        assert_eq!(names(&dom, root), ["c", "x", "a"]);
    }

    #[test]
    fn move_before_and_after() {
        let mut dom = Dom::new();
        let root = dom.root();
        let [a, b, c] = ["a", "b", "c"].map(|name| text(&mut dom, name));
        dom.append(root, [a, b, c]).unwrap();

        dom.move_before(a, c).unwrap();
        assert_eq!(names(&dom, root), ["b", "a", "c"]);

        dom.move_after(b, c).unwrap();
        assert_eq!(names(&dom, root), ["a", "c", "b"]);
    }

    #[test]
    fn sibling_operations_require_shared_group() {
        let mut dom = Dom::new();
        let root = dom.root();
        let other = dom.create(Node::Group(GroupKind::Inliners));
        let a = text(&mut dom, "a");
        let b = text(&mut dom, "b");
        dom.append(root, [a]).unwrap();
        dom.append(other, [b]).unwrap();

        assert_eq!(dom.swap(a, b), Err(DomError::NotSiblings(a, b)));
        let loose = text(&mut dom, "loose");
        assert_eq!(dom.before(loose, [a]), Err(DomError::Detached(loose)));
    }

    #[test]
    fn elements_are_not_containers() {
        let mut dom = Dom::new();
        let a = text(&mut dom, "a");
        let b = text(&mut dom, "b");
        assert_eq!(dom.append(a, [b]), Err(DomError::NotAGroup(a)));
    }

    #[test]
    fn owned_group_becomes_child_of_element() {
        let mut dom = Dom::new();
        let paragraph = dom.create(Node::Element(ElementNode::block("paragraph")));
        let group = dom.create_group(GroupKind::Inliners, Some(paragraph)).unwrap();

        assert_eq!(dom.children(paragraph), &[group]);
        assert_eq!(dom.parent(group), Some(paragraph));
    }

    #[test]
    fn group_cannot_contain_itself() {
        let mut dom = Dom::new();
        let root = dom.root();
        let paragraph = dom.create(Node::Element(ElementNode::block("paragraph")));
        dom.append(root, [paragraph]).unwrap();
        let group = dom.create_group(GroupKind::Inliners, Some(paragraph)).unwrap();

        assert_eq!(dom.append(group, [paragraph]), Err(DomError::Cycle(paragraph)));
    }

    #[test]
    fn reset_detaches_children() {
        let mut dom = Dom::new();
        let paragraph = dom.create(Node::Element(ElementNode::block("paragraph")));
        let group = dom.create_group(GroupKind::Inliners, Some(paragraph)).unwrap();

        let old = dom
            .reset(
                paragraph,
                Node::Error(ErrorNode::new(
                    "paragraph",
                    ElementRole::Block,
                    "raw",
                    anyhow::anyhow!("boom"),
                )),
            )
            .unwrap();

        assert!(old.as_element().is_some());
        assert!(dom.children(paragraph).is_empty());
        assert_eq!(dom.parent(group), None);
        assert_eq!(dom[paragraph].as_error().map(|e| e.source.as_str()), Some("raw"));
    }
}
