use std::ops::ControlFlow;

use super::{Dom, NodeId};

/// Pre-order walk over the descendants of `from`, excluding `from` itself.
pub fn walk_down<B>(
    dom: &Dom,
    from: NodeId,
    mut step: impl FnMut(NodeId) -> ControlFlow<B>,
) -> ControlFlow<B> {
    fn visit<B>(
        dom: &Dom,
        node: NodeId,
        step: &mut impl FnMut(NodeId) -> ControlFlow<B>,
    ) -> ControlFlow<B> {
        for child in dom.children(node) {
            step(*child)?;
            visit(dom, *child, step)?;
        }
        ControlFlow::Continue(())
    }
    visit(dom, from, &mut step)
}

/// Walks the ancestors of `from`, nearest first.
pub fn walk_up<B>(
    dom: &Dom,
    from: NodeId,
    mut step: impl FnMut(NodeId) -> ControlFlow<B>,
) -> ControlFlow<B> {
    let mut current = dom.parent(from);
    while let Some(node) = current {
        step(node)?;
        current = dom.parent(node);
    }
    ControlFlow::Continue(())
}

#[must_use]
pub fn next(dom: &Dom, node: NodeId) -> Option<NodeId> {
    let parent = dom.parent(node)?;
    let index = dom.index_of(node)?;
    dom.children(parent).get(index + 1).copied()
}

#[must_use]
pub fn previous(dom: &Dom, node: NodeId) -> Option<NodeId> {
    let parent = dom.parent(node)?;
    let index = dom.index_of(node)?;
    dom.children(parent).get(index.checked_sub(1)?).copied()
}

/// Visits the following siblings of `from`, in order.
pub fn walk_forward<B>(
    dom: &Dom,
    from: NodeId,
    mut step: impl FnMut(NodeId) -> ControlFlow<B>,
) -> ControlFlow<B> {
    let mut current = next(dom, from);
    while let Some(node) = current {
        step(node)?;
        current = next(dom, node);
    }
    ControlFlow::Continue(())
}

/// Visits the preceding siblings of `from`, nearest first.
pub fn walk_backward<B>(
    dom: &Dom,
    from: NodeId,
    mut step: impl FnMut(NodeId) -> ControlFlow<B>,
) -> ControlFlow<B> {
    let mut current = previous(dom, from);
    while let Some(node) = current {
        step(node)?;
        current = previous(dom, node);
    }
    ControlFlow::Continue(())
}

/// Collects every descendant of `from` in pre-order.
#[must_use]
pub fn descendants(dom: &Dom, from: NodeId) -> Vec<NodeId> {
    let mut nodes = Vec::new();
    let _ = walk_down(dom, from, |node| {
        nodes.push(node);
        ControlFlow::<()>::Continue(())
    });
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{ElementNode, GroupKind, Node};

    /// root -> [paragraph -> inliners -> [a, b], c]
    fn sample() -> (Dom, [NodeId; 5]) {
        let mut dom = Dom::new();
        let root = dom.root();
        let paragraph = dom.create(Node::Element(ElementNode::block("paragraph")));
        let c = dom.create(Node::Element(ElementNode::block("c")));
        dom.append(root, [paragraph, c]).unwrap();
        let inliners = dom
            .create_group(GroupKind::Inliners, Some(paragraph))
            .unwrap();
        let a = dom.create(Node::Element(ElementNode::inliner("a")));
        let b = dom.create(Node::Element(ElementNode::inliner("b")));
        dom.append(inliners, [a, b]).unwrap();
        (dom, [paragraph, inliners, a, b, c])
    }

    #[test]
    fn walk_down_is_pre_order() {
        let (dom, [paragraph, inliners, a, b, c]) = sample();
        assert_eq!(descendants(&dom, dom.root()), vec![paragraph, inliners, a, b, c]);
    }

    #[test]
    fn walk_down_stops_on_break() {
        let (dom, [_, _, a, _, _]) = sample();
        let found = walk_down(&dom, dom.root(), |node| {
            if dom.element(node).is_some_and(|e| e.name == "a") {
                ControlFlow::Break(node)
            } else {
                ControlFlow::Continue(())
            }
        });
        assert_eq!(found, ControlFlow::Break(a));
    }

    #[test]
    fn walk_up_reaches_root() {
        let (dom, [paragraph, inliners, _, b, _]) = sample();
        let mut seen = Vec::new();
        let _ = walk_up(&dom, b, |node| {
            seen.push(node);
            ControlFlow::<()>::Continue(())
        });
        assert_eq!(seen, vec![inliners, paragraph, dom.root()]);
    }

    #[test]
    fn siblings() {
        let (dom, [paragraph, _, a, b, c]) = sample();
        assert_eq!(next(&dom, a), Some(b));
        assert_eq!(next(&dom, b), None);
        assert_eq!(previous(&dom, c), Some(paragraph));
        assert_eq!(previous(&dom, paragraph), None);

        let mut forward = Vec::new();
        let _ = walk_forward(&dom, paragraph, |node| {
            forward.push(node);
            ControlFlow::<()>::Continue(())
        });
        assert_eq!(forward, vec![c]);

        let mut backward = Vec::new();
        let _ = walk_backward(&dom, b, |node| {
            backward.push(node);
            ControlFlow::<()>::Continue(())
        });
        assert_eq!(backward, vec![a]);
    }
}
