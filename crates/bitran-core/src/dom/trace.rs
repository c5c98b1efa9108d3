use super::{Dom, NodeId};

const INDENT: &str = "  ";

fn label(dom: &Dom, node: NodeId) -> String {
    dom.get(node)
        .map_or_else(|| format!("<unknown {node}>"), |n| n.label())
}

/// Renders the ancestry of `node`, root first, each level indented one step
/// further. The header is `!NO_PARENT!` when the top ancestor is not the root.
#[must_use]
pub fn trace_node_up(dom: &Dom, node: NodeId) -> String {
    let mut chain = vec![node];
    let mut current = dom.parent(node);
    while let Some(parent) = current {
        chain.push(parent);
        current = dom.parent(parent);
    }
    chain.reverse();

    let mut lines = Vec::with_capacity(chain.len() + 1);
    if chain.first() != Some(&dom.root()) {
        lines.push("!NO_PARENT!".to_string());
    }
    let offset = lines.len();
    for (depth, id) in chain.into_iter().enumerate() {
        lines.push(format!("{}{}", INDENT.repeat(depth + offset), label(dom, id)));
    }
    lines.join("\n")
}

/// Renders `node` and all of its descendants as an indented tree.
#[must_use]
pub fn trace_node_down(dom: &Dom, node: NodeId) -> String {
    trace_node_down_with(dom, node, |_, _| None)
}

/// Like [`trace_node_down`], appending `annotate`'s output to each line.
#[must_use]
pub fn trace_node_down_with(
    dom: &Dom,
    node: NodeId,
    annotate: impl Fn(&Dom, NodeId) -> Option<String>,
) -> String {
    fn visit(
        dom: &Dom,
        node: NodeId,
        depth: usize,
        annotate: &impl Fn(&Dom, NodeId) -> Option<String>,
        lines: &mut Vec<String>,
    ) {
        let mut line = format!("{}{}", INDENT.repeat(depth), label(dom, node));
        if let Some(note) = annotate(dom, node) {
            line.push(' ');
            line.push_str(&note);
        }
        lines.push(line);
        for child in dom.children(node) {
            visit(dom, *child, depth + 1, annotate, lines);
        }
    }

    let mut lines = Vec::new();
    visit(dom, node, 0, &annotate, &mut lines);
    lines.join("\n")
}
