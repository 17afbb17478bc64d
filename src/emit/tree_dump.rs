//! §4.5 artifact 1: indented depth-first text dump of the final tree, for human inspection.

use crate::node::{Element, NodeId, Tree};
use std::fmt::Write;

fn element_text(element: &Element) -> String {
    match element {
        Element::Root => "ROOT".to_string(),
        Element::Fixed(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        Element::List(items) => format!(
            "{{{}}}",
            items
                .iter()
                .map(|i| String::from_utf8_lossy(i).into_owned())
                .collect::<Vec<_>>()
                .join(", ")
        ),
        Element::Variable => "\u{00a7}".to_string(),
    }
}

pub fn dump(tree: &Tree) -> String {
    let mut out = String::new();
    dump_from(tree, tree.root, 0, &mut out);
    out
}

fn dump_from(tree: &Tree, id: NodeId, depth: usize, out: &mut String) {
    let node = tree.get(id);
    let indent = "  ".repeat(depth);
    let _ = write!(out, "{}{} ({})", indent, element_text(&node.element), node.occurrence);
    if node.end {
        let _ = write!(out, " - End ({})", node.ending_lines);
    }
    let _ = writeln!(out, " - Theta={}", node.theta1);
    for &child in &node.children {
        dump_from(tree, child, depth + 1, out);
    }
}
