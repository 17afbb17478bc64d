//! §4.5 artifact 2: one string per template, built by depth-first accumulation of element text,
//! emitted whenever a node is `end` (an optional tail begins there) or is a leaf.

use crate::node::{Element, NodeId, Tree};

fn element_text(element: &Element) -> String {
    match element {
        Element::Root => String::new(),
        Element::Fixed(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        Element::List(items) => items
            .first()
            .map(|i| String::from_utf8_lossy(i).into_owned())
            .unwrap_or_default(),
        Element::Variable => "\u{00a7}".to_string(),
    }
}

pub fn templates(tree: &Tree) -> Vec<String> {
    let mut out = Vec::new();
    walk(tree, tree.root, String::new(), &mut out);
    out
}

fn walk(tree: &Tree, id: NodeId, prefix: String, out: &mut Vec<String>) {
    let node = tree.get(id);
    let accumulated = format!("{}{}", prefix, element_text(&node.element));

    if node.end || node.is_leaf() {
        out.push(accumulated.clone());
    }
    for &child in &node.children {
        walk(tree, child, accumulated.clone(), out);
    }
}
