//! §4.4.5 (optional): bottom-up search for repeated subtrees, so the emitter can factor them out
//! as named shared bindings instead of repeating the grammar text at every occurrence.

use crate::node::{NodeId, Tree};
use std::collections::HashMap;

fn subtree_height(tree: &Tree, id: NodeId) -> u32 {
    tree.get(id)
        .children
        .iter()
        .map(|&c| subtree_height(tree, c) + 1)
        .max()
        .unwrap_or(0)
}

fn shape_key(tree: &Tree, id: NodeId) -> String {
    let node = tree.get(id);
    let mut key = match &node.element {
        crate::node::Element::Root => "root".to_string(),
        crate::node::Element::Fixed(b) => format!("f:{}", String::from_utf8_lossy(b)),
        crate::node::Element::List(items) => format!(
            "l:{}",
            items
                .iter()
                .map(|w| String::from_utf8_lossy(w).into_owned())
                .collect::<Vec<_>>()
                .join(",")
        ),
        crate::node::Element::Variable => "v".to_string(),
    };
    for &child in &node.children {
        key.push('|');
        key.push_str(&shape_key(tree, child));
    }
    key
}

/// Returns groups of node ids sharing an identical subtree shape, restricted to groups of size
/// >= 2 and height >= `min_height`. Every `optional_node_pairs` tail is additionally appended as
/// a singleton group so the emitter always names it.
pub fn discover_subtrees(tree: &mut Tree, min_height: u32) -> Vec<Vec<NodeId>> {
    let mut all_nodes = Vec::new();
    collect_all(tree, tree.root, &mut all_nodes);

    let mut by_shape: HashMap<String, Vec<NodeId>> = HashMap::new();
    for &id in &all_nodes {
        if subtree_height(tree, id) >= min_height {
            by_shape
                .entry(shape_key(tree, id))
                .or_default()
                .push(id);
        }
    }

    let mut groups: Vec<Vec<NodeId>> = by_shape
        .into_values()
        .filter(|g| g.len() >= 2)
        .collect();

    for &(_, tail) in &tree.optional_node_pairs.clone() {
        if !groups.iter().any(|g| g.contains(&tail)) {
            groups.push(vec![tail]);
        }
    }

    groups.sort_by_key(|g| subtree_height(tree, g[0]));
    tree.subtree_groups = groups.clone();
    groups
}

fn collect_all(tree: &Tree, id: NodeId, out: &mut Vec<NodeId>) {
    out.push(id);
    for &child in &tree.get(id).children.clone() {
        collect_all(tree, child, out);
    }
}
