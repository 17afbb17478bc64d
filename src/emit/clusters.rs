//! §4.5 artifact 3: one cluster per terminal, listing the input line ids that ended there.

use crate::node::{NodeId, Tree};

pub fn clusters(tree: &Tree) -> Vec<Vec<u64>> {
    let mut out = Vec::new();
    walk(tree, tree.root, &mut out);
    out
}

fn walk(tree: &Tree, id: NodeId, out: &mut Vec<Vec<u64>>) {
    let node = tree.get(id);
    if !node.ending_line_ids.is_empty() {
        out.push(node.ending_line_ids.clone());
    }
    for &child in &node.children {
        walk(tree, child, out);
    }
}
