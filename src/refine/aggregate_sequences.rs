//! §4.4.7: fold `A -> B` chains of plain fixed nodes into a single fixed node, to keep the
//! emitted grammar from spelling out one `FixedDataModelElement` per delimiter-separated word.

use crate::node::{Element, NodeId, Tree};
use std::collections::HashSet;

fn is_plain_fixed(tree: &Tree, id: NodeId) -> bool {
    let node = tree.get(id);
    !node.is_list && !node.is_variable && matches!(node.element, Element::Fixed(_))
}

/// `subtree_groups` members are never folded away — the emitter needs them intact to name and
/// reference them.
pub fn aggregate_sequences(tree: &mut Tree, subtree_groups: &[Vec<NodeId>]) {
    let protected: HashSet<NodeId> = subtree_groups.iter().flatten().copied().collect();
    let optional_tails: HashSet<NodeId> = tree
        .optional_node_pairs
        .iter()
        .map(|(_, tail)| *tail)
        .collect();

    loop {
        if !aggregate_pass(tree, tree.root, &protected, &optional_tails) {
            break;
        }
    }
    tree.update_parents();
}

fn aggregate_pass(
    tree: &mut Tree,
    id: NodeId,
    protected: &HashSet<NodeId>,
    optional_tails: &HashSet<NodeId>,
) -> bool {
    let children = tree.get(id).children.clone();
    let mut changed = false;

    if !tree.get(id).end
        && !protected.contains(&id)
        && !optional_tails.contains(&id)
        && children.len() == 1
        && is_plain_fixed(tree, id)
    {
        let only_child = children[0];
        if is_plain_fixed(tree, only_child)
            && !protected.contains(&only_child)
            && !optional_tails.contains(&only_child)
        {
            let child_bytes = tree.get(only_child).element.as_fixed().unwrap().to_vec();
            let grandchildren = tree.get(only_child).children.clone();
            let child_end = tree.get(only_child).end;
            {
                let node = tree.get_mut(id);
                if let Element::Fixed(bytes) = &mut node.element {
                    bytes.extend(child_bytes);
                }
                node.end = child_end;
                node.children = grandchildren;
            }
            return true;
        }
    }

    for child in children {
        if aggregate_pass(tree, child, protected, optional_tails) {
            changed = true;
            break;
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;

    #[test]
    fn folds_a_chain_of_fixed_nodes() {
        let mut tree = Tree::new(1);
        let root = tree.root;
        let a = tree.add_child(root, Node::fixed(b"foo".to_vec()));
        let b = tree.add_child(a, Node::fixed(b"bar".to_vec()));
        tree.get_mut(b).end = true;

        aggregate_sequences(&mut tree, &[]);

        let a_node = tree.get(a);
        assert_eq!(a_node.element.as_fixed(), Some(b"foobar".as_slice()));
        assert!(a_node.children.is_empty());
        assert!(a_node.end);
    }
}
