//! §4.4.1: deterministic child order. Downstream matchers rely on longer prefixes appearing
//! before shorter ones, so this runs first and again after list unification.

use crate::node::{NodeId, Tree};

pub fn sort_children(tree: &mut Tree) {
    sort_from(tree, tree.root);
}

fn sort_from(tree: &mut Tree, id: NodeId) {
    {
        let node = tree.get_mut(id);
        if node.is_list {
            if let crate::node::Element::List(items) = &mut node.element {
                items.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| b.cmp(a)));
            }
        }
    }

    let children = tree.get(id).children.clone();
    let (variables, rest): (Vec<NodeId>, Vec<NodeId>) =
        children.into_iter().partition(|&c| tree.get(c).is_variable);

    let (lists, mut fixed): (Vec<NodeId>, Vec<NodeId>) =
        rest.into_iter().partition(|&c| tree.get(c).is_list);
    let mut lists = lists;

    fixed.sort_by(|&a, &b| {
        let ea = tree.get(a).element.sort_key();
        let eb = tree.get(b).element.sort_key();
        eb.len().cmp(&ea.len()).then_with(|| eb.cmp(ea))
    });
    lists.sort_by(|&a, &b| {
        let ea = tree.get(a).element.sort_key();
        let eb = tree.get(b).element.sort_key();
        eb.len().cmp(&ea.len()).then_with(|| eb.cmp(ea))
    });

    let mut ordered = fixed;
    ordered.extend(lists);
    ordered.extend(variables);

    tree.get_mut(id).children = ordered.clone();

    for child in ordered {
        sort_from(tree, child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;

    #[test]
    fn variable_child_always_sorts_last() {
        let mut tree = Tree::new(3);
        let root = tree.root;
        let mut fixed = Node::fixed(b"a".to_vec());
        fixed.occurrence = 1;
        tree.add_child(root, fixed);
        let var = Node::variable();
        tree.add_child(root, var);

        sort_children(&mut tree);
        let children = &tree.get(root).children;
        assert!(tree.get(children[children.len() - 1]).is_variable);
    }

    #[test]
    fn sort_is_idempotent() {
        let mut tree = Tree::new(3);
        let root = tree.root;
        tree.add_child(root, Node::fixed(b"aaa".to_vec()));
        tree.add_child(root, Node::fixed(b"bb".to_vec()));
        tree.add_child(root, Node::fixed(b"c".to_vec()));

        sort_children(&mut tree);
        let first_pass = tree.get(root).children.clone();
        sort_children(&mut tree);
        let second_pass = tree.get(root).children.clone();
        assert_eq!(first_pass, second_pass);
    }
}
