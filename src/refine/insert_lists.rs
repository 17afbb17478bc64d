//! §4.4.3: when every sibling at a branch leads into an identical subtree shape, replace the
//! branch with a single list-node carrying the sibling elements as its value set.

use crate::node::{Element, Node, NodeId, Tree};

fn paths_identical(tree: &Tree, a: NodeId, b: NodeId, compare_element: bool) -> bool {
    let na = tree.get(a);
    let nb = tree.get(b);
    if na.is_variable != nb.is_variable || na.end != nb.end || na.datatype != nb.datatype {
        return false;
    }
    if compare_element && na.element != nb.element {
        return false;
    }
    if na.children.len() != nb.children.len() {
        return false;
    }
    na.children
        .iter()
        .zip(nb.children.iter())
        .all(|(&x, &y)| paths_identical(tree, x, y, true))
}

fn merge_paths(tree: &mut Tree, a: NodeId, b: NodeId) {
    tree.get_mut(a).occurrence += tree.get(b).occurrence;
    tree.get_mut(a).ending_lines += tree.get(b).ending_lines;
    let mut ids = tree.get(b).ending_line_ids.clone();
    tree.get_mut(a).ending_line_ids.append(&mut ids);
    let ca = tree.get(a).children.clone();
    let cb = tree.get(b).children.clone();
    for (x, y) in ca.iter().zip(cb.iter()) {
        merge_paths(tree, *x, *y);
    }
}

pub fn insert_lists(tree: &mut Tree) {
    insert_from(tree, tree.root);
    tree.update_parents();
}

fn insert_from(tree: &mut Tree, id: NodeId) {
    let children = tree.get(id).children.clone();
    for &child in &children {
        insert_from(tree, child);
    }

    let non_variable: Vec<NodeId> = children
        .iter()
        .copied()
        .filter(|&c| !tree.get(c).is_variable && !tree.get(c).is_list)
        .collect();
    if non_variable.len() < 2 {
        return;
    }

    let anchor = non_variable[0];
    let all_identical = non_variable[1..]
        .iter()
        .all(|&c| paths_identical(tree, anchor, c, false));
    if !all_identical {
        return;
    }

    let mut values = Vec::new();
    if let Some(v) = tree.get(anchor).element.as_fixed() {
        values.push(v.to_vec());
    }
    for &c in &non_variable[1..] {
        if let Some(v) = tree.get(c).element.as_fixed() {
            values.push(v.to_vec());
        }
        merge_paths(tree, anchor, c);
    }

    {
        let node = tree.get_mut(anchor);
        node.element = Element::List(values);
        node.is_list = true;
        node.datatype = [crate::datatype::DataType::String].into_iter().collect();
    }

    let survivors: Vec<NodeId> = children
        .into_iter()
        .filter(|&c| c == anchor || tree.get(c).is_variable)
        .collect();
    tree.get_mut(id).children = survivors;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_leaf_siblings_collapse_into_one_list() {
        let mut tree = Tree::new(3);
        let root = tree.root;
        for word in [b"this".to_vec(), b"that".to_vec(), b"those".to_vec()] {
            let mut n = Node::fixed(word);
            n.occurrence = 1;
            n.end = true;
            n.ending_lines = 1;
            tree.add_child(root, n);
        }
        insert_lists(&mut tree);
        let children = &tree.get(root).children;
        assert_eq!(children.len(), 1);
        let list_node = tree.get(children[0]);
        assert!(list_node.is_list);
        assert_eq!(list_node.element.as_list().unwrap().len(), 3);
        assert_eq!(list_node.occurrence, 3);
    }
}
