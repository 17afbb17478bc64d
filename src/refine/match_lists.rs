//! §4.4.4: globally unify list-nodes whose value sets overlap enough to plausibly be the same
//! enumerable field, so that a value seen under one branch is also accepted under a sibling
//! branch that happened to observe a different sample of the same set.

use crate::node::{NodeId, Tree};
use std::collections::BTreeSet;

fn overlap_ratio(a: &BTreeSet<Vec<u8>>, b: &BTreeSet<Vec<u8>>) -> f64 {
    let intersection = a.intersection(b).count();
    let smaller = a.len().min(b.len()).max(1);
    intersection as f64 / smaller as f64
}

pub fn match_lists(tree: &mut Tree, element_list_similarity: f64) {
    let mut list_nodes = Vec::new();
    collect_list_nodes(tree, tree.root, &mut list_nodes);
    if list_nodes.is_empty() {
        return;
    }

    let mut value_lists: Vec<BTreeSet<Vec<u8>>> = Vec::new();
    for &id in &list_nodes {
        let values: BTreeSet<Vec<u8>> = tree
            .get(id)
            .element
            .as_list()
            .unwrap()
            .iter()
            .cloned()
            .collect();
        match value_lists
            .iter()
            .position(|existing| overlap_ratio(existing, &values) > element_list_similarity)
        {
            Some(idx) => value_lists[idx].extend(values),
            None => value_lists.push(values),
        }
    }

    // Merge value-lists among themselves to a fixed point.
    loop {
        let mut merged_any = false;
        'outer: for i in 0..value_lists.len() {
            for j in (i + 1)..value_lists.len() {
                if overlap_ratio(&value_lists[i], &value_lists[j]) > element_list_similarity {
                    let other = value_lists.remove(j);
                    value_lists[i].extend(other);
                    merged_any = true;
                    break 'outer;
                }
            }
        }
        if !merged_any {
            break;
        }
    }

    for &id in &list_nodes {
        let current: BTreeSet<Vec<u8>> = tree
            .get(id)
            .element
            .as_list()
            .unwrap()
            .iter()
            .cloned()
            .collect();
        if let Some(unified) = value_lists
            .iter()
            .find(|vl| overlap_ratio(vl, &current) > element_list_similarity || !vl.is_disjoint(&current))
        {
            let mut values: Vec<Vec<u8>> = unified.iter().cloned().collect();
            values.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| b.cmp(a)));
            tree.get_mut(id).element = crate::node::Element::List(values);
        }
    }
}

fn collect_list_nodes(tree: &Tree, id: NodeId, out: &mut Vec<NodeId>) {
    if tree.get(id).is_list {
        out.push(id);
    }
    for &child in &tree.get(id).children.clone() {
        collect_list_nodes(tree, child, out);
    }
}
