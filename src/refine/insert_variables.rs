//! §4.4.2: collapse siblings whose subtrees are merely *similar* into one variable child whose
//! subtree is the merge of the originals.

use crate::config::Config;
use crate::node::{Element, Node, NodeId, Tree};

/// Mean path similarity between two subtrees, as a dual-pointer walk over their children in
/// sort order. Delimiter-vs-delimiter samples are dropped; a sentinel `1.0` seeds the running
/// mean so two empty subtrees collapse to "similar".
fn path_similarity(tree: &Tree, a: NodeId, b: NodeId, delimiters: &std::collections::BTreeSet<u8>) -> f64 {
    let mut matches = 1usize;
    let mut total = 1usize;
    walk_similarity(tree, a, b, delimiters, &mut matches, &mut total);
    matches as f64 / total as f64
}

fn walk_similarity(
    tree: &Tree,
    a: NodeId,
    b: NodeId,
    delimiters: &std::collections::BTreeSet<u8>,
    matches: &mut usize,
    total: &mut usize,
) {
    let na = tree.get(a);
    let nb = tree.get(b);

    if na.is_variable || nb.is_variable {
        // Variable absorbs anything; contributes no sample either way.
    } else {
        let is_delim = |n: &crate::node::Node| {
            n.element
                .as_fixed()
                .map(|e| e.len() == 1 && delimiters.contains(&e[0]))
                .unwrap_or(false)
        };
        if !(is_delim(na) && is_delim(nb)) {
            *total += 1;
            if na.element == nb.element && na.is_list == nb.is_list {
                *matches += 1;
            }
        }
    }

    let ca = &na.children;
    let cb = &nb.children;
    for (x, y) in ca.iter().zip(cb.iter()) {
        walk_similarity(tree, *x, *y, delimiters, matches, total);
    }
}

/// Fuses `b`'s counts into `a`'s subtree: matching children merge counts recursively, children
/// unique to one side are grafted as-is.
fn merge_subtree_counts(tree: &mut Tree, a: NodeId, b: NodeId) {
    tree.get_mut(a).occurrence += tree.get(b).occurrence;
    tree.get_mut(a).ending_lines += tree.get(b).ending_lines;
    let mut more_ids = tree.get(b).ending_line_ids.clone();
    tree.get_mut(a).ending_line_ids.append(&mut more_ids);

    let b_datatype = tree.get(b).datatype.clone();
    tree.get_mut(a)
        .datatype
        .retain(|dt| b_datatype.contains(dt));

    let children_a = tree.get(a).children.clone();
    let children_b = tree.get(b).children.clone();
    for (ca, cb) in children_a.iter().zip(children_b.iter()) {
        merge_subtree_counts(tree, *ca, *cb);
    }
    if children_b.len() > children_a.len() {
        for extra in &children_b[children_a.len()..] {
            let cloned = clone_subtree(tree, *extra);
            tree.get_mut(a).children.push(cloned);
        }
    }
}

fn clone_subtree(tree: &mut Tree, id: NodeId) -> NodeId {
    let node = tree.get(id).clone();
    let children = node.children.clone();
    let mut fresh = Node {
        children: Vec::new(),
        ..node
    };
    fresh.parent = None;
    let new_id = tree.insert(fresh);
    for child in children {
        let new_child = clone_subtree(tree, child);
        tree.get_mut(new_id).children.push(new_child);
    }
    new_id
}

/// Runs on every node's sibling set, depth-first. `depth` tracks position for `force_branch`
/// exemption.
pub fn insert_variables(tree: &mut Tree, cfg: &Config) {
    insert_from(tree, tree.root, 0, cfg);
    tree.update_parents();
}

fn insert_from(tree: &mut Tree, id: NodeId, depth: usize, cfg: &Config) {
    let children = tree.get(id).children.clone();
    for &child in &children {
        insert_from(tree, child, depth + 1, cfg);
    }

    if cfg.force_branch.contains(&depth) || children.len() < 2 {
        return;
    }

    let any_delimiter = children.iter().any(|&c| {
        tree.get(c)
            .element
            .as_fixed()
            .map(|e| e.len() == 1 && cfg.delimiters.contains(&e[0]))
            .unwrap_or(false)
    });
    if any_delimiter {
        return;
    }

    let mut all_similar = true;
    for i in 0..children.len() {
        for j in (i + 1)..children.len() {
            let sim = path_similarity(tree, children[i], children[j], &cfg.delimiters);
            if sim < cfg.merge_similarity {
                all_similar = false;
                break;
            }
        }
        if !all_similar {
            break;
        }
    }
    if !all_similar {
        return;
    }

    let survivor = children[0];
    for &other in &children[1..] {
        merge_subtree_counts(tree, survivor, other);
    }
    {
        let node = tree.get_mut(survivor);
        node.element = Element::Variable;
        node.is_variable = true;
        node.is_list = false;
    }

    tree.get_mut(id).children = vec![survivor];
}
