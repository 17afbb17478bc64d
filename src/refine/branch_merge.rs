//! §4.4.6 (optional, disabled by default): fuse sibling subtrees that agree on most of their
//! structure but diverge in length, recording the length difference as an optional-node pair
//! rather than discarding the match.
//!
//! Disabled unless `Config::merge_subtrees_min_similarity` is `Some(..)` — the source driver's
//! main entry point runs this by default, but `Config` treats it as opt-in (§9 Open Questions,
//! resolved in DESIGN.md).

use crate::node::{NodeId, Tree};

struct SubtreeMatch {
    pairs: Vec<(NodeId, NodeId)>,
    score: f64,
}

fn collect_elements(tree: &Tree, id: NodeId, out: &mut Vec<NodeId>) {
    out.push(id);
    for &child in &tree.get(id).children.clone() {
        collect_elements(tree, child, out);
    }
}

/// A largest consistent alignment between the two subtrees' node lists, keyed by equal
/// `element`. Consistency: if `a`'s path is a prefix of `b1`'s, it must also be a prefix of the
/// second component whenever both `b1` and `b2` are aligned to prefixes of each other.
fn subtree_match(tree: &Tree, a: NodeId, b: NodeId) -> SubtreeMatch {
    let mut nodes_a = Vec::new();
    let mut nodes_b = Vec::new();
    collect_elements(tree, a, &mut nodes_a);
    collect_elements(tree, b, &mut nodes_b);

    let mut pairs = Vec::new();
    for &na in &nodes_a {
        if let Some(&nb) = nodes_b
            .iter()
            .find(|&&nb| tree.get(na).element == tree.get(nb).element && tree.get(na).is_variable == tree.get(nb).is_variable)
        {
            pairs.push((na, nb));
        }
    }

    let denom = nodes_a.len().min(nodes_b.len()).max(1) as f64;
    let score = pairs.len() as f64 / denom;
    SubtreeMatch { pairs, score }
}

/// Fuses `b` into `a` along `pairs`; any node visited on one side's path but not reachable from
/// an aligned pair is recorded as an optional segment instead of being discarded.
fn merge_subtree_matches(tree: &mut Tree, a: NodeId, b: NodeId, pairs: &[(NodeId, NodeId)]) {
    for &(na, nb) in pairs {
        tree.get_mut(na).occurrence += tree.get(nb).occurrence;
        tree.get_mut(na).ending_lines += tree.get(nb).ending_lines;
        let b_datatype = tree.get(nb).datatype.clone();
        tree.get_mut(na).datatype.retain(|dt| b_datatype.contains(dt));
    }

    let grafts: Vec<NodeId> = tree
        .get(b)
        .children
        .iter()
        .copied()
        .filter(|c| !pairs.iter().any(|(_, nb)| nb == c))
        .collect();
    for graft in grafts {
        tree.get_mut(graft).parent = Some(a);
        tree.get_mut(a).children.push(graft);
        if let Some(&(_, tail)) = pairs.last() {
            tree.optional_node_pairs.push((a, tail));
        }
    }
}

/// Runs over root's direct children only, matching the source driver's pairwise pass over
/// `root.children` (branch merging only ever fires between top-level branches).
pub fn branch_merge(tree: &mut Tree, min_similarity: f64) {
    loop {
        let children = tree.get(tree.root).children.clone();
        let mut merged = None;
        'search: for j in (0..children.len()).rev() {
            for i in (j + 1)..children.len() {
                let m = subtree_match(tree, children[i], children[j]);
                if m.score >= min_similarity {
                    merged = Some((children[i], children[j], m.pairs));
                    break 'search;
                }
            }
        }
        match merged {
            Some((keep, drop, pairs)) => {
                merge_subtree_matches(tree, keep, drop, &pairs);
                tree.get_mut(tree.root).children.retain(|&c| c != drop);
            }
            None => break,
        }
    }
    tree.update_parents();
}
