//! Tree Builder (§4.2): recursive descent over token depth, deciding per depth between a fixed
//! child, branched fixed children, or a variable child using six statistical thresholds.

use crate::config::Config;
use crate::datatype::{self, DataType};
use crate::line::LogLine;
use crate::node::{Node, NodeId, Tree};
use std::collections::{BTreeMap, BTreeSet};

struct Thresholds<'c> {
    cfg: &'c Config,
}

/// Builds the tree rooted at `tree.root` from every line in `lines`, consuming the full line set.
pub fn build_tree(tree: &mut Tree, lines: &[LogLine], cfg: &Config) {
    let thresholds = Thresholds { cfg };
    let all_ids: Vec<u64> = lines.iter().map(|l| l.id).collect();
    let by_id: BTreeMap<u64, &LogLine> = lines.iter().map(|l| (l.id, l)).collect();
    build_recursive(tree, tree.root, 0, all_ids, &by_id, &thresholds, cfg.theta1);
}

fn word_count(counter: &BTreeMap<Vec<u8>, u64>) -> u64 {
    counter.values().sum()
}

fn build_recursive(
    tree: &mut Tree,
    node_id: NodeId,
    depth: usize,
    line_ids: Vec<u64>,
    by_id: &BTreeMap<u64, &LogLine>,
    thresholds: &Thresholds,
    theta1: f64,
) {
    if line_ids.is_empty() {
        return;
    }

    // Partition into lines that end exactly here and lines that continue.
    let mut ending = Vec::new();
    let mut continuing = Vec::new();
    for &id in &line_ids {
        let line = by_id[&id];
        if line.words.len() <= depth {
            ending.push(id);
        } else {
            continuing.push(id);
        }
    }

    {
        let node = tree.get_mut(node_id);
        node.ending_lines += ending.len() as u64;
        node.ending_line_ids.extend(ending.iter().copied());
    }

    if continuing.is_empty() {
        // No children will be added below; `end` stays false per the invariant that a leaf is
        // never `end` even if lines terminated here.
        return;
    }

    let total = continuing.len() as u64;
    let mut counter: BTreeMap<Vec<u8>, u64> = BTreeMap::new();
    for &id in &continuing {
        let word = by_id[&id].word_at(depth).unwrap().to_vec();
        *counter.entry(word).or_insert(0) += 1;
    }

    let cfg = thresholds.cfg;
    let force_branch = cfg.force_branch.contains(&depth);
    let force_var = cfg.force_var.contains(&depth);

    let pass: BTreeMap<Vec<u8>, u64> = counter
        .iter()
        .filter(|(_, &count)| (count as f64) / (total as f64) >= cfg.theta1 || force_branch)
        .map(|(w, c)| (w.clone(), *c))
        .collect();
    let sum_pass: u64 = word_count(&pass);
    let sum_fail = total - sum_pass;

    let delimiter_flag = counter
        .keys()
        .next()
        .map(|w| w.len() == 1 && cfg.delimiters.contains(&w[0]))
        .unwrap_or(false);

    let mut candidate_type = DataType::full_set();
    for word in counter.keys() {
        datatype::narrow(&mut candidate_type, word);
    }
    let special = !force_branch
        && candidate_type
            .iter()
            .any(|dt| !matches!(dt, DataType::String));

    enum Decision {
        Variable,
        FixedSingle { tail_as_var: bool },
        FixedBranch { tail_as_var: bool },
    }

    let decision = if !delimiter_flag && (pass.is_empty() || special || force_var) {
        Decision::Variable
    } else if pass.len() == 1 {
        let (_, count) = pass.iter().next().unwrap();
        let ratio = (*count as f64) / (total as f64);
        if ratio >= cfg.theta2 || delimiter_flag {
            Decision::FixedSingle {
                tail_as_var: sum_fail > 0 && (sum_fail as f64) / (total as f64) >= cfg.theta6,
            }
        } else {
            Decision::Variable
        }
    } else {
        let ratio = (sum_pass as f64) / (total as f64);
        if ratio > cfg.theta3 || delimiter_flag {
            Decision::FixedBranch {
                tail_as_var: sum_fail > 0 && (sum_fail as f64) / (total as f64) >= cfg.theta6,
            }
        } else {
            Decision::Variable
        }
    };

    let next_theta1 = |child_occurrence: u64, parent_occurrence: u64| -> f64 {
        let ratio = 1.0 - (child_occurrence as f64) / (parent_occurrence.max(1) as f64);
        (theta1 * (1.0 + ratio * cfg.damping)).min(0.49)
    };

    match decision {
        Decision::Variable => {
            let mut var_node = Node::variable();
            for word in counter.keys() {
                datatype::narrow(&mut var_node.datatype, word);
            }
            var_node.theta1 = theta1;
            var_node.occurrence = total;
            let child_id = tree.add_child(node_id, var_node);
            route_and_recurse(
                tree,
                child_id,
                depth,
                continuing,
                by_id,
                thresholds,
                next_theta1(total, tree.get(node_id).occurrence.max(total)),
            );
        }
        Decision::FixedSingle { tail_as_var } => {
            let (word, _) = pass.into_iter().next().unwrap();
            emit_fixed_group(
                tree,
                node_id,
                depth,
                word,
                &continuing,
                by_id,
                thresholds,
                theta1,
                &next_theta1,
            );
            if tail_as_var {
                emit_tail_variable(tree, node_id, depth, &continuing, by_id, &counter, thresholds, theta1);
            }
        }
        Decision::FixedBranch { tail_as_var } => {
            for word in pass.keys() {
                emit_fixed_group(
                    tree,
                    node_id,
                    depth,
                    word.clone(),
                    &continuing,
                    by_id,
                    thresholds,
                    theta1,
                    &next_theta1,
                );
            }
            if tail_as_var {
                emit_tail_variable(tree, node_id, depth, &continuing, by_id, &counter, thresholds, theta1);
            }
        }
    }

    // `node_id`'s children are fully populated now; this is the first point at which `end` can
    // be determined correctly.
    let node = tree.get_mut(node_id);
    if node.ending_lines > 0 && !node.children.is_empty() {
        node.end = true;
    }
}

fn emit_fixed_group(
    tree: &mut Tree,
    node_id: NodeId,
    depth: usize,
    word: Vec<u8>,
    continuing: &[u64],
    by_id: &BTreeMap<u64, &LogLine>,
    thresholds: &Thresholds,
    theta1: f64,
    next_theta1: &impl Fn(u64, u64) -> f64,
) {
    let matching: Vec<u64> = continuing
        .iter()
        .copied()
        .filter(|id| by_id[id].word_at(depth) == Some(word.as_slice()))
        .collect();
    let occurrence = matching.len() as u64;

    let cfg = thresholds.cfg;
    let force_branch = cfg.force_branch.contains(&depth);
    let parent_occurrence = tree.get(node_id).occurrence;
    if !force_branch && parent_occurrence > 0 && (occurrence as f64) / (parent_occurrence as f64) < cfg.theta5 {
        return;
    }

    let mut fixed_node = Node::fixed(word);
    fixed_node.theta1 = theta1;
    fixed_node.occurrence = occurrence;
    let child_id = tree.add_child(node_id, fixed_node);

    build_recursive(
        tree,
        child_id,
        depth + 1,
        matching,
        by_id,
        thresholds,
        next_theta1(occurrence, parent_occurrence),
    );
}

fn emit_tail_variable(
    tree: &mut Tree,
    node_id: NodeId,
    depth: usize,
    continuing: &[u64],
    by_id: &BTreeMap<u64, &LogLine>,
    counter: &BTreeMap<Vec<u8>, u64>,
    thresholds: &Thresholds,
    theta1: f64,
) {
    let cfg = thresholds.cfg;
    // Words that did not qualify for the `pass` set form the tail.
    let tail_words: BTreeSet<&Vec<u8>> = counter
        .iter()
        .filter(|(_, &count)| (count as f64) / (continuing.len() as f64) < cfg.theta1)
        .map(|(w, _)| w)
        .collect();
    if tail_words.iter().any(|w| w.len() == 1 && cfg.delimiters.contains(&w[0])) {
        return;
    }

    let matching: Vec<u64> = continuing
        .iter()
        .copied()
        .filter(|id| {
            by_id[id]
                .word_at(depth)
                .map(|w| tail_words.contains(&w.to_vec()))
                .unwrap_or(false)
        })
        .collect();
    if matching.is_empty() {
        return;
    }

    let mut var_node = Node::variable();
    for id in &matching {
        let word = by_id[id].word_at(depth).unwrap();
        datatype::narrow(&mut var_node.datatype, word);
    }
    var_node.theta1 = theta1;
    var_node.occurrence = matching.len() as u64;
    let child_id = tree.add_child(node_id, var_node);

    build_recursive(tree, child_id, depth + 1, matching, by_id, thresholds, theta1);
}

fn route_and_recurse(
    tree: &mut Tree,
    child_id: NodeId,
    depth: usize,
    continuing: Vec<u64>,
    by_id: &BTreeMap<u64, &LogLine>,
    thresholds: &Thresholds,
    theta1: f64,
) {
    build_recursive(tree, child_id, depth + 1, continuing, by_id, thresholds, theta1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::tokenize_lines;

    fn build_from(raw: &str, cfg: &Config) -> Tree {
        let (lines, _) = tokenize_lines(raw, cfg.time_stamp_length, &cfg.delimiters);
        let mut tree = Tree::new(lines.len() as u64);
        build_tree(&mut tree, &lines, cfg);
        tree
    }

    #[test]
    fn repeated_identical_line_collapses_to_single_fixed_child() {
        let cfg = Config::default();
        let raw = "word\n".repeat(100);
        let tree = build_from(&raw, &cfg);
        let root_children = &tree.get(tree.root).children;
        assert_eq!(root_children.len(), 1);
        let child = tree.get(root_children[0]);
        assert_eq!(child.element.as_fixed(), Some(b"word".as_slice()));
        assert_eq!(child.occurrence, 100);
    }

    #[test]
    fn node_with_both_ending_and_continuing_lines_is_marked_end() {
        let cfg = Config::default();
        let raw = format!("{}{}", "a\n".repeat(50), "a b\n".repeat(50));
        let tree = build_from(&raw, &cfg);
        let root_children = &tree.get(tree.root).children;
        assert_eq!(root_children.len(), 1);
        let a_node = tree.get(root_children[0]);
        assert_eq!(a_node.element.as_fixed(), Some(b"a".as_slice()));
        assert!(a_node.end);
        assert!(!a_node.children.is_empty());
    }

    #[test]
    fn varying_integers_collapse_to_a_variable() {
        let cfg = Config::default();
        let raw: String = (0..100).map(|n| format!("{}\n", n)).collect();
        let tree = build_from(&raw, &cfg);
        let root_children = &tree.get(tree.root).children;
        assert_eq!(root_children.len(), 1);
        let child = tree.get(root_children[0]);
        assert!(child.is_variable);
        assert!(child.datatype.contains(&DataType::Integer));
    }
}
