//! The ordered refinement passes (§4.4) that turn a raw built tree into the final structure
//! handed to the emitter.

mod aggregate_sequences;
mod branch_merge;
mod insert_lists;
mod insert_variables;
mod match_lists;
mod sort_children;
mod subtree_discovery;

use crate::config::Config;
use crate::node::{NodeId, Tree};

/// Runs `sort_children -> insert_variables -> [branch_merge] -> insert_lists -> match_lists ->
/// [subtree_discovery] -> sort_children -> aggregate_sequences`, logging progress through each
/// stage.
pub fn run(tree: &mut Tree, cfg: &Config) -> Vec<Vec<NodeId>> {
    log::info!("sort branches");
    sort_children::sort_children(tree);

    log::info!("refine tree by aggregating similar paths");
    insert_variables::insert_variables(tree, cfg);

    if let Some(min_similarity) = cfg.merge_subtrees_min_similarity {
        log::info!("merge subtrees");
        branch_merge::branch_merge(tree, min_similarity);
    }

    log::info!("replace equal branches with lists");
    insert_lists::insert_lists(tree);

    log::info!("match list elements");
    match_lists::match_lists(tree, cfg.element_list_similarity);

    log::info!("getting the list of subtrees");
    let subtree_groups = subtree_discovery::discover_subtrees(tree, cfg.subtree_min_height);

    log::info!("sort branches");
    sort_children::sort_children(tree);

    log::info!("aggregate fixed word elements");
    aggregate_sequences::aggregate_sequences(tree, &subtree_groups);

    subtree_groups
}
