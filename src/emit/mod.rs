//! The Emitter (§4.5): turns a refined [Tree](crate::node::Tree) into the artifacts a caller
//! writes to disk.

mod clusters;
mod grammar;
mod templates;
mod tree_dump;

use crate::node::{NodeId, Tree};
use std::collections::BTreeSet;

pub struct Artifacts {
    pub tree_dump: String,
    pub templates: Vec<String>,
    pub clusters: Vec<Vec<u64>>,
    pub grammar_program: String,
}

pub fn emit(
    tree: &Tree,
    subtree_groups: &[Vec<NodeId>],
    delimiters: &BTreeSet<u8>,
) -> Result<Artifacts, std::fmt::Error> {
    Ok(Artifacts {
        tree_dump: tree_dump::dump(tree),
        templates: templates::templates(tree),
        clusters: clusters::clusters(tree),
        grammar_program: grammar::write_grammar(tree, subtree_groups, delimiters)?,
    })
}
