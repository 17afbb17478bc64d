//! Ties the pipeline together (§2, §5): tokenize -> build -> refine -> emit. Single-threaded,
//! batch, synchronous; a fresh [Tree] is built per call.

use crate::builder;
use crate::config::Config;
use crate::emit::{self, Artifacts};
use crate::error::PgError;
use crate::line::{self, LogLine};
use crate::node::Tree;
use crate::viz;

pub struct Engine<'c> {
    cfg: &'c Config,
}

impl<'c> Engine<'c> {
    pub fn new(cfg: &'c Config) -> Result<Self, PgError> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    /// Runs the full pipeline over `raw` (the already-read contents of `Config::input_file`).
    pub fn run(&self, raw: &str) -> Result<Artifacts, PgError> {
        log::info!("import {:?}", self.cfg.input_file);
        let (lines, dropped) = line::tokenize_lines(raw, self.cfg.time_stamp_length, &self.cfg.delimiters);
        if dropped > 0 {
            log::warn!("{} empty lines were skipped during import", dropped);
        }
        log::info!("total amount of log lines read: {}", lines.len());

        let mut tree = self.build_tree(&lines);

        log::info!("nodes: {}", tree.count_nodes());
        log::info!("leaf occurrence sum: {}", tree.count_leaf_occurrences());

        let subtree_groups = crate::refine::run(&mut tree, self.cfg);

        #[cfg(debug_assertions)]
        if let Err(e) = tree.check_consistency() {
            return Err(e);
        }

        log::info!("write artifacts");
        let mut artifacts = emit::emit(&tree, &subtree_groups, &self.cfg.delimiters)
            .map_err(|e| PgError::Io(e.to_string()))?;

        if self.cfg.visualize {
            let rendered = viz::render(&tree).map_err(|e| PgError::Io(e.to_string()))?;
            artifacts.tree_dump = format!("{}\n\n{}", artifacts.tree_dump, rendered);
        }

        Ok(artifacts)
    }

    fn build_tree(&self, lines: &[LogLine]) -> Tree {
        log::info!("build tree");
        let mut tree = Tree::new(lines.len() as u64);
        builder::build_tree(&mut tree, lines, self.cfg);
        tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_to_end_repeated_word_yields_single_fixed_template() {
        let mut cfg = Config::default();
        cfg.delimiters = Default::default();
        let engine = Engine::new(&cfg).unwrap();
        let raw = "word\n".repeat(100);
        let artifacts = engine.run(&raw).unwrap();
        assert!(artifacts.grammar_program.contains("FixedDataModelElement"));
        assert!(artifacts.grammar_program.contains("b'word'"));
        assert_eq!(artifacts.templates, vec!["word".to_string()]);
    }

    #[test]
    fn end_to_end_integers_yield_integer_variable() {
        let mut cfg = Config::default();
        cfg.delimiters = Default::default();
        let engine = Engine::new(&cfg).unwrap();
        let raw: String = (0..100).map(|n| format!("{}\n", n)).collect();
        let artifacts = engine.run(&raw).unwrap();
        assert!(artifacts.grammar_program.contains("DecimalIntegerValueModelElement"));
    }
}
