//! Engine configuration, the one supported external input surface (§6).

use crate::error::ConfigError;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Flat record of every tunable the engine consults. Populate by hand or deserialize from TOML.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input_file: PathBuf,
    pub tree_file: PathBuf,
    pub parser_file: PathBuf,
    pub templates_file: PathBuf,

    /// Bytes peeled off the front of every line as a timestamp. `-1` disables the behavior.
    pub time_stamp_length: i64,

    pub theta1: f64,
    pub theta2: f64,
    pub theta3: f64,
    pub theta4: f64,
    pub theta5: f64,
    pub theta6: f64,
    pub damping: f64,

    pub merge_similarity: f64,
    /// `None` leaves the optional branch-merge pass (§4.4.6) disabled, matching the source driver.
    pub merge_subtrees_min_similarity: Option<f64>,
    pub subtree_min_height: u32,
    pub element_list_similarity: f64,

    pub delimiters: BTreeSet<u8>,
    pub force_branch: BTreeSet<usize>,
    pub force_var: BTreeSet<usize>,

    pub visualize: bool,
    pub visualization_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_file: PathBuf::from("input.log"),
            tree_file: PathBuf::from("tree.txt"),
            parser_file: PathBuf::from("parser.rs"),
            templates_file: PathBuf::from("logTemplates.txt"),
            time_stamp_length: -1,
            theta1: 0.3,
            theta2: 0.9,
            theta3: 0.3,
            theta4: 0.95,
            theta5: 0.1,
            theta6: 0.1,
            damping: 0.5,
            merge_similarity: 0.8,
            merge_subtrees_min_similarity: None,
            subtree_min_height: 2,
            element_list_similarity: 0.8,
            delimiters: [b' ', b':', b'=', b',', b'[', b']', b'(', b')'].into_iter().collect(),
            force_branch: BTreeSet::new(),
            force_var: BTreeSet::new(),
            visualize: false,
            visualization_file: PathBuf::from("tree.viz.txt"),
        }
    }
}

impl Config {
    /// Validate invariants that are cheap to check up front so the engine never has to handle a
    /// malformed threshold mid-run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("theta1", self.theta1),
            ("theta2", self.theta2),
            ("theta3", self.theta3),
            ("theta4", self.theta4),
            ("theta5", self.theta5),
            ("theta6", self.theta6),
            ("merge_similarity", self.merge_similarity),
            ("element_list_similarity", self.element_list_similarity),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::new(name, "must lie within [0, 1]"));
            }
        }
        if let Some(s) = self.merge_subtrees_min_similarity {
            if !(0.0..=1.0).contains(&s) {
                return Err(ConfigError::new(
                    "merge_subtrees_min_similarity",
                    "must lie within [0, 1]",
                ));
            }
        }
        if self.subtree_min_height == 0 {
            return Err(ConfigError::new(
                "subtree_min_height",
                "must be at least 1",
            ));
        }
        if self.delimiters.is_empty() && self.time_stamp_length > 0 {
            return Err(ConfigError::new(
                "delimiters",
                "an empty delimiter set combined with timestamp peeling leaves nothing to tokenize",
            ));
        }
        Ok(())
    }
}
