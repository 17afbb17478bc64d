//! The thin collaborator layer (§1): reading the input log and writing emitted artifacts to
//! disk. Replaceable; the engine never touches the filesystem directly.

use crate::config::Config;
use crate::emit::Artifacts;
use crate::error::PgError;
use std::fs;

pub fn read_input(cfg: &Config) -> Result<String, PgError> {
    fs::read_to_string(&cfg.input_file).map_err(PgError::from)
}

pub fn write_artifacts(cfg: &Config, artifacts: &Artifacts) -> Result<(), PgError> {
    fs::write(&cfg.tree_file, &artifacts.tree_dump)?;
    fs::write(&cfg.parser_file, &artifacts.grammar_program)?;
    fs::write(&cfg.templates_file, artifacts.templates.join("\n"))?;
    if cfg.visualize {
        fs::write(&cfg.visualization_file, &artifacts.tree_dump)?;
    }
    Ok(())
}
