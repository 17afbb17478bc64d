//! Minimal illustrative binary, not a supported CLI surface (§6). Reads a `Config` from the TOML
//! path given as the first argument, runs the engine, and writes its artifacts to disk.

use pgen::config::Config;
use pgen::engine::Engine;

fn main() {
    pretty_env_logger::init();

    let path = std::env::args().nth(1).expect("usage: mine <config.toml>");
    let text = std::fs::read_to_string(&path).expect("failed to read config file");
    let cfg: Config = toml::from_str(&text).expect("failed to parse config file");

    let engine = Engine::new(&cfg).expect("invalid configuration");
    let raw = pgen::io::read_input(&cfg).expect("failed to read input file");
    let artifacts = engine.run(&raw).expect("mining failed");
    pgen::io::write_artifacts(&cfg, &artifacts).expect("failed to write artifacts");

    log::info!("parser done");
}
