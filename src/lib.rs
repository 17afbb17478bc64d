//! `pgen` induces a parser-combinator grammar from a corpus of unstructured log lines.
//!
//! # Overview
//! Hand-written log parsers, one per log format, are expensive to maintain. Given enough
//! example lines of a format, the structure of the format itself can be inferred: positions
//! that never vary become literals, positions drawn from a small enumerable set become word
//! lists, and positions that vary freely become typed values (integers, floats, IP addresses,
//! timestamps, hex or base64 blobs, or free strings). This crate builds that inference as a
//! batch, offline pipeline and emits the result as a parser-combinator program.
//!
//! # Design
//! The pipeline is tokenize ([line]) -> build ([builder]) -> refine ([refine]) -> emit
//! ([emit]), orchestrated by [engine::Engine]. The intermediate representation is a tree of
//! [node::Node], stored in a [node::Tree] arena and addressed by stable [node::NodeId] rather
//! than by direct reference, so that back-edges (`parent`, optional-node pairs, subtree groups)
//! stay valid while refinement passes grow or prune the arena.
//!
//! # Example
//! ```no_run
//! use pgen::config::Config;
//! use pgen::engine::Engine;
//!
//! let cfg = Config::default();
//! let engine = Engine::new(&cfg).unwrap();
//! let raw = pgen::io::read_input(&cfg).unwrap();
//! let artifacts = engine.run(&raw).unwrap();
//! pgen::io::write_artifacts(&cfg, &artifacts).unwrap();
//! ```
//!
//! # License
//! [pgen](crate) is provided under the MIT license. See [LICENSE](https://github.com/creative-forest/pgen/blob/main/LICENSE).

pub mod builder;
pub mod config;
pub mod datatype;
pub mod emit;
pub mod engine;
pub mod error;
pub mod io;
pub mod line;
pub mod node;
pub mod refine;
pub mod viz;
