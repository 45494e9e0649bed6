//! Filesystem utilities for mlrelease.
//!
//! Atomic writes plus the YAML load/save pair shared by the version store and
//! the component rewriter.

mod atomic;
mod yaml;

pub use atomic::atomic_write_file;
pub use yaml::{YamlLoad, load_yaml, save_yaml};
