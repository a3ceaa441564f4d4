//! Library half of the `make-hgrid` binary: argument parsing, YAML
//! configuration loading and run summaries.

pub mod cli;
pub mod config_loader;
pub mod summary;
