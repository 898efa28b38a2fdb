//! # sctp
//!
//! Command-line front end for a semantic-graph store.
//!
//! - `cli` → argument parsing and one command function per store operation
//! - `config` → flag/environment/file layering into a `ClientConfig`

pub mod cli;
pub mod config;
