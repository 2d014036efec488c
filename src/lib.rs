//! Maintenance tools for a plugin manifest catalog
//!
//! - [`version`]: Picks the newest upstream revision from a set of git refs
//! - [`remote`]: Lists the refs of a remote repository
//! - [`manifest`]: Loads, templates and saves plugin manifests
//! - [`check`]: HEAD-checks manifest URLs
//! - [`catalog`]: Generates the manifest index and the plugin table
//! - [`commands`]: Drivers behind the `plugin-catalog` subcommands

pub mod catalog;
pub mod check;
pub mod commands;
pub mod config;
pub mod logging;
pub mod manifest;
pub mod remote;
pub mod retry;
pub mod version;
