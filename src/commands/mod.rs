//! Subcommand drivers
//!
//! Each driver walks its manifests one at a time, reports per-item
//! failures, keeps going, and fails the run at the end if anything failed.

pub mod autoupdate;
pub mod check_urls;
pub mod generate;
