//! Version resolution layer
//!
//! Decides which upstream revision is the newest for a plugin.
//!
//! # Modules
//!
//! - [`key`]: Loose version grammar and the total order over tag names
//! - [`resolver`]: `commit` / `tag` resolution over a ref snapshot
//! - [`types`]: `RemoteRefs`, the ref snapshot handed to the resolver
//! - [`error`]: Error types for resolution and remote listing

pub mod error;
pub mod key;
pub mod resolver;
pub mod types;

pub use error::{FetchError, ResolveError};
pub use key::{Component, VersionKey, VersionTag};
pub use resolver::{UpdateMode, latest_tag, resolve_latest};
pub use types::RemoteRefs;
