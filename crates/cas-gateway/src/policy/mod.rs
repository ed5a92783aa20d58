//! Live authorization policy.
//!
//! - `source`: locate and parse the policy file (`cas-app-config.yaml`).
//! - `store`: the published snapshot every decision reads.
//! - `watch`: background reload when the file changes.

pub mod source;
pub mod store;
pub mod watch;

pub use source::{PolicySource, SourceSnapshot};
pub use store::{PolicyStore, PolicyView};
pub use watch::{watch, WatchHandle};
