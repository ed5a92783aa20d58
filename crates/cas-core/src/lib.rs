//! cas core: transport-agnostic media model, authorization policy, verdicts,
//! and the error surface shared by the gateway and its tests.
//!
//! Nothing here performs I/O. The gateway crate owns the network, the policy
//! file, and the HTTP surface; this crate only decides.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Malformed catalog payloads and bad configuration surface as `CasError`
//! instead of taking the serving task down.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod auth;
pub mod error;
pub mod media;
pub mod policy;
pub mod verdict;

pub use auth::Claims;
pub use error::{CasError, FetchError, Result};
pub use media::{AttributeValue, Encoding, MediaDescriptor};
pub use policy::Policy;
pub use verdict::{Denial, Verdict};
