//! Top-level facade crate for the content authorization server.
//!
//! Re-exports core types and the gateway library so users can depend on a single crate.

pub mod core {
    pub use cas_core::*;
}

pub mod gateway {
    pub use cas_gateway::*;
}
