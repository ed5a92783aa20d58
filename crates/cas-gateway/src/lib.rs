//! Content authorization gateway library entry.
//!
//! This crate wires configuration, the live policy store, the catalog
//! client, the authorization engine, and bearer verification into an axum
//! service. It is consumed by the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod obs;
pub mod ops;
pub mod policy;
pub mod router;
pub mod transport;
