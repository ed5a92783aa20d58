//! Transport layer (HTTP).
//!
//! Handlers translate verdicts into responses; all decision logic stays in
//! the engine.

pub mod http;
