//! Test harness for the Waymark routing engine.
//!
//! Provides `TestEngine` for resolving requests against fixture manifests
//! and checking outcomes.

pub mod engine;
#[cfg(test)]
pub mod scenarios;

pub use engine::{TestEngine, TestError};
