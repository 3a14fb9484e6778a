//! Waymark routing engine.
//!
//! Loads controller route declarations (from a manifest or built in code),
//! compiles them into a route table and resolves requests against it. The
//! live table can be replaced at runtime without blocking readers.

pub mod engine;
pub mod error;

pub use engine::{Engine, Resolution};
pub use error::EngineError;

pub use waymark_manifest as manifest;
pub use waymark_router as router;
