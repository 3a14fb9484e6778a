//! Route manifest loader.
//!
//! Reads YAML/JSON manifests describing controllers, their prefixes, default
//! routes and actions, and converts them into the metadata
//! `waymark_router::RouteTable::build` expects.

pub mod error;
pub mod model;
pub mod parser;

pub use error::ManifestError;
pub use model::{ActionSpec, ControllerSpec, Manifest, RouteEntry, RouteSpec};
pub use parser::{parse_manifest, parse_manifest_file};
