use thiserror::Error;

/// Errors produced while loading a route manifest (E3001–E3002).
#[derive(Debug, Error)]
pub enum ManifestError {
    /// E3001: YAML/JSON syntax error, unknown key or duplicate key.
    #[error("E3001: parse error: {0}")]
    Parse(String),

    /// E3002: Well-formed document with invalid content.
    #[error("E3002: schema error: {0}")]
    Schema(String),

    /// I/O error reading the manifest file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
