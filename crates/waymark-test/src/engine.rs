//! TestEngine: resolve requests against fixture manifests.

use std::path::{Path, PathBuf};

use http::Method;
use thiserror::Error;

use waymark_lib::router::RouteValues;
use waymark_lib::{Engine, EngineError, Resolution};

/// Errors from TestEngine operations.
#[derive(Debug, Error)]
pub enum TestError {
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("invalid HTTP method: {0}")]
    InvalidMethod(String),

    #[error("{method} {path}: expected {expected}, got {actual}")]
    Unexpected {
        method: String,
        path: String,
        expected: String,
        actual: String,
    },
}

/// Directory holding the shared manifest fixtures.
pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../tests/fixtures")
}

/// Request-level test harness.
///
/// Wraps an [`Engine`] and offers `expect_*` helpers that turn an unexpected
/// resolution into a descriptive [`TestError`].
pub struct TestEngine {
    engine: Engine,
}

impl TestEngine {
    /// Load a manifest from `tests/fixtures/<name>`.
    pub fn from_fixture(name: &str) -> Result<Self, TestError> {
        Self::from_manifest(&fixtures_dir().join(name))
    }

    pub fn from_manifest(path: &Path) -> Result<Self, TestError> {
        Ok(Self {
            engine: Engine::from_manifest_file(path)?,
        })
    }

    /// Build from an inline YAML/JSON manifest.
    pub fn from_yaml(manifest: &str) -> Result<Self, TestError> {
        Ok(Self {
            engine: Engine::from_manifest_str(manifest)?,
        })
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Resolve a request given as method name and path.
    pub fn request(&self, method: &str, path: &str) -> Result<Resolution, TestError> {
        let method = Method::from_bytes(method.as_bytes())
            .map_err(|_| TestError::InvalidMethod(method.to_string()))?;
        Ok(self.engine.resolve(&method, path))
    }

    /// Expect `method path` to select `action` (written `controller.action`).
    ///
    /// Returns the bound route values.
    pub fn expect_selected(
        &self,
        method: &str,
        path: &str,
        action: &str,
    ) -> Result<RouteValues, TestError> {
        match self.request(method, path)? {
            Resolution::Selected {
                action: selected,
                values,
                ..
            } if selected.to_string() == action => Ok(values),
            other => Err(unexpected(method, path, action, &other)),
        }
    }

    pub fn expect_not_found(&self, method: &str, path: &str) -> Result<(), TestError> {
        match self.request(method, path)? {
            Resolution::NotFound => Ok(()),
            other => Err(unexpected(method, path, "404 Not Found", &other)),
        }
    }

    /// Expect a 405; returns the methods the path does accept.
    pub fn expect_method_not_allowed(
        &self,
        method: &str,
        path: &str,
    ) -> Result<Vec<Method>, TestError> {
        match self.request(method, path)? {
            Resolution::MethodNotAllowed { allowed } => Ok(allowed),
            other => Err(unexpected(method, path, "405 Method Not Allowed", &other)),
        }
    }
}

fn unexpected(method: &str, path: &str, expected: &str, actual: &Resolution) -> TestError {
    let actual = match actual {
        Resolution::Selected {
            action, template, ..
        } => format!("{} via '{}'", action, template),
        Resolution::MethodNotAllowed { allowed } => format!("405 (allowed: {:?})", allowed),
        Resolution::NotFound => "404 Not Found".to_string(),
    };
    TestError::Unexpected {
        method: method.to_string(),
        path: path.to_string(),
        expected: expected.to_string(),
        actual,
    }
}
