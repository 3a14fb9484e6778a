use thiserror::Error;
use waymark_manifest::ManifestError;
use waymark_router::BuildError;

/// Errors raised while loading or reloading routes.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Build(#[from] BuildError),
}
