//! The routing engine: a live route table behind an atomic pointer.

use std::path::Path;
use std::sync::Arc;

use arc_swap::ArcSwap;
use http::{Method, StatusCode};
use waymark_manifest::{parse_manifest, parse_manifest_file, Manifest};
use waymark_router::{ActionId, ControllerMetadata, Outcome, RouteTable, RouteValues, UrlError};
use waymark_telemetry::{
    log_method_not_allowed, log_reload_failed, log_route_not_found, log_route_selected,
    log_table_built, log_table_reloaded,
};

use crate::error::EngineError;

/// The result of resolving one request, detached from the route table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Selected {
        action: ActionId,
        /// Effective template of the winning route.
        template: String,
        values: RouteValues,
    },
    MethodNotAllowed {
        /// Sorted; suitable for an `Allow` header.
        allowed: Vec<Method>,
    },
    NotFound,
}

impl Resolution {
    pub fn status(&self) -> StatusCode {
        match self {
            Resolution::Selected { .. } => StatusCode::OK,
            Resolution::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Resolution::NotFound => StatusCode::NOT_FOUND,
        }
    }

    /// Value for an `Allow` response header, on `MethodNotAllowed` only.
    pub fn allow_header(&self) -> Option<String> {
        match self {
            Resolution::MethodNotAllowed { allowed } => Some(
                allowed
                    .iter()
                    .map(Method::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            _ => None,
        }
    }

    pub fn action(&self) -> Option<&ActionId> {
        match self {
            Resolution::Selected { action, .. } => Some(action),
            _ => None,
        }
    }
}

impl From<Outcome<'_>> for Resolution {
    fn from(outcome: Outcome<'_>) -> Self {
        match outcome {
            Outcome::Selected(m) => Resolution::Selected {
                action: m.route.action.clone(),
                template: m.route.template.raw().to_string(),
                values: m.values,
            },
            Outcome::MethodNotAllowed { allowed } => Resolution::MethodNotAllowed { allowed },
            Outcome::NotFound => Resolution::NotFound,
        }
    }
}

/// Resolves requests against the current route table.
///
/// Each call to [`Engine::resolve`] works on one snapshot of the table, so a
/// concurrent [`Engine::reload`] never produces a mixed answer.
pub struct Engine {
    table: ArcSwap<RouteTable>,
}

impl Engine {
    pub fn new(table: RouteTable) -> Self {
        log_table_built!(routes = table.len(), "route table built");
        Self {
            table: ArcSwap::from_pointee(table),
        }
    }

    pub fn from_controllers(controllers: &[ControllerMetadata]) -> Result<Self, EngineError> {
        Ok(Self::new(RouteTable::build(controllers)?))
    }

    /// Build from a YAML/JSON manifest string.
    pub fn from_manifest_str(input: &str) -> Result<Self, EngineError> {
        Self::from_manifest(&parse_manifest(input)?)
    }

    pub fn from_manifest_file(path: &Path) -> Result<Self, EngineError> {
        Self::from_manifest(&parse_manifest_file(path)?)
    }

    pub fn from_manifest(manifest: &Manifest) -> Result<Self, EngineError> {
        Self::from_controllers(&manifest.controllers())
    }

    /// Snapshot of the live table.
    pub fn table(&self) -> Arc<RouteTable> {
        self.table.load_full()
    }

    pub fn resolve(&self, method: &Method, path: &str) -> Resolution {
        let table = self.table.load();
        let resolution = Resolution::from(table.resolve(method, path));

        match &resolution {
            Resolution::Selected {
                action, template, ..
            } => log_route_selected!(
                method = %method,
                path = %path,
                action = %action,
                template = %template,
                "route selected"
            ),
            Resolution::MethodNotAllowed { allowed } => log_method_not_allowed!(
                method = %method,
                path = %path,
                allowed = ?allowed,
                "method not allowed"
            ),
            Resolution::NotFound => {
                log_route_not_found!(method = %method, path = %path, "no route matches path")
            }
        }

        resolution
    }

    /// Render the URL of a named route in the live table.
    pub fn url_for(&self, name: &str, values: &[(&str, &str)]) -> Result<String, UrlError> {
        self.table.load().url_for(name, values)
    }

    /// Build a new table and swap it in.
    ///
    /// On error the current table stays live.
    pub fn reload(&self, controllers: &[ControllerMetadata]) -> Result<(), EngineError> {
        match RouteTable::build(controllers) {
            Ok(table) => {
                let routes = table.len();
                let previous = self.table.swap(Arc::new(table));
                log_table_reloaded!(
                    previous_routes = previous.len(),
                    routes,
                    "route table reloaded"
                );
                Ok(())
            }
            Err(e) => {
                log_reload_failed!(error = %e, "reload rejected; keeping current table");
                Err(e.into())
            }
        }
    }

    pub fn reload_manifest_file(&self, path: &Path) -> Result<(), EngineError> {
        let manifest = parse_manifest_file(path).map_err(|e| {
            log_reload_failed!(path = %path.display(), error = %e, "reload rejected; keeping current table");
            e
        })?;
        self.reload(&manifest.controllers())
    }
}
