//! Method filtering and final route selection.
//!
//! A path that matches no template is always `NotFound`. A path that matches
//! at least one template, none of which accepts the method, is always
//! `MethodNotAllowed`. Otherwise the most specific accepting route wins.

use http::{Method, StatusCode};

use crate::matcher::MatchResult;
use crate::table::{MethodSet, RouteTable};

/// The decision for one request.
#[derive(Debug, Clone)]
pub enum Outcome<'a> {
    /// A route accepts the path and method.
    Selected(MatchResult<'a>),
    /// The path matched, the method did not.
    MethodNotAllowed {
        /// Methods accepted on this path, sorted, for an `Allow` header.
        allowed: Vec<Method>,
    },
    /// No template matches the path.
    NotFound,
}

impl Outcome<'_> {
    /// The HTTP status a caller should answer with.
    pub fn status(&self) -> StatusCode {
        match self {
            Outcome::Selected(_) => StatusCode::OK,
            Outcome::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Outcome::NotFound => StatusCode::NOT_FOUND,
        }
    }

    pub fn is_selected(&self) -> bool {
        matches!(self, Outcome::Selected(_))
    }
}

/// Pick a route from path matches (already in specificity order).
pub fn dispatch<'a>(matches: Vec<MatchResult<'a>>, method: &Method) -> Outcome<'a> {
    if matches.is_empty() {
        return Outcome::NotFound;
    }

    let mut allowed = MethodSet::default();
    for candidate in matches {
        if candidate.route.allowed_methods.allows(method) {
            return Outcome::Selected(candidate);
        }
        allowed.extend(&candidate.route.allowed_methods);
    }

    Outcome::MethodNotAllowed {
        allowed: allowed.iter().cloned().collect(),
    }
}

impl RouteTable {
    /// Match `path` and dispatch on `method` in one step.
    pub fn resolve(&self, method: &Method, path: &str) -> Outcome<'_> {
        let outcome = dispatch(self.match_path(path), method);

        match &outcome {
            Outcome::Selected(m) => tracing::trace!(
                method = %method,
                path = %path,
                action = %m.route.action,
                template = %m.route.template,
                "route selected"
            ),
            Outcome::MethodNotAllowed { allowed } => tracing::trace!(
                method = %method,
                path = %path,
                allowed = ?allowed,
                "method not allowed"
            ),
            Outcome::NotFound => tracing::trace!(method = %method, path = %path, "no route"),
        }

        outcome
    }
}
