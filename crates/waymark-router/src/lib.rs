//! Attribute route matching and dispatch.
//!
//! Compiles controller route declarations (prefixes, explicit templates,
//! default routes, method attributes) into an immutable [`RouteTable`], then
//! resolves `(method, path)` pairs against it:
//!
//! ```
//! use http::Method;
//! use waymark_router::{ActionMetadata, ControllerMetadata, Outcome, RouteDeclaration, RouteTable};
//!
//! let table = RouteTable::build(&[ControllerMetadata::new("values")
//!     .with_prefix("api/values")
//!     .with_action(
//!         ActionMetadata::new("get")
//!             .with_route(RouteDeclaration::new("{id:int}").with_methods(["GET"])),
//!     )])
//! .unwrap();
//!
//! match table.resolve(&Method::GET, "api/values/42") {
//!     Outcome::Selected(m) => assert_eq!(m.values.get("id"), Some("42")),
//!     other => panic!("unexpected {:?}", other),
//! }
//! assert!(matches!(table.resolve(&Method::DELETE, "api/values/42"), Outcome::MethodNotAllowed { .. }));
//! assert!(matches!(table.resolve(&Method::GET, "api/values/x"), Outcome::NotFound));
//! ```

pub mod compose;
pub mod constraint;
pub mod dispatch;
pub mod error;
pub mod matcher;
pub mod table;
pub mod template;
mod url;

pub use compose::compose;
pub use constraint::Constraint;
pub use dispatch::{dispatch, Outcome};
pub use error::{BuildError, TemplateError, TemplateErrorKind, UrlError};
pub use matcher::{split_path, MatchResult, RouteValues};
pub use table::{
    ActionId, ActionMetadata, ControllerMetadata, MethodSet, RouteDeclaration, RouteDefinition,
    RouteOrigin, RouteTable, Specificity,
};
pub use template::{Segment, Template};
