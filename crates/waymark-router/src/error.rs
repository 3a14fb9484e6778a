use thiserror::Error;

/// A route template that violates the template grammar.
///
/// Raised while the route table is built. A table is never produced from a
/// configuration that contains one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed route template '{template}': {kind}")]
pub struct TemplateError {
    /// The template text as it was handed to the parser.
    pub template: String,
    /// What is wrong with it.
    pub kind: TemplateErrorKind,
}

impl TemplateError {
    pub(crate) fn new(template: &str, kind: TemplateErrorKind) -> Self {
        Self {
            template: template.to_string(),
            kind,
        }
    }
}

/// The individual grammar violations (E2001–E2012).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateErrorKind {
    /// E2001: A wildcard is followed by another segment.
    #[error("E2001: wildcard '{0}' must be the last segment")]
    WildcardNotLast(String),

    /// E2002: More than one wildcard in a single template.
    #[error("E2002: a template may contain at most one wildcard")]
    MultipleWildcards,

    /// E2003: A required segment follows an optional one.
    #[error("E2003: required segment '{0}' follows an optional parameter")]
    RequiredAfterOptional(String),

    /// E2004: Constraint name is not in the catalogue.
    #[error("E2004: unknown constraint '{0}'")]
    UnknownConstraint(String),

    /// E2005: Constraint arguments are missing or unparsable.
    #[error("E2005: invalid constraint arguments: {0}")]
    InvalidConstraintArgument(String),

    /// E2006: `{}` or `{:int}`.
    #[error("E2006: parameter name must not be empty")]
    EmptyParameterName,

    /// E2007: The same parameter name appears twice (case-insensitive).
    #[error("E2007: duplicate parameter '{0}'")]
    DuplicateParameter(String),

    /// E2008: Unbalanced braces or text mixed with a parameter in one segment.
    #[error("E2008: malformed segment '{0}'")]
    MalformedSegment(String),

    /// E2009: `a//b`.
    #[error("E2009: empty segment")]
    EmptySegment,

    /// E2010: `{page:int=first}`.
    #[error("E2010: default value '{default}' of '{name}' does not satisfy its constraint")]
    DefaultViolatesConstraint { name: String, default: String },

    /// E2011: `{page?=1}`.
    #[error("E2011: parameter '{0}' cannot be both optional and defaulted")]
    OptionalWithDefault(String),

    /// E2012: `{*rest=x}` or `{*rest?}`.
    #[error("E2012: wildcard '{0}' cannot be optional or defaulted")]
    WildcardModifier(String),
}

/// Errors produced while building a route table (E2100–E2104).
#[derive(Debug, Error)]
pub enum BuildError {
    /// E2100: A declared template failed to parse.
    #[error("E2100: {controller}.{action}: {source}")]
    Template {
        controller: String,
        action: String,
        #[source]
        source: TemplateError,
    },

    /// E2101: Two declarations use the same route name.
    #[error("E2101: route name '{name}' declared by both {first} and {second}")]
    DuplicateRouteName {
        name: String,
        first: String,
        second: String,
    },

    /// E2102: A method attribute is not a valid HTTP method token.
    #[error("E2102: {location}: invalid HTTP method '{method}'")]
    InvalidMethod { location: String, method: String },

    /// E2103: A controller prefix that cannot have templates appended to it.
    #[error("E2103: controller '{controller}': invalid route prefix: {reason}")]
    InvalidPrefix { controller: String, reason: String },

    /// E2104: Two actions with the same name in one controller.
    #[error("E2104: controller '{controller}' declares action '{action}' more than once")]
    DuplicateAction { controller: String, action: String },
}

/// Errors produced by URL generation (E2201–E2203).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    /// E2201: No route carries the requested name.
    #[error("E2201: no route named '{0}'")]
    UnknownRoute(String),

    /// E2202: A value needed to render the template was not supplied.
    #[error("E2202: route '{route}' requires a value for '{name}'")]
    MissingValue { route: String, name: String },

    /// E2203: A supplied value fails the parameter's constraint.
    #[error("E2203: route '{route}': value '{value}' for '{name}' does not satisfy its constraint")]
    ConstraintViolation {
        route: String,
        name: String,
        value: String,
    },
}
