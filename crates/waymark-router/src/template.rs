//! Route template parsing.
//!
//! A template is a `/`-separated list of segments. Each segment is either
//! literal text or a single parameter wrapped in braces:
//!
//! | Form                  | Segment                                    |
//! |-----------------------|--------------------------------------------|
//! | `users`               | literal                                    |
//! | `{id}`                | required parameter                         |
//! | `{id?}`               | optional parameter                         |
//! | `{id:int}`            | required, constrained                      |
//! | `{id:int?}`           | optional, constrained when present         |
//! | `{page=1}`            | optional, `1` bound when absent            |
//! | `{page:int=1}`        | defaulted, constrained when present        |
//! | `{*path}`             | wildcard, captures the rest of the path    |
//!
//! Optional and defaulted parameters must be trailing: only further optional
//! parameters or the wildcard may follow them.

use std::fmt;

use crate::constraint::{satisfies_all, Constraint};
use crate::error::{TemplateError, TemplateErrorKind};

/// One segment of a parsed template.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Fixed text, compared case-insensitively.
    Literal(String),
    /// `{name}`, `{name?}`, `{name:c}`, `{name:c?}`.
    Parameter {
        name: String,
        constraints: Vec<Constraint>,
        optional: bool,
    },
    /// `{name=default}` or `{name:c=default}`.
    ParameterWithDefault {
        name: String,
        constraints: Vec<Constraint>,
        default: String,
    },
    /// `{*name}` or `{*name:c}`. Always last.
    Wildcard {
        name: String,
        constraints: Vec<Constraint>,
    },
}

impl Segment {
    /// The parameter name, or `None` for literals.
    pub fn name(&self) -> Option<&str> {
        match self {
            Segment::Literal(_) => None,
            Segment::Parameter { name, .. }
            | Segment::ParameterWithDefault { name, .. }
            | Segment::Wildcard { name, .. } => Some(name),
        }
    }

    /// True for segments a path may leave out.
    pub fn is_optional(&self) -> bool {
        match self {
            Segment::Literal(_) => false,
            Segment::Parameter { optional, .. } => *optional,
            Segment::ParameterWithDefault { .. } | Segment::Wildcard { .. } => true,
        }
    }

    /// The constraint chain (empty for literals).
    pub fn constraints(&self) -> &[Constraint] {
        match self {
            Segment::Literal(_) => &[],
            Segment::Parameter { constraints, .. }
            | Segment::ParameterWithDefault { constraints, .. }
            | Segment::Wildcard { constraints, .. } => constraints,
        }
    }

    /// Precedence digit used when ranking templates; lower is more specific.
    pub(crate) fn precedence(&self) -> u8 {
        let constrained = !self.constraints().is_empty();
        match self {
            Segment::Literal(_) => 1,
            Segment::Parameter {
                optional: false, ..
            } => {
                if constrained {
                    2
                } else {
                    3
                }
            }
            Segment::Parameter { optional: true, .. } | Segment::ParameterWithDefault { .. } => {
                if constrained {
                    4
                } else {
                    5
                }
            }
            Segment::Wildcard { .. } => {
                if constrained {
                    6
                } else {
                    7
                }
            }
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let write_constraints = |f: &mut fmt::Formatter<'_>, constraints: &[Constraint]| {
            constraints.iter().try_for_each(|c| write!(f, ":{}", c))
        };
        match self {
            Segment::Literal(text) => f.write_str(text),
            Segment::Parameter {
                name,
                constraints,
                optional,
            } => {
                write!(f, "{{{}", name)?;
                write_constraints(f, constraints)?;
                if *optional {
                    f.write_str("?")?;
                }
                f.write_str("}")
            }
            Segment::ParameterWithDefault {
                name,
                constraints,
                default,
            } => {
                write!(f, "{{{}", name)?;
                write_constraints(f, constraints)?;
                write!(f, "={}}}", default)
            }
            Segment::Wildcard { name, constraints } => {
                write!(f, "{{*{}", name)?;
                write_constraints(f, constraints)?;
                f.write_str("}")
            }
        }
    }
}

/// A parsed route template.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    raw: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Parse a template string.
    ///
    /// A single leading and trailing `/` is ignored; the empty template has
    /// no segments and matches only the empty path.
    pub fn parse(template: &str) -> Result<Self, TemplateError> {
        let err = |kind| TemplateError::new(template, kind);
        let trimmed = template.trim_matches('/');

        let segments = if trimmed.is_empty() {
            Vec::new()
        } else {
            trimmed
                .split('/')
                .map(parse_segment)
                .collect::<Result<Vec<_>, _>>()
                .map_err(err)?
        };

        validate_structure(&segments).map_err(err)?;

        Ok(Self {
            raw: template.to_string(),
            segments,
        })
    }

    /// The template text as declared.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The parsed segments in order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Names of all parameters, in template order.
    pub fn parameter_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(Segment::name)
    }

    /// True if the template has any optional, defaulted or wildcard segment.
    pub fn has_optional_segments(&self) -> bool {
        self.segments.iter().any(Segment::is_optional)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

/// Classify one `/`-delimited piece of a template.
fn parse_segment(segment: &str) -> Result<Segment, TemplateErrorKind> {
    if segment.is_empty() {
        return Err(TemplateErrorKind::EmptySegment);
    }

    let inner = match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
        Some(inner) if !inner.contains(['{', '}']) => inner,
        _ if segment.contains(['{', '}']) => {
            return Err(TemplateErrorKind::MalformedSegment(segment.to_string()))
        }
        _ => return Ok(Segment::Literal(segment.to_string())),
    };

    // `{*name:c}`
    if let Some(body) = inner.strip_prefix('*') {
        if body.contains('=') || body.ends_with('?') {
            let name = body.split([':', '=', '?']).next().unwrap_or_default();
            return Err(TemplateErrorKind::WildcardModifier(name.to_string()));
        }
        let (name, constraints) = parse_name_and_constraints(body)?;
        return Ok(Segment::Wildcard { name, constraints });
    }

    // `{name:c=default}`
    if let Some((body, default)) = inner.split_once('=') {
        if let Some(name) = body.strip_suffix('?') {
            return Err(TemplateErrorKind::OptionalWithDefault(
                name.split(':').next().unwrap_or(name).to_string(),
            ));
        }
        let (name, constraints) = parse_name_and_constraints(body)?;
        if !satisfies_all(&constraints, default) {
            return Err(TemplateErrorKind::DefaultViolatesConstraint {
                name,
                default: default.to_string(),
            });
        }
        return Ok(Segment::ParameterWithDefault {
            name,
            constraints,
            default: default.to_string(),
        });
    }

    // `{name:c?}` / `{name:c}`
    let (body, optional) = match inner.strip_suffix('?') {
        Some(body) => (body, true),
        None => (inner, false),
    };
    let (name, constraints) = parse_name_and_constraints(body)?;
    Ok(Segment::Parameter {
        name,
        constraints,
        optional,
    })
}

/// Split `id:int:min(1)` into the name and its constraint chain.
fn parse_name_and_constraints(body: &str) -> Result<(String, Vec<Constraint>), TemplateErrorKind> {
    let mut parts = body.split(':');
    let name = parts.next().unwrap_or_default().trim();
    if name.is_empty() {
        return Err(TemplateErrorKind::EmptyParameterName);
    }
    if name.contains(['*', '?', '=']) {
        return Err(TemplateErrorKind::MalformedSegment(format!("{{{}}}", body)));
    }

    let constraints = parts
        .map(|spec| match spec.trim() {
            "" => Err(TemplateErrorKind::UnknownConstraint(String::new())),
            spec => Constraint::parse(spec),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok((name.to_string(), constraints))
}

/// Enforce the cross-segment rules: one wildcard, wildcard last, optional
/// segments trailing, parameter names unique.
fn validate_structure(segments: &[Segment]) -> Result<(), TemplateErrorKind> {
    let wildcards = segments
        .iter()
        .filter(|s| matches!(s, Segment::Wildcard { .. }))
        .count();
    if wildcards > 1 {
        return Err(TemplateErrorKind::MultipleWildcards);
    }

    let mut seen_optional = false;
    let mut names: Vec<String> = Vec::new();

    for (i, segment) in segments.iter().enumerate() {
        if let Segment::Wildcard { name, .. } = segment {
            if i + 1 != segments.len() {
                return Err(TemplateErrorKind::WildcardNotLast(name.clone()));
            }
        }

        if segment.is_optional() {
            seen_optional = true;
        } else if seen_optional {
            return Err(TemplateErrorKind::RequiredAfterOptional(segment.to_string()));
        }

        if let Some(name) = segment.name() {
            let folded = name.to_lowercase();
            if names.contains(&folded) {
                return Err(TemplateErrorKind::DuplicateParameter(name.to_string()));
            }
            names.push(folded);
        }
    }

    Ok(())
}
