//! Path matching against the route table.

use crate::constraint::{satisfies_all, Constraint};
use crate::table::{RouteDefinition, RouteTable};
use crate::template::Segment;

/// Values bound from the path, in template order.
///
/// Optional parameters the path did not supply are absent, not empty.
/// Defaulted parameters are always present. Lookups ignore ASCII case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteValues {
    values: Vec<(String, String)>,
}

impl RouteValues {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_vec(self) -> Vec<(String, String)> {
        self.values
    }
}

/// A route whose template matched the request path.
#[derive(Debug, Clone)]
pub struct MatchResult<'a> {
    pub route: &'a RouteDefinition,
    pub values: RouteValues,
}

/// Split a request path into segments.
///
/// Leading, trailing and repeated slashes are ignored, so `""` and `"/"`
/// both yield no segments.
pub fn split_path(path: &str) -> Vec<&str> {
    path_segments(path).iter().map(|s| s.text).collect()
}

/// A non-empty path segment and its byte offset in the request path.
#[derive(Debug, Clone, Copy)]
struct PathSegment<'p> {
    text: &'p str,
    start: usize,
}

fn path_segments(path: &str) -> Vec<PathSegment<'_>> {
    let mut segments = Vec::new();
    let mut start = 0;
    for text in path.split('/') {
        if !text.is_empty() {
            segments.push(PathSegment { text, start });
        }
        start += text.len() + 1;
    }
    segments
}

impl RouteTable {
    /// All definitions whose template matches `path`, most specific first.
    ///
    /// Never fails: an empty result means no template matches.
    pub fn match_path(&self, path: &str) -> Vec<MatchResult<'_>> {
        let segments = path_segments(path);

        self.definitions()
            .iter()
            .filter_map(|route| {
                let mut values = Vec::new();
                match_segments(route.template.segments(), path, &segments, &mut values).then(
                    || MatchResult {
                        route,
                        values: RouteValues { values },
                    },
                )
            })
            .collect()
    }
}

/// Align template segments against a request path.
///
/// Returns the bound values on success.
pub fn match_template(template: &[Segment], path: &str) -> Option<Vec<(String, String)>> {
    let segments = path_segments(path);
    let mut values = Vec::new();
    match_segments(template, path, &segments, &mut values).then_some(values)
}

/// Segments are positional: an optional or defaulted parameter is absent only
/// once the path has run out. A present segment must satisfy it.
fn match_segments(
    template: &[Segment],
    source: &str,
    path: &[PathSegment<'_>],
    values: &mut Vec<(String, String)>,
) -> bool {
    let Some((segment, rest)) = template.split_first() else {
        // Every template segment satisfied; the path must be fully consumed.
        return path.is_empty();
    };

    match segment {
        Segment::Literal(text) => match path.split_first() {
            Some((head, tail)) if literal_eq(head.text, text) => {
                match_segments(rest, source, tail, values)
            }
            _ => false,
        },

        Segment::Parameter {
            name,
            constraints,
            optional,
        } => {
            if path.is_empty() {
                return *optional && match_segments(rest, source, path, values);
            }
            bind(name, constraints, path, values)
                && match_segments(rest, source, &path[1..], values)
        }

        Segment::ParameterWithDefault {
            name,
            constraints,
            default,
        } => {
            if path.is_empty() {
                values.push((name.clone(), default.clone()));
                return match_segments(rest, source, path, values);
            }
            bind(name, constraints, path, values)
                && match_segments(rest, source, &path[1..], values)
        }

        // Wildcards are always last and take everything, including nothing.
        // Interior empty segments of the request are kept in the capture.
        Segment::Wildcard { name, constraints } => {
            let captured = match (path.first(), path.last()) {
                (Some(first), Some(last)) => &source[first.start..last.start + last.text.len()],
                _ => "",
            };
            if !satisfies_all(constraints, captured) {
                return false;
            }
            values.push((name.clone(), captured.to_string()));
            true
        }
    }
}

/// Bind the next path segment to a parameter if it passes the constraints.
fn bind(
    name: &str,
    constraints: &[Constraint],
    path: &[PathSegment<'_>],
    values: &mut Vec<(String, String)>,
) -> bool {
    match path.first() {
        Some(head) if satisfies_all(constraints, head.text) => {
            values.push((name.to_string(), head.text.to_string()));
            true
        }
        _ => false,
    }
}

fn literal_eq(path_segment: &str, literal: &str) -> bool {
    path_segment.eq_ignore_ascii_case(literal)
        || (!path_segment.is_ascii() && path_segment.to_lowercase() == literal.to_lowercase())
}
