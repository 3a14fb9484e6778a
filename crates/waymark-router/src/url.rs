//! URL generation from named routes.

use crate::constraint::{satisfies_all, Constraint};
use crate::error::UrlError;
use crate::table::RouteTable;
use crate::template::Segment;

impl RouteTable {
    /// Render the path of the route called `name`.
    ///
    /// `values` are looked up case-insensitively; unused values are ignored.
    /// Optional and defaulted parameters may be left out as long as nothing
    /// after them is supplied; a defaulted parameter is written out with its
    /// default when a later value needs the position. The result carries no
    /// leading slash.
    pub fn url_for(&self, name: &str, values: &[(&str, &str)]) -> Result<String, UrlError> {
        let route = self
            .by_name(name)
            .ok_or_else(|| UrlError::UnknownRoute(name.to_string()))?;

        let lookup = |param: &str| {
            values
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(param))
                .map(|(_, v)| *v)
        };
        let segments = route.template.segments();

        // Index past the last segment the caller actually supplied.
        let supplied_end = segments
            .iter()
            .rposition(|s| s.name().is_some_and(|n| lookup(n).is_some()))
            .map_or(0, |i| i + 1);

        let mut parts: Vec<String> = Vec::with_capacity(segments.len());
        for (i, segment) in segments.iter().enumerate() {
            let needed = i < supplied_end;
            match segment {
                Segment::Literal(text) => parts.push(text.clone()),
                Segment::Parameter {
                    name: param,
                    constraints,
                    optional,
                } => match lookup(param) {
                    Some(value) => parts.push(checked(name, param, constraints, value)?),
                    None if *optional && !needed => break,
                    None => {
                        return Err(UrlError::MissingValue {
                            route: name.to_string(),
                            name: param.clone(),
                        })
                    }
                },
                Segment::ParameterWithDefault {
                    name: param,
                    constraints,
                    default,
                } => match lookup(param) {
                    Some(value) => parts.push(checked(name, param, constraints, value)?),
                    None if needed => parts.push(default.clone()),
                    None => break,
                },
                Segment::Wildcard {
                    name: param,
                    constraints,
                } => match lookup(param).map(|v| v.trim_matches('/')) {
                    Some(value) if !value.is_empty() => {
                        parts.push(checked(name, param, constraints, value)?)
                    }
                    // An empty capture must still pass the constraints.
                    _ if !satisfies_all(constraints, "") => {
                        return Err(UrlError::MissingValue {
                            route: name.to_string(),
                            name: param.clone(),
                        })
                    }
                    _ => {}
                },
            }
        }

        Ok(parts.join("/"))
    }
}

fn checked(
    route: &str,
    name: &str,
    constraints: &[Constraint],
    value: &str,
) -> Result<String, UrlError> {
    if value.is_empty() || !satisfies_all(constraints, value) {
        return Err(UrlError::ConstraintViolation {
            route: route.to_string(),
            name: name.to_string(),
            value: value.to_string(),
        });
    }
    Ok(value.to_string())
}
