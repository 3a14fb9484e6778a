//! Inline parameter constraints.
//!
//! A constraint follows the parameter name inside the braces, separated by
//! `:`. Several may be chained (`{id:int:min(1)}`); a value must satisfy all
//! of them. Names are case-insensitive.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use uuid::Uuid;

use crate::error::TemplateErrorKind;

/// A named predicate over a captured segment value.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// 32-bit signed integer.
    Int,
    /// 64-bit signed integer.
    Long,
    /// `true` or `false`, any case.
    Bool,
    /// ASCII letters only.
    Alpha,
    /// A GUID/UUID in any of the usual textual forms.
    Guid,
    /// Plain decimal number: optional sign, digits, at most one `.`.
    Decimal,
    /// Finite 64-bit float.
    Double,
    /// Finite 32-bit float.
    Float,
    /// RFC 3339 timestamp, `YYYY-MM-DD`, or `YYYY-MM-DDTHH:MM:SS`.
    DateTime,
    /// Integer no smaller than the bound.
    Min(i64),
    /// Integer no larger than the bound.
    Max(i64),
    /// Integer within the inclusive range.
    Range(i64, i64),
    /// Exactly this many characters.
    Length(usize),
    /// Between the two character counts, inclusive.
    LengthBetween(usize, usize),
    /// At least this many characters.
    MinLength(usize),
    /// At most this many characters.
    MaxLength(usize),
}

impl Constraint {
    /// Parse one constraint from its inline form (`int`, `min(1)`, `range(1,10)`).
    pub fn parse(spec: &str) -> Result<Self, TemplateErrorKind> {
        let (name, args) = split_arguments(spec)?;

        let constraint = match name.to_ascii_lowercase().as_str() {
            "int" => Self::Int,
            "long" => Self::Long,
            "bool" => Self::Bool,
            "alpha" => Self::Alpha,
            "guid" => Self::Guid,
            "decimal" => Self::Decimal,
            "double" => Self::Double,
            "float" => Self::Float,
            "datetime" => Self::DateTime,
            "min" => return Ok(Self::Min(single_argument(spec, args)?)),
            "max" => return Ok(Self::Max(single_argument(spec, args)?)),
            "minlength" => return Ok(Self::MinLength(single_argument(spec, args)?)),
            "maxlength" => return Ok(Self::MaxLength(single_argument(spec, args)?)),
            "range" => {
                let (low, high) = two_arguments(spec, args)?;
                if low > high {
                    return Err(TemplateErrorKind::InvalidConstraintArgument(format!(
                        "'{}': lower bound exceeds upper bound",
                        spec
                    )));
                }
                return Ok(Self::Range(low, high));
            }
            "length" => {
                let parts = arguments(spec, args)?;
                return match parts.as_slice() {
                    [exact] => Ok(Self::Length(parse_argument(spec, exact)?)),
                    [low, high] => {
                        let (low, high) = (parse_argument(spec, low)?, parse_argument(spec, high)?);
                        if low > high {
                            return Err(TemplateErrorKind::InvalidConstraintArgument(format!(
                                "'{}': lower bound exceeds upper bound",
                                spec
                            )));
                        }
                        Ok(Self::LengthBetween(low, high))
                    }
                    _ => Err(TemplateErrorKind::InvalidConstraintArgument(format!(
                        "'{}' takes one or two arguments",
                        spec
                    ))),
                };
            }
            _ => return Err(TemplateErrorKind::UnknownConstraint(name.to_string())),
        };

        if args.is_some() {
            return Err(TemplateErrorKind::InvalidConstraintArgument(format!(
                "'{}' takes no arguments",
                name
            )));
        }
        Ok(constraint)
    }

    /// Returns true if `value` satisfies this constraint.
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            Self::Int => value.parse::<i32>().is_ok(),
            Self::Long => value.parse::<i64>().is_ok(),
            Self::Bool => value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false"),
            Self::Alpha => !value.is_empty() && value.chars().all(|c| c.is_ascii_alphabetic()),
            Self::Guid => Uuid::parse_str(value).is_ok(),
            Self::Decimal => is_decimal(value),
            Self::Double => value.parse::<f64>().map(f64::is_finite).unwrap_or(false),
            Self::Float => value.parse::<f32>().map(f32::is_finite).unwrap_or(false),
            Self::DateTime => is_datetime(value),
            Self::Min(min) => value.parse::<i64>().map(|v| v >= *min).unwrap_or(false),
            Self::Max(max) => value.parse::<i64>().map(|v| v <= *max).unwrap_or(false),
            Self::Range(low, high) => value
                .parse::<i64>()
                .map(|v| (*low..=*high).contains(&v))
                .unwrap_or(false),
            Self::Length(len) => value.chars().count() == *len,
            Self::LengthBetween(low, high) => (*low..=*high).contains(&value.chars().count()),
            Self::MinLength(min) => value.chars().count() >= *min,
            Self::MaxLength(max) => value.chars().count() <= *max,
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int => f.write_str("int"),
            Self::Long => f.write_str("long"),
            Self::Bool => f.write_str("bool"),
            Self::Alpha => f.write_str("alpha"),
            Self::Guid => f.write_str("guid"),
            Self::Decimal => f.write_str("decimal"),
            Self::Double => f.write_str("double"),
            Self::Float => f.write_str("float"),
            Self::DateTime => f.write_str("datetime"),
            Self::Min(v) => write!(f, "min({})", v),
            Self::Max(v) => write!(f, "max({})", v),
            Self::Range(low, high) => write!(f, "range({},{})", low, high),
            Self::Length(v) => write!(f, "length({})", v),
            Self::LengthBetween(low, high) => write!(f, "length({},{})", low, high),
            Self::MinLength(v) => write!(f, "minlength({})", v),
            Self::MaxLength(v) => write!(f, "maxlength({})", v),
        }
    }
}

/// Returns true if `value` satisfies every constraint in the chain.
pub fn satisfies_all(constraints: &[Constraint], value: &str) -> bool {
    constraints.iter().all(|c| c.accepts(value))
}

/// Split `min(1)` into `("min", Some("1"))` and `int` into `("int", None)`.
fn split_arguments(spec: &str) -> Result<(&str, Option<&str>), TemplateErrorKind> {
    match spec.split_once('(') {
        Some((name, rest)) => {
            let args = rest.strip_suffix(')').ok_or_else(|| {
                TemplateErrorKind::InvalidConstraintArgument(format!("unclosed '(' in '{}'", spec))
            })?;
            Ok((name, Some(args)))
        }
        None if spec.contains(')') => Err(TemplateErrorKind::InvalidConstraintArgument(format!(
            "unexpected ')' in '{}'",
            spec
        ))),
        None => Ok((spec, None)),
    }
}

fn arguments<'a>(spec: &str, args: Option<&'a str>) -> Result<Vec<&'a str>, TemplateErrorKind> {
    let args = args.ok_or_else(|| {
        TemplateErrorKind::InvalidConstraintArgument(format!("'{}' requires arguments", spec))
    })?;
    Ok(args.split(',').map(str::trim).collect())
}

fn parse_argument<T: std::str::FromStr>(spec: &str, arg: &str) -> Result<T, TemplateErrorKind> {
    arg.parse().map_err(|_| {
        TemplateErrorKind::InvalidConstraintArgument(format!("'{}' in '{}' is not a number", arg, spec))
    })
}

fn single_argument<T: std::str::FromStr>(
    spec: &str,
    args: Option<&str>,
) -> Result<T, TemplateErrorKind> {
    match arguments(spec, args)?.as_slice() {
        [arg] => parse_argument(spec, arg),
        _ => Err(TemplateErrorKind::InvalidConstraintArgument(format!(
            "'{}' takes exactly one argument",
            spec
        ))),
    }
}

fn two_arguments(spec: &str, args: Option<&str>) -> Result<(i64, i64), TemplateErrorKind> {
    match arguments(spec, args)?.as_slice() {
        [low, high] => Ok((parse_argument(spec, low)?, parse_argument(spec, high)?)),
        _ => Err(TemplateErrorKind::InvalidConstraintArgument(format!(
            "'{}' takes exactly two arguments",
            spec
        ))),
    }
}

fn is_decimal(value: &str) -> bool {
    let digits = value.strip_prefix(['-', '+']).unwrap_or(value);
    let mut seen_digit = false;
    let mut seen_dot = false;
    for c in digits.chars() {
        match c {
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => return false,
        }
    }
    seen_digit
}

fn is_datetime(value: &str) -> bool {
    DateTime::parse_from_rfc3339(value).is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S").is_ok()
        || NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_constraints() {
        assert_eq!(Constraint::parse("int"), Ok(Constraint::Int));
        assert_eq!(Constraint::parse("INT"), Ok(Constraint::Int));
        assert_eq!(Constraint::parse("guid"), Ok(Constraint::Guid));
        assert_eq!(Constraint::parse("datetime"), Ok(Constraint::DateTime));
    }

    #[test]
    fn parse_constraints_with_arguments() {
        assert_eq!(Constraint::parse("min(1)"), Ok(Constraint::Min(1)));
        assert_eq!(Constraint::parse("range(1, 10)"), Ok(Constraint::Range(1, 10)));
        assert_eq!(Constraint::parse("length(3)"), Ok(Constraint::Length(3)));
        assert_eq!(
            Constraint::parse("length(2,4)"),
            Ok(Constraint::LengthBetween(2, 4))
        );
    }

    #[test]
    fn reject_unknown_constraint() {
        assert_eq!(
            Constraint::parse("regex"),
            Err(TemplateErrorKind::UnknownConstraint("regex".to_string()))
        );
    }

    #[test]
    fn reject_bad_arguments() {
        assert!(matches!(
            Constraint::parse("min"),
            Err(TemplateErrorKind::InvalidConstraintArgument(_))
        ));
        assert!(matches!(
            Constraint::parse("int(3)"),
            Err(TemplateErrorKind::InvalidConstraintArgument(_))
        ));
        assert!(matches!(
            Constraint::parse("range(10,1)"),
            Err(TemplateErrorKind::InvalidConstraintArgument(_))
        ));
        assert!(matches!(
            Constraint::parse("max(x)"),
            Err(TemplateErrorKind::InvalidConstraintArgument(_))
        ));
        assert!(matches!(
            Constraint::parse("min(1"),
            Err(TemplateErrorKind::InvalidConstraintArgument(_))
        ));
    }

    #[test]
    fn int_is_32_bit() {
        assert!(Constraint::Int.accepts("42"));
        assert!(Constraint::Int.accepts("-7"));
        assert!(!Constraint::Int.accepts("Ethan"));
        assert!(!Constraint::Int.accepts("4294967296"));
        assert!(Constraint::Long.accepts("4294967296"));
    }

    #[test]
    fn numeric_and_text_predicates() {
        assert!(Constraint::Bool.accepts("TRUE"));
        assert!(!Constraint::Bool.accepts("yes"));
        assert!(Constraint::Alpha.accepts("abc"));
        assert!(!Constraint::Alpha.accepts("abc1"));
        assert!(Constraint::Decimal.accepts("-12.50"));
        assert!(!Constraint::Decimal.accepts("1.2.3"));
        assert!(!Constraint::Decimal.accepts("-"));
        assert!(Constraint::Double.accepts("1e3"));
        assert!(!Constraint::Double.accepts("inf"));
        assert!(Constraint::Guid.accepts("67e55044-10b1-426f-9247-bb680e5fe0c8"));
        assert!(!Constraint::Guid.accepts("not-a-guid"));
    }

    #[test]
    fn datetime_formats() {
        assert!(Constraint::DateTime.accepts("2024-02-29"));
        assert!(Constraint::DateTime.accepts("2024-02-29T10:30:00"));
        assert!(Constraint::DateTime.accepts("2024-02-29T10:30:00Z"));
        assert!(!Constraint::DateTime.accepts("2023-02-29"));
    }

    #[test]
    fn bounds_and_lengths() {
        assert!(Constraint::Min(1).accepts("1"));
        assert!(!Constraint::Min(1).accepts("0"));
        assert!(Constraint::Range(1, 3).accepts("3"));
        assert!(!Constraint::Range(1, 3).accepts("4"));
        assert!(Constraint::Length(2).accepts("ab"));
        assert!(Constraint::LengthBetween(2, 3).accepts("abc"));
        assert!(!Constraint::MaxLength(2).accepts("abc"));
        assert!(Constraint::MinLength(2).accepts("abc"));
    }

    #[test]
    fn chain_requires_every_constraint() {
        let chain = vec![Constraint::Int, Constraint::Min(10)];
        assert!(satisfies_all(&chain, "12"));
        assert!(!satisfies_all(&chain, "9"));
        assert!(!satisfies_all(&chain, "twelve"));
        assert!(satisfies_all(&[], "anything"));
    }

    #[test]
    fn display_round_trips_inline_form() {
        assert_eq!(Constraint::Range(1, 5).to_string(), "range(1,5)");
        assert_eq!(Constraint::Int.to_string(), "int");
    }
}
