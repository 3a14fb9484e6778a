//! Joining controller prefixes with action templates.

/// Marker that makes an action template ignore its controller's prefix.
pub const PREFIX_OVERRIDE: &str = "~/";

/// Compose the effective template for an action.
///
/// - No prefix: the action template verbatim.
/// - Prefix and empty action template: the prefix alone (the "prefix root").
/// - Prefix and non-empty template: `prefix/template`.
/// - Template starting with `~/`: the rest of the template, prefix ignored.
pub fn compose(prefix: Option<&str>, template: &str) -> String {
    if let Some(absolute) = template.strip_prefix(PREFIX_OVERRIDE) {
        return absolute.to_string();
    }

    let prefix = prefix.map(|p| p.trim_matches('/')).filter(|p| !p.is_empty());
    let template = template.trim_matches('/');

    match prefix {
        None => template.to_string(),
        Some(prefix) if template.is_empty() => prefix.to_string(),
        Some(prefix) => format!("{}/{}", prefix, template),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_prefix_is_verbatim() {
        assert_eq!(compose(None, "values/{id}"), "values/{id}");
        assert_eq!(compose(None, ""), "");
    }

    #[test]
    fn prefix_joined_with_slash() {
        assert_eq!(compose(Some("prefix"), "{id:int}"), "prefix/{id:int}");
    }

    #[test]
    fn empty_template_is_prefix_root() {
        assert_eq!(compose(Some("prefix"), ""), "prefix");
    }

    #[test]
    fn stray_slashes_trimmed() {
        assert_eq!(compose(Some("/api/"), "/values/"), "api/values");
        assert_eq!(compose(Some("/"), "values"), "values");
    }

    #[test]
    fn override_ignores_prefix() {
        assert_eq!(compose(Some("prefix"), "~/absolute/{id}"), "absolute/{id}");
        assert_eq!(compose(None, "~/absolute"), "absolute");
    }
}
