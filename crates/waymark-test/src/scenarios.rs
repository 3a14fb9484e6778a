//! Request scenarios against `tests/fixtures/attribute_routing.yaml`.

use http::{Method, StatusCode};

use crate::engine::{TestEngine, TestError};

fn routing() -> TestEngine {
    TestEngine::from_fixture("attribute_routing.yaml").expect("fixture should load")
}

#[test]
fn test_optional_segments() -> Result<(), TestError> {
    let engine = routing();

    let values = engine.expect_selected("GET", "optional", "optional.get")?;
    assert!(values.is_empty());
    assert!(!values.contains("opt1"));

    let values = engine.expect_selected("GET", "optional/1", "optional.get")?;
    assert_eq!(values.get("opt1"), Some("1"));
    assert!(!values.contains("opt2"));

    let values = engine.expect_selected("GET", "optional/1/2", "optional.get")?;
    assert_eq!(values.get("opt1"), Some("1"));
    assert_eq!(values.get("opt2"), Some("2"));

    engine.expect_not_found("GET", "optional/1/2/3")
}

#[test]
fn test_bare_optional_template_matches_root() -> Result<(), TestError> {
    let engine = TestEngine::from_yaml(
        "controllers:\n  - name: c\n    actions:\n      - name: a\n        routes: [\"{opt1?}/{opt2?}\"]\n",
    )?;

    assert!(engine.expect_selected("GET", "", "c.a")?.is_empty());
    assert_eq!(engine.expect_selected("GET", "1", "c.a")?.len(), 1);
    assert_eq!(engine.expect_selected("GET", "1/2", "c.a")?.len(), 2);
    Ok(())
}

#[test]
fn test_required_after_optional_rejected() {
    let result = TestEngine::from_yaml(
        "controllers:\n  - name: c\n    actions:\n      - name: a\n        routes: [\"{opt?}/{id}\"]\n",
    );
    assert!(result.is_err());
}

#[test]
fn test_constraint_falls_through_to_unconstrained() -> Result<(), TestError> {
    let engine = routing();

    let values = engine.expect_selected("GET", "controller/42", "constraints.by_id")?;
    assert_eq!(values.get("id"), Some("42"));

    let values = engine.expect_selected("GET", "controller/Ethan", "constraints.by_name")?;
    assert_eq!(values.get("name"), Some("Ethan"));
    Ok(())
}

#[test]
fn test_wildcard_captures_slashes() -> Result<(), TestError> {
    let engine = routing();

    let values = engine.expect_selected("GET", "wildcard/a/b/c", "wildcard.get")?;
    assert_eq!(values.get("wildcard"), Some("a/b/c"));

    let values = engine.expect_selected("POST", "wildcard", "wildcard.get")?;
    assert_eq!(values.get("wildcard"), Some(""));
    Ok(())
}

#[test]
fn test_default_substitution() -> Result<(), TestError> {
    let engine = routing();

    let values = engine.expect_selected("GET", "default", "defaults.get")?;
    assert_eq!(values.get("default1"), Some("D1"));
    assert_eq!(values.get("default2"), Some("D2"));

    let values = engine.expect_selected("GET", "default/1", "defaults.get")?;
    assert_eq!(values.get("default1"), Some("1"));
    assert_eq!(values.get("default2"), Some("D2"));

    let values = engine.expect_selected("GET", "default/1/2", "defaults.get")?;
    assert_eq!(values.get("default2"), Some("2"));
    Ok(())
}

#[test]
fn test_method_union_and_405() -> Result<(), TestError> {
    let engine = routing();

    engine.expect_selected("GET", "verbs/7", "verbs.get_put")?;
    engine.expect_selected("PUT", "verbs/7", "verbs.get_put")?;

    let allowed = engine.expect_method_not_allowed("DELETE", "verbs/7")?;
    assert_eq!(allowed, vec![Method::GET, Method::PUT]);

    // A constraint failure is a path miss, not a method miss.
    engine.expect_not_found("DELETE", "verbs/seven")
}

#[test]
fn test_default_route_fallback() -> Result<(), TestError> {
    let engine = routing();

    let values = engine.expect_selected("GET", "prefix2/defaultroute/12", "defaultroute.get")?;
    assert_eq!(values.get("id"), Some("12"));

    engine.expect_not_found("GET", "prefix2/defaultroute/name")?;

    let allowed = engine.expect_method_not_allowed("PUT", "prefix2/defaultroute/12")?;
    assert_eq!(allowed, vec![Method::GET]);
    Ok(())
}

#[test]
fn test_multiple_routes_one_action() -> Result<(), TestError> {
    let engine = routing();

    engine.expect_selected("DELETE", "multi1", "multi.delete")?;
    engine.expect_selected("DELETE", "multi2", "multi.delete")?;
    engine.expect_method_not_allowed("GET", "multi1")?;
    engine.expect_method_not_allowed("POST", "multi2")?;
    Ok(())
}

#[test]
fn test_prefix_root_and_unrouted_action() -> Result<(), TestError> {
    let engine = routing();

    engine.expect_selected("GET", "home", "home.index")?;
    engine.expect_selected("GET", "/home/", "home.index")?;
    engine.expect_not_found("GET", "home/unrouted")
}

#[test]
fn test_literals_ignore_case() -> Result<(), TestError> {
    let engine = routing();
    engine.expect_selected("DELETE", "MULTI1", "multi.delete")?;
    engine.expect_selected("GET", "Controller/42", "constraints.by_id")?;
    Ok(())
}

#[test]
fn test_prefix_override_and_order() -> Result<(), TestError> {
    let engine = routing();

    let values = engine.expect_selected("GET", "legacy/5", "legacy.show")?;
    assert_eq!(values.get("id"), Some("5"));
    engine.expect_not_found("GET", "api/v2/legacy/5")?;

    // The explicit order lets the unconstrained route win.
    engine.expect_selected("GET", "api/v2/items/5", "legacy.search")?;
    Ok(())
}

#[test]
fn test_url_generation() {
    let engine = routing();
    let engine = engine.engine();

    assert_eq!(engine.url_for("home", &[]).as_deref(), Ok("home"));
    assert_eq!(
        engine.url_for("verb-item", &[("id", "3")]).as_deref(),
        Ok("verbs/3")
    );
    assert_eq!(
        engine.url_for("legacy-show", &[("id", "5")]).as_deref(),
        Ok("legacy/5")
    );
    assert!(engine.url_for("verb-item", &[("id", "x")]).is_err());
}

#[test]
fn test_status_codes() -> Result<(), TestError> {
    let engine = routing();

    assert_eq!(engine.request("GET", "verbs/1")?.status(), StatusCode::OK);
    assert_eq!(
        engine.request("DELETE", "verbs/1")?.status(),
        StatusCode::METHOD_NOT_ALLOWED
    );
    assert_eq!(
        engine.request("GET", "nowhere/at/all")?.status(),
        StatusCode::NOT_FOUND
    );
    Ok(())
}

#[test]
fn test_resolution_is_deterministic() -> Result<(), TestError> {
    let engine = routing();
    let first = engine.request("GET", "controller/42")?;
    for _ in 0..20 {
        assert_eq!(engine.request("GET", "controller/42")?, first);
    }
    Ok(())
}
