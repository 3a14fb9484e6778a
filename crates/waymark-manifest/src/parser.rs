use std::path::Path;

use crate::error::ManifestError;
use crate::model::{Manifest, RouteSpec};

/// Parse a manifest from a YAML/JSON string.
pub fn parse_manifest(input: &str) -> Result<Manifest, ManifestError> {
    // JSON is valid YAML, so one parser covers both.
    let manifest: Manifest =
        serde_yaml::from_str(input).map_err(|e| ManifestError::Parse(e.to_string()))?;
    validate(&manifest)?;
    Ok(manifest)
}

/// Parse a manifest from a file path.
pub fn parse_manifest_file(path: &Path) -> Result<Manifest, ManifestError> {
    let content = std::fs::read_to_string(path)?;
    let mut manifest = parse_manifest(&content)?;
    manifest.filename = path
        .file_name()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string());

    waymark_telemetry::log_manifest_loaded!(
        path = %path.display(),
        controllers = manifest.controllers.len(),
        "manifest loaded"
    );
    Ok(manifest)
}

/// Checks the type system cannot express. Template syntax is left to the
/// route table builder.
fn validate(manifest: &Manifest) -> Result<(), ManifestError> {
    let mut controller_names: Vec<&str> = Vec::new();

    for (i, controller) in manifest.controllers.iter().enumerate() {
        if controller.name.trim().is_empty() {
            return Err(ManifestError::Schema(format!(
                "controllers[{}]: name must not be empty",
                i
            )));
        }
        if controller_names.contains(&controller.name.as_str()) {
            return Err(ManifestError::Schema(format!(
                "duplicate controller '{}'",
                controller.name
            )));
        }
        controller_names.push(&controller.name);

        for (j, action) in controller.actions.iter().enumerate() {
            if action.name.trim().is_empty() {
                return Err(ManifestError::Schema(format!(
                    "controller '{}' actions[{}]: name must not be empty",
                    controller.name, j
                )));
            }
            if let Some(method) = action.methods.iter().find(|m| m.trim().is_empty()) {
                return Err(ManifestError::Schema(format!(
                    "action '{}.{}': empty method '{}'",
                    controller.name, action.name, method
                )));
            }
            for route in &action.routes {
                if let RouteSpec::Full(entry) = route {
                    if entry.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
                        return Err(ManifestError::Schema(format!(
                            "action '{}.{}': route '{}' has an empty name",
                            controller.name, action.name, entry.template
                        )));
                    }
                }
            }
        }
    }

    tracing::debug!(
        controllers = manifest.controllers.len(),
        "manifest validated"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RouteEntry;

    const SAMPLE: &str = r#"
controllers:
  - name: values
    prefix: api/values
    default_route: "{id:int}"
    actions:
      - name: get
        methods: [GET]
      - name: update
        routes:
          - template: "{id:int}"
            methods: [PUT, PATCH]
            name: value-update
            order: 1
          - "~/legacy/values/{id:int}"
  - name: home
    actions:
      - name: index
        routes: [""]
"#;

    #[test]
    fn parse_full_manifest() {
        let manifest = parse_manifest(SAMPLE).unwrap();
        assert_eq!(manifest.controllers.len(), 2);

        let values = &manifest.controllers[0];
        assert_eq!(values.prefix.as_deref(), Some("api/values"));
        assert_eq!(values.default_route.as_deref(), Some("{id:int}"));
        assert_eq!(values.actions[0].methods, vec!["GET"]);
        assert!(values.actions[0].routes.is_empty());

        let routes = &values.actions[1].routes;
        assert_eq!(
            routes[0],
            RouteSpec::Full(RouteEntry {
                template: "{id:int}".to_string(),
                methods: vec!["PUT".to_string(), "PATCH".to_string()],
                name: Some("value-update".to_string()),
                order: 1,
            })
        );
        assert_eq!(routes[1].template(), "~/legacy/values/{id:int}");
    }

    #[test]
    fn converts_to_controller_metadata() {
        let controllers = parse_manifest(SAMPLE).unwrap().controllers();
        assert_eq!(controllers.len(), 2);

        let update = &controllers[0].actions[1];
        assert_eq!(update.name, "update");
        assert_eq!(update.routes[0].methods, vec!["PUT", "PATCH"]);
        assert_eq!(update.routes[0].name.as_deref(), Some("value-update"));
        assert_eq!(update.routes[0].order, 1);
        assert!(update.routes[1].methods.is_empty());

        assert_eq!(controllers[1].actions[0].routes[0].template, "");
    }

    #[test]
    fn parse_json_manifest() {
        let json = r#"{"controllers":[{"name":"c","actions":[{"name":"a","routes":["x/{id}"]}]}]}"#;
        let manifest = parse_manifest(json).unwrap();
        assert_eq!(manifest.controllers[0].actions[0].routes[0].template(), "x/{id}");
    }

    #[test]
    fn empty_document_has_no_controllers() {
        let manifest = parse_manifest("controllers: []").unwrap();
        assert!(manifest.controllers.is_empty());
    }

    #[test]
    fn unknown_key_rejected() {
        let err = parse_manifest("controllers:\n  - name: c\n    prefx: api\n").unwrap_err();
        assert!(matches!(err, ManifestError::Parse(_)));
        assert!(err.to_string().starts_with("E3001"));
    }

    #[test]
    fn duplicate_prefix_rejected() {
        let input = "controllers:\n  - name: c\n    prefix: a\n    prefix: b\n";
        assert!(matches!(
            parse_manifest(input),
            Err(ManifestError::Parse(_))
        ));
    }

    #[test]
    fn invalid_yaml() {
        assert!(matches!(
            parse_manifest("controllers: [unclosed"),
            Err(ManifestError::Parse(_))
        ));
    }

    #[test]
    fn empty_controller_name() {
        let err = parse_manifest("controllers:\n  - name: ''\n").unwrap_err();
        assert!(matches!(err, ManifestError::Schema(_)));
        assert!(err.to_string().starts_with("E3002"));
    }

    #[test]
    fn duplicate_controller() {
        let input = "controllers:\n  - name: c\n  - name: c\n";
        assert!(matches!(
            parse_manifest(input),
            Err(ManifestError::Schema(msg)) if msg.contains("duplicate controller")
        ));
    }

    #[test]
    fn empty_action_name() {
        let input = "controllers:\n  - name: c\n    actions:\n      - name: ' '\n";
        assert!(matches!(
            parse_manifest(input),
            Err(ManifestError::Schema(_))
        ));
    }

    #[test]
    fn parse_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routes.yaml");
        std::fs::write(&path, SAMPLE).unwrap();

        let manifest = parse_manifest_file(&path).unwrap();
        assert_eq!(manifest.filename.as_deref(), Some("routes.yaml"));
        assert_eq!(manifest.controllers.len(), 2);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = parse_manifest_file(&dir.path().join("absent.yaml"));
        assert!(matches!(result, Err(ManifestError::Io(_))));
    }
}
