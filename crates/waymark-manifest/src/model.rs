use serde::{Deserialize, Serialize};
use waymark_router::{ActionMetadata, ControllerMetadata, RouteDeclaration};

/// A parsed route manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// File name the manifest was read from, if any.
    #[serde(skip)]
    pub filename: Option<String>,
    #[serde(default)]
    pub controllers: Vec<ControllerSpec>,
}

/// A controller entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ControllerSpec {
    pub name: String,
    /// Prepended to every explicit route of the controller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    /// Template for actions that declare no routes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_route: Option<String>,
    #[serde(default)]
    pub actions: Vec<ActionSpec>,
}

/// An action entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActionSpec {
    pub name: String,
    /// Methods applying to every route of the action.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<RouteSpec>,
}

/// A route entry: either a bare template or the full form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RouteSpec {
    Template(String),
    Full(RouteEntry),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteEntry {
    pub template: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub order: i32,
}

impl Manifest {
    /// Convert into the metadata the route table is built from.
    pub fn controllers(&self) -> Vec<ControllerMetadata> {
        self.controllers.iter().map(ControllerSpec::to_metadata).collect()
    }
}

impl ControllerSpec {
    fn to_metadata(&self) -> ControllerMetadata {
        let mut controller = ControllerMetadata::new(&self.name);
        controller.prefix = self.prefix.clone();
        controller.default_route = self.default_route.clone();
        controller.actions = self.actions.iter().map(ActionSpec::to_metadata).collect();
        controller
    }
}

impl ActionSpec {
    fn to_metadata(&self) -> ActionMetadata {
        let mut action = ActionMetadata::new(&self.name).with_methods(self.methods.iter().cloned());
        action.routes = self.routes.iter().map(RouteSpec::to_declaration).collect();
        action
    }
}

impl RouteSpec {
    /// The template as written in the manifest.
    pub fn template(&self) -> &str {
        match self {
            RouteSpec::Template(template) => template,
            RouteSpec::Full(entry) => &entry.template,
        }
    }

    fn to_declaration(&self) -> RouteDeclaration {
        match self {
            RouteSpec::Template(template) => RouteDeclaration::new(template),
            RouteSpec::Full(entry) => {
                let mut declaration = RouteDeclaration::new(&entry.template)
                    .with_methods(entry.methods.iter().cloned())
                    .with_order(entry.order);
                declaration.name = entry.name.clone();
                declaration
            }
        }
    }
}
