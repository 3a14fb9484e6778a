//! Route table construction.
//!
//! Turns controller metadata into an immutable, specificity-ordered list of
//! route definitions. Built once per configuration; read-only afterwards and
//! safe to share between any number of request threads.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::fmt;

use http::Method;

use crate::compose::compose;
use crate::error::BuildError;
use crate::template::{Segment, Template};

/// One explicit route declaration on an action (a `Route` attribute).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteDeclaration {
    /// Action-level template, composed with the controller prefix.
    pub template: String,
    /// Methods attached to this declaration.
    pub methods: Vec<String>,
    /// Optional unique name, used for URL generation.
    pub name: Option<String>,
    /// Explicit ordering; lower ranks first among explicit routes.
    pub order: i32,
}

impl RouteDeclaration {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            ..Self::default()
        }
    }

    pub fn with_methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.methods.extend(methods.into_iter().map(Into::into));
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }
}

/// An action as seen by the table builder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionMetadata {
    pub name: String,
    /// Method attributes on the action itself (apply to all its routes).
    pub methods: Vec<String>,
    /// Explicit route declarations. Empty means the action is reachable only
    /// through its controller's default route, if any.
    pub routes: Vec<RouteDeclaration>,
}

impl ActionMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.methods.extend(methods.into_iter().map(Into::into));
        self
    }

    pub fn with_route(mut self, route: RouteDeclaration) -> Self {
        self.routes.push(route);
        self
    }
}

/// A controller as seen by the table builder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControllerMetadata {
    pub name: String,
    /// `RoutePrefix`, prepended to every explicit template.
    pub prefix: Option<String>,
    /// `DefaultRoute`, used by actions without explicit declarations.
    pub default_route: Option<String>,
    pub actions: Vec<ActionMetadata>,
}

impl ControllerMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_default_route(mut self, template: impl Into<String>) -> Self {
        self.default_route = Some(template.into());
        self
    }

    pub fn with_action(mut self, action: ActionMetadata) -> Self {
        self.actions.push(action);
        self
    }
}

/// Identifies the action a route dispatches to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionId {
    pub controller: String,
    pub action: String,
}

impl ActionId {
    pub fn new(controller: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            controller: controller.into(),
            action: action.into(),
        }
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.controller, self.action)
    }
}

/// The set of methods a route accepts. Empty means any method.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodSet {
    methods: Vec<Method>,
}

impl MethodSet {
    /// A set accepting every method.
    pub fn any() -> Self {
        Self::default()
    }

    /// Parse method names (case-insensitive).
    pub fn parse<I, S>(methods: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();
        for method in methods {
            let method = method.as_ref();
            let parsed = Method::from_bytes(method.trim().to_ascii_uppercase().as_bytes())
                .map_err(|_| method.to_string())?;
            set.insert(parsed);
        }
        Ok(set)
    }

    pub fn insert(&mut self, method: Method) {
        if !self.methods.contains(&method) {
            self.methods.push(method);
            self.methods.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        }
    }

    pub fn extend(&mut self, other: &MethodSet) {
        for method in &other.methods {
            self.insert(method.clone());
        }
    }

    /// True if this set places no restriction on the method.
    pub fn is_any(&self) -> bool {
        self.methods.is_empty()
    }

    pub fn allows(&self, method: &Method) -> bool {
        self.is_any() || self.methods.contains(method)
    }

    /// The listed methods, sorted by name. Empty for an any-method set.
    pub fn iter(&self) -> impl Iterator<Item = &Method> {
        self.methods.iter()
    }
}

impl fmt::Display for MethodSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_any() {
            return f.write_str("*");
        }
        let names: Vec<&str> = self.methods.iter().map(Method::as_str).collect();
        f.write_str(&names.join(","))
    }
}

/// Where a definition came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RouteOrigin {
    /// An explicit `Route` declaration on the action.
    Explicit,
    /// The controller's `DefaultRoute`.
    DefaultRoute,
}

/// Ranking key; smaller sorts first.
///
/// Explicit routes always precede default routes. Within an origin: explicit
/// `order`, then fewer optional segments, then more literals, then the
/// per-segment precedence digits, then declaration index.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Specificity {
    origin: RouteOrigin,
    order: i32,
    optional_segments: usize,
    literal_segments: Reverse<usize>,
    precedence: Vec<u8>,
    index: usize,
}

impl Specificity {
    fn compute(template: &Template, origin: RouteOrigin, order: i32, index: usize) -> Self {
        let segments = template.segments();
        Self {
            origin,
            order,
            optional_segments: segments.iter().filter(|s| s.is_optional()).count(),
            literal_segments: Reverse(
                segments
                    .iter()
                    .filter(|s| matches!(s, Segment::Literal(_)))
                    .count(),
            ),
            precedence: segments.iter().map(Segment::precedence).collect(),
            index,
        }
    }
}

/// One row of the route table.
#[derive(Debug, Clone)]
pub struct RouteDefinition {
    pub template: Template,
    pub allowed_methods: MethodSet,
    pub action: ActionId,
    pub origin: RouteOrigin,
    pub name: Option<String>,
    pub specificity: Specificity,
}

/// The immutable, ordered route table.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    definitions: Vec<RouteDefinition>,
    names: HashMap<String, usize>,
}

/// An action's explicit declarations, grouped by effective template.
struct TemplateGroup {
    effective: String,
    methods: MethodSet,
    names: Vec<String>,
    order: i32,
}

impl RouteTable {
    /// Build a table from controller metadata.
    ///
    /// Fails on the first malformed template, invalid method, bad prefix or
    /// duplicate route name. Declaration order within the input is kept as
    /// the final tie-breaker.
    pub fn build(controllers: &[ControllerMetadata]) -> Result<Self, BuildError> {
        let mut definitions = Vec::new();
        let mut pending_names: Vec<(String, usize, ActionId)> = Vec::new();

        for controller in controllers {
            validate_prefix(controller)?;

            let mut seen_actions: Vec<&str> = Vec::new();
            for action in &controller.actions {
                if seen_actions.contains(&action.name.as_str()) {
                    return Err(BuildError::DuplicateAction {
                        controller: controller.name.clone(),
                        action: action.name.clone(),
                    });
                }
                seen_actions.push(&action.name);

                let id = ActionId::new(&controller.name, &action.name);
                let action_methods = parse_methods(&id.to_string(), &action.methods)?;
                let prefix = controller.prefix.as_deref();

                if action.routes.is_empty() {
                    let Some(default_route) = controller.default_route.as_deref() else {
                        tracing::debug!(action = %id, "action has no route and no default route; not routable");
                        continue;
                    };
                    let effective = compose(prefix, default_route);
                    let template = parse_template(&id, &effective)?;
                    push_definition(
                        &mut definitions,
                        template,
                        action_methods,
                        id,
                        RouteOrigin::DefaultRoute,
                        None,
                        0,
                    );
                    continue;
                }

                for group in group_declarations(&id, prefix, &action.routes)? {
                    let template = parse_template(&id, &group.effective)?;
                    let mut methods = action_methods.clone();
                    methods.extend(&group.methods);

                    let index = definitions.len();
                    for name in &group.names {
                        pending_names.push((name.clone(), index, id.clone()));
                    }
                    push_definition(
                        &mut definitions,
                        template,
                        methods,
                        id.clone(),
                        RouteOrigin::Explicit,
                        group.names.first().cloned(),
                        group.order,
                    );
                }
            }
        }

        // Names point at declaration indices; resolve them after sorting.
        let mut names_by_index: HashMap<String, usize> = HashMap::new();
        let mut owners: HashMap<String, ActionId> = HashMap::new();
        for (name, index, owner) in pending_names {
            if let Some(first) = owners.get(&name) {
                return Err(BuildError::DuplicateRouteName {
                    name,
                    first: first.to_string(),
                    second: owner.to_string(),
                });
            }
            owners.insert(name.clone(), owner);
            names_by_index.insert(name, index);
        }

        definitions.sort_by(|a, b| a.specificity.cmp(&b.specificity));

        let names = names_by_index
            .into_iter()
            .filter_map(|(name, declared)| {
                definitions
                    .iter()
                    .position(|d| d.specificity.index == declared)
                    .map(|position| (name, position))
            })
            .collect();

        let table = Self { definitions, names };

        for definition in &table.definitions {
            tracing::debug!(
                template = %definition.template,
                methods = %definition.allowed_methods,
                action = %definition.action,
                origin = ?definition.origin,
                "route registered"
            );
        }
        tracing::debug!(
            controllers = controllers.len(),
            routes = table.definitions.len(),
            "route table built"
        );

        Ok(table)
    }

    /// Definitions in specificity order.
    pub fn definitions(&self) -> &[RouteDefinition] {
        &self.definitions
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Look up a definition by route name.
    pub fn by_name(&self, name: &str) -> Option<&RouteDefinition> {
        self.names.get(name).map(|&i| &self.definitions[i])
    }
}

fn push_definition(
    definitions: &mut Vec<RouteDefinition>,
    template: Template,
    allowed_methods: MethodSet,
    action: ActionId,
    origin: RouteOrigin,
    name: Option<String>,
    order: i32,
) {
    let index = definitions.len();
    let specificity = Specificity::compute(&template, origin, order, index);
    definitions.push(RouteDefinition {
        template,
        allowed_methods,
        action,
        origin,
        name,
        specificity,
    });
}

/// Merge declarations that compose to the same template; their method sets
/// are unioned. Groups keep the position of their first declaration.
fn group_declarations(
    id: &ActionId,
    prefix: Option<&str>,
    routes: &[RouteDeclaration],
) -> Result<Vec<TemplateGroup>, BuildError> {
    let mut groups: Vec<TemplateGroup> = Vec::new();
    let location = id.to_string();

    for route in routes {
        let effective = compose(prefix, &route.template);
        let methods = parse_methods(&location, &route.methods)?;

        match groups.iter_mut().find(|g| g.effective == effective) {
            Some(group) => {
                group.methods.extend(&methods);
                group.order = group.order.min(route.order);
                if let Some(name) = &route.name {
                    if !group.names.contains(name) {
                        group.names.push(name.clone());
                    }
                }
            }
            None => groups.push(TemplateGroup {
                effective,
                methods,
                names: route.name.iter().cloned().collect(),
                order: route.order,
            }),
        }
    }

    Ok(groups)
}

fn parse_methods(location: &str, methods: &[String]) -> Result<MethodSet, BuildError> {
    MethodSet::parse(methods).map_err(|method| BuildError::InvalidMethod {
        location: location.to_string(),
        method,
    })
}

fn parse_template(id: &ActionId, effective: &str) -> Result<Template, BuildError> {
    Template::parse(effective).map_err(|source| BuildError::Template {
        controller: id.controller.clone(),
        action: id.action.clone(),
        source,
    })
}

/// A prefix has action templates appended, so it may only hold literals and
/// required parameters.
fn validate_prefix(controller: &ControllerMetadata) -> Result<(), BuildError> {
    let Some(prefix) = controller.prefix.as_deref() else {
        return Ok(());
    };

    let invalid = |reason: String| BuildError::InvalidPrefix {
        controller: controller.name.clone(),
        reason,
    };

    if prefix.starts_with(crate::compose::PREFIX_OVERRIDE) {
        return Err(invalid(format!("'{}' must not start with '~/'", prefix)));
    }

    let template = Template::parse(prefix).map_err(|e| invalid(e.to_string()))?;
    if let Some(segment) = template.segments().iter().find(|s| s.is_optional()) {
        return Err(invalid(format!(
            "segment '{}' is optional; prefixes may only contain literals and required parameters",
            segment
        )));
    }
    Ok(())
}
