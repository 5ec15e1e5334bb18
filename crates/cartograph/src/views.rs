//! View definitions and the computation of their contents.
//!
//! A [`ViewDefinition`] names a view, fixes its scope and carries optional
//! user predicates. [`ViewDefinition::compute`] turns it into a stored
//! [`View`] by filtering the current graph.
//!
//! Every kind adds a built-in scoping predicate:
//!
//! | Kind             | Built-in element predicate                                   |
//! |------------------|--------------------------------------------------------------|
//! | System landscape | top-level elements                                            |
//! | System context   | the system, and top-level elements it talks to               |
//! | Container        | the system's containers, and their neighbours outside the system |
//! | Component        | the container's components, and their neighbours outside the container |
//!
//! An element is shown if the built-in predicate or any user include
//! predicate holds, and no user exclude predicate holds. A relationship is
//! shown if both endpoints are shown and it passes the user relationship
//! predicates, including cascading exclusion.

use indexmap::{IndexMap, IndexSet};
use log::{debug, trace};

use cartograph_core::{
    error::ModelError,
    identifier::{ElementRef, NodeRef, RelationshipRef},
    model::Workspace,
    view::{AutomaticLayout, View, ViewKind, ViewScope},
};

use crate::{
    explorer::Explorer,
    expression::{ElementContext, Expression, RelationshipContext},
};

/// Definition of a view, computed against a workspace when it is added.
///
/// # Examples
///
/// ```
/// use cartograph::{
///     ViewDefinition,
///     identifier::NodeRef,
///     model::{ElementSpec, Workspace},
/// };
///
/// # fn main() -> Result<(), cartograph::CartographError> {
/// let mut ws = Workspace::new("w", "");
/// let user = ws.add(NodeRef::Workspace, ElementSpec::person("User"))?;
/// let shop = ws.add(NodeRef::Workspace, ElementSpec::software_system("Shop"))?;
/// let other = ws.add(NodeRef::Workspace, ElementSpec::software_system("Other"))?;
/// ws.relate(user).described_as("Buys from").to(shop)?;
///
/// let view = ViewDefinition::system_context(shop, "shop-context", "The shop and its users")
///     .compute(&ws)?;
/// assert_eq!(view.elements(), &[user, shop]);
/// assert_eq!(view.relationships().len(), 1);
/// # let _ = other;
/// # Ok(())
/// # }
/// ```
pub struct ViewDefinition<'p> {
    kind: ViewKind,
    scope: ViewScope,
    key: String,
    description: String,
    title: Option<String>,
    automatic_layout: Option<AutomaticLayout>,
    properties: IndexMap<String, String>,
    expression: Expression<'p>,
}

impl<'p> ViewDefinition<'p> {
    fn new(kind: ViewKind, scope: ViewScope, key: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind,
            scope,
            key: key.into(),
            description: description.into(),
            title: None,
            automatic_layout: None,
            properties: IndexMap::new(),
            expression: Expression::new(),
        }
    }

    /// A view of every top-level element.
    pub fn system_landscape(key: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(ViewKind::SystemLandscape, ViewScope::None, key, description)
    }

    /// A view of a software system and what it talks to.
    pub fn system_context(
        system: ElementRef,
        key: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self::new(ViewKind::SystemContext, ViewScope::SoftwareSystem(system), key, description)
    }

    /// A view of the containers of a software system.
    pub fn container(
        system: ElementRef,
        key: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self::new(ViewKind::Container, ViewScope::SoftwareSystem(system), key, description)
    }

    /// A view of the components of a container.
    pub fn component(
        container: ElementRef,
        key: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self::new(ViewKind::Component, ViewScope::Container(container), key, description)
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn automatic_layout(mut self, layout: AutomaticLayout) -> Self {
        self.automatic_layout = Some(layout);
        self
    }

    pub fn property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn include_element(mut self, predicate: impl Fn(&ElementContext<'_>) -> bool + 'p) -> Self {
        self.expression = self.expression.include_element(predicate);
        self
    }

    pub fn exclude_element(mut self, predicate: impl Fn(&ElementContext<'_>) -> bool + 'p) -> Self {
        self.expression = self.expression.exclude_element(predicate);
        self
    }

    pub fn include_relationship(
        mut self,
        predicate: impl Fn(&RelationshipContext<'_>) -> bool + 'p,
    ) -> Self {
        self.expression = self.expression.include_relationship(predicate);
        self
    }

    pub fn exclude_relationship(
        mut self,
        predicate: impl Fn(&RelationshipContext<'_>) -> bool + 'p,
    ) -> Self {
        self.expression = self.expression.exclude_relationship(predicate);
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn kind(&self) -> ViewKind {
        self.kind
    }

    pub fn has_automatic_layout(&self) -> bool {
        self.automatic_layout.is_some()
    }

    /// Computes the view's element and relationship sets against the
    /// current graph.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidViewScope`] if the scope element is not
    /// of the kind the view needs.
    pub fn compute(&self, workspace: &Workspace) -> Result<View, ModelError> {
        if !workspace.is_valid_scope(self.kind, self.scope) {
            return Err(ModelError::InvalidViewScope {
                key: self.key.clone(),
            });
        }

        let explorer = Explorer::new(NodeRef::Workspace);
        let elements: IndexSet<ElementRef> = explorer
            .walk_elements(workspace)
            .iter()
            .filter_map(|&element| ElementContext::new(workspace, element))
            .filter(|element| {
                let shown = self.in_scope(element)
                    || (self.expression.has_element_includes()
                        && self.expression.is_element_included(element));
                shown && !self.expression.is_element_excluded(element)
            })
            .map(|element| element.element_ref())
            .collect();

        let relationships: Vec<RelationshipRef> = explorer
            .walk_relationships(workspace)
            .iter()
            .filter_map(|&relationship| RelationshipContext::new(workspace, relationship))
            .filter(|relationship| {
                let endpoints = workspace.relationship(relationship.relationship_ref());
                endpoints.is_ok_and(|r| {
                    elements.contains(&r.source()) && elements.contains(&r.destination())
                }) && self.expression.is_relationship_included(relationship)
                    && !self.expression.is_relationship_excluded(relationship)
            })
            .map(|relationship| relationship.relationship_ref())
            .collect();

        debug!(
            key = self.key.as_str(),
            kind:? = self.kind,
            elements = elements.len(),
            relationships = relationships.len();
            "View computed"
        );

        let mut view = View::new(self.kind, self.key.clone(), self.description.clone(), self.scope)
            .with_properties(self.properties.clone())
            .with_contents(elements.into_iter().collect(), relationships);
        if let Some(title) = &self.title {
            view = view.with_title(title.clone());
        }
        if let Some(layout) = self.automatic_layout {
            view = view.with_automatic_layout(layout);
        }
        Ok(view)
    }

    fn in_scope(&self, element: &ElementContext<'_>) -> bool {
        let shown = match self.scope {
            ViewScope::None => element.parent() == Some(NodeRef::Workspace),
            ViewScope::SoftwareSystem(system) if self.kind == ViewKind::SystemContext => {
                element.is(system)
                    || (element.parent() == Some(NodeRef::Workspace)
                        && !inside_scope(element, system)
                        && (element.sources().contains(system)
                            || element.destinations().contains(system)))
            }
            ViewScope::SoftwareSystem(scope) | ViewScope::Container(scope) => {
                child_or_neighbour_of_child(element, scope)
            }
        };
        trace!(element_id = element.id(), shown; "Scope checked");
        shown
    }
}

/// A direct child of `scope`, or a neighbour of one that lies outside `scope`.
fn child_or_neighbour_of_child(element: &ElementContext<'_>, scope: ElementRef) -> bool {
    let is_child =
        |candidate: &ElementContext<'_>| candidate.parent() == Some(NodeRef::Element(scope));
    if is_child(element) {
        return true;
    }

    !inside_scope(element, scope)
        && element
            .sources()
            .iter()
            .chain(element.destinations().iter())
            .any(|neighbour| is_child(&neighbour))
}

/// `scope` itself or one of its descendants.
fn inside_scope(element: &ElementContext<'_>, scope: ElementRef) -> bool {
    element.is(scope)
        || element
            .workspace()
            .ancestors(element.element_ref())
            .is_ok_and(|ancestors| ancestors.contains(&scope))
}

#[cfg(test)]
mod tests {
    use cartograph_core::model::ElementSpec;

    use super::*;

    struct Fixture {
        ws: Workspace,
        user: ElementRef,
        shop: ElementRef,
        bank: ElementRef,
        web: ElementRef,
        db: ElementRef,
        api: ElementRef,
        repo: ElementRef,
    }

    fn fixture() -> Fixture {
        let mut ws = Workspace::new("w", "");
        let user = ws.add(NodeRef::Workspace, ElementSpec::person("User")).unwrap();
        let shop = ws.add(NodeRef::Workspace, ElementSpec::software_system("Shop")).unwrap();
        let bank = ws
            .add(NodeRef::Workspace, ElementSpec::software_system("Bank").tag("external"))
            .unwrap();
        let web = ws.add(shop, ElementSpec::container("Web")).unwrap();
        let db = ws.add(shop, ElementSpec::container("Database")).unwrap();
        let api = ws.add(web, ElementSpec::component("API")).unwrap();
        let repo = ws.add(web, ElementSpec::component("Repository")).unwrap();

        ws.relate(user).described_as("Browses").to(web).unwrap();
        ws.relate(user).described_as("Buys from").to(shop).unwrap();
        ws.relate(shop).described_as("Charges through").to(bank).unwrap();
        ws.relate(web).described_as("Reads").to(db).unwrap();
        ws.relate(api).described_as("Calls").to(repo).unwrap();
        ws.relate(repo).described_as("Queries").to(db).unwrap();

        Fixture {
            ws,
            user,
            shop,
            bank,
            web,
            db,
            api,
            repo,
        }
    }

    #[test]
    fn test_landscape_shows_top_level() {
        let Fixture {
            ws,
            user,
            shop,
            bank,
            ..
        } = fixture();

        let view = ViewDefinition::system_landscape("landscape", "").compute(&ws).unwrap();

        assert_eq!(view.elements(), &[user, shop, bank]);
        assert_eq!(view.relationships().len(), 2);
        assert_eq!(view.scope(), ViewScope::None);
    }

    #[test]
    fn test_system_context() {
        let Fixture {
            ws,
            user,
            shop,
            bank,
            ..
        } = fixture();

        let view = ViewDefinition::system_context(shop, "context", "").compute(&ws).unwrap();

        assert_eq!(view.elements(), &[user, shop, bank]);
        for &relationship in view.relationships() {
            let relationship = ws.relationship(relationship).unwrap();
            assert!(relationship.source() == shop || relationship.destination() == shop);
        }
    }

    #[test]
    fn test_system_context_omits_own_containers() {
        let mut ws = Workspace::new("w", "");
        let user = ws.add(NodeRef::Workspace, ElementSpec::person("User")).unwrap();
        let shop = ws.add(NodeRef::Workspace, ElementSpec::software_system("Shop")).unwrap();
        let web = ws.add(shop, ElementSpec::container("Web")).unwrap();
        let api = ws.add(shop, ElementSpec::container("API")).unwrap();
        let handler = ws.add(api, ElementSpec::component("Handler")).unwrap();
        ws.relate(user).described_as("Browses").to(shop).unwrap();
        let calls = ws.relate(web).described_as("Calls").to(handler).unwrap().id();
        let implied = ws.derive_implied(calls).unwrap();
        assert_eq!(implied.len(), 2);

        let view = ViewDefinition::system_context(shop, "context", "").compute(&ws).unwrap();

        assert_eq!(view.elements(), &[user, shop]);
        for &element in view.elements() {
            assert_eq!(ws.element(element).unwrap().parent(), Some(NodeRef::Workspace));
        }
        assert_eq!(view.relationships().len(), 1);
    }

    #[test]
    fn test_container_view_excludes_system() {
        let Fixture {
            ws,
            user,
            shop,
            web,
            db,
            ..
        } = fixture();

        let view = ViewDefinition::container(shop, "containers", "").compute(&ws).unwrap();

        assert_eq!(view.elements(), &[user, web, db]);
        assert!(!view.elements().contains(&shop));
        assert_eq!(view.relationships().len(), 2);
    }

    #[test]
    fn test_component_view() {
        let Fixture {
            ws, web, db, api, repo, ..
        } = fixture();

        let view = ViewDefinition::component(web, "components", "").compute(&ws).unwrap();

        assert_eq!(view.elements(), &[api, repo, db]);
        assert_eq!(view.relationships().len(), 2);
    }

    #[test]
    fn test_user_predicates() {
        let Fixture {
            ws, user, shop, bank, ..
        } = fixture();

        let view = ViewDefinition::system_context(shop, "context", "")
            .exclude_element(|e| e.tags().contains("external"))
            .compute(&ws)
            .unwrap();
        assert_eq!(view.elements(), &[user, shop]);
        assert_eq!(view.relationships().len(), 1);

        let view = ViewDefinition::container(shop, "containers", "")
            .include_element(move |e| e.is(bank))
            .exclude_relationship(|r| r.description() == "Reads")
            .compute(&ws)
            .unwrap();
        assert!(view.elements().contains(&bank));
        assert_eq!(view.relationships().len(), 1);
    }

    #[test]
    fn test_wrong_scope_kind() {
        let Fixture { ws, web, shop, .. } = fixture();

        assert_eq!(
            ViewDefinition::system_context(web, "bad", "").compute(&ws).map(|v| v.key().to_string()),
            Err(ModelError::InvalidViewScope {
                key: "bad".to_string()
            })
        );
        assert!(ViewDefinition::component(shop, "bad", "").compute(&ws).is_err());
    }

    #[test]
    fn test_metadata_carried() {
        let Fixture { ws, .. } = fixture();

        let view = ViewDefinition::system_landscape("landscape", "Everything")
            .title("Landscape")
            .property("owner", "architecture")
            .automatic_layout(AutomaticLayout::default())
            .compute(&ws)
            .unwrap();

        assert_eq!(view.title(), Some("Landscape"));
        assert_eq!(view.description(), "Everything");
        assert_eq!(view.properties().get("owner").map(String::as_str), Some("architecture"));
        assert!(view.automatic_layout().is_some());
    }
}
