//! The workspace: root of the containment tree and owner of the graph.

use std::collections::HashSet;

use indexmap::IndexMap;
use log::{debug, info, trace};

use crate::{
    error::ModelError,
    identifier::{ElementRef, IdAllocator, NodeRef, RelationshipRef},
    model::{
        element::{Element, ElementKind, ElementSpec, normalize_name},
        group::{GroupStack, WorkspaceConfiguration},
        relationship::Relationship,
    },
    view::{View, ViewKind, ViewScope},
};

/// Root of an architecture model.
///
/// The workspace owns every element and relationship created through it and
/// the [`IdAllocator`] that numbers them. Elements are created detached and
/// join the model once they are passed to [`Workspace::contains`].
///
/// # Examples
///
/// ```
/// use cartograph_core::{
///     identifier::NodeRef,
///     model::{ElementSpec, Workspace},
/// };
///
/// # fn main() -> Result<(), cartograph_core::error::ModelError> {
/// let mut workspace = Workspace::new("Shop", "Online shop landscape");
/// let customer = workspace.create(ElementSpec::person("Customer"))?;
/// let shop = workspace.create(ElementSpec::software_system("Shop"))?;
/// workspace.contains(NodeRef::Workspace, [customer, shop])?.get();
///
/// workspace.relate(customer).described_as("Buys from").to(shop)?;
///
/// assert_eq!(workspace.person("customer")?, customer);
/// assert_eq!(workspace.element(customer)?.relationships().len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Workspace {
    id: u64,
    name: String,
    description: String,
    configuration: WorkspaceConfiguration,
    pub(crate) ids: IdAllocator,
    pub(crate) elements: Vec<Element>,
    pub(crate) relationships: Vec<Relationship>,
    children: Vec<ElementRef>,
    child_names: IndexMap<String, ElementRef>,
    groups: GroupStack,
    views: Vec<View>,
}

impl Workspace {
    /// Creates an empty workspace with the default configuration.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::with_configuration(name, description, WorkspaceConfiguration::default())
    }

    /// Creates an empty workspace with the given configuration.
    pub fn with_configuration(
        name: impl Into<String>,
        description: impl Into<String>,
        configuration: WorkspaceConfiguration,
    ) -> Self {
        Self::with_allocator(name, description, configuration, IdAllocator::new())
    }

    /// Creates an empty workspace that continues numbering from `ids`.
    pub fn with_allocator(
        name: impl Into<String>,
        description: impl Into<String>,
        configuration: WorkspaceConfiguration,
        mut ids: IdAllocator,
    ) -> Self {
        let id = ids.next_workspace_id();
        let name = name.into();
        info!(workspace_id = id, name = name.as_str(); "Workspace created");

        Self {
            id,
            name,
            description: description.into(),
            configuration,
            ids,
            elements: Vec::new(),
            relationships: Vec::new(),
            children: Vec::new(),
            child_names: IndexMap::new(),
            groups: GroupStack::default(),
            views: Vec::new(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn configuration(&self) -> &WorkspaceConfiguration {
        &self.configuration
    }

    // =========================================================================
    // Elements
    // =========================================================================

    /// Creates a detached element.
    ///
    /// The element receives a fresh id and the currently active group path.
    /// It becomes part of the model once passed to [`Workspace::contains`].
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::TechnologyNotSupported`] if `spec` carries a
    /// technology its kind does not support.
    pub fn create(&mut self, spec: ElementSpec) -> Result<ElementRef, ModelError> {
        if spec.has_technology() && !spec.kind().can_have_technology() {
            return Err(ModelError::TechnologyNotSupported { kind: spec.kind() });
        }

        let id = self.ids.next_element_or_relationship_id();
        let group = self.groups.path(self.configuration.group_separator());
        let element_ref = ElementRef::new(self.elements.len());

        debug!(
            element_id = id.as_str(),
            kind:? = spec.kind(),
            name = spec.name(),
            group = group.as_str();
            "Element created"
        );

        self.elements.push(Element::new(id, group, spec));
        Ok(element_ref)
    }

    /// Creates an element and places it under `parent` in one step.
    ///
    /// # Errors
    ///
    /// Fails with the errors of [`Workspace::create`] and
    /// [`Workspace::contains`]. If containment fails, the element stays
    /// detached.
    pub fn add(
        &mut self,
        parent: impl Into<NodeRef>,
        spec: ElementSpec,
    ) -> Result<ElementRef, ModelError> {
        let element = self.create(spec)?;
        self.contains(parent.into(), [element])?.get();
        Ok(element)
    }

    /// Places `children` under `parent`, in order.
    ///
    /// Each child gets `parent` as its parent, is appended to the parent's
    /// child list and is registered under its normalized name for
    /// [`Workspace::find`]. All children are validated before any of them is
    /// attached.
    ///
    /// The returned [`Contained`] can declare relationships between the
    /// children; it hands back `parent`, so calls can be nested.
    ///
    /// # Errors
    ///
    /// - [`ModelError::UnknownElement`] for out-of-range handles.
    /// - [`ModelError::InvalidContainment`] if `parent` cannot hold a child,
    ///   e.g. a component placed directly in the workspace.
    /// - [`ModelError::AlreadyContained`] if a child already has a parent or
    ///   is listed twice.
    pub fn contains<P, I>(&mut self, parent: P, children: I) -> Result<Contained<'_, P>, ModelError>
    where
        P: Into<NodeRef> + Copy,
        I: IntoIterator<Item = ElementRef>,
    {
        let parent_node: NodeRef = parent.into();
        let parent_kind = match parent_node {
            NodeRef::Workspace => None,
            NodeRef::Element(element) => Some(self.element(element)?.kind()),
        };

        let children: Vec<ElementRef> = children.into_iter().collect();
        let mut seen = HashSet::with_capacity(children.len());
        for &child in &children {
            let element = self.element(child)?;
            let allowed = match parent_kind {
                None => element.kind().is_top_level(),
                Some(kind) => kind.accepts(element.kind()),
            };
            if !allowed {
                return Err(ModelError::InvalidContainment {
                    parent: parent_kind,
                    child: element.kind(),
                });
            }
            if element.parent().is_some() || !seen.insert(child) {
                return Err(ModelError::AlreadyContained {
                    name: element.name().to_string(),
                });
            }
        }

        for &child in &children {
            let element = &mut self.elements[child.index()];
            element.parent = Some(parent_node);
            let key = normalize_name(&element.name);
            debug!(
                parent:? = parent_node,
                child_id = element.id.as_str(),
                key = key.as_str();
                "Element contained"
            );

            match parent_node {
                NodeRef::Workspace => {
                    self.children.push(child);
                    self.child_names.insert(key, child);
                }
                NodeRef::Element(parent) => {
                    let parent = &mut self.elements[parent.index()];
                    parent.children.push(child);
                    parent.child_names.insert(key, child);
                }
            }
        }

        Ok(Contained {
            workspace: self,
            parent,
            children,
        })
    }

    /// Returns the element behind a handle.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownElement`] if the handle was not issued by
    /// this workspace.
    pub fn element(&self, element: ElementRef) -> Result<&Element, ModelError> {
        self.elements
            .get(element.index())
            .ok_or(ModelError::UnknownElement(element))
    }

    /// Iterates every element created in this workspace, attached or not, in
    /// creation order.
    pub fn elements(&self) -> impl Iterator<Item = (ElementRef, &Element)> {
        self.elements
            .iter()
            .enumerate()
            .map(|(idx, element)| (ElementRef::new(idx), element))
    }

    /// The ordered children of a node.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownElement`] for foreign handles.
    pub fn children(&self, parent: impl Into<NodeRef>) -> Result<&[ElementRef], ModelError> {
        match parent.into() {
            NodeRef::Workspace => Ok(&self.children),
            NodeRef::Element(element) => Ok(self.element(element)?.children()),
        }
    }

    /// Ancestors of an element, nearest first, stopping below the workspace.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownElement`] for foreign handles.
    pub fn ancestors(&self, element: ElementRef) -> Result<Vec<ElementRef>, ModelError> {
        let mut ancestors = Vec::new();
        let mut next = self.element(element)?.parent();
        while let Some(NodeRef::Element(ancestor)) = next {
            ancestors.push(ancestor);
            next = self.elements[ancestor.index()].parent();
        }
        Ok(ancestors)
    }

    // =========================================================================
    // Name lookup
    // =========================================================================

    /// Looks up a child of `parent` by name.
    ///
    /// The name is normalized as in [`normalize_name`], so `"Web Application"`
    /// and `"web_application"` find the same child.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NotFound`] if no child is registered under the
    /// name.
    pub fn find(&self, parent: impl Into<NodeRef>, name: &str) -> Result<ElementRef, ModelError> {
        let names = match parent.into() {
            NodeRef::Workspace => &self.child_names,
            NodeRef::Element(element) => &self.element(element)?.child_names,
        };
        names
            .get(&normalize_name(name))
            .copied()
            .ok_or_else(|| ModelError::NotFound {
                name: name.to_string(),
            })
    }

    /// Looks up a top-level person.
    pub fn person(&self, name: &str) -> Result<ElementRef, ModelError> {
        self.find_kind(NodeRef::Workspace, name, ElementKind::Person)
    }

    /// Looks up a top-level software system.
    pub fn software_system(&self, name: &str) -> Result<ElementRef, ModelError> {
        self.find_kind(NodeRef::Workspace, name, ElementKind::SoftwareSystem)
    }

    /// Looks up a top-level custom element.
    pub fn custom_element(&self, name: &str) -> Result<ElementRef, ModelError> {
        self.find_kind(NodeRef::Workspace, name, ElementKind::Element)
    }

    /// Looks up a container of a software system.
    pub fn container(&self, system: ElementRef, name: &str) -> Result<ElementRef, ModelError> {
        self.find_kind(system.into(), name, ElementKind::Container)
    }

    /// Looks up a component of a container.
    pub fn component(&self, container: ElementRef, name: &str) -> Result<ElementRef, ModelError> {
        self.find_kind(container.into(), name, ElementKind::Component)
    }

    fn find_kind(
        &self,
        parent: NodeRef,
        name: &str,
        expected: ElementKind,
    ) -> Result<ElementRef, ModelError> {
        let found = self.find(parent, name)?;
        let actual = self.elements[found.index()].kind();
        if actual != expected {
            return Err(ModelError::KindMismatch {
                name: name.to_string(),
                expected,
                actual,
            });
        }
        Ok(found)
    }

    // =========================================================================
    // Groups
    // =========================================================================

    /// Runs `build` with the group `name` in scope.
    ///
    /// Every element created inside `build` gets the active group path, the
    /// names of all enclosing groups joined by the configured separator. The
    /// group leaves scope when `build` returns, whether it succeeded or not.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidGroupName`] before `build` runs if `name`
    /// contains the group separator; otherwise returns what `build` returns.
    ///
    /// # Examples
    ///
    /// ```
    /// use cartograph_core::model::{ElementSpec, Workspace};
    ///
    /// # fn main() -> Result<(), cartograph_core::error::ModelError> {
    /// let mut workspace = Workspace::new("w", "");
    /// let a = workspace.group("Company 1", |ws| {
    ///     ws.group("Department 1", |ws| ws.create(ElementSpec::software_system("A")))
    /// })?;
    /// assert_eq!(workspace.element(a)?.group(), "Company 1/Department 1");
    /// # Ok(())
    /// # }
    /// ```
    pub fn group<T, F>(&mut self, name: &str, build: F) -> Result<T, ModelError>
    where
        F: FnOnce(&mut Self) -> Result<T, ModelError>,
    {
        let separator = self.configuration.group_separator();
        self.groups.enter(name, separator)?;
        trace!(group = name; "Entered group");

        let result = build(self);

        self.groups.leave();
        trace!(group = name; "Left group");
        result
    }

    /// Elements created under a group path or any group nested below it.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NotFound`] if no element was created under the
    /// path.
    pub fn elements_in_group(&self, path: &str) -> Result<Vec<ElementRef>, ModelError> {
        let separator = self.configuration.group_separator();
        let members: Vec<ElementRef> = self
            .elements()
            .filter(|(_, element)| {
                let group = element.group();
                group == path
                    || group
                        .strip_prefix(path)
                        .is_some_and(|rest| rest.starts_with(separator))
            })
            .map(|(element_ref, _)| element_ref)
            .collect();

        if members.is_empty() || path.is_empty() {
            return Err(ModelError::NotFound {
                name: path.to_string(),
            });
        }
        Ok(members)
    }

    // =========================================================================
    // Views
    // =========================================================================

    /// Stores a computed view.
    ///
    /// # Errors
    ///
    /// - [`ModelError::DuplicateViewKey`] if a view with the same key exists.
    /// - [`ModelError::InvalidViewScope`] if the scope does not match the view
    ///   kind: system context and container views need a software system,
    ///   component views a container, landscape views no scope.
    pub fn add_view(&mut self, view: View) -> Result<(), ModelError> {
        if self.views.iter().any(|existing| existing.key() == view.key()) {
            return Err(ModelError::DuplicateViewKey {
                key: view.key().to_string(),
            });
        }
        if !self.is_valid_scope(view.kind(), view.scope()) {
            return Err(ModelError::InvalidViewScope {
                key: view.key().to_string(),
            });
        }

        info!(
            key = view.key(),
            kind:? = view.kind(),
            elements = view.elements().len(),
            relationships = view.relationships().len();
            "View added"
        );
        self.views.push(view);
        Ok(())
    }

    /// Checks that a scope suits a view kind.
    pub fn is_valid_scope(&self, kind: ViewKind, scope: ViewScope) -> bool {
        let is_kind = |element: ElementRef, expected: ElementKind| {
            self.element(element)
                .is_ok_and(|element| element.kind() == expected)
        };
        match (kind, scope) {
            (ViewKind::SystemLandscape, ViewScope::None) => true,
            (ViewKind::SystemContext | ViewKind::Container, ViewScope::SoftwareSystem(system)) => {
                is_kind(system, ElementKind::SoftwareSystem)
            }
            (ViewKind::Component, ViewScope::Container(container)) => {
                is_kind(container, ElementKind::Container)
            }
            _ => false,
        }
    }

    /// Views in the order they were added.
    pub fn views(&self) -> &[View] {
        &self.views
    }

    /// Looks up a view by key.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NotFound`] if no view has the key.
    pub fn view(&self, key: &str) -> Result<&View, ModelError> {
        self.views
            .iter()
            .find(|view| view.key() == key)
            .ok_or_else(|| ModelError::NotFound {
                name: key.to_string(),
            })
    }
}

/// Result of [`Workspace::contains`]: the parent and its newly added children.
///
/// Relationships among the children can be declared right away, mirroring a
/// `where` clause in the fluent style.
#[must_use = "call `get` or declare relationships to recover the parent"]
pub struct Contained<'w, P> {
    workspace: &'w mut Workspace,
    parent: P,
    children: Vec<ElementRef>,
}

impl<'w, P: Copy> Contained<'w, P> {
    /// The parent the children were added to.
    pub fn parent(&self) -> P {
        self.parent
    }

    /// The children added by this call, in order.
    pub fn children(&self) -> &[ElementRef] {
        &self.children
    }

    /// Releases the workspace and returns the parent.
    pub fn get(self) -> P {
        self.parent
    }

    /// Declares relationships among the children and returns the parent.
    ///
    /// # Errors
    ///
    /// Propagates the first error returned by `define`.
    pub fn with_relationships<F>(self, define: F) -> Result<P, ModelError>
    where
        F: FnOnce(&mut Workspace, &[ElementRef]) -> Result<Vec<RelationshipRef>, ModelError>,
    {
        self.declare(define, false)
    }

    /// Like [`Contained::with_relationships`], additionally deriving the
    /// implied relationships of every relationship `define` returns.
    ///
    /// See [`Workspace::derive_implied`].
    pub fn with_implied_relationships<F>(self, define: F) -> Result<P, ModelError>
    where
        F: FnOnce(&mut Workspace, &[ElementRef]) -> Result<Vec<RelationshipRef>, ModelError>,
    {
        self.declare(define, true)
    }

    fn declare<F>(self, define: F, implied: bool) -> Result<P, ModelError>
    where
        F: FnOnce(&mut Workspace, &[ElementRef]) -> Result<Vec<RelationshipRef>, ModelError>,
    {
        let Contained {
            workspace,
            parent,
            children,
        } = self;

        let relationships = define(workspace, &children)?;
        if implied {
            for relationship in relationships {
                workspace.derive_implied(relationship)?;
            }
        }
        Ok(parent)
    }
}
