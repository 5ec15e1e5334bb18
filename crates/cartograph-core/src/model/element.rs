//! Element kinds and element records.
//!
//! All element variants share one record type, [`Element`]. What differs per
//! variant is captured by [`ElementKind`]: its base tag, whether it may carry
//! a technology, and which kinds it may contain.

use std::fmt;

use indexmap::IndexMap;

use crate::{
    identifier::{ElementRef, NodeRef, RelationshipRef},
    model::tags::{ELEMENT_TAG, Tags},
};

/// The variant of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Person,
    SoftwareSystem,
    Container,
    Component,
    /// A custom element outside the C4 vocabulary.
    Element,
}

impl ElementKind {
    /// The tag every element of this kind carries besides `"Element"`.
    pub fn base_tag(self) -> &'static str {
        match self {
            ElementKind::Person => "Person",
            ElementKind::SoftwareSystem => "Software System",
            ElementKind::Container => "Container",
            ElementKind::Component => "Component",
            ElementKind::Element => ELEMENT_TAG,
        }
    }

    /// Whether elements of this kind may have children at all.
    pub fn can_have_children(self) -> bool {
        matches!(self, ElementKind::SoftwareSystem | ElementKind::Container)
    }

    /// Whether elements of this kind carry a technology.
    pub fn can_have_technology(self) -> bool {
        matches!(self, ElementKind::Container | ElementKind::Component)
    }

    /// Whether an element of this kind may be placed directly in the workspace.
    pub fn is_top_level(self) -> bool {
        matches!(
            self,
            ElementKind::Person | ElementKind::SoftwareSystem | ElementKind::Element
        )
    }

    /// Whether an element of this kind may contain an element of `child` kind.
    pub fn accepts(self, child: ElementKind) -> bool {
        matches!(
            (self, child),
            (ElementKind::SoftwareSystem, ElementKind::Container)
                | (ElementKind::Container, ElementKind::Component)
        )
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base_tag())
    }
}

/// Declarative description of an element to be created in a workspace.
///
/// # Examples
///
/// ```
/// use cartograph_core::model::{ElementKind, ElementSpec};
///
/// let db = ElementSpec::container("Database")
///     .description("Stores orders")
///     .technology("PostgreSQL")
///     .tag("storage");
/// assert_eq!(db.kind(), ElementKind::Container);
/// ```
#[derive(Debug, Clone)]
pub struct ElementSpec {
    kind: ElementKind,
    name: String,
    description: String,
    technology: Option<String>,
    tags: Vec<String>,
    properties: IndexMap<String, String>,
}

impl ElementSpec {
    /// Creates an [`ElementSpec`] for an element of the given kind.
    pub fn new(kind: ElementKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            description: String::new(),
            technology: None,
            tags: Vec::new(),
            properties: IndexMap::new(),
        }
    }

    pub fn person(name: impl Into<String>) -> Self {
        Self::new(ElementKind::Person, name)
    }

    pub fn software_system(name: impl Into<String>) -> Self {
        Self::new(ElementKind::SoftwareSystem, name)
    }

    pub fn container(name: impl Into<String>) -> Self {
        Self::new(ElementKind::Container, name)
    }

    pub fn component(name: impl Into<String>) -> Self {
        Self::new(ElementKind::Component, name)
    }

    pub fn element(name: impl Into<String>) -> Self {
        Self::new(ElementKind::Element, name)
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the technology. Only containers and components accept one.
    pub fn technology(mut self, technology: impl Into<String>) -> Self {
        self.technology = Some(technology.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn has_technology(&self) -> bool {
        self.technology.is_some()
    }
}

/// An element of the architecture model.
///
/// Elements are owned by their [`Workspace`](crate::model::Workspace) and
/// addressed through [`ElementRef`] handles. Containment (`parent`,
/// `children`) forms a tree; `sources` and `destinations` record the
/// endpoints of relationships touching this element and play no part in
/// containment.
#[derive(Debug, Clone)]
pub struct Element {
    pub(crate) id: String,
    pub(crate) kind: ElementKind,
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) technology: Option<String>,
    pub(crate) tags: Tags,
    pub(crate) properties: IndexMap<String, String>,
    pub(crate) group: String,
    pub(crate) parent: Option<NodeRef>,
    pub(crate) children: Vec<ElementRef>,
    pub(crate) child_names: IndexMap<String, ElementRef>,
    pub(crate) relationships: Vec<RelationshipRef>,
    pub(crate) sources: Vec<ElementRef>,
    pub(crate) destinations: Vec<ElementRef>,
}

impl Element {
    pub(crate) fn new(id: String, group: String, spec: ElementSpec) -> Self {
        let mut tags = Tags::with_base([ELEMENT_TAG, spec.kind.base_tag()]);
        tags.extend(spec.tags);
        Self {
            id,
            kind: spec.kind,
            name: spec.name,
            description: spec.description,
            technology: spec.technology,
            tags,
            properties: spec.properties,
            group,
            parent: None,
            children: Vec::new(),
            child_names: IndexMap::new(),
            relationships: Vec::new(),
            sources: Vec::new(),
            destinations: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// The technology, for containers and components that declare one.
    pub fn technology(&self) -> Option<&str> {
        self.technology.as_deref()
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    pub fn properties(&self) -> &IndexMap<String, String> {
        &self.properties
    }

    /// The group path this element was created under, empty if none.
    pub fn group(&self) -> &str {
        &self.group
    }

    /// The parent, or `None` while the element is not yet contained.
    pub fn parent(&self) -> Option<NodeRef> {
        self.parent
    }

    pub fn children(&self) -> &[ElementRef] {
        &self.children
    }

    /// Outgoing relationships, in creation order.
    pub fn relationships(&self) -> &[RelationshipRef] {
        &self.relationships
    }

    /// Sources of incoming relationships, one entry per relationship.
    pub fn sources(&self) -> &[ElementRef] {
        &self.sources
    }

    /// Destinations of outgoing relationships, one entry per relationship.
    pub fn destinations(&self) -> &[ElementRef] {
        &self.destinations
    }
}

/// Normalizes a child name into its lookup key.
///
/// Lower-cases the name and replaces spaces with underscores, so
/// `"Web Application"` and `"web_application"` resolve to the same child.
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}
