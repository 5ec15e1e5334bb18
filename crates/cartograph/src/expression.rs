//! Include / exclude filtering of elements and relationships.
//!
//! An [`Expression`] holds predicates over [`ElementContext`] and
//! [`RelationshipContext`], read-only views of the graph around one element
//! or relationship. Elements are kept if at least one include predicate holds
//! (every element, when there is none) and no exclude predicate holds.
//! Relationships are filtered the same way and are additionally dropped when
//! either endpoint matches an element exclude predicate.

use indexmap::{IndexMap, IndexSet};
use log::trace;

use cartograph_core::{
    identifier::{ElementRef, NodeRef, RelationshipRef},
    model::{Element, ElementKind, Relationship, Tags, Workspace},
};

use crate::explorer::Explorer;

/// A boxed predicate over elements.
pub type ElementPredicate<'p> = Box<dyn Fn(&ElementContext<'_>) -> bool + 'p>;

/// A boxed predicate over relationships.
pub type RelationshipPredicate<'p> = Box<dyn Fn(&RelationshipContext<'_>) -> bool + 'p>;

/// An element as seen by filter predicates.
#[derive(Clone, Copy)]
pub struct ElementContext<'w> {
    workspace: &'w Workspace,
    element_ref: ElementRef,
    element: &'w Element,
}

impl<'w> ElementContext<'w> {
    /// Returns `None` for out-of-range handles.
    pub fn new(workspace: &'w Workspace, element_ref: ElementRef) -> Option<Self> {
        let element = workspace.element(element_ref).ok()?;
        Some(Self {
            workspace,
            element_ref,
            element,
        })
    }

    pub fn workspace(&self) -> &'w Workspace {
        self.workspace
    }

    pub fn element_ref(&self) -> ElementRef {
        self.element_ref
    }

    pub fn id(&self) -> &'w str {
        self.element.id()
    }

    pub fn name(&self) -> &'w str {
        self.element.name()
    }

    pub fn description(&self) -> &'w str {
        self.element.description()
    }

    pub fn kind(&self) -> ElementKind {
        self.element.kind()
    }

    pub fn tags(&self) -> &'w Tags {
        self.element.tags()
    }

    /// The technology; always `None` for kinds without one.
    pub fn technology(&self) -> Option<&'w str> {
        self.element.technology()
    }

    pub fn group(&self) -> &'w str {
        self.element.group()
    }

    pub fn parent(&self) -> Option<NodeRef> {
        self.element.parent()
    }

    pub fn properties(&self) -> &'w IndexMap<String, String> {
        self.element.properties()
    }

    /// Elements with a relationship to this one.
    pub fn sources(&self) -> Neighbours<'w> {
        Neighbours {
            workspace: self.workspace,
            elements: self.element.sources(),
        }
    }

    /// Elements this one has a relationship to.
    pub fn destinations(&self) -> Neighbours<'w> {
        Neighbours {
            workspace: self.workspace,
            elements: self.element.destinations(),
        }
    }

    /// Whether this is the given element.
    pub fn is(&self, element: ElementRef) -> bool {
        self.element_ref == element
    }
}

/// The sources or destinations of an element, flattened for matching.
#[derive(Clone, Copy)]
pub struct Neighbours<'w> {
    workspace: &'w Workspace,
    elements: &'w [ElementRef],
}

impl<'w> Neighbours<'w> {
    pub fn contains(&self, element: ElementRef) -> bool {
        self.elements.contains(&element)
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Neighbours in relationship order, one entry per relationship.
    pub fn iter(self) -> impl Iterator<Item = ElementContext<'w>> {
        let workspace = self.workspace;
        self.elements
            .iter()
            .filter_map(move |&element| ElementContext::new(workspace, element))
    }

    pub fn ids(&self) -> IndexSet<&'w str> {
        self.iter().map(|element| element.id()).collect()
    }

    pub fn names(&self) -> IndexSet<&'w str> {
        self.iter().map(|element| element.name()).collect()
    }

    /// Union of the neighbours' tags.
    pub fn tags(&self) -> IndexSet<&'w str> {
        self.iter().flat_map(|element| element.tags().iter()).collect()
    }
}

/// A relationship as seen by filter predicates.
#[derive(Clone, Copy)]
pub struct RelationshipContext<'w> {
    workspace: &'w Workspace,
    relationship_ref: RelationshipRef,
    relationship: &'w Relationship,
}

impl<'w> RelationshipContext<'w> {
    /// Returns `None` for out-of-range handles.
    pub fn new(workspace: &'w Workspace, relationship_ref: RelationshipRef) -> Option<Self> {
        let relationship = workspace.relationship(relationship_ref).ok()?;
        Some(Self {
            workspace,
            relationship_ref,
            relationship,
        })
    }

    pub fn relationship_ref(&self) -> RelationshipRef {
        self.relationship_ref
    }

    pub fn id(&self) -> &'w str {
        self.relationship.id()
    }

    pub fn description(&self) -> &'w str {
        self.relationship.description()
    }

    pub fn technology(&self) -> Option<&'w str> {
        self.relationship.technology()
    }

    pub fn tags(&self) -> &'w Tags {
        self.relationship.tags()
    }

    pub fn url(&self) -> Option<&'w str> {
        self.relationship.url()
    }

    pub fn properties(&self) -> &'w IndexMap<String, String> {
        self.relationship.properties()
    }

    pub fn is_implied(&self) -> bool {
        self.relationship.is_implied()
    }

    pub fn source(&self) -> Option<ElementContext<'w>> {
        ElementContext::new(self.workspace, self.relationship.source())
    }

    pub fn destination(&self) -> Option<ElementContext<'w>> {
        ElementContext::new(self.workspace, self.relationship.destination())
    }
}

/// Include and exclude predicates for elements and relationships.
///
/// # Examples
///
/// ```
/// use cartograph::{
///     Expression,
///     identifier::NodeRef,
///     model::{ElementSpec, Workspace},
/// };
///
/// # fn main() -> Result<(), cartograph::CartographError> {
/// let mut ws = Workspace::new("w", "");
/// let api = ws.add(NodeRef::Workspace, ElementSpec::software_system("API").tag("internal"))?;
/// let bank = ws.add(NodeRef::Workspace, ElementSpec::software_system("Bank").tag("external"))?;
/// ws.relate(api).described_as("Pays through").to(bank)?;
///
/// let expression = Expression::new().exclude_element(|e| e.tags().contains("external"));
///
/// assert_eq!(expression.elements(&ws), vec![api]);
/// assert!(expression.relationships(&ws).is_empty());
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct Expression<'p> {
    include_elements: Vec<ElementPredicate<'p>>,
    exclude_elements: Vec<ElementPredicate<'p>>,
    include_relationships: Vec<RelationshipPredicate<'p>>,
    exclude_relationships: Vec<RelationshipPredicate<'p>>,
}

impl<'p> Expression<'p> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include_element(mut self, predicate: impl Fn(&ElementContext<'_>) -> bool + 'p) -> Self {
        self.include_elements.push(Box::new(predicate));
        self
    }

    pub fn exclude_element(mut self, predicate: impl Fn(&ElementContext<'_>) -> bool + 'p) -> Self {
        self.exclude_elements.push(Box::new(predicate));
        self
    }

    pub fn include_relationship(
        mut self,
        predicate: impl Fn(&RelationshipContext<'_>) -> bool + 'p,
    ) -> Self {
        self.include_relationships.push(Box::new(predicate));
        self
    }

    pub fn exclude_relationship(
        mut self,
        predicate: impl Fn(&RelationshipContext<'_>) -> bool + 'p,
    ) -> Self {
        self.exclude_relationships.push(Box::new(predicate));
        self
    }

    /// Whether any element include predicate was given.
    pub fn has_element_includes(&self) -> bool {
        !self.include_elements.is_empty()
    }

    /// At least one include predicate holds, or there are none.
    pub fn is_element_included(&self, element: &ElementContext<'_>) -> bool {
        self.include_elements.is_empty()
            || self.include_elements.iter().any(|include| include(element))
    }

    pub fn is_element_excluded(&self, element: &ElementContext<'_>) -> bool {
        self.exclude_elements.iter().any(|exclude| exclude(element))
    }

    /// At least one include predicate holds, or there are none.
    pub fn is_relationship_included(&self, relationship: &RelationshipContext<'_>) -> bool {
        self.include_relationships.is_empty()
            || self
                .include_relationships
                .iter()
                .any(|include| include(relationship))
    }

    /// A relationship exclude predicate holds, or an endpoint is an excluded
    /// element.
    pub fn is_relationship_excluded(&self, relationship: &RelationshipContext<'_>) -> bool {
        if self
            .exclude_relationships
            .iter()
            .any(|exclude| exclude(relationship))
        {
            return true;
        }
        [relationship.source(), relationship.destination()]
            .iter()
            .flatten()
            .any(|endpoint| self.is_element_excluded(endpoint))
    }

    /// Elements of the workspace that pass the filter, in traversal order.
    pub fn elements(&self, workspace: &Workspace) -> Vec<ElementRef> {
        let explorer = Explorer::new(NodeRef::Workspace);
        let selected: Vec<ElementRef> = explorer
            .walk_elements(workspace)
            .iter()
            .filter_map(|&element| ElementContext::new(workspace, element))
            .filter(|element| self.is_element_included(element) && !self.is_element_excluded(element))
            .map(|element| element.element_ref())
            .collect();
        trace!(count = selected.len(); "Elements filtered");
        selected
    }

    /// Relationships of the workspace that pass the filter, in traversal
    /// order.
    pub fn relationships(&self, workspace: &Workspace) -> Vec<RelationshipRef> {
        let explorer = Explorer::new(NodeRef::Workspace);
        let selected: Vec<RelationshipRef> = explorer
            .walk_relationships(workspace)
            .iter()
            .filter_map(|&relationship| RelationshipContext::new(workspace, relationship))
            .filter(|relationship| {
                self.is_relationship_included(relationship)
                    && !self.is_relationship_excluded(relationship)
            })
            .map(|relationship| relationship.relationship_ref())
            .collect();
        trace!(count = selected.len(); "Relationships filtered");
        selected
    }
}
