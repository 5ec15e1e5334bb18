//! Identifier allocation and typed handles into a workspace graph.
//!
//! Every [`Workspace`](crate::model::Workspace) owns one [`IdAllocator`], so
//! two workspaces built side by side never share a sequence. Elements and
//! relationships are addressed through the copyable [`ElementRef`] and
//! [`RelationshipRef`] handles; [`NodeRef`] additionally names the workspace
//! root where either an element or the workspace itself may appear.

use std::fmt;

/// Issues identifiers for one workspace.
///
/// Two monotonic counters are kept. The first one numbers workspaces, the
/// second one is shared by elements and relationships so that an element id
/// can never collide with a relationship id.
///
/// # Examples
///
/// ```
/// use cartograph_core::identifier::IdAllocator;
///
/// let mut ids = IdAllocator::new();
/// assert_eq!(ids.next_workspace_id(), 1);
/// assert_eq!(ids.next_element_or_relationship_id(), "1");
/// assert_eq!(ids.next_element_or_relationship_id(), "2");
/// ```
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    workspace: u64,
    element_or_relationship: u64,
}

impl IdAllocator {
    /// Creates an allocator whose counters both start at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a fresh workspace id.
    pub fn next_workspace_id(&mut self) -> u64 {
        self.workspace += 1;
        self.workspace
    }

    /// Returns a fresh id from the sequence shared by elements and relationships.
    pub fn next_element_or_relationship_id(&mut self) -> String {
        self.element_or_relationship += 1;
        self.element_or_relationship.to_string()
    }
}

/// Handle to an element stored in a workspace.
///
/// Handles are only meaningful for the workspace that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementRef(usize);

impl ElementRef {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub(crate) fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element#{}", self.0)
    }
}

/// Handle to a relationship stored in a workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelationshipRef(usize);

impl RelationshipRef {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub(crate) fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for RelationshipRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "relationship#{}", self.0)
    }
}

/// A node of the containment tree: either the workspace root or an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRef {
    /// The workspace itself.
    Workspace,
    /// An element below the workspace.
    Element(ElementRef),
}

impl NodeRef {
    /// Returns the element handle, or `None` for the workspace root.
    pub fn element(self) -> Option<ElementRef> {
        match self {
            NodeRef::Workspace => None,
            NodeRef::Element(element) => Some(element),
        }
    }
}

impl From<ElementRef> for NodeRef {
    fn from(element: ElementRef) -> Self {
        NodeRef::Element(element)
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeRef::Workspace => write!(f, "workspace"),
            NodeRef::Element(element) => write!(f, "{element}"),
        }
    }
}
