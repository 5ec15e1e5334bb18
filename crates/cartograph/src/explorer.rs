//! Depth-first traversal of the containment tree.
//!
//! # Caching
//!
//! An [`Explorer`] walks its root once per sequence and keeps the result.
//! Later calls replay the stored sequence, even if the workspace changed in
//! the meantime. Build a new explorer to observe a mutated graph.
//!
//! The cache is not keyed by workspace either: an explorer answers with the
//! handles of the first workspace it walked, whatever workspace later calls
//! pass. Use one explorer per workspace.

use std::cell::OnceCell;

use log::trace;

use cartograph_core::{
    identifier::{ElementRef, NodeRef, RelationshipRef},
    model::Workspace,
};

/// Cached pre-order walker over the elements below a root node.
///
/// # Examples
///
/// ```
/// use cartograph::{
///     Explorer,
///     identifier::NodeRef,
///     model::{ElementSpec, Workspace},
/// };
///
/// # fn main() -> Result<(), cartograph::CartographError> {
/// let mut ws = Workspace::new("w", "");
/// let user = ws.add(NodeRef::Workspace, ElementSpec::person("User"))?;
/// let shop = ws.add(NodeRef::Workspace, ElementSpec::software_system("Shop"))?;
/// let web = ws.add(shop, ElementSpec::container("Web"))?;
///
/// let explorer = Explorer::new(NodeRef::Workspace);
/// assert_eq!(explorer.walk_elements(&ws), &[user, shop, web]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Explorer {
    root: NodeRef,
    elements: OnceCell<Vec<ElementRef>>,
    relationships: OnceCell<Vec<RelationshipRef>>,
}

impl Explorer {
    /// Creates an explorer rooted at the workspace or at an element.
    pub fn new(root: impl Into<NodeRef>) -> Self {
        Self {
            root: root.into(),
            elements: OnceCell::new(),
            relationships: OnceCell::new(),
        }
    }

    pub fn root(&self) -> NodeRef {
        self.root
    }

    /// Every element below the root, parents before their children and
    /// siblings in insertion order. The root itself is not included.
    pub fn walk_elements(&self, workspace: &Workspace) -> &[ElementRef] {
        self.elements.get_or_init(|| {
            let mut elements = Vec::new();
            visit(workspace, self.root, &mut |element| elements.push(element));
            trace!(root:? = self.root, count = elements.len(); "Elements walked");
            elements
        })
    }

    /// Outgoing relationships of every element below the root.
    ///
    /// Each element contributes its own relationships, in creation order,
    /// before any of its descendants do.
    pub fn walk_relationships(&self, workspace: &Workspace) -> &[RelationshipRef] {
        self.relationships.get_or_init(|| {
            let mut relationships = Vec::new();
            visit(workspace, self.root, &mut |element| {
                if let Ok(element) = workspace.element(element) {
                    relationships.extend_from_slice(element.relationships());
                }
            });
            trace!(root:? = self.root, count = relationships.len(); "Relationships walked");
            relationships
        })
    }
}

fn visit(workspace: &Workspace, node: NodeRef, on_element: &mut impl FnMut(ElementRef)) {
    let Ok(children) = workspace.children(node) else {
        return;
    };
    for &child in children {
        on_element(child);
        visit(workspace, child.into(), on_element);
    }
}


#[cfg(test)]
mod proptest_tests {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use cartograph_core::model::{ElementKind, ElementSpec};

    use super::*;

    // ===================
    // Strategies
    // ===================

    fn kind_strategy() -> impl Strategy<Value = ElementKind> {
        prop_oneof![
            Just(ElementKind::Person),
            Just(ElementKind::SoftwareSystem),
            Just(ElementKind::Container),
            Just(ElementKind::Component),
            Just(ElementKind::Element),
        ]
    }

    /// Element kind plus a pick among the nodes added so far (0 is the workspace).
    fn step_strategy() -> impl Strategy<Value = Vec<(ElementKind, usize)>> {
        prop::collection::vec((kind_strategy(), any::<usize>()), 0..40)
    }

    /// Builds a workspace, skipping placements the model rejects.
    fn build(steps: &[(ElementKind, usize)]) -> (Workspace, Vec<ElementRef>) {
        let mut ws = Workspace::new("w", "");
        let mut attached = Vec::new();
        for (idx, &(kind, pick)) in steps.iter().enumerate() {
            let parent = match pick % (attached.len() + 1) {
                0 => NodeRef::Workspace,
                n => NodeRef::Element(attached[n - 1]),
            };
            if let Ok(element) = ws.add(parent, ElementSpec::new(kind, format!("e{idx}"))) {
                attached.push(element);
            }
        }
        (ws, attached)
    }

    // ===================
    // Property Test Functions
    // ===================

    /// The walk lists every attached element once.
    fn check_walk_covers_attached(steps: &[(ElementKind, usize)]) -> Result<(), TestCaseError> {
        let (ws, attached) = build(steps);
        let walked = Explorer::new(NodeRef::Workspace).walk_elements(&ws).to_vec();

        prop_assert_eq!(walked.len(), attached.len());
        let walked: HashSet<_> = walked.into_iter().collect();
        let attached: HashSet<_> = attached.into_iter().collect();
        prop_assert_eq!(walked, attached);
        Ok(())
    }

    /// Each element is directly followed by the walk of its own subtree.
    fn check_walk_is_pre_order(steps: &[(ElementKind, usize)]) -> Result<(), TestCaseError> {
        let (ws, _) = build(steps);
        let walked = Explorer::new(NodeRef::Workspace).walk_elements(&ws).to_vec();

        for (idx, &element) in walked.iter().enumerate() {
            let subtree = Explorer::new(element).walk_elements(&ws).to_vec();
            prop_assert_eq!(&walked[idx + 1..idx + 1 + subtree.len()], subtree.as_slice());
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn walk_covers_attached(steps in step_strategy()) {
            check_walk_covers_attached(&steps)?;
        }

        #[test]
        fn walk_is_pre_order(steps in step_strategy()) {
            check_walk_is_pre_order(&steps)?;
        }
    }
}
