//! Error types for building the architecture model.

use thiserror::Error;

use crate::{
    identifier::{ElementRef, RelationshipRef},
    model::ElementKind,
};

/// Errors raised while constructing or querying a workspace graph.
///
/// Any error aborts construction of the current graph; nothing is retried or
/// partially recovered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// The workspace was used as a relationship endpoint.
    #[error("the workspace cannot be the {side} of a relationship")]
    WorkspaceEndpoint { side: &'static str },

    /// A name-based lookup found no child under that name.
    #[error("no element named `{name}`")]
    NotFound { name: String },

    /// A group name contains the configured group separator.
    #[error("group name `{name}` must not contain the group separator `{separator}`")]
    InvalidGroupName { name: String, separator: char },

    /// The group separator is not exactly one character long.
    #[error("group separator must be exactly one character, got `{separator}`")]
    InvalidGroupSeparator { separator: String },

    /// An element handle is out of range for this workspace.
    ///
    /// Handles are not tied to the workspace that issued them, so an
    /// in-range handle from another workspace resolves to an unrelated
    /// element.
    #[error("unknown element {0}")]
    UnknownElement(ElementRef),

    /// A relationship handle is out of range for this workspace.
    #[error("unknown relationship {0}")]
    UnknownRelationship(RelationshipRef),

    /// The element already has a parent.
    #[error("element `{name}` is already contained by another parent")]
    AlreadyContained { name: String },

    /// The parent kind cannot hold the child kind.
    #[error("{} cannot contain {child}", describe_parent(.parent))]
    InvalidContainment {
        parent: Option<ElementKind>,
        child: ElementKind,
    },

    /// A technology was given to an element kind that has none.
    #[error("{kind} elements do not carry a technology")]
    TechnologyNotSupported { kind: ElementKind },

    /// A typed lookup resolved to an element of another kind.
    #[error("`{name}` is a {actual}, not a {expected}")]
    KindMismatch {
        name: String,
        expected: ElementKind,
        actual: ElementKind,
    },

    /// A view is scoped to an element of the wrong kind.
    #[error("view `{key}` has an invalid scope")]
    InvalidViewScope { key: String },

    /// A view with the same key was already added.
    #[error("a view with key `{key}` already exists")]
    DuplicateViewKey { key: String },
}

fn describe_parent(parent: &Option<ElementKind>) -> String {
    match parent {
        Some(kind) => kind.to_string(),
        None => "a workspace".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_containment_message() {
        let err = ModelError::InvalidContainment {
            parent: None,
            child: ElementKind::Component,
        };
        assert_eq!(err.to_string(), "a workspace cannot contain Component");

        let err = ModelError::InvalidContainment {
            parent: Some(ElementKind::Person),
            child: ElementKind::Container,
        };
        assert_eq!(err.to_string(), "Person cannot contain Container");
    }

    #[test]
    fn test_workspace_endpoint_message() {
        let err = ModelError::WorkspaceEndpoint { side: "source" };
        assert_eq!(
            err.to_string(),
            "the workspace cannot be the source of a relationship"
        );
    }
}
