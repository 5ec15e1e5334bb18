//! Group scopes and the workspace configuration that governs them.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// The default separator joining nested group names.
pub const DEFAULT_GROUP_SEPARATOR: char = '/';

/// Scope of a workspace, as understood by Structurizr tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scope {
    #[serde(alias = "landscape")]
    Landscape,
    #[serde(alias = "softwaresystem", alias = "software_system")]
    SoftwareSystem,
}

/// Workspace-level configuration.
///
/// # Examples
///
/// ```
/// use cartograph_core::model::{Scope, WorkspaceConfiguration};
///
/// let config = WorkspaceConfiguration::new(Some(Scope::Landscape), "|").unwrap();
/// assert_eq!(config.group_separator(), '|');
///
/// assert!(WorkspaceConfiguration::new(None, "::").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceConfiguration {
    #[serde(skip_serializing_if = "Option::is_none")]
    scope: Option<Scope>,
    group_separator: char,
}

impl WorkspaceConfiguration {
    /// Creates a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidGroupSeparator`] unless `group_separator`
    /// is exactly one character.
    pub fn new(scope: Option<Scope>, group_separator: &str) -> Result<Self, ModelError> {
        Ok(Self {
            scope,
            group_separator: parse_separator(group_separator)?,
        })
    }

    pub fn scope(&self) -> Option<Scope> {
        self.scope
    }

    pub fn group_separator(&self) -> char {
        self.group_separator
    }
}

impl Default for WorkspaceConfiguration {
    fn default() -> Self {
        Self {
            scope: None,
            group_separator: DEFAULT_GROUP_SEPARATOR,
        }
    }
}

fn parse_separator(separator: &str) -> Result<char, ModelError> {
    let mut chars = separator.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(ch),
        _ => Err(ModelError::InvalidGroupSeparator {
            separator: separator.to_string(),
        }),
    }
}

/// Stack of the group names currently in scope.
#[derive(Debug, Clone, Default)]
pub(crate) struct GroupStack {
    segments: Vec<String>,
}

impl GroupStack {
    /// Pushes a group after checking that its name is free of the separator.
    pub(crate) fn enter(&mut self, name: &str, separator: char) -> Result<(), ModelError> {
        if name.contains(separator) {
            return Err(ModelError::InvalidGroupName {
                name: name.to_string(),
                separator,
            });
        }
        self.segments.push(name.to_string());
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        self.segments.pop();
    }

    /// The active group path, empty outside of any group.
    pub(crate) fn path(&self, separator: char) -> String {
        self.segments.join(separator.to_string().as_str())
    }
}
