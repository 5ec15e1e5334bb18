//! Configuration types for Cartograph.
//!
//! All types implement [`serde::Deserialize`] with every field defaulted, so
//! a caller can load a partial TOML or JSON document and keep the defaults
//! for the rest.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining workspace and layout settings.
//! - [`WorkspaceConfig`] - Scope and group separator of new workspaces.
//! - [`LayoutConfig`] - Automatic layout given to views that do not set one.
//!
//! # Example
//!
//! ```
//! # use cartograph::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.workspace().group_separator(), "/");
//! assert!(config.layout().automatic_layout().is_ok());
//! ```

use serde::Deserialize;

use cartograph_core::{
    model::{DEFAULT_GROUP_SEPARATOR, Scope, WorkspaceConfiguration},
    view::{AutomaticLayout, Implementation, RankDirection},
};

use crate::CartographError;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Workspace configuration section.
    #[serde(default)]
    workspace: WorkspaceConfig,

    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,
}

impl AppConfig {
    pub fn new(workspace: WorkspaceConfig, layout: LayoutConfig) -> Self {
        Self { workspace, layout }
    }

    pub fn workspace(&self) -> &WorkspaceConfig {
        &self.workspace
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }
}

/// Defaults for newly created workspaces.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkspaceConfig {
    #[serde(default)]
    scope: Option<Scope>,

    #[serde(default = "default_group_separator")]
    group_separator: String,
}

fn default_group_separator() -> String {
    DEFAULT_GROUP_SEPARATOR.to_string()
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            scope: None,
            group_separator: default_group_separator(),
        }
    }
}

impl WorkspaceConfig {
    pub fn new(scope: Option<Scope>, group_separator: impl Into<String>) -> Self {
        Self {
            scope,
            group_separator: group_separator.into(),
        }
    }

    pub fn scope(&self) -> Option<Scope> {
        self.scope
    }

    pub fn group_separator(&self) -> &str {
        &self.group_separator
    }

    /// Returns the validated [`WorkspaceConfiguration`].
    ///
    /// # Errors
    ///
    /// Returns an error unless the group separator is exactly one character.
    pub fn configuration(&self) -> Result<WorkspaceConfiguration, CartographError> {
        Ok(WorkspaceConfiguration::new(self.scope, &self.group_separator)?)
    }
}

/// Automatic layout applied to views that do not define their own.
#[derive(Debug, Clone, Deserialize)]
pub struct LayoutConfig {
    #[serde(default)]
    implementation: Implementation,

    /// One of `tb`, `bt`, `lr`, `rl`.
    #[serde(default = "default_rank_direction")]
    rank_direction: String,

    #[serde(default)]
    rank_separation: Option<u32>,

    #[serde(default)]
    node_separation: Option<u32>,

    #[serde(default)]
    edge_separation: Option<u32>,

    #[serde(default)]
    vertices: bool,
}

fn default_rank_direction() -> String {
    "tb".to_string()
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            implementation: Implementation::default(),
            rank_direction: default_rank_direction(),
            rank_separation: None,
            node_separation: None,
            edge_separation: None,
            vertices: false,
        }
    }
}

impl LayoutConfig {
    pub fn implementation(&self) -> Implementation {
        self.implementation
    }

    pub fn rank_direction(&self) -> &str {
        &self.rank_direction
    }

    /// Builds the configured [`AutomaticLayout`], keeping the layout
    /// defaults for unset separations.
    ///
    /// # Errors
    ///
    /// Returns [`CartographError::Config`] for an unknown rank direction.
    pub fn automatic_layout(&self) -> Result<AutomaticLayout, CartographError> {
        let rank_direction: RankDirection = self
            .rank_direction
            .parse()
            .map_err(|err| CartographError::Config(format!("{err}: `{}`", self.rank_direction)))?;

        let mut layout = AutomaticLayout::new(rank_direction)
            .with_implementation(self.implementation)
            .with_vertices(self.vertices);
        if let Some(rank_separation) = self.rank_separation {
            layout = layout.with_rank_separation(rank_separation);
        }
        if let Some(node_separation) = self.node_separation {
            layout = layout.with_node_separation(node_separation);
        }
        if let Some(edge_separation) = self.edge_separation {
            layout = layout.with_edge_separation(edge_separation);
        }
        Ok(layout)
    }
}
