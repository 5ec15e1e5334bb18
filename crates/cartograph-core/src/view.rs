//! Computed views and their layout parameters.
//!
//! A [`View`] is the stored result of filtering the graph for one diagram:
//! its metadata plus the ordered element and relationship sets it shows.
//! Computing those sets is the job of the `cartograph` crate; this module
//! only holds the result.

use std::{fmt, str::FromStr};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::identifier::{ElementRef, RelationshipRef};

/// The kind of a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    SystemLandscape,
    SystemContext,
    Container,
    Component,
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ViewKind::SystemLandscape => "system landscape",
            ViewKind::SystemContext => "system context",
            ViewKind::Container => "container",
            ViewKind::Component => "component",
        };
        f.write_str(name)
    }
}

/// Element a view is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewScope {
    /// Landscape views look at the whole workspace.
    None,
    SoftwareSystem(ElementRef),
    Container(ElementRef),
}

/// Layout engine used by automatic layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Implementation {
    #[default]
    #[serde(alias = "graphviz")]
    Graphviz,
    #[serde(alias = "dagre")]
    Dagre,
}

/// Direction in which ranks are laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum RankDirection {
    #[default]
    TopBottom,
    BottomTop,
    LeftRight,
    RightLeft,
}

impl FromStr for RankDirection {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tb" => Ok(RankDirection::TopBottom),
            "bt" => Ok(RankDirection::BottomTop),
            "lr" => Ok(RankDirection::LeftRight),
            "rl" => Ok(RankDirection::RightLeft),
            _ => Err("Invalid rank direction, expected one of tb, bt, lr, rl"),
        }
    }
}

/// Automatic layout settings of a view.
///
/// Defaults follow Structurizr: Graphviz, top to bottom, 300 between ranks
/// and nodes, no edge separation, no vertices.
///
/// # Examples
///
/// ```
/// use cartograph_core::view::{AutomaticLayout, RankDirection};
///
/// let layout = AutomaticLayout::new("lr".parse().unwrap())
///     .with_rank_separation(200)
///     .with_node_separation(150);
/// assert_eq!(layout.rank_direction(), RankDirection::LeftRight);
/// assert_eq!(layout.rank_separation(), 200);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomaticLayout {
    implementation: Implementation,
    rank_direction: RankDirection,
    rank_separation: u32,
    node_separation: u32,
    edge_separation: u32,
    vertices: bool,
}

impl AutomaticLayout {
    /// Creates a layout with the given rank direction and default spacing.
    pub fn new(rank_direction: RankDirection) -> Self {
        Self {
            rank_direction,
            ..Self::default()
        }
    }

    pub fn with_implementation(mut self, implementation: Implementation) -> Self {
        self.implementation = implementation;
        self
    }

    pub fn with_rank_separation(mut self, rank_separation: u32) -> Self {
        self.rank_separation = rank_separation;
        self
    }

    pub fn with_node_separation(mut self, node_separation: u32) -> Self {
        self.node_separation = node_separation;
        self
    }

    pub fn with_edge_separation(mut self, edge_separation: u32) -> Self {
        self.edge_separation = edge_separation;
        self
    }

    pub fn with_vertices(mut self, vertices: bool) -> Self {
        self.vertices = vertices;
        self
    }

    pub fn implementation(&self) -> Implementation {
        self.implementation
    }

    pub fn rank_direction(&self) -> RankDirection {
        self.rank_direction
    }

    pub fn rank_separation(&self) -> u32 {
        self.rank_separation
    }

    pub fn node_separation(&self) -> u32 {
        self.node_separation
    }

    pub fn edge_separation(&self) -> u32 {
        self.edge_separation
    }

    pub fn vertices(&self) -> bool {
        self.vertices
    }
}

impl Default for AutomaticLayout {
    fn default() -> Self {
        Self {
            implementation: Implementation::Graphviz,
            rank_direction: RankDirection::TopBottom,
            rank_separation: 300,
            node_separation: 300,
            edge_separation: 0,
            vertices: false,
        }
    }
}

/// A computed view.
#[derive(Debug, Clone)]
pub struct View {
    kind: ViewKind,
    key: String,
    description: String,
    title: Option<String>,
    automatic_layout: Option<AutomaticLayout>,
    scope: ViewScope,
    properties: IndexMap<String, String>,
    elements: Vec<ElementRef>,
    relationships: Vec<RelationshipRef>,
}

impl View {
    /// Creates a view with empty element and relationship sets.
    pub fn new(
        kind: ViewKind,
        key: impl Into<String>,
        description: impl Into<String>,
        scope: ViewScope,
    ) -> Self {
        Self {
            kind,
            key: key.into(),
            description: description.into(),
            title: None,
            automatic_layout: None,
            scope,
            properties: IndexMap::new(),
            elements: Vec::new(),
            relationships: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_automatic_layout(mut self, layout: AutomaticLayout) -> Self {
        self.automatic_layout = Some(layout);
        self
    }

    pub fn with_properties(mut self, properties: IndexMap<String, String>) -> Self {
        self.properties = properties;
        self
    }

    /// Stores the computed element and relationship sets.
    pub fn with_contents(
        mut self,
        elements: Vec<ElementRef>,
        relationships: Vec<RelationshipRef>,
    ) -> Self {
        self.elements = elements;
        self.relationships = relationships;
        self
    }

    pub fn kind(&self) -> ViewKind {
        self.kind
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn automatic_layout(&self) -> Option<&AutomaticLayout> {
        self.automatic_layout.as_ref()
    }

    pub fn scope(&self) -> ViewScope {
        self.scope
    }

    pub fn properties(&self) -> &IndexMap<String, String> {
        &self.properties
    }

    pub fn elements(&self) -> &[ElementRef] {
        &self.elements
    }

    pub fn relationships(&self) -> &[RelationshipRef] {
        &self.relationships
    }
}
