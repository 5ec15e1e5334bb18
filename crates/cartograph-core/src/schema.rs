//! Structurizr workspace JSON layout.
//!
//! The model is serialized through borrowed mirror structs so the graph
//! types themselves stay free of serde attributes. Only elements reachable
//! from the workspace through containment are emitted.

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::{
    identifier::{ElementRef, NodeRef, RelationshipRef},
    model::{Element, ElementKind, Tags, Workspace, WorkspaceConfiguration},
    view::{AutomaticLayout, View, ViewKind, ViewScope},
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WorkspaceSchema<'a> {
    id: u64,
    name: &'a str,
    description: &'a str,
    model: ModelSchema<'a>,
    views: ViewsSchema<'a>,
    configuration: &'a WorkspaceConfiguration,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ModelSchema<'a> {
    people: Vec<ElementSchema<'a>>,
    software_systems: Vec<ElementSchema<'a>>,
    deployment_nodes: Vec<ElementSchema<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    custom_elements: Vec<ElementSchema<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ElementSchema<'a> {
    id: &'a str,
    name: &'a str,
    description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    technology: Option<&'a str>,
    tags: &'a Tags,
    properties: &'a IndexMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    group: Option<&'a str>,
    relationships: Vec<RelationshipSchema<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    containers: Option<Vec<ElementSchema<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    components: Option<Vec<ElementSchema<'a>>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RelationshipSchema<'a> {
    id: &'a str,
    source_id: &'a str,
    destination_id: &'a str,
    description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    technology: Option<&'a str>,
    tags: &'a Tags,
    properties: &'a IndexMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    linked_relationship_id: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ViewsSchema<'a> {
    system_landscape_views: Vec<ViewSchema<'a>>,
    system_context_views: Vec<ViewSchema<'a>>,
    container_views: Vec<ViewSchema<'a>>,
    component_views: Vec<ViewSchema<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ViewSchema<'a> {
    key: &'a str,
    description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    automatic_layout: Option<&'a AutomaticLayout>,
    #[serde(skip_serializing_if = "Option::is_none")]
    software_system_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    container_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    properties: Option<&'a IndexMap<String, String>>,
    elements: Vec<IdSchema<'a>>,
    relationships: Vec<IdSchema<'a>>,
}

#[derive(Serialize)]
struct IdSchema<'a> {
    id: &'a str,
}

impl Serialize for Workspace {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        WorkspaceSchema::new(self).serialize(serializer)
    }
}

impl<'a> WorkspaceSchema<'a> {
    fn new(workspace: &'a Workspace) -> Self {
        let top_level = |kind: ElementKind| {
            attached(workspace, NodeRef::Workspace)
                .filter(|element| element.kind() == kind)
                .map(|element| ElementSchema::new(workspace, element))
                .collect::<Vec<_>>()
        };

        let views_of = |kind: ViewKind| {
            workspace
                .views()
                .iter()
                .filter(|view| view.kind() == kind)
                .map(|view| ViewSchema::new(workspace, view))
                .collect::<Vec<_>>()
        };

        Self {
            id: workspace.id(),
            name: workspace.name(),
            description: workspace.description(),
            model: ModelSchema {
                people: top_level(ElementKind::Person),
                software_systems: top_level(ElementKind::SoftwareSystem),
                deployment_nodes: Vec::new(),
                custom_elements: top_level(ElementKind::Element),
            },
            views: ViewsSchema {
                system_landscape_views: views_of(ViewKind::SystemLandscape),
                system_context_views: views_of(ViewKind::SystemContext),
                container_views: views_of(ViewKind::Container),
                component_views: views_of(ViewKind::Component),
            },
            configuration: workspace.configuration(),
        }
    }
}

/// Children of a node that resolve to elements of this workspace.
fn attached<'a>(
    workspace: &'a Workspace,
    parent: NodeRef,
) -> impl Iterator<Item = &'a Element> + 'a {
    workspace
        .children(parent)
        .unwrap_or_default()
        .iter()
        .filter_map(move |&child| workspace.element(child).ok())
}

impl<'a> ElementSchema<'a> {
    fn new(workspace: &'a Workspace, element: &'a Element) -> Self {
        let children = |expected: ElementKind| -> Option<Vec<ElementSchema<'a>>> {
            element.kind().accepts(expected).then(|| {
                element
                    .children()
                    .iter()
                    .filter_map(|&child| workspace.element(child).ok())
                    .map(|child| ElementSchema::new(workspace, child))
                    .collect()
            })
        };

        Self {
            id: element.id(),
            name: element.name(),
            description: element.description(),
            technology: element.technology(),
            tags: element.tags(),
            properties: element.properties(),
            group: Some(element.group()).filter(|group| !group.is_empty()),
            relationships: element
                .relationships()
                .iter()
                .filter_map(|&relationship| RelationshipSchema::new(workspace, relationship))
                .collect(),
            containers: children(ElementKind::Container),
            components: children(ElementKind::Component),
        }
    }
}

impl<'a> RelationshipSchema<'a> {
    fn new(workspace: &'a Workspace, relationship: RelationshipRef) -> Option<Self> {
        let relationship = workspace.relationship(relationship).ok()?;
        Some(Self {
            id: relationship.id(),
            source_id: element_id(workspace, relationship.source())?,
            destination_id: element_id(workspace, relationship.destination())?,
            description: relationship.description(),
            technology: relationship.technology(),
            tags: relationship.tags(),
            properties: relationship.properties(),
            url: relationship.url(),
            linked_relationship_id: relationship.linked_relationship_id(),
        })
    }
}

impl<'a> ViewSchema<'a> {
    fn new(workspace: &'a Workspace, view: &'a View) -> Self {
        let (software_system_id, container_id) = match view.scope() {
            ViewScope::None => (None, None),
            ViewScope::SoftwareSystem(system) => (element_id(workspace, system), None),
            ViewScope::Container(container) => (None, element_id(workspace, container)),
        };

        Self {
            key: view.key(),
            description: view.description(),
            title: view.title(),
            automatic_layout: view.automatic_layout(),
            software_system_id,
            container_id,
            properties: Some(view.properties()).filter(|properties| !properties.is_empty()),
            elements: view
                .elements()
                .iter()
                .filter_map(|&element| element_id(workspace, element))
                .map(|id| IdSchema { id })
                .collect(),
            relationships: view
                .relationships()
                .iter()
                .filter_map(|&relationship| workspace.relationship(relationship).ok())
                .map(|relationship| IdSchema {
                    id: relationship.id(),
                })
                .collect(),
        }
    }
}

fn element_id(workspace: &Workspace, element: ElementRef) -> Option<&str> {
    workspace.element(element).ok().map(Element::id)
}
