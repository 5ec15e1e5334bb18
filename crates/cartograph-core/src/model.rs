//! The architecture model: elements, containment, groups and relationships.

mod element;
mod group;
mod implied;
mod relationship;
mod tags;
mod workspace;

pub use element::{Element, ElementKind, ElementSpec, normalize_name};
pub use group::{DEFAULT_GROUP_SEPARATOR, Scope, WorkspaceConfiguration};
pub use relationship::{Annotation, Description, LateUses, Relationship, Uses, UsesFrom, desc};
pub use tags::{ELEMENT_TAG, RELATIONSHIP_TAG, Tags};
pub use workspace::{Contained, Workspace};
