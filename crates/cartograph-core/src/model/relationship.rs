//! Relationships and the builder chain that declares them.
//!
//! A relationship is declared in two steps. [`Workspace::relate`] captures
//! the source, [`UsesFrom::described_as`] and [`UsesFrom::technology`] fill
//! in the details, and [`UsesFrom::to`] supplies the destination and
//! finalizes the record. For one source with many destinations,
//! [`Workspace::relate_each`] takes a list of [`desc`] entries.

use indexmap::IndexMap;
use log::{debug, trace};

use crate::{
    error::ModelError,
    identifier::{ElementRef, NodeRef, RelationshipRef},
    model::{
        tags::{RELATIONSHIP_TAG, Tags},
        workspace::Workspace,
    },
};

/// A directed edge between two elements.
#[derive(Debug, Clone)]
pub struct Relationship {
    pub(crate) id: String,
    pub(crate) source: ElementRef,
    pub(crate) destination: ElementRef,
    pub(crate) description: String,
    pub(crate) technology: Option<String>,
    pub(crate) tags: Tags,
    pub(crate) properties: IndexMap<String, String>,
    pub(crate) url: Option<String>,
    pub(crate) linked_relationship_id: Option<String>,
}

impl Relationship {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source(&self) -> ElementRef {
        self.source
    }

    pub fn destination(&self) -> ElementRef {
        self.destination
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn technology(&self) -> Option<&str> {
        self.technology.as_deref()
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    pub fn properties(&self) -> &IndexMap<String, String> {
        &self.properties
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Id of the explicit relationship this one was derived from.
    pub fn linked_relationship_id(&self) -> Option<&str> {
        self.linked_relationship_id.as_deref()
    }

    /// Whether this relationship was derived by
    /// [`Workspace::derive_implied`].
    pub fn is_implied(&self) -> bool {
        self.linked_relationship_id.is_some()
    }

    fn apply(&mut self, annotation: Annotation) {
        self.tags.extend(annotation.tags);
        self.properties.extend(annotation.properties);
        if let Some(url) = annotation.url {
            self.url = Some(url);
        }
    }
}

/// Extra information attached to a relationship after it is created.
///
/// Tags are added to the existing set, properties are merged with later keys
/// winning, and a url replaces any previous one.
///
/// # Examples
///
/// ```
/// use cartograph_core::model::Annotation;
///
/// let annotation = Annotation::new()
///     .tag("async")
///     .property("protocol", "amqp")
///     .url("https://example.com/queue");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotation {
    tags: Vec<String>,
    properties: IndexMap<String, String>,
    url: Option<String>,
}

impl Annotation {
    pub fn new() -> Self {
        Self::default()
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

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// First binding step: a source waiting for its destination.
#[must_use = "a relationship is only created by `to`"]
pub struct UsesFrom<'w> {
    workspace: &'w mut Workspace,
    source: NodeRef,
    description: String,
    technology: Option<String>,
}

impl<'w> UsesFrom<'w> {
    pub fn described_as(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn technology(mut self, technology: impl Into<String>) -> Self {
        self.technology = Some(technology.into());
        self
    }

    /// Supplies the destination and creates the relationship.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::WorkspaceEndpoint`] if either endpoint is the
    /// workspace and [`ModelError::UnknownElement`] for foreign handles. No
    /// id is allocated and nothing is recorded when this fails.
    pub fn to(self, destination: impl Into<NodeRef>) -> Result<Uses<'w>, ModelError> {
        let UsesFrom {
            workspace,
            source,
            description,
            technology,
        } = self;

        let relationship =
            workspace.finalize_relationship(source, destination.into(), description, technology)?;
        Ok(Uses {
            workspace,
            relationship,
        })
    }
}

/// A created relationship that can still be annotated.
pub struct Uses<'w> {
    workspace: &'w mut Workspace,
    relationship: RelationshipRef,
}

impl Uses<'_> {
    /// Adds tags, properties and a url to the relationship.
    pub fn annotate(self, annotation: Annotation) -> Self {
        self.workspace.relationships[self.relationship.index()].apply(annotation);
        self
    }

    pub fn id(&self) -> RelationshipRef {
        self.relationship
    }
}

impl From<Uses<'_>> for RelationshipRef {
    fn from(uses: Uses<'_>) -> Self {
        uses.relationship
    }
}

/// Starts a fan-out entry for [`Workspace::relate_each`].
///
/// ```
/// use cartograph_core::{
///     identifier::NodeRef,
///     model::{ElementSpec, Workspace, desc},
/// };
///
/// # fn main() -> Result<(), cartograph_core::error::ModelError> {
/// let mut ws = Workspace::new("w", "");
/// let user = ws.add(NodeRef::Workspace, ElementSpec::person("User"))?;
/// let shop = ws.add(NodeRef::Workspace, ElementSpec::software_system("Shop"))?;
/// let bank = ws.add(NodeRef::Workspace, ElementSpec::software_system("Bank"))?;
///
/// let created = ws.relate_each(user, [
///     desc("Buys from").to(shop),
///     desc("Pays with").technology("HTTPS").to(bank),
/// ])?;
/// assert_eq!(created.len(), 2);
/// # Ok(())
/// # }
/// ```
pub fn desc(description: impl Into<String>) -> Description {
    Description {
        description: description.into(),
        technology: None,
    }
}

/// Description and technology of a fan-out entry, before its destination.
#[derive(Debug, Clone)]
pub struct Description {
    description: String,
    technology: Option<String>,
}

impl Description {
    pub fn technology(mut self, technology: impl Into<String>) -> Self {
        self.technology = Some(technology.into());
        self
    }

    pub fn to(self, destination: impl Into<NodeRef>) -> LateUses {
        LateUses {
            description: self.description,
            technology: self.technology,
            destination: destination.into(),
            annotation: Annotation::default(),
        }
    }
}

/// A fan-out entry whose source is bound later by [`Workspace::relate_each`].
#[derive(Debug, Clone)]
pub struct LateUses {
    description: String,
    technology: Option<String>,
    destination: NodeRef,
    annotation: Annotation,
}

impl LateUses {
    /// Annotation applied once the relationship exists.
    pub fn annotate(mut self, annotation: Annotation) -> Self {
        self.annotation = annotation;
        self
    }
}

impl Workspace {
    /// Starts declaring a relationship from `source`.
    pub fn relate(&mut self, source: impl Into<NodeRef>) -> UsesFrom<'_> {
        UsesFrom {
            workspace: self,
            source: source.into(),
            description: String::new(),
            technology: None,
        }
    }

    /// Declares a relationship in one call.
    ///
    /// # Errors
    ///
    /// Same as [`UsesFrom::to`].
    pub fn uses<I, S>(
        &mut self,
        source: impl Into<NodeRef>,
        destination: impl Into<NodeRef>,
        description: impl Into<String>,
        technology: Option<&str>,
        tags: I,
    ) -> Result<RelationshipRef, ModelError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let relationship = self.finalize_relationship(
            source.into(),
            destination.into(),
            description.into(),
            technology.map(str::to_string),
        )?;
        self.relationships[relationship.index()].tags.extend(tags);
        Ok(relationship)
    }

    /// Declares one relationship from `source` per entry, in entry order.
    ///
    /// All entries are checked before the first relationship is created, so
    /// a bad entry leaves the graph untouched.
    ///
    /// # Errors
    ///
    /// Same as [`UsesFrom::to`].
    pub fn relate_each<I>(
        &mut self,
        source: impl Into<NodeRef>,
        entries: I,
    ) -> Result<Vec<RelationshipRef>, ModelError>
    where
        I: IntoIterator<Item = LateUses>,
    {
        let source = source.into();
        let entries: Vec<LateUses> = entries.into_iter().collect();
        for entry in &entries {
            self.check_endpoints(source, entry.destination)?;
        }

        let mut created = Vec::with_capacity(entries.len());
        for entry in entries {
            let relationship = self.finalize_relationship(
                source,
                entry.destination,
                entry.description,
                entry.technology,
            )?;
            self.relationships[relationship.index()].apply(entry.annotation);
            created.push(relationship);
        }
        Ok(created)
    }

    /// Annotates an existing relationship.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownRelationship`] for foreign handles.
    pub fn annotate(
        &mut self,
        relationship: RelationshipRef,
        annotation: Annotation,
    ) -> Result<(), ModelError> {
        self.relationships
            .get_mut(relationship.index())
            .ok_or(ModelError::UnknownRelationship(relationship))?
            .apply(annotation);
        Ok(())
    }

    /// Returns the relationship behind a handle.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownRelationship`] for foreign handles.
    pub fn relationship(&self, relationship: RelationshipRef) -> Result<&Relationship, ModelError> {
        self.relationships
            .get(relationship.index())
            .ok_or(ModelError::UnknownRelationship(relationship))
    }

    /// Iterates every relationship in creation order.
    pub fn relationships(&self) -> impl Iterator<Item = (RelationshipRef, &Relationship)> {
        self.relationships
            .iter()
            .enumerate()
            .map(|(idx, relationship)| (RelationshipRef::new(idx), relationship))
    }

    fn check_endpoints(
        &self,
        source: NodeRef,
        destination: NodeRef,
    ) -> Result<(ElementRef, ElementRef), ModelError> {
        let NodeRef::Element(source) = source else {
            return Err(ModelError::WorkspaceEndpoint { side: "source" });
        };
        let NodeRef::Element(destination) = destination else {
            return Err(ModelError::WorkspaceEndpoint {
                side: "destination",
            });
        };
        self.element(source)?;
        self.element(destination)?;
        Ok((source, destination))
    }

    /// Creates the relationship record and wires it into both endpoints.
    pub(crate) fn finalize_relationship(
        &mut self,
        source: NodeRef,
        destination: NodeRef,
        description: String,
        technology: Option<String>,
    ) -> Result<RelationshipRef, ModelError> {
        let (source, destination) = self.check_endpoints(source, destination)?;

        let id = self.ids.next_element_or_relationship_id();
        let relationship_ref = RelationshipRef::new(self.relationships.len());
        debug!(
            relationship_id = id.as_str(),
            source_id = self.elements[source.index()].id.as_str(),
            destination_id = self.elements[destination.index()].id.as_str(),
            description = description.as_str();
            "Relationship created"
        );

        self.relationships.push(Relationship {
            id,
            source,
            destination,
            description,
            technology,
            tags: Tags::with_base([RELATIONSHIP_TAG]),
            properties: IndexMap::new(),
            url: None,
            linked_relationship_id: None,
        });

        let source_element = &mut self.elements[source.index()];
        source_element.relationships.push(relationship_ref);
        source_element.destinations.push(destination);
        self.elements[destination.index()].sources.push(source);
        trace!(relationship:? = relationship_ref; "Endpoints updated");

        Ok(relationship_ref)
    }
}
