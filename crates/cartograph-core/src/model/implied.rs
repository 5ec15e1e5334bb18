//! Derivation of implied relationships across containment boundaries.
//!
//! A relationship `u -> c` where `c` lives inside `s` also means `u -> s`:
//! whoever uses a container uses the system around it. Derivation walks the
//! destination's ancestors up to, but excluding, the workspace and creates
//! one linked relationship per ancestor.

use log::{debug, trace};

use crate::{
    error::ModelError,
    identifier::{NodeRef, RelationshipRef},
    model::workspace::Workspace,
};

impl Workspace {
    /// Creates the implied relationships of an explicit relationship.
    ///
    /// For each ancestor `a` of the destination, a relationship from the
    /// same source to `a` is created with the same description and
    /// technology and with its linked relationship id set to the original's
    /// id. Returns the created relationships, nearest ancestor first.
    ///
    /// Existing relationships to an ancestor are not looked up, so deriving
    /// twice, or deriving where an explicit relationship to the ancestor
    /// already exists, creates duplicates. Deriving from a relationship that
    /// is itself implied creates nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownRelationship`] for foreign handles.
    ///
    /// # Examples
    ///
    /// ```
    /// use cartograph_core::{identifier::NodeRef, model::{ElementSpec, Workspace}};
    ///
    /// # fn main() -> Result<(), cartograph_core::error::ModelError> {
    /// let mut ws = Workspace::new("w", "");
    /// let u = ws.add(NodeRef::Workspace, ElementSpec::person("u"))?;
    /// let s = ws.add(NodeRef::Workspace, ElementSpec::software_system("s"))?;
    /// let c = ws.add(s, ElementSpec::container("c"))?;
    ///
    /// let r = ws.relate(u).described_as("Runs SQL queries").to(c)?.id();
    /// let implied = ws.derive_implied(r)?;
    ///
    /// assert_eq!(implied.len(), 1);
    /// assert_eq!(ws.relationship(implied[0])?.destination(), s);
    /// # Ok(())
    /// # }
    /// ```
    pub fn derive_implied(
        &mut self,
        relationship: RelationshipRef,
    ) -> Result<Vec<RelationshipRef>, ModelError> {
        let original = self.relationship(relationship)?;
        if original.is_implied() {
            trace!(relationship_id = original.id(); "Skipping implied relationship");
            return Ok(Vec::new());
        }

        let source = original.source();
        let description = original.description().to_string();
        let technology = original.technology().map(str::to_string);
        let original_id = original.id().to_string();
        let mut next = self.element(original.destination())?.parent();

        let mut derived = Vec::new();
        while let Some(NodeRef::Element(ancestor)) = next {
            let implied = self.finalize_relationship(
                source.into(),
                ancestor.into(),
                description.clone(),
                technology.clone(),
            )?;
            self.relationships[implied.index()].linked_relationship_id = Some(original_id.clone());
            derived.push(implied);
            next = self.element(ancestor)?.parent();
        }

        debug!(
            relationship_id = original_id.as_str(),
            implied = derived.len();
            "Implied relationships derived"
        );
        Ok(derived)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        identifier::{ElementRef, NodeRef},
        model::{ElementSpec, Workspace},
    };

    struct Fixture {
        ws: Workspace,
        u: ElementRef,
        s: ElementRef,
        c: ElementRef,
        x: ElementRef,
    }

    fn fixture() -> Fixture {
        let mut ws = Workspace::new("w", "");
        let u = ws.add(NodeRef::Workspace, ElementSpec::person("u")).unwrap();
        let s = ws.add(NodeRef::Workspace, ElementSpec::software_system("s")).unwrap();
        let c = ws.add(s, ElementSpec::container("c")).unwrap();
        let x = ws.add(c, ElementSpec::component("x")).unwrap();
        Fixture { ws, u, s, c, x }
    }

    #[test]
    fn test_container_destination_implies_system() {
        let Fixture { mut ws, u, s, c, .. } = fixture();

        let r = ws
            .relate(u)
            .described_as("Runs SQL queries")
            .to(c)
            .unwrap()
            .id();
        let implied = ws.derive_implied(r).unwrap();

        let outgoing = ws.element(u).unwrap().relationships().to_vec();
        assert_eq!(outgoing.len(), 2);
        assert_eq!(outgoing, vec![r, implied[0]]);

        let original = ws.relationship(r).unwrap();
        let derived = ws.relationship(implied[0]).unwrap();
        assert_eq!(derived.source(), u);
        assert_eq!(derived.destination(), s);
        assert_eq!(derived.description(), "Runs SQL queries");
        assert_eq!(derived.linked_relationship_id(), Some(original.id()));
    }

    #[test]
    fn test_component_destination_implies_every_ancestor() {
        let Fixture { mut ws, u, s, c, x } = fixture();

        let r = ws.relate(u).described_as("Calls").technology("gRPC").to(x).unwrap().id();
        let implied = ws.derive_implied(r).unwrap();

        let destinations: Vec<_> = implied
            .iter()
            .map(|&r| ws.relationship(r).unwrap().destination())
            .collect();
        assert_eq!(destinations, vec![c, s]);
        for &implied in &implied {
            assert_eq!(ws.relationship(implied).unwrap().technology(), Some("gRPC"));
        }
    }

    #[test]
    fn test_top_level_destination_implies_nothing() {
        let Fixture { mut ws, u, s, .. } = fixture();

        let r = ws.relate(u).to(s).unwrap().id();

        assert!(ws.derive_implied(r).unwrap().is_empty());
    }

    #[test]
    fn test_implied_relationship_is_not_rederived() {
        let Fixture { mut ws, u, x, .. } = fixture();

        let r = ws.relate(u).to(x).unwrap().id();
        let implied = ws.derive_implied(r).unwrap();

        assert!(ws.derive_implied(implied[0]).unwrap().is_empty());
    }

    #[test]
    fn test_existing_relationship_to_ancestor_is_duplicated() {
        let Fixture { mut ws, u, s, c, .. } = fixture();

        ws.relate(u).described_as("Uses").to(s).unwrap();
        let r = ws.relate(u).described_as("Uses").to(c).unwrap().id();
        ws.derive_implied(r).unwrap();

        let to_system = ws
            .element(u)
            .unwrap()
            .destinations()
            .iter()
            .filter(|&&d| d == s)
            .count();
        assert_eq!(to_system, 2);
    }

    #[test]
    fn test_where_clause_derives_implied() {
        let mut ws = Workspace::new("w", "");
        let u = ws.create(ElementSpec::person("u")).unwrap();
        let s = ws.create(ElementSpec::software_system("s")).unwrap();
        let db = ws.create(ElementSpec::container("database")).unwrap();
        ws.contains(s, [db]).unwrap().get();

        ws.contains(NodeRef::Workspace, [u, s])
            .unwrap()
            .with_implied_relationships(|ws, children| {
                let (u, s) = (children[0], children[1]);
                let db = ws.container(s, "database")?;
                Ok(vec![ws.relate(u).described_as("Runs SQL queries").to(db)?.id()])
            })
            .unwrap();

        let destinations = ws.element(u).unwrap().destinations().to_vec();
        assert_eq!(destinations, vec![db, s]);
    }
}
