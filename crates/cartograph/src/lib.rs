//! Cartograph - Architecture as code for C4 models.
//!
//! Build a workspace of people, software systems, containers and components,
//! connect them with relationships and compute system landscape, system
//! context, container and component views from it. The resulting
//! [`model::Workspace`] serializes into the Structurizr workspace JSON
//! layout.

pub mod config;

mod error;
mod explorer;
mod expression;
mod views;

pub use cartograph_core::{identifier, model, view};

pub use cartograph_core::error::ModelError;
pub use error::CartographError;
pub use explorer::Explorer;
pub use expression::{
    ElementContext, ElementPredicate, Expression, Neighbours, RelationshipContext,
    RelationshipPredicate,
};
pub use views::ViewDefinition;

use log::{debug, info};

use config::AppConfig;
use model::Workspace;

/// Builder for workspaces and views that applies an [`AppConfig`].
///
/// # Examples
///
/// ```
/// use cartograph::{
///     ArchitectureBuilder, ViewDefinition,
///     config::AppConfig,
///     identifier::NodeRef,
///     model::ElementSpec,
/// };
///
/// # fn main() -> Result<(), cartograph::CartographError> {
/// let builder = ArchitectureBuilder::new(AppConfig::default());
/// let mut workspace = builder.workspace("Shop", "Online shop")?;
///
/// let user = workspace.add(NodeRef::Workspace, ElementSpec::person("User"))?;
/// let shop = workspace.add(NodeRef::Workspace, ElementSpec::software_system("Shop"))?;
/// workspace.relate(user).described_as("Buys from").to(shop)?;
///
/// builder.add_view(&mut workspace, ViewDefinition::system_landscape("landscape", "Everyone"))?;
///
/// let view = workspace.view("landscape")?;
/// assert_eq!(view.elements(), &[user, shop]);
/// assert!(view.automatic_layout().is_some());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ArchitectureBuilder {
    config: AppConfig,
}

impl ArchitectureBuilder {
    /// Create a new builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Create an empty workspace with the configured scope and group
    /// separator.
    ///
    /// # Errors
    ///
    /// Returns `CartographError` if the configured group separator is not a
    /// single character.
    pub fn workspace(
        &self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Workspace, CartographError> {
        let configuration = self.config.workspace().configuration()?;
        info!(scope:? = configuration.scope(); "Creating workspace");
        Ok(Workspace::with_configuration(name, description, configuration))
    }

    /// Compute a view against the workspace's current graph and store it.
    ///
    /// Views without an automatic layout get the configured default one.
    ///
    /// # Errors
    ///
    /// Returns `CartographError` for an invalid scope, a duplicate key or an
    /// invalid layout configuration.
    pub fn add_view(
        &self,
        workspace: &mut Workspace,
        definition: ViewDefinition<'_>,
    ) -> Result<(), CartographError> {
        let mut view = definition.compute(workspace)?;
        if !definition.has_automatic_layout() {
            let layout = self.config.layout().automatic_layout()?;
            debug!(key = definition.key(), layout:? = layout; "Applying default layout");
            view = view.with_automatic_layout(layout);
        }
        workspace.add_view(view)?;
        Ok(())
    }
}
