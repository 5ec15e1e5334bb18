//! Integration tests for the ArchitectureBuilder API
//!
//! These tests build small models through the public API only.

use cartograph::{
    ArchitectureBuilder, CartographError, ModelError, ViewDefinition,
    config::AppConfig,
    identifier::NodeRef,
    model::{ElementSpec, Scope},
    view::{AutomaticLayout, RankDirection},
};

#[test]
fn test_builder_api_exists() {
    let _builder = ArchitectureBuilder::default();
}

#[test]
fn test_workspace_uses_configured_separator() {
    let config: AppConfig = toml::from_str(
        r#"
        [workspace]
        scope = "softwaresystem"
        group_separator = "|"
        "#,
    )
    .expect("valid config");
    let builder = ArchitectureBuilder::new(config);

    let mut workspace = builder.workspace("w", "").expect("valid separator");
    let element = workspace
        .group("A/B", |ws| ws.group("C", |ws| ws.add(NodeRef::Workspace, ElementSpec::person("u"))))
        .expect("names free of separator");

    assert_eq!(workspace.configuration().scope(), Some(Scope::SoftwareSystem));
    assert_eq!(workspace.element(element).unwrap().group(), "A/B|C");
}

#[test]
fn test_bad_separator_fails() {
    let config: AppConfig = toml::from_str("[workspace]\ngroup_separator = \"->\"\n").unwrap();
    let builder = ArchitectureBuilder::new(config);

    let result = builder.workspace("w", "");

    assert!(matches!(
        result,
        Err(CartographError::Model(ModelError::InvalidGroupSeparator { .. }))
    ));
}

#[test]
fn test_default_layout_applied_only_when_missing() {
    let config: AppConfig = toml::from_str("[layout]\nrank_direction = \"lr\"\n").unwrap();
    let builder = ArchitectureBuilder::new(config);
    let mut workspace = builder.workspace("w", "").unwrap();
    let system = workspace
        .add(NodeRef::Workspace, ElementSpec::software_system("s"))
        .unwrap();

    builder
        .add_view(&mut workspace, ViewDefinition::system_landscape("landscape", ""))
        .unwrap();
    builder
        .add_view(
            &mut workspace,
            ViewDefinition::system_context(system, "context", "")
                .automatic_layout(AutomaticLayout::new(RankDirection::BottomTop)),
        )
        .unwrap();

    let landscape = workspace.view("landscape").unwrap();
    assert_eq!(
        landscape.automatic_layout().map(|l| l.rank_direction()),
        Some(RankDirection::LeftRight)
    );
    let context = workspace.view("context").unwrap();
    assert_eq!(
        context.automatic_layout().map(|l| l.rank_direction()),
        Some(RankDirection::BottomTop)
    );
}

#[test]
fn test_add_view_errors() {
    let builder = ArchitectureBuilder::default();
    let mut workspace = builder.workspace("w", "").unwrap();
    let person = workspace.add(NodeRef::Workspace, ElementSpec::person("u")).unwrap();

    let wrong_scope = builder.add_view(&mut workspace, ViewDefinition::container(person, "c", ""));
    assert!(matches!(
        wrong_scope,
        Err(CartographError::Model(ModelError::InvalidViewScope { .. }))
    ));

    builder
        .add_view(&mut workspace, ViewDefinition::system_landscape("l", ""))
        .unwrap();
    let duplicate = builder.add_view(&mut workspace, ViewDefinition::system_landscape("l", ""));
    assert!(matches!(
        duplicate,
        Err(CartographError::Model(ModelError::DuplicateViewKey { .. }))
    ));
    assert_eq!(workspace.views().len(), 1);
}

#[test]
fn test_bad_layout_config_fails_add_view() {
    let config: AppConfig = toml::from_str("[layout]\nrank_direction = \"up\"\n").unwrap();
    let builder = ArchitectureBuilder::new(config);
    let mut workspace = builder.workspace("w", "").unwrap();

    let result = builder.add_view(&mut workspace, ViewDefinition::system_landscape("l", ""));

    assert!(matches!(result, Err(CartographError::Config(_))));
    assert!(workspace.views().is_empty());
}
