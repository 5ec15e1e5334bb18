//! Integration tests for view computation and expression filtering.

use cartograph::{
    ArchitectureBuilder, Expression, ViewDefinition,
    identifier::{ElementRef, NodeRef},
    model::{ElementKind, ElementSpec, Workspace},
};

/// A small banking model.
struct Bank {
    ws: Workspace,
    customer: ElementRef,
    staff: ElementRef,
    banking: ElementRef,
    mainframe: ElementRef,
    email: ElementRef,
    web: ElementRef,
    spa: ElementRef,
    api: ElementRef,
    database: ElementRef,
    signin: ElementRef,
    accounts: ElementRef,
    security: ElementRef,
}

fn bank() -> Bank {
    let mut ws = Workspace::new("Big Bank", "Banking landscape");
    let customer = ws.add(NodeRef::Workspace, ElementSpec::person("Personal Banking Customer")).unwrap();
    let staff = ws
        .group("Big Bank", |ws| {
            ws.add(NodeRef::Workspace, ElementSpec::person("Customer Service Staff"))
        })
        .unwrap();
    let banking = ws
        .add(NodeRef::Workspace, ElementSpec::software_system("Internet Banking System"))
        .unwrap();
    let mainframe = ws
        .add(
            NodeRef::Workspace,
            ElementSpec::software_system("Mainframe Banking System").tag("external"),
        )
        .unwrap();
    let email = ws
        .add(NodeRef::Workspace, ElementSpec::software_system("E-mail System").tag("external"))
        .unwrap();

    let web = ws.add(banking, ElementSpec::container("Web Application").technology("Java")).unwrap();
    let spa = ws
        .add(banking, ElementSpec::container("Single-Page Application").technology("JavaScript"))
        .unwrap();
    let api = ws.add(banking, ElementSpec::container("API Application").technology("Java")).unwrap();
    let database = ws
        .add(banking, ElementSpec::container("Database").technology("Oracle").tag("db"))
        .unwrap();

    let signin = ws.add(api, ElementSpec::component("Sign In Controller")).unwrap();
    let accounts = ws.add(api, ElementSpec::component("Accounts Controller")).unwrap();
    let security = ws.add(api, ElementSpec::component("Security Component")).unwrap();

    ws.relate(customer).described_as("Views balances").to(banking).unwrap();
    ws.relate(customer).described_as("Visits").technology("HTTPS").to(web).unwrap();
    ws.relate(customer).described_as("Uses").to(spa).unwrap();
    ws.relate(staff).described_as("Uses").to(mainframe).unwrap();
    ws.relate(banking).described_as("Gets account information").to(mainframe).unwrap();
    ws.relate(banking).described_as("Sends e-mail").to(email).unwrap();
    ws.relate(web).described_as("Delivers").to(spa).unwrap();
    ws.relate(spa).described_as("Calls").technology("JSON/HTTPS").to(signin).unwrap();
    ws.relate(spa).described_as("Calls").technology("JSON/HTTPS").to(accounts).unwrap();
    ws.relate(signin).described_as("Uses").to(security).unwrap();
    ws.relate(security).described_as("Reads").technology("SQL").to(database).unwrap();
    ws.relate(accounts).described_as("Uses").technology("XML/HTTPS").to(mainframe).unwrap();
    ws.relate(api).described_as("Sends e-mail").to(email).unwrap();

    Bank {
        ws,
        customer,
        staff,
        banking,
        mainframe,
        email,
        web,
        spa,
        api,
        database,
        signin,
        accounts,
        security,
    }
}

#[test]
fn test_system_landscape_view() {
    let Bank {
        mut ws,
        customer,
        staff,
        banking,
        mainframe,
        email,
        ..
    } = bank();

    let builder = ArchitectureBuilder::default();
    builder
        .add_view(&mut ws, ViewDefinition::system_landscape("landscape", "Everything"))
        .unwrap();

    let view = ws.view("landscape").unwrap();
    assert_eq!(view.elements(), &[customer, staff, banking, mainframe, email]);
    assert_eq!(view.relationships().len(), 4);
}

#[test]
fn test_system_context_view() {
    let Bank {
        mut ws,
        customer,
        banking,
        mainframe,
        email,
        ..
    } = bank();

    let builder = ArchitectureBuilder::default();
    builder
        .add_view(&mut ws, ViewDefinition::system_context(banking, "context", ""))
        .unwrap();

    let view = ws.view("context").unwrap();
    assert_eq!(view.elements(), &[customer, banking, mainframe, email]);
    assert_eq!(view.relationships().len(), 3);
}

#[test]
fn test_system_context_view_after_implied() {
    let Bank {
        mut ws,
        customer,
        banking,
        mainframe,
        email,
        spa,
        signin,
        ..
    } = bank();

    let calls = ws.element(spa).unwrap().relationships()[0];
    assert_eq!(ws.relationship(calls).unwrap().destination(), signin);
    let implied = ws.derive_implied(calls).unwrap();
    assert_eq!(implied.len(), 2);

    let builder = ArchitectureBuilder::default();
    builder
        .add_view(&mut ws, ViewDefinition::system_context(banking, "context", ""))
        .unwrap();

    let view = ws.view("context").unwrap();
    assert_eq!(view.elements(), &[customer, banking, mainframe, email]);
    assert!(!view.elements().contains(&spa));
    assert_eq!(view.relationships().len(), 3);
}

#[test]
fn test_container_view() {
    let Bank {
        mut ws,
        customer,
        mainframe,
        email,
        banking,
        web,
        spa,
        api,
        database,
        ..
    } = bank();

    let builder = ArchitectureBuilder::default();
    builder
        .add_view(
            &mut ws,
            ViewDefinition::container(banking, "containers", "").exclude_element(|e| e.tags().contains("db")),
        )
        .unwrap();

    let view = ws.view("containers").unwrap();
    assert_eq!(view.elements(), &[customer, web, spa, api, email]);
    assert!(!view.elements().contains(&database));
    assert!(!view.elements().contains(&mainframe));
    // customer -> web, customer -> spa, web -> spa, api -> email
    assert_eq!(view.relationships().len(), 4);
}

#[test]
fn test_component_view() {
    let Bank {
        mut ws,
        mainframe,
        api,
        spa,
        database,
        signin,
        accounts,
        security,
        email,
        ..
    } = bank();

    let builder = ArchitectureBuilder::default();
    builder
        .add_view(&mut ws, ViewDefinition::component(api, "components", ""))
        .unwrap();

    let view = ws.view("components").unwrap();
    // api's components come before its later sibling, the database
    assert_eq!(
        view.elements(),
        &[spa, signin, accounts, security, database, mainframe]
    );
    assert!(!view.elements().contains(&email));
    assert_eq!(view.relationships().len(), 5);
}

#[test]
fn test_cascading_exclusion() {
    let Bank { ws, spa, signin, .. } = bank();

    let expression = Expression::new()
        .include_relationship(|r| r.technology() == Some("JSON/HTTPS"))
        .exclude_element(move |e| e.is(signin));

    let kept = expression.relationships(&ws);
    assert_eq!(kept.len(), 1);
    let relationship = ws.relationship(kept[0]).unwrap();
    assert_eq!(relationship.source(), spa);
    assert_ne!(relationship.destination(), signin);
}

#[test]
fn test_expression_over_whole_workspace() {
    let Bank { ws, web, api, .. } = bank();

    let java = Expression::new().include_element(|e| e.technology() == Some("Java"));
    assert_eq!(java.elements(&ws), vec![web, api]);

    let people = Expression::new().include_element(|e| e.kind() == ElementKind::Person);
    let grouped: Vec<_> = people
        .elements(&ws)
        .into_iter()
        .filter(|&e| ws.element(e).unwrap().group() == "Big Bank")
        .collect();
    assert_eq!(grouped.len(), 1);
}
