//! Example: Modelling an internet banking system
//!
//! This example builds a small C4 model, derives implied relationships,
//! adds a context and a container view and prints the workspace JSON.

use cartograph::{
    ArchitectureBuilder, ViewDefinition,
    config::AppConfig,
    identifier::NodeRef,
    model::{Annotation, ElementSpec, desc},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let builder = ArchitectureBuilder::new(AppConfig::default());
    let mut ws = builder.workspace("Big Bank plc", "Internet banking landscape")?;

    // People and systems are created detached and attached below.
    let customer = ws.create(ElementSpec::person("Personal Banking Customer"))?;
    let banking = ws.create(ElementSpec::software_system("Internet Banking System"))?;
    let mainframe = ws.group("Big Bank plc", |ws| {
        ws.create(ElementSpec::software_system("Mainframe Banking System").tag("existing"))
    })?;

    let web = ws.create(ElementSpec::container("Web Application").technology("Java"))?;
    let api = ws.create(ElementSpec::container("API Application").technology("Java"))?;
    let database = ws.create(ElementSpec::container("Database").technology("Oracle"))?;

    ws.contains(banking, [web, api, database])?
        .with_implied_relationships(|ws, _| {
            let mut relationships = ws.relate_each(
                api,
                [
                    desc("Reads from and writes to").technology("SQL/TCP").to(database),
                    desc("Makes API calls to")
                        .technology("XML/HTTPS")
                        .to(mainframe)
                        .annotate(Annotation::new().tag("external")),
                ],
            )?;
            relationships.push(ws.relate(web).described_as("Calls").to(api)?.id());
            Ok(relationships)
        })?;

    ws.contains(NodeRef::Workspace, [customer, banking, mainframe])?
        .with_implied_relationships(|ws, _| {
            Ok(vec![
                ws.relate(customer)
                    .described_as("Visits")
                    .technology("HTTPS")
                    .to(web)?
                    .id(),
            ])
        })?;

    builder.add_view(
        &mut ws,
        ViewDefinition::system_context(banking, "context", "Internet banking in context")
            .title("System Context"),
    )?;
    builder.add_view(
        &mut ws,
        ViewDefinition::container(banking, "containers", "Inside internet banking")
            .exclude_element(|e| e.tags().contains("existing")),
    )?;

    println!("{}", serde_json::to_string_pretty(&ws)?);
    Ok(())
}
