// talog/src/commands/inspect.rs

use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use std::path::Path;

pub fn execute(project_dir: &Path) -> miette::Result<()> {
    let config = super::load_configuration(project_dir)?;
    let catalog = config.catalog();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Dataset", "Callable", "Validators"]);

    for name in catalog.names() {
        let Some(entry) = catalog.entry(name) else {
            continue;
        };
        let validators: Vec<&str> = entry
            .validations
            .iter()
            .map(|v| v.callable.as_str())
            .collect();
        let validators = if validators.is_empty() {
            "-".to_string()
        } else {
            validators.join("\n")
        };
        table.add_row(vec![name, entry.source.callable.as_str(), validators.as_str()]);
    }

    println!("{table}");
    Ok(())
}
