// talog/src/commands/read.rs

use std::path::Path;

use miette::IntoDiagnostic;
use talog_core::ReadOptions;

use crate::cli::OutputFormat;

pub fn execute(
    project_dir: &Path,
    name: &str,
    skip_validation: bool,
    format: OutputFormat,
) -> miette::Result<()> {
    let config = super::load_configuration(project_dir)?;
    let data = config
        .catalog()
        .read_with(name, ReadOptions { skip_validation })?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&data).into_diagnostic()?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&data).into_diagnostic()?),
    }
    Ok(())
}
