// talog/src/commands/params.rs

use std::path::Path;

use miette::IntoDiagnostic;
use talog_core::infrastructure::fs::atomic_write;

pub fn execute(project_dir: &Path, output: Option<&Path>) -> miette::Result<()> {
    let config = super::load_configuration(project_dir)?;
    let yaml = serde_yaml::to_string(config.parameters()).into_diagnostic()?;

    match output {
        Some(path) => {
            atomic_write(path, &yaml)?;
            println!("✨ Parameters written to {}", path.display());
        }
        None => print!("{yaml}"),
    }
    Ok(())
}
