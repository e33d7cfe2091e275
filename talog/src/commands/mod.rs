// talog/src/commands/mod.rs

pub mod inspect;
pub mod list;
pub mod params;
pub mod read;
pub mod validate;

use std::collections::BTreeMap;
use std::path::Path;

use miette::WrapErr;
use talog_core::Configuration;
use talog_core::Value;
use talog_core::infrastructure::config::project::load_project_config;

/// Load the manifest in `project_dir`, stack its parameter files and build
/// the catalog. Relative file paths in recipes resolve against the project.
pub fn load_configuration(project_dir: &Path) -> miette::Result<Configuration> {
    let project = load_project_config(project_dir)?;

    let base_dir = project_dir.to_string_lossy().into_owned();
    let mut initialised = BTreeMap::new();
    initialised.insert("base_dir".to_string(), Value::from(base_dir));

    Configuration::builder(project.catalog_path(project_dir))
        .parameters_paths(&project.parameter_paths(project_dir))
        .optional_parameters_paths(&project.optional_parameter_paths(project_dir))
        .initialised(initialised)
        .load()
        .wrap_err_with(|| format!("Failed to load project '{}'", project.name))
}
