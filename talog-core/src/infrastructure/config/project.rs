// talog-core/src/infrastructure/config/project.rs

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, instrument};
use validator::Validate;

use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::read_text;

const MANIFEST_CANDIDATES: [&str; 2] = ["talog.yaml", "talog.yml"];

/// The project manifest: which parameter files to stack, and which catalog
/// to render with them. Paths are relative to the project directory.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct ProjectConfig {
    #[validate(length(min = 1, message = "project name must not be empty"))]
    pub name: String,

    #[serde(default)]
    pub parameters: Vec<String>,

    #[serde(rename = "optional-parameters", default)]
    pub optional_parameters: Vec<String>,

    #[validate(length(min = 1, message = "catalog path must not be empty"))]
    pub catalog: String,
}

impl ProjectConfig {
    pub fn parameter_paths(&self, project_dir: &Path) -> Vec<PathBuf> {
        self.parameters.iter().map(|p| project_dir.join(p)).collect()
    }

    pub fn optional_parameter_paths(&self, project_dir: &Path) -> Vec<PathBuf> {
        self.optional_parameters
            .iter()
            .map(|p| project_dir.join(p))
            .collect()
    }

    pub fn catalog_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.catalog)
    }
}

#[instrument(skip(project_dir), fields(dir = %project_dir.display()))]
pub fn load_project_config(project_dir: &Path) -> Result<ProjectConfig, InfrastructureError> {
    let config_path = find_main_config(project_dir)?;
    info!(path = ?config_path, "Loading project manifest");

    let content = read_text(&config_path)?;
    let mut config: ProjectConfig = serde_yaml::from_str(&content)
        .map_err(|e| InfrastructureError::yaml(config_path.display().to_string(), e))?;

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    config.validate()?;

    Ok(config)
}

fn find_main_config(root: &Path) -> Result<PathBuf, InfrastructureError> {
    for filename in MANIFEST_CANDIDATES {
        let p = root.join(filename);
        if p.exists() {
            return Ok(p);
        }
    }
    Err(InfrastructureError::ConfigNotFound(format!(
        "No manifest in {:?}. Checked: {:?}",
        root, MANIFEST_CANDIDATES
    )))
}

// TALOG_CATALOG swaps the catalog; TALOG_PARAMETERS appends parameter files
// (comma-separated) after the manifest's own.
fn apply_env_overrides(config: &mut ProjectConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(val) = lookup("TALOG_CATALOG").filter(|v| !v.trim().is_empty()) {
        info!(old = %config.catalog, new = %val, "Overriding catalog via ENV");
        config.catalog = val;
    }
    if let Some(val) = lookup("TALOG_PARAMETERS") {
        let extra: Vec<String> = val
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
        if !extra.is_empty() {
            info!(files = ?extra, "Appending parameter files via ENV");
            config.parameters.extend(extra);
        }
    }
}
