// talog-core/src/infrastructure/config/loader.rs

use std::path::Path;

use tracing::{debug, instrument};

use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::read_text;
use crate::ports::TemplateEngine;

/// Render `text` with `parameters`, then parse the result as YAML.
///
/// `name` identifies the document in template and parse errors.
pub fn render_yaml(
    engine: &dyn TemplateEngine,
    name: &str,
    text: &str,
    parameters: &serde_yaml::Mapping,
) -> Result<serde_yaml::Value, InfrastructureError> {
    let rendered = engine.render(name, text, parameters)?;
    debug!(file = name, bytes = rendered.len(), "Template rendered");
    serde_yaml::from_str(&rendered).map_err(|e| InfrastructureError::yaml(name, e))
}

/// Load a YAML file, applying template rendering first.
#[instrument(skip(engine, parameters), fields(path = %path.display()))]
pub fn load_yaml_with_template(
    engine: &dyn TemplateEngine,
    path: &Path,
    parameters: &serde_yaml::Mapping,
) -> Result<serde_yaml::Value, InfrastructureError> {
    let text = read_text(path)?;
    render_yaml(engine, &path.display().to_string(), &text, parameters)
}
