// talog-core/src/ports/template.rs

use crate::infrastructure::error::TemplateError;

pub trait TemplateEngine: Send + Sync {
    /// Render `template` against `context`. `name` identifies the source
    /// (usually a file path) in errors.
    fn render(
        &self,
        name: &str,
        template: &str,
        context: &serde_yaml::Mapping,
    ) -> Result<String, TemplateError>;
}
