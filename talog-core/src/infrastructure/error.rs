// talog-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum TemplateError {
    #[error("Unresolved placeholder '{placeholder}' in {file} (line {line})")]
    #[diagnostic(
        code(talog::infra::template::unresolved),
        help("Define the value in an earlier parameter file, or pass it as a parameter.")
    )]
    Unresolved {
        file: String,
        placeholder: String,
        line: usize,
    },

    #[error("Template error in {file}: {message}")]
    #[diagnostic(
        code(talog::infra::template::malformed),
        help("Check your Jinja syntax ({{ ... }}).")
    )]
    Malformed { file: String, message: String },
}

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- FILESYSTEM (IO) ---
    #[error("File System Error on '{path}': {source}")]
    #[diagnostic(
        code(talog::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // --- CONFIG / YAML ---
    #[error("YAML Parsing Error in '{path}': {source}")]
    #[diagnostic(
        code(talog::infra::yaml),
        help("Check your YAML syntax (indentation, types) after template rendering.")
    )]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Configuration Error: {0}")]
    #[diagnostic(code(talog::infra::config))]
    ConfigError(String),

    #[error("Project configuration not found: {0}")]
    #[diagnostic(code(talog::infra::config_missing))]
    ConfigNotFound(String),

    #[error("Invalid project configuration: {0}")]
    #[diagnostic(code(talog::infra::project))]
    InvalidProject(#[from] validator::ValidationErrors),

    // --- TEMPLATING ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Template(#[from] TemplateError),
}

impl InfrastructureError {
    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        InfrastructureError::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    pub fn yaml(path: impl Into<String>, source: serde_yaml::Error) -> Self {
        InfrastructureError::Yaml {
            path: path.into(),
            source,
        }
    }
}
