// talog-core/src/domain/error.rs

use std::fmt;

use miette::Diagnostic;
use thiserror::Error;

use crate::domain::arguments::CallError;
use crate::domain::path::TreePath;

#[derive(Error, Debug, Diagnostic)]
pub enum ReferenceError {
    #[error("Malformed reference '{reference}': {reason}")]
    #[diagnostic(
        code(talog::domain::reference::malformed),
        help("References look like `package.module.Name` or `package.module.Name:method`.")
    )]
    Malformed { reference: String, reason: String },

    #[error("Cannot resolve '{reference}': no module '{module}' is registered")]
    #[diagnostic(
        code(talog::domain::reference::module),
        help("Register the callable in the Registry before loading the catalog.")
    )]
    UnknownModule { reference: String, module: String },

    #[error("Cannot resolve '{reference}': module '{module}' has no attribute '{attribute}'")]
    #[diagnostic(code(talog::domain::reference::attribute))]
    UnknownAttribute {
        reference: String,
        module: String,
        attribute: String,
    },

    #[error("'{reference}' is registered as a {found}, but a {expected} is required here")]
    #[diagnostic(code(talog::domain::reference::kind))]
    KindMismatch {
        reference: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl ReferenceError {
    pub fn reference(&self) -> &str {
        match self {
            ReferenceError::Malformed { reference, .. }
            | ReferenceError::UnknownModule { reference, .. }
            | ReferenceError::UnknownAttribute { reference, .. }
            | ReferenceError::KindMismatch { reference, .. } => reference,
        }
    }
}

/// A resolved callable rejected its arguments or failed while running.
#[derive(Error, Debug, Diagnostic)]
#[error("Failed to invoke '{callable}' at {path}: {source}")]
#[diagnostic(
    code(talog::domain::invocation),
    help("Check the `args` of the recipe at the reported position.")
)]
pub struct InvocationError {
    pub path: TreePath,
    pub callable: String,
    #[source]
    pub source: CallError,
}

#[derive(Debug)]
pub struct ValidationFailure {
    /// Position of the validator in the dataset's `validations` list.
    pub index: usize,
    pub callable: String,
    pub reason: String,
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.index, self.callable, self.reason)
    }
}

/// Every failed validator of one dataset.
#[derive(Error, Debug, Diagnostic)]
#[diagnostic(
    code(talog::domain::validation),
    help("Data was not read. Use `skip_validation` to bypass validators while debugging.")
)]
pub struct ValidationError {
    pub dataset: String,
    pub failures: Vec<ValidationFailure>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Dataset '{}' failed {} validation(s)",
            self.dataset,
            self.failures.len()
        )?;
        for failure in &self.failures {
            write!(f, "\n  - {failure}")?;
        }
        Ok(())
    }
}

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Unresolvable callable at {path}: {source}")]
    #[diagnostic(
        code(talog::domain::reference),
        help("Register the callable in the Registry, or fix the `callable` at the reported position.")
    )]
    Reference {
        path: TreePath,
        #[source]
        source: ReferenceError,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Invocation(#[from] InvocationError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Validation(#[from] ValidationError),

    #[error("Dataset '{name}' is not in the catalog")]
    #[diagnostic(
        code(talog::domain::unknown_dataset),
        help("Check the dataset name against the top-level keys of the catalog file.")
    )]
    UnknownDataset { name: String, known: Vec<String> },

    #[error("Malformed configuration at {path}: {reason}")]
    #[diagnostic(code(talog::domain::malformed))]
    MalformedConfig { path: String, reason: String },

    #[error("Dataset '{dataset}': '{callable}' built a {found}, not a data source")]
    #[diagnostic(
        code(talog::domain::not_a_data_source),
        help("Top-level catalog recipes must build something implementing DataSource.")
    )]
    NotADataSource {
        dataset: String,
        callable: String,
        found: &'static str,
    },

    #[error("Dataset '{dataset}': reading failed: {source}")]
    #[diagnostic(code(talog::domain::read))]
    SourceRead {
        dataset: String,
        #[source]
        source: CallError,
    },

    #[error("Dataset '{dataset}': writing failed: {source}")]
    #[diagnostic(code(talog::domain::write))]
    SourceWrite {
        dataset: String,
        #[source]
        source: CallError,
    },

    #[error("Dataset '{dataset}' cannot be written to")]
    #[diagnostic(code(talog::domain::not_writeable))]
    NotWriteable { dataset: String },
}

impl DomainError {
    pub fn reference(path: &TreePath, source: ReferenceError) -> Self {
        DomainError::Reference {
            path: path.clone(),
            source,
        }
    }

    pub fn malformed(path: &TreePath, reason: impl Into<String>) -> Self {
        DomainError::MalformedConfig {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}
