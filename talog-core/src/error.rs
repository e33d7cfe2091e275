// talog-core/src/error.rs

use crate::domain::error::DomainError;
use crate::infrastructure::error::{InfrastructureError, TemplateError};
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum TalogError {
    // --- DOMAIN (references, invocation, validation) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Domain(#[from] DomainError),

    // --- INFRASTRUCTURE (IO, YAML, templates) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Infrastructure(#[from] InfrastructureError),
}

impl From<TemplateError> for TalogError {
    fn from(err: TemplateError) -> Self {
        TalogError::Infrastructure(InfrastructureError::Template(err))
    }
}

impl TalogError {
    /// The domain error underneath, if this is one.
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            TalogError::Domain(err) => Some(err),
            TalogError::Infrastructure(_) => None,
        }
    }
}
