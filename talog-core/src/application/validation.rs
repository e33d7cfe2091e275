// talog-core/src/application/validation.rs

use tracing::{info, warn};

use crate::application::builder::ObjectBuilder;
use crate::domain::arguments::Verdict;
use crate::domain::error::{DomainError, ValidationError, ValidationFailure};
use crate::domain::path::TreePath;
use crate::domain::tree::{Recipe, VALIDATIONS_KEY};
use crate::ports::DataSource;

/// Result of one validator.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatorOutcome {
    pub index: usize,
    pub callable: String,
    pub verdict: Verdict,
}

/// Every validator of a dataset, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    pub dataset: String,
    pub outcomes: Vec<ValidatorOutcome>,
}

impl ValidationReport {
    pub fn passed(&self) -> bool {
        self.outcomes.iter().all(|o| o.verdict.passed())
    }

    pub fn failures(&self) -> impl Iterator<Item = &ValidatorOutcome> {
        self.outcomes.iter().filter(|o| !o.verdict.passed())
    }

    /// `Err` with every failure when at least one validator failed.
    pub fn into_result(self) -> Result<(), ValidationError> {
        let failures: Vec<ValidationFailure> = self
            .outcomes
            .into_iter()
            .filter_map(|outcome| match outcome.verdict {
                Verdict::Pass => None,
                Verdict::Fail(reason) => Some(ValidationFailure {
                    index: outcome.index,
                    callable: outcome.callable,
                    reason,
                }),
            })
            .collect();
        if failures.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                dataset: self.dataset,
                failures,
            })
        }
    }
}

/// Run every validator against `source`. No short-circuit: a failing
/// validator does not stop the ones after it.
///
/// A validator that errors counts as failed. An unresolvable validator
/// reference, or a failure while building its arguments, is a configuration
/// error and aborts the run.
pub fn run_validations(
    builder: &ObjectBuilder<'_>,
    dataset: &str,
    source: &dyn DataSource,
    validations: &[Recipe],
) -> Result<ValidationReport, DomainError> {
    let base = TreePath::root().key(dataset).key(VALIDATIONS_KEY);
    let mut outcomes = Vec::with_capacity(validations.len());

    if !validations.is_empty() {
        info!(dataset, count = validations.len(), "Validating data source");
    }

    for (index, recipe) in validations.iter().enumerate() {
        let path = base.index(index);
        let validator = builder
            .registry()
            .resolve_validator(&recipe.callable)
            .map_err(|e| DomainError::reference(&path, e))?;
        let args = builder.resolve_args(recipe, &path)?;

        let verdict = match validator(source, args) {
            Ok(verdict) => verdict,
            Err(err) => Verdict::Fail(err.to_string()),
        };

        match &verdict {
            Verdict::Pass => info!(dataset, validator = %recipe.callable, "Expectation passed"),
            Verdict::Fail(reason) => {
                warn!(dataset, validator = %recipe.callable, %reason, "Expectation failed")
            }
        }

        outcomes.push(ValidatorOutcome {
            index,
            callable: recipe.callable.clone(),
            verdict,
        });
    }

    Ok(ValidationReport {
        dataset: dataset.to_string(),
        outcomes,
    })
}
