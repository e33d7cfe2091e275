// talog-core/src/application/registry.rs

// Reference resolution without dynamic imports: every callable a catalog may
// name is registered up front under its dotted reference.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::domain::arguments::{Arguments, CallError, Verdict};
use crate::domain::error::ReferenceError;
use crate::domain::value::Value;
use crate::ports::DataSource;

pub type FactoryFn = dyn Fn(Arguments) -> Result<Value, CallError> + Send + Sync;
pub type ValidatorFn =
    dyn Fn(&dyn DataSource, Arguments) -> Result<Verdict, CallError> + Send + Sync;

#[allow(clippy::unwrap_used)]
static REFERENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*(:[A-Za-z_][A-Za-z0-9_]*)?$")
        .unwrap()
});

#[derive(Clone)]
pub enum Callable {
    /// Builds a value from keyword arguments.
    Factory(Arc<FactoryFn>),
    /// Judges a data source, given extra keyword arguments.
    Validator(Arc<ValidatorFn>),
}

impl Callable {
    pub fn kind(&self) -> &'static str {
        match self {
            Callable::Factory(_) => "factory",
            Callable::Validator(_) => "validator",
        }
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callable::{}", self.kind())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: BTreeMap<String, Callable>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in sources and validators.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::infrastructure::adapters::register_builtins(&mut registry);
        registry
    }

    pub fn register_factory<F>(&mut self, reference: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(Arguments) -> Result<Value, CallError> + Send + Sync + 'static,
    {
        self.entries
            .insert(reference.into(), Callable::Factory(Arc::new(factory)));
        self
    }

    pub fn register_validator<F>(
        &mut self,
        reference: impl Into<String>,
        validator: F,
    ) -> &mut Self
    where
        F: Fn(&dyn DataSource, Arguments) -> Result<Verdict, CallError> + Send + Sync + 'static,
    {
        self.entries
            .insert(reference.into(), Callable::Validator(Arc::new(validator)));
        self
    }

    /// Every registered reference, sorted.
    pub fn references(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn contains(&self, reference: &str) -> bool {
        self.entries.contains_key(reference)
    }

    /// Resolve a dotted reference (`pkg.module.Name` or `pkg.module.Name:attr`).
    pub fn resolve(&self, reference: &str) -> Result<&Callable, ReferenceError> {
        check_syntax(reference)?;
        if let Some(callable) = self.entries.get(reference) {
            return Ok(callable);
        }

        let (module, attribute) = split_reference(reference);
        if !module.is_empty() && !self.knows_module(module) {
            return Err(ReferenceError::UnknownModule {
                reference: reference.to_string(),
                module: module.to_string(),
            });
        }
        Err(ReferenceError::UnknownAttribute {
            reference: reference.to_string(),
            module: if module.is_empty() {
                "<root>".to_string()
            } else {
                module.to_string()
            },
            attribute: attribute.to_string(),
        })
    }

    pub fn resolve_factory(&self, reference: &str) -> Result<Arc<FactoryFn>, ReferenceError> {
        match self.resolve(reference)? {
            Callable::Factory(f) => Ok(Arc::clone(f)),
            other => Err(ReferenceError::KindMismatch {
                reference: reference.to_string(),
                expected: "factory",
                found: other.kind(),
            }),
        }
    }

    pub fn resolve_validator(&self, reference: &str) -> Result<Arc<ValidatorFn>, ReferenceError> {
        match self.resolve(reference)? {
            Callable::Validator(v) => Ok(Arc::clone(v)),
            other => Err(ReferenceError::KindMismatch {
                reference: reference.to_string(),
                expected: "validator",
                found: other.kind(),
            }),
        }
    }

    fn knows_module(&self, module: &str) -> bool {
        self.entries.keys().any(|key| {
            key.strip_prefix(module).is_some_and(|rest| {
                rest.is_empty() || rest.starts_with('.') || rest.starts_with(':')
            })
        })
    }
}

fn check_syntax(reference: &str) -> Result<(), ReferenceError> {
    if REFERENCE_RE.is_match(reference) {
        return Ok(());
    }
    let reason = if reference.matches(':').count() > 1 {
        "at most one `:` is allowed"
    } else {
        "expected dot-separated identifiers"
    };
    Err(ReferenceError::Malformed {
        reference: reference.to_string(),
        reason: reason.to_string(),
    })
}

/// `a.b.C:m` -> (`a.b.C`, `m`); `a.b.f` -> (`a.b`, `f`); `f` -> (``, `f`).
fn split_reference(reference: &str) -> (&str, &str) {
    if let Some((owner, attribute)) = reference.split_once(':') {
        return (owner, attribute);
    }
    match reference.rsplit_once('.') {
        Some((module, attribute)) => (module, attribute),
        None => ("", reference),
    }
}
