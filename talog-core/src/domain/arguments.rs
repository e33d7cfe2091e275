// talog-core/src/domain/arguments.rs

// Keyword arguments as a registered callable sees them. A callable pulls the
// names it understands and calls `finish()`, which rejects whatever is left:
// that is how an unexpected keyword surfaces.

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;

use crate::domain::value::Value;

/// Failure reported by a registered callable (factory, validator or source).
#[derive(Error, Debug)]
pub enum CallError {
    #[error("missing required argument '{0}'")]
    MissingArgument(String),

    #[error("unexpected argument(s): {}", .0.join(", "))]
    UnexpectedArguments(Vec<String>),

    #[error("argument '{name}' must be {expected}, found {found}")]
    InvalidArgument {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("{0}")]
    Failed(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CallError {
    pub fn failed(message: impl Into<String>) -> Self {
        CallError::Failed(message.into())
    }
}

/// Outcome of a validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail(String),
}

impl Verdict {
    pub fn fail(reason: impl Into<String>) -> Self {
        Verdict::Fail(reason.into())
    }

    /// `Pass` when `condition` holds, otherwise `Fail(reason())`.
    pub fn check(condition: bool, reason: impl FnOnce() -> String) -> Self {
        if condition {
            Verdict::Pass
        } else {
            Verdict::Fail(reason())
        }
    }

    pub fn passed(&self) -> bool {
        matches!(self, Verdict::Pass)
    }
}

impl From<bool> for Verdict {
    fn from(passed: bool) -> Self {
        Verdict::check(passed, || "validator returned false".to_string())
    }
}

/// Conversion from a resolved argument into a concrete Rust type.
pub trait FromValue: Sized {
    const EXPECTED: &'static str;

    fn from_value(value: Value) -> Result<Self, Value>;
}

impl FromValue for Value {
    const EXPECTED: &'static str = "any value";

    fn from_value(value: Value) -> Result<Self, Value> {
        Ok(value)
    }
}

impl FromValue for String {
    const EXPECTED: &'static str = "a string";

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(other),
        }
    }
}

impl FromValue for bool {
    const EXPECTED: &'static str = "a bool";

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(other),
        }
    }
}

impl FromValue for i64 {
    const EXPECTED: &'static str = "an integer";

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Int(i) => Ok(i),
            other => Err(other),
        }
    }
}

impl FromValue for usize {
    const EXPECTED: &'static str = "a non-negative integer";

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Int(i) if i >= 0 => usize::try_from(i).map_err(|_| Value::Int(i)),
            other => Err(other),
        }
    }
}

impl FromValue for f64 {
    const EXPECTED: &'static str = "a number";

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Float(f) => Ok(f),
            Value::Int(i) => Ok(i as f64),
            other => Err(other),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    const EXPECTED: &'static str = "a list";

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::List(items) => {
                let snapshot = items.clone();
                items
                    .into_iter()
                    .map(T::from_value)
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|_| Value::List(snapshot))
            }
            other => Err(other),
        }
    }
}

impl FromValue for BTreeMap<String, Value> {
    const EXPECTED: &'static str = "a mapping";

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Map(map) => Ok(map),
            other => Err(other),
        }
    }
}

/// Resolved keyword arguments, plus the initialised values a callable may
/// fall back on when the recipe does not name them.
#[derive(Debug, Clone, Default)]
pub struct Arguments {
    explicit: BTreeMap<String, Value>,
    initialised: Arc<BTreeMap<String, Value>>,
}

impl Arguments {
    pub fn new(explicit: BTreeMap<String, Value>) -> Self {
        Self {
            explicit,
            initialised: Arc::default(),
        }
    }

    pub fn with_initialised(mut self, initialised: Arc<BTreeMap<String, Value>>) -> Self {
        self.initialised = initialised;
        self
    }

    /// Builder-style helper, mostly for tests.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.explicit.insert(name.into(), value.into());
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.explicit.contains_key(name) || self.initialised.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.explicit.len()
    }

    pub fn is_empty(&self) -> bool {
        self.explicit.is_empty()
    }

    fn take(&mut self, name: &str) -> Option<Value> {
        self.explicit
            .remove(name)
            .or_else(|| self.initialised.get(name).cloned())
    }

    pub fn required<T: FromValue>(&mut self, name: &str) -> Result<T, CallError> {
        let value = self
            .take(name)
            .ok_or_else(|| CallError::MissingArgument(name.to_string()))?;
        convert(name, value)
    }

    pub fn optional<T: FromValue>(&mut self, name: &str) -> Result<Option<T>, CallError> {
        match self.take(name) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => convert(name, value).map(Some),
        }
    }

    pub fn optional_or<T: FromValue>(&mut self, name: &str, default: T) -> Result<T, CallError> {
        Ok(self.optional(name)?.unwrap_or(default))
    }

    /// Hand every remaining explicit argument to the caller, e.g. for
    /// callables that accept arbitrary keywords.
    pub fn remaining(&mut self) -> BTreeMap<String, Value> {
        std::mem::take(&mut self.explicit)
    }

    /// Fail when the recipe supplied arguments the callable did not consume.
    pub fn finish(self) -> Result<(), CallError> {
        if self.explicit.is_empty() {
            Ok(())
        } else {
            Err(CallError::UnexpectedArguments(
                self.explicit.into_keys().collect(),
            ))
        }
    }
}

fn convert<T: FromValue>(name: &str, value: Value) -> Result<T, CallError> {
    T::from_value(value).map_err(|original| CallError::InvalidArgument {
        name: name.to_string(),
        expected: T::EXPECTED,
        found: original.kind(),
    })
}
