// talog-core/src/infrastructure/adapters/memory.rs

use std::any::Any;
use std::sync::RwLock;

use crate::domain::arguments::{Arguments, CallError};
use crate::domain::value::Value;
use crate::ports::{DataSink, DataSource};

pub const REFERENCE: &str = "talog.sources.InMemory";

/// A fixed payload held in memory. Writing replaces it.
#[derive(Debug)]
pub struct InMemorySource {
    data: RwLock<Value>,
}

impl InMemorySource {
    pub fn new(data: Value) -> Self {
        Self {
            data: RwLock::new(data),
        }
    }

    /// The current payload, without going through `read`.
    pub fn payload(&self) -> Result<Value, CallError> {
        self.data
            .read()
            .map(|data| data.clone())
            .map_err(|_| CallError::failed("in-memory payload lock poisoned"))
    }
}

impl DataSource for InMemorySource {
    fn read(&self) -> Result<Value, CallError> {
        self.payload()
    }

    fn describe(&self) -> String {
        match self.data.read() {
            Ok(data) => format!("InMemory({})", data.kind()),
            Err(_) => "InMemory(poisoned)".to_string(),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_sink(&self) -> Option<&dyn DataSink> {
        Some(self)
    }
}

impl DataSink for InMemorySource {
    fn write(&self, data: &Value) -> Result<(), CallError> {
        let mut guard = self
            .data
            .write()
            .map_err(|_| CallError::failed("in-memory payload lock poisoned"))?;
        *guard = data.clone();
        Ok(())
    }
}

/// `talog.sources.InMemory(data)`
pub fn factory(mut args: Arguments) -> Result<Value, CallError> {
    let data: Value = args.required("data")?;
    args.finish()?;
    Ok(Value::source(InMemorySource::new(data)))
}
