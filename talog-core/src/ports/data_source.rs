// talog-core/src/ports/data_source.rs

// What the catalog needs from whatever a dataset recipe builds. Building a
// source must not fetch anything: only `read` touches the outside world.

use std::any::Any;
use std::fmt;

use crate::domain::arguments::CallError;
use crate::domain::value::{Value, short_type_name};

pub trait DataSource: Send + Sync + fmt::Debug {
    /// Fetch and materialize the data this source points at.
    fn read(&self) -> Result<Value, CallError>;

    /// Short human-readable description, used in listings and logs.
    fn describe(&self) -> String {
        short_type_name(std::any::type_name::<Self>()).to_string()
    }

    /// Lets validators inspect the concrete source without reading it.
    fn as_any(&self) -> &dyn Any;

    /// The write capability, for sources that also accept data.
    fn as_sink(&self) -> Option<&dyn DataSink> {
        None
    }
}

pub trait DataSink: Send + Sync {
    fn write(&self, data: &Value) -> Result<(), CallError>;
}
