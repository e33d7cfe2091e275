pub mod arguments;
pub mod error;
pub mod path;
pub mod tree;
pub mod value;

// Re-exports
pub use arguments::{Arguments, CallError, FromValue, Verdict};
pub use error::{DomainError, InvocationError, ReferenceError, ValidationError, ValidationFailure};
pub use path::TreePath;
pub use tree::{ConfigNode, DatasetEntry, Recipe};
pub use value::{Object, Value};
