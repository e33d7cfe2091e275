// talog-core/src/application/mod.rs

pub mod builder;
pub mod catalog;
pub mod configuration;
pub mod registry;
pub mod validation;

// --- RE-EXPORTS (FACADE PATTERN) ---
// `use talog_core::application::{Catalog, Configuration, Registry};`

pub use builder::ObjectBuilder;
pub use catalog::{Catalog, ReadOptions};
pub use configuration::{Configuration, ConfigurationBuilder};
pub use registry::{Callable, Registry};
pub use validation::{ValidationReport, ValidatorOutcome, run_validations};
