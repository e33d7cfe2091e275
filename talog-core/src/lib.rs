// talog-core/src/lib.rs

#![allow(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::perf)]

// --- HEXAGONAL MODULES ---

// 1. Ports: the capabilities a data source or template engine must offer.
pub mod ports;

// 2. Domain: configuration trees, runtime values, argument extraction.
// Depends on ports only.
pub mod domain;

// 3. Infrastructure: YAML files, Jinja rendering, built-in sources.
pub mod infrastructure;

// 4. Application: registry, object builder, validation, catalog.
pub mod application;

pub mod error;

// --- RE-EXPORTS (FACADE) ---
pub use application::{Catalog, Configuration, ObjectBuilder, ReadOptions, Registry};
pub use domain::{Arguments, CallError, ConfigNode, Recipe, Value, Verdict};
pub use error::TalogError;
pub use ports::{DataSink, DataSource};
