// talog-core/src/ports/mod.rs

pub mod data_source;
pub mod template;

pub use data_source::{DataSink, DataSource};
pub use template::TemplateEngine;
