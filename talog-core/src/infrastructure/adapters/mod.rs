// talog-core/src/infrastructure/adapters/mod.rs

pub mod file;
pub mod memory;
pub mod validators;

pub use file::{FileFormat, FileSource};
pub use memory::InMemorySource;

use crate::application::registry::Registry;

/// Register every built-in source and validator under `talog.*`.
pub fn register_builtins(registry: &mut Registry) {
    registry
        .register_factory(memory::REFERENCE, memory::factory)
        .register_factory(file::REFERENCE, file::factory)
        .register_validator("talog.validators.not_empty", validators::not_empty)
        .register_validator("talog.validators.min_length", validators::min_length)
        .register_validator("talog.validators.max_length", validators::max_length)
        .register_validator("talog.validators.file_exists", validators::file_exists);
}
