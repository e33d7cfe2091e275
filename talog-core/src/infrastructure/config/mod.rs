pub mod loader;
pub mod project;

pub use loader::{load_yaml_with_template, render_yaml};
pub use project::{ProjectConfig, load_project_config};
