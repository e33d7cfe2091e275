// talog-core/src/application/configuration.rs

// Stacks parameter files (generic first, environment-specific last) into one
// flat namespace, then renders the catalog with it.
//
// Ordering: file i is rendered against the merge of files 0..i-1, and only
// then merged itself. A file therefore never sees its own keys, nor the keys
// of later files. Merging is a shallow top-level override.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{info, instrument, warn};

use crate::application::catalog::Catalog;
use crate::application::registry::Registry;
use crate::domain::value::Value;
use crate::error::TalogError;
use crate::infrastructure::config::loader::load_yaml_with_template;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::template::JinjaRenderer;
use crate::ports::TemplateEngine;

#[derive(Debug, Clone)]
pub struct Configuration {
    parameters: serde_yaml::Mapping,
    catalog: Catalog,
}

impl Configuration {
    /// Load `parameters_paths` in order, then the catalog, using the
    /// built-in registry.
    pub fn from_hierarchical_config<P: AsRef<Path>>(
        parameters_paths: &[P],
        catalog_path: impl AsRef<Path>,
    ) -> Result<Self, TalogError> {
        Self::builder(catalog_path)
            .parameters_paths(parameters_paths)
            .load()
    }

    pub fn builder(catalog_path: impl AsRef<Path>) -> ConfigurationBuilder {
        ConfigurationBuilder {
            parameters_paths: Vec::new(),
            optional_parameters_paths: Vec::new(),
            catalog_path: catalog_path.as_ref().to_path_buf(),
            registry: None,
            initialised: BTreeMap::new(),
        }
    }

    /// The merged parameter set.
    pub fn parameters(&self) -> &serde_yaml::Mapping {
        &self.parameters
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Convert the merged parameters into a typed config.
    pub fn parameters_as<T: DeserializeOwned>(&self) -> Result<T, TalogError> {
        serde_yaml::from_value(serde_yaml::Value::Mapping(self.parameters.clone()))
            .map_err(|e| InfrastructureError::yaml("<merged parameters>", e).into())
    }

    pub fn into_parts(self) -> (serde_yaml::Mapping, Catalog) {
        (self.parameters, self.catalog)
    }
}

pub struct ConfigurationBuilder {
    parameters_paths: Vec<PathBuf>,
    optional_parameters_paths: Vec<PathBuf>,
    catalog_path: PathBuf,
    registry: Option<Arc<Registry>>,
    initialised: BTreeMap<String, Value>,
}

impl ConfigurationBuilder {
    /// Required parameter files, most generic first.
    pub fn parameters_paths<P: AsRef<Path>>(mut self, paths: &[P]) -> Self {
        self.parameters_paths
            .extend(paths.iter().map(|p| p.as_ref().to_path_buf()));
        self
    }

    /// Parameter files applied after the required ones. Missing files are
    /// skipped with a warning.
    pub fn optional_parameters_paths<P: AsRef<Path>>(mut self, paths: &[P]) -> Self {
        self.optional_parameters_paths
            .extend(paths.iter().map(|p| p.as_ref().to_path_buf()));
        self
    }

    /// Defaults to `Registry::with_builtins()`.
    pub fn registry(mut self, registry: Arc<Registry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn initialised(mut self, initialised: BTreeMap<String, Value>) -> Self {
        self.initialised = initialised;
        self
    }

    #[instrument(skip_all, fields(catalog = %self.catalog_path.display()))]
    pub fn load(self) -> Result<Configuration, TalogError> {
        let engine = JinjaRenderer::new();

        let mut parameters = serde_yaml::Mapping::new();
        for path in &self.parameters_paths {
            merge_file(&engine, path, &mut parameters)?;
        }
        for path in &self.optional_parameters_paths {
            if path.exists() {
                merge_file(&engine, path, &mut parameters)?;
            } else {
                warn!(path = %path.display(), "Optional parameter file not found");
            }
        }
        info!(keys = parameters.len(), "Parameters merged");

        let registry = self
            .registry
            .unwrap_or_else(|| Arc::new(Registry::with_builtins()));
        let catalog = Catalog::from_yaml_with(
            &engine,
            &self.catalog_path,
            Some(&parameters),
            registry,
        )?
        .with_initialised(self.initialised);

        Ok(Configuration {
            parameters,
            catalog,
        })
    }
}

/// Render `path` against what has been merged so far, then fold it in.
pub fn merge_file(
    engine: &dyn TemplateEngine,
    path: &Path,
    merged: &mut serde_yaml::Mapping,
) -> Result<(), InfrastructureError> {
    match load_yaml_with_template(engine, path, merged)? {
        serde_yaml::Value::Null => {
            info!(path = %path.display(), "Parameter file is empty");
            Ok(())
        }
        serde_yaml::Value::Mapping(layer) => {
            info!(path = %path.display(), keys = layer.len(), "Parameter file loaded");
            for (key, value) in layer {
                merged.insert(key, value);
            }
            Ok(())
        }
        _ => Err(InfrastructureError::ConfigError(format!(
            "parameter file {} must contain a mapping",
            path.display()
        ))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::infrastructure::error::TemplateError;
    use anyhow::Result;
    use serde::Deserialize;
    use std::fs;
    use tempfile::{TempDir, tempdir};

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn yaml(text: &str) -> serde_yaml::Mapping {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn test_later_file_renders_against_earlier_then_overrides() -> Result<()> {
        let dir = tempdir()?;
        let a = write(&dir, "a.yaml", "x: 1\n");
        let b = write(&dir, "b.yaml", "x: 2\ny: \"{{ x }}\"\n");
        let catalog = write(&dir, "catalog.yaml", "{}\n");

        let config = Configuration::from_hierarchical_config(&[a, b], &catalog)?;
        // y was rendered while only a.yaml was merged.
        assert_eq!(config.parameters(), &yaml("x: 2\ny: \"1\"\n"));
        Ok(())
    }

    #[test]
    fn test_override_is_shallow() -> Result<()> {
        let dir = tempdir()?;
        let base = write(&dir, "base.yaml", "db: {host: localhost, port: 5432}\nname: base\n");
        let prod = write(&dir, "prod.yaml", "db: {host: prod.internal}\n");
        let catalog = write(&dir, "catalog.yaml", "{}\n");

        let config = Configuration::from_hierarchical_config(&[base, prod], &catalog)?;
        assert_eq!(
            config.parameters(),
            &yaml("db: {host: prod.internal}\nname: base\n")
        );
        Ok(())
    }

    #[test]
    fn test_catalog_rendered_with_merged_parameters() -> Result<()> {
        let dir = tempdir()?;
        let base = write(&dir, "base.yaml", "rows: [1, 2]\nlabel: base\n");
        let env = write(&dir, "env.yaml", "label: \"{{ label }}-dev\"\n");
        let catalog = write(
            &dir,
            "catalog.yaml",
            "numbers:\n  callable: talog.sources.InMemory\n  args:\n    data: {{ rows }}\n",
        );

        let config = Configuration::from_hierarchical_config(&[base, env], &catalog)?;
        assert_eq!(
            config.parameters().get("label"),
            Some(&serde_yaml::Value::from("base-dev"))
        );
        assert_eq!(config.catalog().read("numbers")?, Value::from(vec![1, 2]));
        Ok(())
    }

    #[test]
    fn test_unresolved_reference_names_the_file() -> Result<()> {
        let dir = tempdir()?;
        let a = write(&dir, "a.yaml", "x: 1\n");
        // y can only see a.yaml, so z is unknown.
        let b = write(&dir, "b.yaml", "z: 2\ny: \"{{ z }}\"\n");
        let catalog = write(&dir, "catalog.yaml", "{}\n");

        let err = Configuration::from_hierarchical_config(&[a, b], &catalog).unwrap_err();
        match err {
            TalogError::Infrastructure(InfrastructureError::Template(
                TemplateError::Unresolved { file, .. },
            )) => assert!(file.ends_with("b.yaml"), "{file}"),
            other => panic!("expected template error, got {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn test_optional_files_are_skipped_when_missing() -> Result<()> {
        let dir = tempdir()?;
        let a = write(&dir, "a.yaml", "x: 1\n");
        let local = write(&dir, "local.yaml", "x: 3\n");
        let catalog = write(&dir, "catalog.yaml", "{}\n");

        let config = Configuration::builder(&catalog)
            .parameters_paths(&[a])
            .optional_parameters_paths(&[dir.path().join("missing.yaml"), local])
            .load()?;
        assert_eq!(config.parameters(), &yaml("x: 3\n"));
        Ok(())
    }

    #[test]
    fn test_missing_required_file_fails() {
        let dir = tempdir().unwrap();
        let catalog = write(&dir, "catalog.yaml", "{}\n");
        let err =
            Configuration::from_hierarchical_config(&[dir.path().join("nope.yaml")], &catalog)
                .unwrap_err();
        assert!(matches!(
            err,
            TalogError::Infrastructure(InfrastructureError::Io { .. })
        ));
    }

    #[test]
    fn test_non_mapping_parameter_file_fails() {
        let dir = tempdir().unwrap();
        let a = write(&dir, "a.yaml", "- 1\n- 2\n");
        let catalog = write(&dir, "catalog.yaml", "{}\n");
        let err = Configuration::from_hierarchical_config(&[a], &catalog).unwrap_err();
        assert!(err.to_string().contains("must contain a mapping"));
    }

    #[test]
    fn test_typed_parameters() -> Result<()> {
        #[derive(Deserialize)]
        struct Settings {
            env: String,
            retries: u32,
        }

        let dir = tempdir()?;
        let a = write(&dir, "a.yaml", "env: dev\nretries: 3\nextra: true\n");
        let catalog = write(&dir, "catalog.yaml", "{}\n");

        let config = Configuration::from_hierarchical_config(&[a], &catalog)?;
        let settings: Settings = config.parameters_as()?;
        assert_eq!(settings.env, "dev");
        assert_eq!(settings.retries, 3);
        Ok(())
    }
}
