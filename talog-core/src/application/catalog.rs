// talog-core/src/application/catalog.rs

// A catalog keeps recipes, not objects. Every read builds the data source
// afresh, runs its validators, and only then fetches.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::builder::ObjectBuilder;
use crate::application::registry::Registry;
use crate::application::validation::{ValidationReport, run_validations};
use crate::domain::error::DomainError;
use crate::domain::path::TreePath;
use crate::domain::tree::DatasetEntry;
use crate::domain::value::Value;
use crate::error::TalogError;
use crate::infrastructure::config::loader::{load_yaml_with_template, render_yaml};
use crate::infrastructure::template::JinjaRenderer;
use crate::ports::{DataSource, TemplateEngine};

#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOptions {
    /// Fetch even when validators would fail. Meant for debugging a dataset.
    pub skip_validation: bool,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    entries: BTreeMap<String, DatasetEntry>,
    registry: Arc<Registry>,
    initialised: Arc<BTreeMap<String, Value>>,
}

impl Catalog {
    pub fn new(entries: BTreeMap<String, DatasetEntry>, registry: Arc<Registry>) -> Self {
        Self {
            entries,
            registry,
            initialised: Arc::default(),
        }
    }

    /// Build from an already rendered and parsed catalog document.
    pub fn from_document(
        document: &serde_yaml::Value,
        registry: Arc<Registry>,
    ) -> Result<Self, TalogError> {
        let mapping = document.as_mapping().ok_or_else(|| {
            DomainError::malformed(
                &TreePath::root(),
                "a catalog must be a mapping of dataset names to recipes",
            )
        })?;

        let mut entries = BTreeMap::new();
        for (key, value) in mapping {
            let name = key.as_str().ok_or_else(|| {
                DomainError::malformed(&TreePath::root(), "dataset names must be strings")
            })?;
            entries.insert(name.to_string(), DatasetEntry::parse(name, value)?);
        }
        debug!(datasets = entries.len(), "Catalog parsed");
        Ok(Self::new(entries, registry))
    }

    /// Render `text` with `parameters`, parse it, build the catalog.
    pub fn from_yaml_str(
        text: &str,
        name: &str,
        parameters: &serde_yaml::Mapping,
        registry: Arc<Registry>,
    ) -> Result<Self, TalogError> {
        let document = render_yaml(&JinjaRenderer::new(), name, text, parameters)?;
        Self::from_document(&document, registry)
    }

    /// Load a catalog file, rendering placeholders with `parameters` first.
    pub fn from_yaml(
        path: impl AsRef<Path>,
        parameters: Option<&serde_yaml::Mapping>,
        registry: Arc<Registry>,
    ) -> Result<Self, TalogError> {
        Self::from_yaml_with(&JinjaRenderer::new(), path, parameters, registry)
    }

    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_yaml_with(
        engine: &dyn TemplateEngine,
        path: impl AsRef<Path>,
        parameters: Option<&serde_yaml::Mapping>,
        registry: Arc<Registry>,
    ) -> Result<Self, TalogError> {
        let empty = serde_yaml::Mapping::new();
        let document =
            load_yaml_with_template(engine, path.as_ref(), parameters.unwrap_or(&empty))?;
        let catalog = Self::from_document(&document, registry)?;
        info!(datasets = catalog.len(), "Catalog loaded");
        Ok(catalog)
    }

    /// Values handed to any callable that asks for an argument its recipe
    /// leaves out.
    pub fn with_initialised(mut self, initialised: BTreeMap<String, Value>) -> Self {
        self.initialised = Arc::new(initialised);
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn entry(&self, name: &str) -> Option<&DatasetEntry> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    fn builder(&self) -> ObjectBuilder<'_> {
        ObjectBuilder::new(&self.registry).with_initialised(Arc::clone(&self.initialised))
    }

    fn lookup(&self, name: &str) -> Result<&DatasetEntry, DomainError> {
        self.entries
            .get(name)
            .ok_or_else(|| DomainError::UnknownDataset {
                name: name.to_string(),
                known: self.entries.keys().cloned().collect(),
            })
    }

    fn build_source(
        &self,
        builder: &ObjectBuilder<'_>,
        name: &str,
        entry: &DatasetEntry,
    ) -> Result<Arc<dyn DataSource>, TalogError> {
        let built = builder.build(&entry.source, &TreePath::root().key(name))?;
        match built {
            Value::Source(source) => Ok(source),
            other => Err(DomainError::NotADataSource {
                dataset: name.to_string(),
                callable: entry.source.callable.clone(),
                found: other.kind(),
            }
            .into()),
        }
    }

    /// Build the data source of `name` without reading it.
    pub fn source(&self, name: &str) -> Result<Arc<dyn DataSource>, TalogError> {
        let entry = self.lookup(name)?;
        self.build_source(&self.builder(), name, entry)
    }

    /// Build the data source and run its validators. Nothing is fetched.
    pub fn validate(&self, name: &str) -> Result<ValidationReport, TalogError> {
        let entry = self.lookup(name)?;
        let builder = self.builder();
        let source = self.build_source(&builder, name, entry)?;
        Ok(run_validations(
            &builder,
            name,
            source.as_ref(),
            &entry.validations,
        )?)
    }

    pub fn read(&self, name: &str) -> Result<Value, TalogError> {
        self.read_with(name, ReadOptions::default())
    }

    pub fn read_with(&self, name: &str, options: ReadOptions) -> Result<Value, TalogError> {
        let entry = self.lookup(name)?;
        let builder = self.builder();
        let source = self.build_source(&builder, name, entry)?;

        if options.skip_validation {
            info!(dataset = name, "Skipping validation");
        } else {
            run_validations(&builder, name, source.as_ref(), &entry.validations)?
                .into_result()
                .map_err(DomainError::from)?;
        }

        info!(dataset = name, source = %source.describe(), "Reading dataset");
        source.read().map_err(|e| {
            DomainError::SourceRead {
                dataset: name.to_string(),
                source: e,
            }
            .into()
        })
    }

    /// Read every dataset, keyed by name.
    pub fn read_all(&self) -> Result<BTreeMap<String, Value>, TalogError> {
        self.names()
            .map(|name| self.read(name).map(|data| (name.to_string(), data)))
            .collect()
    }

    /// Write `data` through the dataset's sink capability.
    pub fn write(&self, name: &str, data: &Value) -> Result<(), TalogError> {
        let source = self.source(name)?;
        let sink = source.as_sink().ok_or_else(|| DomainError::NotWriteable {
            dataset: name.to_string(),
        })?;
        info!(dataset = name, "Writing dataset");
        sink.write(data).map_err(|e| {
            DomainError::SourceWrite {
                dataset: name.to_string(),
                source: e,
            }
            .into()
        })
    }
}

impl fmt::Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = self
            .entries
            .iter()
            .map(|(name, entry)| format!("{name}: {}", entry.source.callable))
            .collect();
        f.write_str(&lines.join("\n"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::arguments::{CallError, Verdict};
    use crate::ports::DataSink;
    use std::any::Any;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // A data source over a fixed list that counts its fetches.
    #[derive(Debug)]
    struct ListSource {
        values: Vec<Value>,
        reads: Arc<AtomicUsize>,
    }

    impl DataSource for ListSource {
        fn read(&self) -> Result<Value, CallError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Ok(Value::List(self.values.clone()))
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[derive(Debug, Default)]
    struct Bucket {
        data: Mutex<Value>,
    }

    impl DataSource for Bucket {
        fn read(&self) -> Result<Value, CallError> {
            Ok(self.data.lock().unwrap().clone())
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_sink(&self) -> Option<&dyn DataSink> {
            Some(self)
        }
    }

    impl DataSink for Bucket {
        fn write(&self, data: &Value) -> Result<(), CallError> {
            *self.data.lock().unwrap() = data.clone();
            Ok(())
        }
    }

    struct Fixture {
        registry: Arc<Registry>,
        reads: Arc<AtomicUsize>,
        builds: Arc<AtomicUsize>,
    }

    fn fixture() -> Fixture {
        let reads = Arc::new(AtomicUsize::new(0));
        let builds = Arc::new(AtomicUsize::new(0));
        let mut registry = Registry::new();

        let (r, b) = (Arc::clone(&reads), Arc::clone(&builds));
        registry
            .register_factory("make_list", move |mut args| {
                let values: Vec<Value> = args.required("values")?;
                args.finish()?;
                b.fetch_add(1, Ordering::SeqCst);
                Ok(Value::source(ListSource {
                    values,
                    reads: Arc::clone(&r),
                }))
            })
            .register_factory("plain_value", |_| Ok(Value::Int(1)))
            .register_factory("bucket", |_| Ok(Value::source(Bucket::default())))
            .register_validator("longer_than", |source, mut args| {
                let threshold: usize = args.required("threshold")?;
                args.finish()?;
                let list = source
                    .as_any()
                    .downcast_ref::<ListSource>()
                    .ok_or_else(|| CallError::failed("expected a list source"))?;
                Ok(Verdict::check(list.values.len() > threshold, || {
                    format!("len {} <= {threshold}", list.values.len())
                }))
            });

        Fixture {
            registry: Arc::new(registry),
            reads,
            builds,
        }
    }

    fn catalog(fixture: &Fixture, text: &str) -> Catalog {
        Catalog::from_yaml_str(
            text,
            "catalog.yaml",
            &serde_yaml::Mapping::new(),
            Arc::clone(&fixture.registry),
        )
        .unwrap()
    }

    const LIST_CATALOG: &str = r#"
numbers:
  callable: make_list
  args:
    values: [1, 2, 3]
"#;

    #[test]
    fn test_read_returns_source_data() {
        let fixture = fixture();
        let catalog = catalog(&fixture, LIST_CATALOG);
        let data = catalog.read("numbers").unwrap();
        assert_eq!(data, Value::from(vec![1, 2, 3]));
    }

    #[test]
    fn test_loading_is_deferred_and_reads_rebuild() {
        let fixture = fixture();
        let catalog = catalog(&fixture, LIST_CATALOG);
        assert_eq!(fixture.builds.load(Ordering::SeqCst), 0);

        catalog.read("numbers").unwrap();
        catalog.read("numbers").unwrap();
        assert_eq!(fixture.builds.load(Ordering::SeqCst), 2);
        assert_eq!(fixture.reads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_unknown_dataset_builds_nothing() {
        let fixture = fixture();
        let catalog = catalog(&fixture, LIST_CATALOG);
        let err = catalog.read("missing").unwrap_err();
        assert!(matches!(
            err.as_domain(),
            Some(DomainError::UnknownDataset { name, known }) if name == "missing" && known == &["numbers"]
        ));
        assert_eq!(fixture.builds.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_failed_validation_blocks_the_fetch() {
        let fixture = fixture();
        let catalog = catalog(
            &fixture,
            r#"
numbers:
  callable: make_list
  args:
    values: [1, 2, 3]
  validations:
    - callable: longer_than
      args: {threshold: 10}
    - callable: longer_than
      args: {threshold: 1}
    - callable: longer_than
      args: {threshold: 5}
"#,
        );
        let err = catalog.read("numbers").unwrap_err();
        match err.as_domain() {
            Some(DomainError::Validation(validation)) => {
                assert_eq!(validation.dataset, "numbers");
                let indices: Vec<usize> = validation.failures.iter().map(|f| f.index).collect();
                assert_eq!(indices, vec![0, 2]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(fixture.reads.load(Ordering::SeqCst), 0);

        let data = catalog
            .read_with(
                "numbers",
                ReadOptions {
                    skip_validation: true,
                },
            )
            .unwrap();
        assert_eq!(data, Value::from(vec![1, 2, 3]));
    }

    #[test]
    fn test_passing_validation_returns_exact_data() {
        let fixture = fixture();
        let catalog = catalog(
            &fixture,
            r#"
numbers:
  callable: make_list
  args: {values: [a, b]}
  validations:
    - callable: longer_than
      args: {threshold: 1}
"#,
        );
        assert!(catalog.validate("numbers").unwrap().passed());
        assert_eq!(fixture.reads.load(Ordering::SeqCst), 0);
        assert_eq!(catalog.read("numbers").unwrap(), Value::from(vec!["a", "b"]));
    }

    #[test]
    fn test_recipe_must_build_a_data_source() {
        let fixture = fixture();
        let catalog = catalog(&fixture, "one:\n  callable: plain_value\n");
        let err = catalog.read("one").unwrap_err();
        assert!(matches!(
            err.as_domain(),
            Some(DomainError::NotADataSource { found: "int", .. })
        ));
    }

    #[test]
    fn test_top_level_value_must_be_recipe() {
        let fixture = fixture();
        let err = Catalog::from_yaml_str(
            "numbers: [1, 2]\n",
            "catalog.yaml",
            &Default::default(),
            Arc::clone(&fixture.registry),
        )
        .unwrap_err();
        assert!(matches!(
            err.as_domain(),
            Some(DomainError::MalformedConfig { path, .. }) if path == "numbers"
        ));
    }

    #[test]
    fn test_parameters_are_rendered() {
        let fixture = fixture();
        let mut params = serde_yaml::Mapping::new();
        params.insert("n".into(), 7.into());
        let catalog = Catalog::from_yaml_str(
            "numbers:\n  callable: make_list\n  args: {values: [{{ n }}]}\n",
            "catalog.yaml",
            &params,
            Arc::clone(&fixture.registry),
        )
        .unwrap();
        assert_eq!(catalog.read("numbers").unwrap(), Value::from(vec![7]));
    }

    #[test]
    fn test_write_requires_a_sink() {
        let fixture = fixture();
        let sinks = catalog(&fixture, "sink:\n  callable: bucket\n");
        sinks.write("sink", &Value::from("x")).unwrap();

        let err = sinks.write("numbers", &Value::Null).unwrap_err();
        assert!(matches!(err.as_domain(), Some(DomainError::UnknownDataset { .. })));

        let lists = catalog(&fixture, LIST_CATALOG);
        let err = lists.write("numbers", &Value::Null).unwrap_err();
        assert!(matches!(err.as_domain(), Some(DomainError::NotWriteable { .. })));
    }

    #[test]
    fn test_nested_unknown_callable_reports_its_position() {
        let fixture = fixture();
        let catalog = catalog(
            &fixture,
            "sales:\n  callable: make_list\n  args:\n    values:\n      callable: talog.sources.Nope\n",
        );
        let err = catalog.read("sales").unwrap_err();
        match err.as_domain() {
            Some(DomainError::Reference { path, source }) => {
                assert_eq!(path.to_string(), "sales.args.values");
                assert_eq!(source.reference(), "talog.sources.Nope");
            }
            other => panic!("expected reference error, got {other:?}"),
        }
        assert!(err.to_string().contains("sales.args.values"));
        assert_eq!(fixture.builds.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_read_all_and_display() {
        let fixture = fixture();
        let catalog = catalog(
            &fixture,
            "b:\n  callable: make_list\n  args: {values: [2]}\na:\n  callable: make_list\n  args: {values: [1]}\n",
        );
        let all = catalog.read_all().unwrap();
        assert_eq!(all.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(catalog.to_string(), "a: make_list\nb: make_list");
    }
}
