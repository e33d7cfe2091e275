// talog-core/src/domain/tree.rs

// The parsed configuration tree. Whether a mapping is a recipe is decided
// once, here, while converting from YAML: downstream code matches on
// `ConfigNode::Recipe` and never sniffs for a `callable` key again.

use std::collections::BTreeMap;

use serde_yaml::Value as Yaml;

use crate::domain::error::DomainError;
use crate::domain::path::TreePath;

pub const CALLABLE_KEY: &str = "callable";
pub const ARGS_KEY: &str = "args";
pub const VALIDATIONS_KEY: &str = "validations";

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigNode {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Sequence(Vec<ConfigNode>),
    Mapping(BTreeMap<String, ConfigNode>),
    Recipe(Recipe),
}

/// Deferred construction: which callable to invoke, with which arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    pub callable: String,
    pub args: BTreeMap<String, ConfigNode>,
}

/// One top-level catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetEntry {
    pub source: Recipe,
    pub validations: Vec<Recipe>,
}

impl ConfigNode {
    /// Parse a YAML tree, classifying every mapping as data or recipe.
    pub fn parse(value: &Yaml, path: &TreePath) -> Result<Self, DomainError> {
        match value {
            Yaml::Null => Ok(ConfigNode::Null),
            Yaml::Bool(b) => Ok(ConfigNode::Bool(*b)),
            Yaml::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(ConfigNode::Int(i))
                } else if n.is_f64() {
                    n.as_f64().map(ConfigNode::Float).ok_or_else(|| {
                        DomainError::malformed(path, format!("unsupported number {n}"))
                    })
                } else {
                    Err(DomainError::malformed(
                        path,
                        format!("integer {n} does not fit in i64"),
                    ))
                }
            }
            Yaml::String(s) => Ok(ConfigNode::String(s.clone())),
            Yaml::Sequence(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| ConfigNode::parse(item, &path.index(i)))
                .collect::<Result<Vec<_>, _>>()
                .map(ConfigNode::Sequence),
            Yaml::Mapping(mapping) => {
                let entries = mapping_entries(mapping, path)?;
                if entries.contains_key(CALLABLE_KEY) {
                    Recipe::parse_entries(entries, path, &[]).map(ConfigNode::Recipe)
                } else {
                    entries
                        .into_iter()
                        .map(|(key, value)| {
                            let child = path.key(key.as_str());
                            ConfigNode::parse(value, &child).map(|node| (key, node))
                        })
                        .collect::<Result<BTreeMap<_, _>, _>>()
                        .map(ConfigNode::Mapping)
                }
            }
            Yaml::Tagged(tagged) => ConfigNode::parse(&tagged.value, path),
        }
    }

    /// True when no recipe appears anywhere below this node.
    pub fn is_plain(&self) -> bool {
        match self {
            ConfigNode::Recipe(_) => false,
            ConfigNode::Sequence(items) => items.iter().all(ConfigNode::is_plain),
            ConfigNode::Mapping(map) => map.values().all(ConfigNode::is_plain),
            _ => true,
        }
    }
}

impl Recipe {
    pub fn new(callable: impl Into<String>) -> Self {
        Self {
            callable: callable.into(),
            args: BTreeMap::new(),
        }
    }

    pub fn arg(mut self, name: impl Into<String>, value: ConfigNode) -> Self {
        self.args.insert(name.into(), value);
        self
    }

    /// Parse a mapping that must be a recipe.
    pub fn parse(value: &Yaml, path: &TreePath) -> Result<Self, DomainError> {
        let mapping = value
            .as_mapping()
            .ok_or_else(|| DomainError::malformed(path, "expected a recipe mapping"))?;
        let entries = mapping_entries(mapping, path)?;
        Recipe::parse_entries(entries, path, &[])
    }

    fn parse_entries(
        entries: BTreeMap<String, &Yaml>,
        path: &TreePath,
        allowed_extra: &[&str],
    ) -> Result<Self, DomainError> {
        let callable = match entries.get(CALLABLE_KEY) {
            Some(Yaml::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
            Some(_) => {
                return Err(DomainError::malformed(
                    &path.key(CALLABLE_KEY),
                    "`callable` must be a non-empty string",
                ));
            }
            None => {
                return Err(DomainError::malformed(path, "missing `callable`"));
            }
        };

        let unknown: Vec<&str> = entries
            .keys()
            .map(String::as_str)
            .filter(|k| *k != CALLABLE_KEY && *k != ARGS_KEY && !allowed_extra.contains(k))
            .collect();
        if !unknown.is_empty() {
            return Err(DomainError::malformed(
                path,
                format!(
                    "recipe for '{callable}' has unknown key(s): {}",
                    unknown.join(", ")
                ),
            ));
        }

        let args_path = path.key(ARGS_KEY);
        let args = match entries.get(ARGS_KEY) {
            None | Some(Yaml::Null) => BTreeMap::new(),
            Some(Yaml::Mapping(mapping)) => mapping_entries(mapping, &args_path)?
                .into_iter()
                .map(|(name, value)| {
                    ConfigNode::parse(value, &args_path.key(name.as_str())).map(|node| (name, node))
                })
                .collect::<Result<BTreeMap<_, _>, _>>()?,
            Some(_) => {
                return Err(DomainError::malformed(&args_path, "`args` must be a mapping"));
            }
        };

        Ok(Recipe { callable, args })
    }
}

impl DatasetEntry {
    /// Split a top-level catalog value into its source recipe and validators.
    pub fn parse(name: &str, value: &Yaml) -> Result<Self, DomainError> {
        let path = TreePath::root().key(name);
        let mapping = value.as_mapping().ok_or_else(|| {
            DomainError::malformed(&path, "a dataset must be a mapping with a `callable`")
        })?;
        let entries = mapping_entries(mapping, &path)?;

        let validations_path = path.key(VALIDATIONS_KEY);
        let validations = match entries.get(VALIDATIONS_KEY) {
            None | Some(Yaml::Null) => Vec::new(),
            Some(Yaml::Sequence(items)) => items
                .iter()
                .enumerate()
                .map(|(i, item)| Recipe::parse(item, &validations_path.index(i)))
                .collect::<Result<Vec<_>, _>>()?,
            Some(_) => {
                return Err(DomainError::malformed(
                    &validations_path,
                    "`validations` must be a list of recipes",
                ));
            }
        };

        let source = Recipe::parse_entries(entries, &path, &[VALIDATIONS_KEY])?;
        Ok(DatasetEntry {
            source,
            validations,
        })
    }
}

/// Mapping entries keyed by string. Scalar keys are stringified.
fn mapping_entries<'a>(
    mapping: &'a serde_yaml::Mapping,
    path: &TreePath,
) -> Result<BTreeMap<String, &'a Yaml>, DomainError> {
    let mut entries = BTreeMap::new();
    for (key, value) in mapping {
        let key = match key {
            Yaml::String(s) => s.clone(),
            Yaml::Number(n) => n.to_string(),
            Yaml::Bool(b) => b.to_string(),
            Yaml::Null => "null".to_string(),
            _ => {
                return Err(DomainError::malformed(
                    path,
                    "mapping keys must be scalars",
                ));
            }
        };
        if entries.insert(key.clone(), value).is_some() {
            return Err(DomainError::malformed(
                path,
                format!("duplicate mapping key '{key}'"),
            ));
        }
    }
    Ok(entries)
}
