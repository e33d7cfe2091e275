// talog-core/src/application/builder.rs

// Turns a configuration tree into live values. Depth-first, bottom-up: every
// argument of a recipe is resolved before the recipe's own callable runs, so
// a callable only ever sees built objects, never raw sub-recipes.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::application::registry::Registry;
use crate::domain::arguments::Arguments;
use crate::domain::error::{DomainError, InvocationError};
use crate::domain::path::TreePath;
use crate::domain::tree::{ARGS_KEY, ConfigNode, Recipe};
use crate::domain::value::Value;

pub struct ObjectBuilder<'a> {
    registry: &'a Registry,
    initialised: Arc<BTreeMap<String, Value>>,
}

impl<'a> ObjectBuilder<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self {
            registry,
            initialised: Arc::default(),
        }
    }

    /// Pre-built values offered to any callable that asks for an argument of
    /// the same name that its recipe does not supply.
    pub fn with_initialised(mut self, initialised: Arc<BTreeMap<String, Value>>) -> Self {
        self.initialised = initialised;
        self
    }

    pub fn registry(&self) -> &Registry {
        self.registry
    }

    /// Resolve any node. Plain data comes back structurally unchanged.
    pub fn resolve(&self, node: &ConfigNode, path: &TreePath) -> Result<Value, DomainError> {
        match node {
            ConfigNode::Recipe(recipe) => self.build(recipe, path),
            ConfigNode::Mapping(map) => map
                .iter()
                .map(|(key, child)| {
                    self.resolve(child, &path.key(key.as_str()))
                        .map(|value| (key.clone(), value))
                })
                .collect::<Result<BTreeMap<_, _>, _>>()
                .map(Value::Map),
            ConfigNode::Sequence(items) => items
                .iter()
                .enumerate()
                .map(|(i, child)| self.resolve(child, &path.index(i)))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            ConfigNode::Null => Ok(Value::Null),
            ConfigNode::Bool(b) => Ok(Value::Bool(*b)),
            ConfigNode::Int(i) => Ok(Value::Int(*i)),
            ConfigNode::Float(f) => Ok(Value::Float(*f)),
            ConfigNode::String(s) => Ok(Value::String(s.clone())),
        }
    }

    /// Resolve the callable, resolve the arguments, invoke.
    pub fn build(&self, recipe: &Recipe, path: &TreePath) -> Result<Value, DomainError> {
        let factory = self
            .registry
            .resolve_factory(&recipe.callable)
            .map_err(|e| DomainError::reference(path, e))?;
        let args = self.resolve_args(recipe, path)?;

        debug!(callable = %recipe.callable, at = %path, args = args.len(), "Invoking recipe");
        factory(args).map_err(|source| {
            InvocationError {
                path: path.clone(),
                callable: recipe.callable.clone(),
                source,
            }
            .into()
        })
    }

    /// Resolve the `args` of a recipe into keyword arguments.
    pub fn resolve_args(&self, recipe: &Recipe, path: &TreePath) -> Result<Arguments, DomainError> {
        let args_path = path.key(ARGS_KEY);
        let explicit = recipe
            .args
            .iter()
            .map(|(name, node)| {
                self.resolve(node, &args_path.key(name.as_str()))
                    .map(|value| (name.clone(), value))
            })
            .collect::<Result<BTreeMap<_, _>, _>>()?;
        Ok(Arguments::new(explicit).with_initialised(Arc::clone(&self.initialised)))
    }
}
