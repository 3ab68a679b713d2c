#![forbid(unsafe_code)]

use std::collections::HashMap;
use std::rc::Rc;

use pathbind_core::BindingError;

use super::ValueCombiner;
use super::builtin::BuiltinCombiners;

/// Name-keyed table of combiners.
#[derive(Default)]
pub struct ValueCombinerRegistry {
    combiners: HashMap<String, Rc<dyn ValueCombiner>>,
}

/// Populates a registry with a family of combiners.
pub trait ValueCombinerRegistryFiller {
    fn fill(&self, registry: &mut ValueCombinerRegistry);
}

impl ValueCombinerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-filled with [`BuiltinCombiners`].
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.fill_from(&BuiltinCombiners);
        registry
    }

    pub fn fill_from(&mut self, filler: &dyn ValueCombinerRegistryFiller) {
        filler.fill(self);
    }

    /// Register `combiner` under `name`, returning the entry it replaced.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        combiner: Rc<dyn ValueCombiner>,
    ) -> Option<Rc<dyn ValueCombiner>> {
        let name = name.into();
        let previous = self.combiners.insert(name.clone(), combiner);
        if previous.is_some() {
            tracing::debug!(combiner = %name, "value combiner replaced");
        }
        previous
    }

    pub fn resolve(&self, name: &str) -> Result<Rc<dyn ValueCombiner>, BindingError> {
        self.combiners
            .get(name)
            .cloned()
            .ok_or_else(|| BindingError::CombinerNotFound(name.to_owned()))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.combiners.contains_key(name)
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.combiners.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.combiners.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.combiners.is_empty()
    }
}

impl std::fmt::Debug for ValueCombinerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValueCombinerRegistry")
            .field("names", &self.names())
            .finish()
    }
}
