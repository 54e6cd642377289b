//! Lookup table from CloudFormation type to metric generator.

use super::generators::{MetricGenerator, all_generators};
use std::collections::HashMap;
use std::sync::Arc;

/// Maps resource types to the generator that handles them.
///
/// Built once, then only read. Registering a generator for a type that is
/// already present replaces the previous entry.
#[derive(Default, Clone)]
pub struct GeneratorRegistry {
    by_type: HashMap<String, Arc<dyn MetricGenerator>>,
    names: Vec<&'static str>,
}

impl GeneratorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in generator.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for generator in all_generators() {
            registry.register(generator);
        }
        registry
    }

    /// Index a generator under each type it supports.
    pub fn register(&mut self, generator: Arc<dyn MetricGenerator>) {
        for ty in generator.supported_types() {
            self.by_type.insert((*ty).to_string(), Arc::clone(&generator));
        }
        self.names.push(generator.name());
        log::debug!(
            "Registered generator '{}' for {} type(s)",
            generator.name(),
            generator.supported_types().len()
        );
    }

    /// Get the generator for a resource type.
    pub fn lookup(&self, type_identifier: &str) -> Option<Arc<dyn MetricGenerator>> {
        self.by_type.get(type_identifier).cloned()
    }

    /// Check if a resource type has a generator.
    pub fn supports(&self, type_identifier: &str) -> bool {
        self.by_type.contains_key(type_identifier)
    }

    /// Names of registered generators, in registration order.
    pub fn generator_names(&self) -> Vec<String> {
        self.names.iter().map(|n| n.to_string()).collect()
    }

    /// All resource types with a generator, sorted.
    pub fn supported_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.by_type.keys().cloned().collect();
        types.sort();
        types
    }

    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}

impl std::fmt::Debug for GeneratorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorRegistry")
            .field("generators", &self.names)
            .field("types", &self.supported_types())
            .finish()
    }
}
