//! Splits template resources into supported and unsupported sets.

use super::registry::GeneratorRegistry;
use super::types::ResourceDescriptor;
use serde::Serialize;

/// Outcome of classifying a template's resources.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Classification {
    /// Resources with a registered generator, in template order
    pub supported: Vec<ResourceDescriptor>,
    /// Logical ids of everything else, in template order
    pub unsupported: Vec<String>,
    pub total_count: usize,
}

/// Classify resources against the registry and an optional allow-list.
///
/// A resource whose type is missing from the allow-list is unsupported even
/// when a generator exists for it; the registry is not consulted in that case.
pub fn classify(
    resources: &[ResourceDescriptor],
    allowed_types: Option<&[String]>,
    registry: &GeneratorRegistry,
) -> Classification {
    let mut classification = Classification {
        total_count: resources.len(),
        ..Default::default()
    };

    for resource in resources {
        if let Some(allowed) = allowed_types
            && !allowed.iter().any(|t| t == &resource.type_identifier)
        {
            classification.unsupported.push(resource.identifier.clone());
            continue;
        }

        if registry.supports(&resource.type_identifier) {
            classification.supported.push(resource.clone());
        } else {
            classification.unsupported.push(resource.identifier.clone());
        }
    }

    classification
}
