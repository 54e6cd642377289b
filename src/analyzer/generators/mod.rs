//! Metric generators for CloudFormation resource types.
//!
//! Each generator is implemented as a separate module with a consistent
//! interface. A generator declares the resource types it understands and maps
//! one resource to the CloudWatch metrics worth alarming on.

mod api_gateway;
mod dynamodb;
mod ecs;
mod elbv2;
mod lambda;
mod rds;
mod sqs;

use crate::analyzer::types::{
    Dimension, Importance, MetricCategory, MetricDefinition, ResourceDescriptor, Threshold,
};
use std::sync::Arc;
use thiserror::Error;

// ============================================================================
// Generator Trait
// ============================================================================

/// Trait for metric generators.
///
/// Generators are shared across concurrent invocations and must not keep
/// per-call state.
pub trait MetricGenerator: Send + Sync {
    /// Get the generator name (e.g., "lambda").
    fn name(&self) -> &'static str;

    /// CloudFormation types this generator handles.
    fn supported_types(&self) -> &'static [&'static str];

    /// Produce recommended metrics for one resource.
    fn generate(
        &self,
        resource: &ResourceDescriptor,
    ) -> Result<Vec<MetricDefinition>, GenerationError>;
}

/// Errors a generator can report for a single resource.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GenerationError {
    /// A property has a value the generator cannot work with
    #[error("Invalid property '{property}': {reason}")]
    InvalidProperty { property: String, reason: String },

    /// The generator produced output that violates the metric contract
    #[error("Invalid generator output: {0}")]
    InvalidOutput(String),

    /// No generator is registered for the resource type
    #[error("No generator registered for type {0}")]
    NotRegistered(String),

    /// Any other failure
    #[error("{0}")]
    Failed(String),
}

// ============================================================================
// Generator Catalog
// ============================================================================

/// Get all built-in metric generators.
pub fn all_generators() -> Vec<Arc<dyn MetricGenerator>> {
    vec![
        Arc::new(lambda::LambdaGenerator),
        Arc::new(rds::RdsGenerator),
        Arc::new(dynamodb::DynamoDbGenerator),
        Arc::new(ecs::EcsServiceGenerator),
        Arc::new(elbv2::LoadBalancerGenerator),
        Arc::new(api_gateway::ApiGatewayGenerator),
        Arc::new(sqs::SqsQueueGenerator),
    ]
}

pub use api_gateway::ApiGatewayGenerator;
pub use dynamodb::DynamoDbGenerator;
pub use ecs::EcsServiceGenerator;
pub use elbv2::LoadBalancerGenerator;
pub use lambda::LambdaGenerator;
pub use rds::RdsGenerator;
pub use sqs::SqsQueueGenerator;

// ============================================================================
// Shared Helpers
// ============================================================================

/// Value for a name dimension: the explicit physical name when it is a plain
/// string, otherwise the logical id.
pub(crate) fn physical_name(resource: &ResourceDescriptor, property: &str) -> String {
    resource
        .property_str(property)
        .map(String::from)
        .unwrap_or_else(|| resource.identifier.clone())
}

/// Builder for [`MetricDefinition`] with the defaults most alarms use.
pub(crate) struct MetricBuilder {
    metric: MetricDefinition,
}

impl MetricBuilder {
    pub fn new(name: &str, namespace: &str) -> Self {
        Self {
            metric: MetricDefinition {
                name: name.to_string(),
                namespace: namespace.to_string(),
                unit: "Count".to_string(),
                description: String::new(),
                statistic: "Sum".to_string(),
                recommended_threshold: Threshold {
                    warning: 0.0,
                    critical: 0.0,
                },
                evaluation_period: 300,
                category: MetricCategory::Performance,
                importance: Importance::Medium,
                dimensions: Vec::new(),
            },
        }
    }

    pub fn unit(mut self, unit: &str) -> Self {
        self.metric.unit = unit.to_string();
        self
    }

    pub fn statistic(mut self, statistic: &str) -> Self {
        self.metric.statistic = statistic.to_string();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.metric.description = description.into();
        self
    }

    pub fn threshold(mut self, warning: f64, critical: f64) -> Self {
        self.metric.recommended_threshold = Threshold { warning, critical };
        self
    }

    pub fn period(mut self, seconds: u32) -> Self {
        self.metric.evaluation_period = seconds;
        self
    }

    pub fn category(mut self, category: MetricCategory) -> Self {
        self.metric.category = category;
        self
    }

    pub fn importance(mut self, importance: Importance) -> Self {
        self.metric.importance = importance;
        self
    }

    pub fn dimension(mut self, name: &str, value: impl Into<String>) -> Self {
        self.metric.dimensions.push(Dimension::new(name, value));
        self
    }

    pub fn build(self) -> MetricDefinition {
        self.metric
    }
}
