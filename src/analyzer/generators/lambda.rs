//! Lambda functions (`AWS::Lambda::Function`, `AWS::Serverless::Function`).

use super::{GenerationError, MetricBuilder, MetricGenerator, physical_name};
use crate::analyzer::types::{Importance, MetricCategory, MetricDefinition, ResourceDescriptor};

const NAMESPACE: &str = "AWS/Lambda";

/// Lambda's default timeout when `Timeout` is not declared.
const DEFAULT_TIMEOUT_SECS: f64 = 3.0;

/// Regional default for unreserved concurrency.
const ACCOUNT_CONCURRENCY: f64 = 1000.0;

/// Generator: Lambda invocation health, duration and concurrency.
pub struct LambdaGenerator;

impl LambdaGenerator {
    fn timeout_secs(resource: &ResourceDescriptor) -> Result<f64, GenerationError> {
        match resource.properties.get("Timeout") {
            None => Ok(DEFAULT_TIMEOUT_SECS),
            Some(_) => match resource.property_f64("Timeout") {
                Some(t) if t > 0.0 => Ok(t),
                Some(t) => Err(GenerationError::InvalidProperty {
                    property: "Timeout".to_string(),
                    reason: format!("must be positive, got {}", t),
                }),
                // Intrinsic function, resolved at deploy time
                None => Ok(DEFAULT_TIMEOUT_SECS),
            },
        }
    }
}

impl MetricGenerator for LambdaGenerator {
    fn name(&self) -> &'static str {
        "lambda"
    }

    fn supported_types(&self) -> &'static [&'static str] {
        &["AWS::Lambda::Function", "AWS::Serverless::Function"]
    }

    fn generate(
        &self,
        resource: &ResourceDescriptor,
    ) -> Result<Vec<MetricDefinition>, GenerationError> {
        let function_name = physical_name(resource, "FunctionName");
        let timeout_ms = Self::timeout_secs(resource)? * 1000.0;
        let concurrency_cap = resource
            .property_f64("ReservedConcurrentExecutions")
            .filter(|c| *c > 0.0)
            .unwrap_or(ACCOUNT_CONCURRENCY);

        Ok(vec![
            MetricBuilder::new("Errors", NAMESPACE)
                .description("Invocations that ended in a function error")
                .threshold(1.0, 5.0)
                .category(MetricCategory::Error)
                .importance(Importance::High)
                .dimension("FunctionName", function_name.clone())
                .build(),
            MetricBuilder::new("Throttles", NAMESPACE)
                .description("Invocation requests rejected for lack of concurrency")
                .threshold(1.0, 10.0)
                .category(MetricCategory::Saturation)
                .importance(Importance::High)
                .dimension("FunctionName", function_name.clone())
                .build(),
            MetricBuilder::new("Duration", NAMESPACE)
                .unit("Milliseconds")
                .statistic("p99")
                .description(format!(
                    "Execution time approaching the configured timeout of {} ms",
                    timeout_ms
                ))
                .threshold((timeout_ms * 0.8).round(), (timeout_ms * 0.95).round())
                .category(MetricCategory::Latency)
                .importance(Importance::High)
                .dimension("FunctionName", function_name.clone())
                .build(),
            MetricBuilder::new("ConcurrentExecutions", NAMESPACE)
                .statistic("Maximum")
                .period(60)
                .description("Concurrent executions relative to the available concurrency")
                .threshold(
                    (concurrency_cap * 0.8).round(),
                    (concurrency_cap * 0.95).round(),
                )
                .category(MetricCategory::Saturation)
                .importance(Importance::Medium)
                .dimension("FunctionName", function_name.clone())
                .build(),
            MetricBuilder::new("Invocations", NAMESPACE)
                .description("Invocation volume, useful to spot traffic anomalies")
                .threshold(10_000.0, 50_000.0)
                .category(MetricCategory::Performance)
                .importance(Importance::Low)
                .dimension("FunctionName", function_name)
                .build(),
        ])
    }
}
