//! Concurrent metric generation.
//!
//! Every supported resource is handed to its generator on tokio's blocking
//! pool. At most `concurrency` invocations are in flight at once. Results are
//! collected as they complete and reassembled in input order, so the output
//! never depends on completion order. Failures are isolated per resource
//! unless `continue_on_error` is off, in which case the first failure to
//! complete aborts the run without waiting for slower invocations.

use super::generators::{GenerationError, MetricGenerator};
use super::registry::GeneratorRegistry;
use super::sanitizer::sanitize_properties;
use super::types::{AnalysisError, MetricDefinition, ResourceDescriptor, ResourceWithMetrics};
use crate::error::{AnalyzerError, Result};
use futures_util::StreamExt;
use futures_util::stream;
use std::sync::Arc;

/// Default number of generator invocations in flight.
pub const DEFAULT_CONCURRENCY: usize = 6;

/// Knobs for one generation run.
#[derive(Debug, Clone, Copy)]
pub struct GenerationSettings {
    pub concurrency: usize,
    pub continue_on_error: bool,
    pub verbose: bool,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            continue_on_error: false,
            verbose: false,
        }
    }
}

/// A finished invocation awaiting reassembly.
type Completed = (
    ResourceDescriptor,
    std::result::Result<Vec<MetricDefinition>, Failure>,
);

/// Why a single resource produced no metrics.
#[derive(Debug)]
struct Failure {
    message: String,
    stack_trace: Option<String>,
}

impl From<GenerationError> for Failure {
    fn from(e: GenerationError) -> Self {
        Self {
            message: e.to_string(),
            stack_trace: None,
        }
    }
}

/// Generate metrics for every resource.
///
/// Successful resources are returned in input order. With
/// `continue_on_error`, failures are appended to `errors` and omitted from
/// the output; otherwise the first failure to complete aborts the run.
pub async fn generate_all(
    resources: Vec<ResourceDescriptor>,
    registry: &GeneratorRegistry,
    settings: GenerationSettings,
    errors: &mut Vec<AnalysisError>,
) -> Result<Vec<ResourceWithMetrics>> {
    let concurrency = settings.concurrency.max(1);
    let total = resources.len();

    let invocations = resources.into_iter().enumerate().map(|(index, resource)| {
        let generator = registry.lookup(&resource.type_identifier);
        async move {
            let outcome = match generator {
                Some(generator) => invoke(generator, resource.clone()).await,
                None => Err(Failure::from(GenerationError::NotRegistered(
                    resource.type_identifier.clone(),
                ))),
            };
            (index, resource, outcome)
        }
    });

    let mut results = stream::iter(invocations).buffer_unordered(concurrency);
    let mut slots: Vec<Option<Completed>> = (0..total).map(|_| None).collect();

    while let Some((index, resource, outcome)) = results.next().await {
        let outcome = match outcome {
            Err(failure) if !settings.continue_on_error => {
                return Err(AnalyzerError::generation(
                    resource.identifier,
                    resource.type_identifier,
                    failure.message,
                ));
            }
            other => other,
        };
        slots[index] = Some((resource, outcome));
    }

    let mut output = Vec::with_capacity(total);
    for (resource, outcome) in slots.into_iter().flatten() {
        match outcome {
            Ok(metrics) => {
                let message = format!(
                    "Generated {} metric(s) for {} ({})",
                    metrics.len(),
                    resource.identifier,
                    resource.type_identifier
                );
                if settings.verbose {
                    log::info!("{}", message);
                } else {
                    log::debug!("{}", message);
                }
                output.push(ResourceWithMetrics {
                    resource_properties: sanitize_properties(&resource.properties),
                    logical_id: resource.identifier,
                    resource_type: resource.type_identifier,
                    metrics,
                });
            }
            Err(failure) => {
                log::warn!(
                    "Skipping {} ({}): {}",
                    resource.identifier,
                    resource.type_identifier,
                    failure.message
                );
                errors.push(AnalysisError {
                    resource_id: resource.identifier,
                    resource_type: resource.type_identifier,
                    message: failure.message,
                    stack_trace: failure.stack_trace,
                });
            }
        }
    }

    log::debug!(
        "Generation finished: {}/{} resource(s) succeeded",
        output.len(),
        total
    );
    Ok(output)
}

/// Run one generator on the blocking pool and validate what it returns.
async fn invoke(
    generator: Arc<dyn MetricGenerator>,
    resource: ResourceDescriptor,
) -> std::result::Result<Vec<MetricDefinition>, Failure> {
    let name = generator.name();
    let joined = tokio::task::spawn_blocking(move || generator.generate(&resource)).await;

    match joined {
        Ok(Ok(metrics)) => {
            validate_metrics(&metrics)?;
            Ok(metrics)
        }
        Ok(Err(e)) => Err(Failure::from(e)),
        Err(e) if e.is_panic() => {
            let payload = e.into_panic();
            let text = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "non-string panic payload".to_string());
            Err(Failure {
                message: format!("Generator '{}' panicked: {}", name, text),
                stack_trace: Some(text),
            })
        }
        Err(e) => Err(Failure {
            message: format!("Generator '{}' did not complete: {}", name, e),
            stack_trace: None,
        }),
    }
}

/// Reject output that breaks the metric contract.
pub fn validate_metrics(metrics: &[MetricDefinition]) -> std::result::Result<(), GenerationError> {
    for (i, metric) in metrics.iter().enumerate() {
        if metric.name.trim().is_empty() {
            return Err(GenerationError::InvalidOutput(format!(
                "metric #{} has an empty name",
                i
            )));
        }
        if metric.namespace.trim().is_empty() {
            return Err(GenerationError::InvalidOutput(format!(
                "metric '{}' has an empty namespace",
                metric.name
            )));
        }
        let threshold = &metric.recommended_threshold;
        if !threshold.warning.is_finite() || !threshold.critical.is_finite() {
            return Err(GenerationError::InvalidOutput(format!(
                "metric '{}' has a non-finite threshold",
                metric.name
            )));
        }
        if metric.evaluation_period == 0 {
            return Err(GenerationError::InvalidOutput(format!(
                "metric '{}' has a zero evaluation period",
                metric.name
            )));
        }
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::generators::MetricBuilder;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Generator whose behavior depends on the logical id.
    struct Scripted;

    impl MetricGenerator for Scripted {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn supported_types(&self) -> &'static [&'static str] {
            &["Test::Scripted"]
        }

        fn generate(
            &self,
            resource: &ResourceDescriptor,
        ) -> std::result::Result<Vec<MetricDefinition>, GenerationError> {
            match resource.identifier.as_str() {
                id if id.starts_with("fail") => Err(GenerationError::Failed("scripted".into())),
                id if id.starts_with("panic") => panic!("scripted panic"),
                id if id.starts_with("bad") => Ok(vec![MetricBuilder::new("", "Test").build()]),
                id if id.starts_with("glacial") => {
                    std::thread::sleep(Duration::from_millis(600));
                    Ok(vec![MetricBuilder::new("Glacial", "Test").build()])
                }
                id if id.starts_with("slow") => {
                    std::thread::sleep(Duration::from_millis(80));
                    Ok(vec![MetricBuilder::new("Slow", "Test").build()])
                }
                _ => Ok(vec![MetricBuilder::new("Ok", "Test").build()]),
            }
        }
    }

    fn registry() -> GeneratorRegistry {
        let mut registry = GeneratorRegistry::new();
        registry.register(Arc::new(Scripted));
        registry
    }

    fn resources(ids: &[&str]) -> Vec<ResourceDescriptor> {
        ids.iter()
            .map(|id| ResourceDescriptor::new(*id, "Test::Scripted"))
            .collect()
    }

    fn tolerant() -> GenerationSettings {
        GenerationSettings {
            continue_on_error: true,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_output_keeps_input_order() {
        let mut errors = Vec::new();
        let output = generate_all(
            resources(&["slow-a", "b", "slow-c", "d"]),
            &registry(),
            tolerant(),
            &mut errors,
        )
        .await
        .unwrap();

        let ids: Vec<_> = output.iter().map(|r| r.logical_id.as_str()).collect();
        assert_eq!(ids, vec!["slow-a", "b", "slow-c", "d"]);
        assert!(errors.is_empty());
    }

    #[tokio::test]
    async fn test_failures_are_isolated_when_tolerant() {
        let mut errors = Vec::new();
        let output = generate_all(
            resources(&["a", "fail-b", "c", "panic-d", "bad-e"]),
            &registry(),
            tolerant(),
            &mut errors,
        )
        .await
        .unwrap();

        let ids: Vec<_> = output.iter().map(|r| r.logical_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        let failed: Vec<_> = errors.iter().map(|e| e.resource_id.as_str()).collect();
        assert_eq!(failed, vec!["fail-b", "panic-d", "bad-e"]);
        assert!(errors[1].stack_trace.as_deref() == Some("scripted panic"));
        assert!(errors[2].message.contains("Invalid generator output"));
    }

    #[tokio::test]
    async fn test_first_failure_aborts_when_strict() {
        let mut errors = Vec::new();
        let err = generate_all(
            resources(&["a", "fail-b", "c"]),
            &registry(),
            GenerationSettings::default(),
            &mut errors,
        )
        .await
        .unwrap_err();

        assert_eq!(
            err.context().and_then(|c| c.resource_id.as_deref()),
            Some("fail-b")
        );
        assert!(errors.is_empty());
    }

    #[tokio::test]
    async fn test_strict_abort_does_not_wait_for_slower_resources() {
        let settings = GenerationSettings {
            concurrency: 4,
            ..Default::default()
        };
        let started = std::time::Instant::now();
        let mut errors = Vec::new();
        let err = generate_all(
            resources(&["glacial-a", "fail-b", "c"]),
            &registry(),
            settings,
            &mut errors,
        )
        .await
        .unwrap_err();

        assert_eq!(
            err.context().and_then(|c| c.resource_id.as_deref()),
            Some("fail-b")
        );
        assert!(started.elapsed() < Duration::from_millis(400));
    }

    #[tokio::test]
    async fn test_missing_generator_is_recorded() {
        let mut errors = Vec::new();
        let output = generate_all(
            vec![ResourceDescriptor::new("Orphan", "Test::Unknown")],
            &registry(),
            tolerant(),
            &mut errors,
        )
        .await
        .unwrap();

        assert!(output.is_empty());
        assert!(errors[0].message.contains("No generator registered"));
    }

    #[tokio::test]
    async fn test_properties_are_sanitized() {
        let mut errors = Vec::new();
        let resource = ResourceDescriptor::new("a", "Test::Scripted")
            .with_property("AuthToken", json!("abc"))
            .with_property("Size", json!(3));
        let output = generate_all(vec![resource], &registry(), tolerant(), &mut errors)
            .await
            .unwrap();

        assert_eq!(output[0].resource_properties["AuthToken"], json!("[REDACTED]"));
        assert_eq!(output[0].resource_properties["Size"], json!(3));
    }

    struct Counting {
        active: Arc<AtomicUsize>,
        max_seen: Arc<AtomicUsize>,
    }

    impl MetricGenerator for Counting {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn supported_types(&self) -> &'static [&'static str] {
            &["Test::Counting"]
        }

        fn generate(
            &self,
            _resource: &ResourceDescriptor,
        ) -> std::result::Result<Vec<MetricDefinition>, GenerationError> {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_seen.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(20));
            self.active.fetch_sub(1, Ordering::SeqCst);
            Ok(vec![MetricBuilder::new("Count", "Test").build()])
        }
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let max_seen = Arc::new(AtomicUsize::new(0));
        let mut registry = GeneratorRegistry::new();
        registry.register(Arc::new(Counting {
            active: Arc::new(AtomicUsize::new(0)),
            max_seen: Arc::clone(&max_seen),
        }));

        let input: Vec<_> = (0..12)
            .map(|i| ResourceDescriptor::new(format!("R{}", i), "Test::Counting"))
            .collect();
        let settings = GenerationSettings {
            concurrency: 2,
            ..Default::default()
        };
        let mut errors = Vec::new();
        let output = generate_all(input, &registry, settings, &mut errors)
            .await
            .unwrap();

        assert_eq!(output.len(), 12);
        assert!(max_seen.load(Ordering::SeqCst) <= 2);
    }

    #[test]
    fn test_validate_rejects_non_finite_threshold() {
        let metric = MetricBuilder::new("Errors", "AWS/Lambda")
            .threshold(f64::NAN, 1.0)
            .build();
        assert!(matches!(
            validate_metrics(&[metric]),
            Err(GenerationError::InvalidOutput(_))
        ));
    }
}
