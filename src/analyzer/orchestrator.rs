//! Analysis pipeline.
//!
//! `MetricsAnalyzer` runs one template through budget check, parsing,
//! classification and generation, then assembles the [`AnalysisResult`].
//! Only the registry and the statistics slot outlive a call.

use super::classifier::classify;
use super::engine::generate_all;
use super::monitor::{BudgetMonitor, MemoryProbe, ProcessMemoryProbe, bytes_to_mb, check_budget};
use super::options::AnalysisOptions;
use super::registry::GeneratorRegistry;
use super::template::{CfnTemplateParser, TemplateParser};
use super::types::{
    AnalysisMetadata, AnalysisResult, AnalysisStatistics, PerformanceMetrics, Template,
};
use crate::error::{AnalyzerError, Result};
use chrono::Utc;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Runs longer than this are reported with a warning.
pub const SLOW_ANALYSIS_MS: u64 = 30_000;

/// Entry point for analyzing CloudFormation templates.
pub struct MetricsAnalyzer {
    registry: GeneratorRegistry,
    parser: Arc<dyn TemplateParser>,
    probe: Arc<dyn MemoryProbe>,
    statistics: Mutex<Option<AnalysisStatistics>>,
}

impl Default for MetricsAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsAnalyzer {
    /// Analyzer with every built-in generator, the file parser and the
    /// process memory probe.
    pub fn new() -> Self {
        Self {
            registry: GeneratorRegistry::with_defaults(),
            parser: Arc::new(CfnTemplateParser::new()),
            probe: Arc::new(ProcessMemoryProbe::new()),
            statistics: Mutex::new(None),
        }
    }

    pub fn with_registry(mut self, registry: GeneratorRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_parser(mut self, parser: Arc<dyn TemplateParser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_probe(mut self, probe: Arc<dyn MemoryProbe>) -> Self {
        self.probe = probe;
        self
    }

    pub fn registry(&self) -> &GeneratorRegistry {
        &self.registry
    }

    /// Names of the registered generators.
    pub fn registered_generators(&self) -> Vec<String> {
        self.registry.generator_names()
    }

    /// Summary of the most recent successful analysis.
    pub fn analysis_statistics(&self) -> Option<AnalysisStatistics> {
        self.statistics.lock().clone()
    }

    /// Analyze the template at `path`.
    pub async fn analyze(&self, path: &Path, options: &AnalysisOptions) -> Result<AnalysisResult> {
        let started = Instant::now();
        log::info!("Analyzing {}", path.display());

        // Budget check happens before any parsing
        let mut monitor = match options.memory_limit_bytes() {
            Some(limit) => {
                check_budget(self.probe.as_ref(), limit)?;
                Some(BudgetMonitor::start(Arc::clone(&self.probe), limit))
            }
            None => None,
        };
        let mut peak_bytes = self.probe.current_bytes();

        let parse_started = Instant::now();
        let template = self.parse(path).await?;
        let parse_time = parse_started.elapsed();

        let extract_started = Instant::now();
        let classification = classify(
            &template.resources,
            options.resource_types.as_deref(),
            &self.registry,
        );
        let extract_time = extract_started.elapsed();
        log::debug!(
            "{} of {} resource(s) supported",
            classification.supported.len(),
            classification.total_count
        );

        let generate_started = Instant::now();
        let mut errors = Vec::new();
        let generation = generate_all(
            classification.supported.clone(),
            &self.registry,
            options.generation_settings(),
            &mut errors,
        );
        let resources = match monitor.as_mut() {
            Some(monitor) => tokio::select! {
                result = generation => result?,
                violation = monitor.violated() => return Err(violation),
            },
            None => generation.await?,
        };
        let generate_time = generate_started.elapsed();

        if let Some(monitor) = monitor.take() {
            monitor.stop();
            peak_bytes = peak_bytes.max(monitor.peak_bytes());
        }
        peak_bytes = peak_bytes.max(self.probe.current_bytes());

        let total_time = started.elapsed();
        let total_ms = round_ms(total_time);
        let memory_peak_mb = bytes_to_mb(peak_bytes);
        let unsupported_count = classification.unsupported.len();

        let performance_metrics = options.collect_metrics.then(|| {
            let secs = total_time.as_secs_f64();
            PerformanceMetrics {
                total_time_ms: total_ms,
                parse_time_ms: round_ms(parse_time),
                extract_time_ms: round_ms(extract_time),
                generate_time_ms: round_ms(generate_time),
                memory_peak_mb,
                concurrency: options.concurrency.max(1),
                resources_per_second: if secs > 0.0 {
                    classification.total_count as f64 / secs
                } else {
                    0.0
                },
                metrics_generated: resources.iter().map(|r| r.metrics.len()).sum(),
                failed_resources: errors.len(),
            }
        });

        let result = AnalysisResult {
            metadata: AnalysisMetadata {
                version: crate::VERSION.to_string(),
                generated_at: Utc::now().to_rfc3339(),
                template_path: PathBuf::from(path),
                total_resources: classification.total_count,
                supported_resources: classification.supported.len(),
                processing_time_ms: total_ms,
                parse_time_ms: round_ms(parse_time),
                extract_time_ms: round_ms(extract_time),
                generate_time_ms: round_ms(generate_time),
                memory_peak_mb,
            },
            resources,
            unsupported_resources: if options.include_unsupported {
                classification.unsupported
            } else {
                Vec::new()
            },
            errors: (!errors.is_empty()).then_some(errors),
            performance_metrics,
        };

        *self.statistics.lock() = Some(AnalysisStatistics::from_result(&result, unsupported_count));

        if total_ms > SLOW_ANALYSIS_MS {
            log::warn!(
                "Analysis of {} took {} ms (over {} ms)",
                path.display(),
                total_ms,
                SLOW_ANALYSIS_MS
            );
        }
        log::info!(
            "Generated {} metric(s) for {} resource(s) in {} ms",
            result.metric_count(),
            result.resources.len(),
            total_ms
        );

        Ok(result)
    }

    /// Run the parser on the blocking pool. Parser errors pass through
    /// unchanged; a parser that panics becomes a generic analysis failure.
    async fn parse(&self, path: &Path) -> Result<Template> {
        let parser = Arc::clone(&self.parser);
        let owned = path.to_path_buf();
        tokio::task::spawn_blocking(move || parser.parse(&owned))
            .await
            .map_err(AnalyzerError::wrap)?
    }
}

fn round_ms(duration: Duration) -> u64 {
    (duration.as_secs_f64() * 1000.0).round() as u64
}
