//! # Analyzer Module
//!
//! This module turns CloudFormation templates into CloudWatch metric
//! recommendations:
//! - Template parsing (JSON and YAML with short-form intrinsics)
//! - Resource classification against the generator registry
//! - Concurrent per-resource metric generation with failure isolation
//! - Memory budget enforcement during generation
//! - Result assembly and formatting (JSON, HTML)
//!
//! # Example
//!
//! ```rust,ignore
//! use cfn_metrics::analyzer::{AnalysisOptions, MetricsAnalyzer};
//! use std::path::Path;
//!
//! let analyzer = MetricsAnalyzer::new();
//! let options = AnalysisOptions::new().with_continue_on_error(true);
//! let result = analyzer.analyze(Path::new("template.yaml"), &options).await?;
//! println!("{} metrics", result.metric_count());
//! ```

pub mod classifier;
pub mod engine;
pub mod formatter;
pub mod generators;
pub mod monitor;
pub mod options;
pub mod orchestrator;
pub mod registry;
pub mod sanitizer;
pub mod template;
pub mod types;

// Re-export main types
pub use classifier::{Classification, classify};
pub use engine::{DEFAULT_CONCURRENCY, GenerationSettings, generate_all};
pub use formatter::{OutputFormat, format_result_to_string};
pub use generators::{GenerationError, MetricGenerator, all_generators};
pub use monitor::{BudgetMonitor, MemoryProbe, ProcessMemoryProbe};
pub use options::AnalysisOptions;
pub use orchestrator::MetricsAnalyzer;
pub use registry::GeneratorRegistry;
pub use sanitizer::{REDACTED, sanitize_properties};
pub use template::{CfnTemplateParser, TemplateFormat, TemplateParser};
pub use types::{
    AnalysisError, AnalysisMetadata, AnalysisResult, AnalysisStatistics, Dimension, Importance,
    MetricCategory, MetricDefinition, PerformanceMetrics, ResourceDescriptor, ResourceWithMetrics,
    Template, Threshold,
};
