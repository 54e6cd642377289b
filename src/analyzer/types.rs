//! Core types for CloudWatch metric recommendation.
//!
//! These types represent parsed template resources, the metric definitions
//! generators produce for them, and the final analysis result handed to the
//! output formatters.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

// ============================================================================
// Template
// ============================================================================

/// A single entry of a template's `Resources` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    /// Logical id (the key under `Resources`)
    pub identifier: String,
    /// CloudFormation type, e.g. `AWS::Lambda::Function`
    pub type_identifier: String,
    /// Free-form `Properties` block (empty when absent)
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl ResourceDescriptor {
    /// Create a descriptor with no properties.
    pub fn new(identifier: impl Into<String>, type_identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            type_identifier: type_identifier.into(),
            properties: Map::new(),
        }
    }

    /// Builder method to set a property.
    pub fn with_property(mut self, key: impl Into<String>, value: Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    /// Get a property as a string slice, if it is a plain string.
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(|v| v.as_str())
    }

    /// Get a property as a number. Numeric strings are accepted since
    /// CloudFormation templates frequently quote numbers.
    pub fn property_f64(&self, key: &str) -> Option<f64> {
        match self.properties.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// A parsed CloudFormation template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Template {
    /// `AWSTemplateFormatVersion`, when declared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format_version: Option<String>,
    /// `Description`, when declared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Resources in template order
    pub resources: Vec<ResourceDescriptor>,
}

impl Template {
    /// Create a template from resources, keeping their order.
    pub fn from_resources(resources: Vec<ResourceDescriptor>) -> Self {
        Self {
            resources,
            ..Default::default()
        }
    }

    /// Look up a resource by logical id.
    pub fn resource(&self, identifier: &str) -> Option<&ResourceDescriptor> {
        self.resources.iter().find(|r| r.identifier == identifier)
    }
}

// ============================================================================
// Metric Definition
// ============================================================================

/// What aspect of a resource a metric observes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricCategory {
    Performance,
    Error,
    Saturation,
    Latency,
}

impl MetricCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Performance => "Performance",
            Self::Error => "Error",
            Self::Saturation => "Saturation",
            Self::Latency => "Latency",
        }
    }
}

impl fmt::Display for MetricCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How much attention a metric deserves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Importance {
    High,
    Medium,
    Low,
}

impl Importance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Recommended alarm thresholds. `critical` is expected to be the more
/// severe of the two but this is not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    pub warning: f64,
    pub critical: f64,
}

/// A CloudWatch dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    pub name: String,
    pub value: String,
}

impl Dimension {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A recommended CloudWatch metric for one resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDefinition {
    /// Metric name, e.g. `Errors`
    pub name: String,
    /// CloudWatch namespace, e.g. `AWS/Lambda`
    pub namespace: String,
    /// CloudWatch unit, e.g. `Count`, `Milliseconds`
    pub unit: String,
    /// Human-readable explanation
    pub description: String,
    /// Statistic to alarm on, e.g. `Sum`, `Average`, `p99`
    pub statistic: String,
    pub recommended_threshold: Threshold,
    /// Evaluation period in seconds
    pub evaluation_period: u32,
    pub category: MetricCategory,
    pub importance: Importance,
    pub dimensions: Vec<Dimension>,
}

// ============================================================================
// Analysis Output
// ============================================================================

/// A supported resource together with its generated metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceWithMetrics {
    pub logical_id: String,
    pub resource_type: String,
    /// Properties with sensitive values redacted
    pub resource_properties: Map<String, Value>,
    pub metrics: Vec<MetricDefinition>,
}

/// A per-resource generation failure recorded during analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisError {
    pub resource_id: String,
    pub resource_type: String,
    pub message: String,
    /// Panic payload or backtrace, when one was captured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack_trace: Option<String>,
}

/// Metadata describing one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    /// Tool version
    pub version: String,
    /// RFC 3339 timestamp
    pub generated_at: String,
    pub template_path: PathBuf,
    pub total_resources: usize,
    pub supported_resources: usize,
    pub processing_time_ms: u64,
    pub parse_time_ms: u64,
    pub extract_time_ms: u64,
    pub generate_time_ms: u64,
    /// Peak resident memory observed during the run, in MB
    pub memory_peak_mb: f64,
}

/// Optional throughput breakdown, attached when `collect_metrics` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub total_time_ms: u64,
    pub parse_time_ms: u64,
    pub extract_time_ms: u64,
    pub generate_time_ms: u64,
    pub memory_peak_mb: f64,
    /// Concurrency the generation engine ran with
    pub concurrency: usize,
    pub resources_per_second: f64,
    pub metrics_generated: usize,
    pub failed_resources: usize,
}

/// The complete result of analyzing one template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub metadata: AnalysisMetadata,
    pub resources: Vec<ResourceWithMetrics>,
    pub unsupported_resources: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<AnalysisError>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance_metrics: Option<PerformanceMetrics>,
}

impl AnalysisResult {
    /// Total number of metrics across all resources.
    pub fn metric_count(&self) -> usize {
        self.resources.iter().map(|r| r.metrics.len()).sum()
    }

    /// Check if any resource failed.
    pub fn has_errors(&self) -> bool {
        self.errors.as_ref().is_some_and(|e| !e.is_empty())
    }

    /// Find a resource entry by logical id.
    pub fn resource(&self, logical_id: &str) -> Option<&ResourceWithMetrics> {
        self.resources.iter().find(|r| r.logical_id == logical_id)
    }
}

// ============================================================================
// Statistics
// ============================================================================

/// Summary of the most recent analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisStatistics {
    pub total_resources: usize,
    pub supported_resources: usize,
    pub unsupported_resources: usize,
    /// Number of successfully analyzed resources per CloudFormation type
    pub resources_by_type: BTreeMap<String, usize>,
    pub total_metrics: usize,
    pub error_count: usize,
    pub processing_time_ms: u64,
    pub memory_peak_mb: f64,
}

impl AnalysisStatistics {
    /// Snapshot the summary of a result. `unsupported` is the computed count,
    /// which may differ from the result's list when unsupported resources are
    /// omitted from output.
    pub fn from_result(result: &AnalysisResult, unsupported: usize) -> Self {
        let mut resources_by_type = BTreeMap::new();
        for resource in &result.resources {
            *resources_by_type
                .entry(resource.resource_type.clone())
                .or_insert(0) += 1;
        }

        Self {
            total_resources: result.metadata.total_resources,
            supported_resources: result.metadata.supported_resources,
            unsupported_resources: unsupported,
            resources_by_type,
            total_metrics: result.metric_count(),
            error_count: result.errors.as_ref().map_or(0, Vec::len),
            processing_time_ms: result.metadata.processing_time_ms,
            memory_peak_mb: result.metadata.memory_peak_mb,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
