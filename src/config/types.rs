use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub analysis: AnalysisConfig,
    pub output: OutputConfig,
}

/// Analysis configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub concurrency: usize,
    pub continue_on_error: bool,
    pub include_unsupported: bool,
    pub collect_metrics: bool,
    pub memory_limit_mb: Option<u64>,
    /// Only analyze these CloudFormation types
    pub resource_types: Option<Vec<String>>,
    /// Largest template accepted, in bytes
    pub max_template_size_bytes: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            concurrency: crate::analyzer::DEFAULT_CONCURRENCY,
            continue_on_error: false,
            include_unsupported: true,
            collect_metrics: false,
            memory_limit_mb: None,
            resource_types: None,
            max_template_size_bytes: crate::analyzer::template::DEFAULT_MAX_TEMPLATE_BYTES,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// `json` or `html`
    pub format: String,
    /// Pretty-print JSON
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "json".to_string(),
            pretty: true,
        }
    }
}
