//! Options for a single analysis run.

use super::engine::{DEFAULT_CONCURRENCY, GenerationSettings};
use serde::{Deserialize, Serialize};

/// Caller-supplied knobs for [`super::MetricsAnalyzer::analyze`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisOptions {
    /// Only these CloudFormation types are analyzed (default: all)
    pub resource_types: Option<Vec<String>>,

    /// Keep unsupported logical ids in the result (default: true)
    pub include_unsupported: bool,

    /// Generator invocations in flight (default: 6)
    pub concurrency: usize,

    /// Record per-resource failures instead of aborting (default: false)
    pub continue_on_error: bool,

    /// Memory ceiling in bytes; no monitoring when unset
    pub memory_limit: Option<u64>,

    /// Log per-resource progress at info level
    pub verbose: bool,

    /// Attach a performance breakdown to the result
    pub collect_metrics: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            resource_types: None,
            include_unsupported: true,
            concurrency: DEFAULT_CONCURRENCY,
            continue_on_error: false,
            memory_limit: None,
            verbose: false,
            collect_metrics: false,
        }
    }
}

impl AnalysisOptions {
    /// Create the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict analysis to the given types.
    pub fn with_resource_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.resource_types = Some(types.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_include_unsupported(mut self, include: bool) -> Self {
        self.include_unsupported = include;
        self
    }

    /// Set the generation concurrency. Zero is treated as one.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_continue_on_error(mut self, continue_on_error: bool) -> Self {
        self.continue_on_error = continue_on_error;
        self
    }

    /// Enforce a memory ceiling given in bytes.
    pub fn with_memory_limit_bytes(mut self, limit: u64) -> Self {
        self.memory_limit = Some(limit);
        self
    }

    /// Enforce a memory ceiling given in MB.
    pub fn with_memory_limit_mb(self, limit_mb: u64) -> Self {
        self.with_memory_limit_bytes(limit_mb.saturating_mul(1024 * 1024))
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_collect_metrics(mut self, collect: bool) -> Self {
        self.collect_metrics = collect;
        self
    }

    /// Memory ceiling in bytes, if one is set.
    pub fn memory_limit_bytes(&self) -> Option<u64> {
        self.memory_limit
    }

    /// Settings handed to the generation engine.
    pub fn generation_settings(&self) -> GenerationSettings {
        GenerationSettings {
            concurrency: self.concurrency.max(1),
            continue_on_error: self.continue_on_error,
            verbose: self.verbose,
        }
    }
}
