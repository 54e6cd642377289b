//! Error types for template analysis.
//!
//! Every failure surfaced by [`crate::analyzer::MetricsAnalyzer::analyze`] is one
//! of these kinds. Parser and budget failures are always fatal; per-resource
//! generation failures are fatal only when `continue_on_error` is off.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while analyzing a template.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// Template file is missing, unreadable or oversized
    #[error("File error ({}): {reason}", .path.display())]
    File {
        /// Path of the template
        path: PathBuf,
        /// What went wrong
        reason: String,
    },

    /// Template content is malformed or structurally invalid
    #[error("Parse error ({}): {reason}", .path.display())]
    Parse {
        /// Path of the template
        path: PathBuf,
        /// What went wrong
        reason: String,
    },

    /// Metric generation failed, the memory budget was violated, or an
    /// unexpected failure was normalized into this kind
    #[error("{message}")]
    Resource {
        message: String,
        context: Option<Box<ResourceErrorContext>>,
    },

    /// Report formatting or writing failed
    #[error("Output error: {0}")]
    Output(String),

    /// Configuration file could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Structured context attached to [`AnalyzerError::Resource`].
#[derive(Debug, Clone, Default)]
pub struct ResourceErrorContext {
    /// Logical id of the resource whose generator failed
    pub resource_id: Option<String>,
    /// CloudFormation type of that resource
    pub resource_type: Option<String>,
    /// Observed memory usage in MB (budget violations)
    pub actual_mb: Option<f64>,
    /// Configured memory ceiling in MB (budget violations)
    pub limit_mb: Option<f64>,
    /// Text of the underlying error, when this error wraps another one
    pub original: Option<String>,
}

impl std::fmt::Display for ResourceErrorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::new();
        if let Some(id) = &self.resource_id {
            parts.push(format!("resource={}", id));
        }
        if let Some(ty) = &self.resource_type {
            parts.push(format!("type={}", ty));
        }
        if let (Some(actual), Some(limit)) = (self.actual_mb, self.limit_mb) {
            parts.push(format!("memory={:.2}MB limit={:.2}MB", actual, limit));
        }
        if let Some(original) = &self.original {
            parts.push(format!("cause={}", original));
        }
        write!(f, "{}", parts.join(", "))
    }
}

impl AnalyzerError {
    /// A generation failure attributed to one resource.
    pub fn generation(
        resource_id: impl Into<String>,
        resource_type: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let resource_id = resource_id.into();
        let resource_type = resource_type.into();
        Self::Resource {
            message: format!(
                "Metric generation failed for {} ({}): {}",
                resource_id,
                resource_type,
                message.into()
            ),
            context: Some(Box::new(ResourceErrorContext {
                resource_id: Some(resource_id),
                resource_type: Some(resource_type),
                ..Default::default()
            })),
        }
    }

    /// A memory budget violation.
    pub fn memory(message: impl Into<String>, actual_mb: f64, limit_mb: f64) -> Self {
        Self::Resource {
            message: message.into(),
            context: Some(Box::new(ResourceErrorContext {
                actual_mb: Some(actual_mb),
                limit_mb: Some(limit_mb),
                ..Default::default()
            })),
        }
    }

    /// Wrap an unrecognized failure as a generic analysis failure.
    pub fn wrap(original: impl std::fmt::Display) -> Self {
        let original = original.to_string();
        Self::Resource {
            message: format!("Analysis failed: {}", original),
            context: Some(Box::new(ResourceErrorContext {
                original: Some(original),
                ..Default::default()
            })),
        }
    }

    /// Structured context, when this is a resource-kind error.
    pub fn context(&self) -> Option<&ResourceErrorContext> {
        match self {
            Self::Resource { context, .. } => context.as_deref(),
            _ => None,
        }
    }

    /// Short name of the error kind, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::File { .. } => "file",
            Self::Parse { .. } => "parse",
            Self::Resource { .. } => "resource",
            Self::Output(_) => "output",
            Self::Config(_) => "config",
        }
    }
}

impl From<std::io::Error> for AnalyzerError {
    fn from(e: std::io::Error) -> Self {
        Self::Output(e.to_string())
    }
}

impl From<serde_json::Error> for AnalyzerError {
    fn from(e: serde_json::Error) -> Self {
        Self::Output(e.to_string())
    }
}

/// Result type alias for analysis operations
pub type Result<T> = std::result::Result<T, AnalyzerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_error_carries_resource() {
        let err = AnalyzerError::generation("MyQueue", "AWS::SQS::Queue", "boom");
        assert_eq!(err.kind(), "resource");
        assert!(err.to_string().contains("MyQueue"));
        let ctx = err.context().unwrap();
        assert_eq!(ctx.resource_type.as_deref(), Some("AWS::SQS::Queue"));
    }

    #[test]
    fn test_wrap_keeps_original_message() {
        let err = AnalyzerError::wrap("socket closed");
        assert!(err.to_string().contains("socket closed"));
        assert_eq!(
            err.context().and_then(|c| c.original.as_deref()),
            Some("socket closed")
        );
    }

    #[test]
    fn test_memory_context_describes_figures() {
        let err = AnalyzerError::memory("Memory limit exceeded", 600.0, 512.0);
        let ctx = err.context().unwrap();
        assert!(ctx.to_string().contains("limit=512.00MB"));
    }
}
