//! # cfn-metrics
//!
//! A Rust command-line tool and library that analyzes AWS CloudFormation
//! templates and recommends CloudWatch metrics for the resources they declare.
//!
//! ## Features
//!
//! - **Template Parsing**: JSON and YAML templates, including short-form intrinsics
//! - **Metric Catalog**: Generators for Lambda, RDS, DynamoDB, ECS, ELBv2, API Gateway and SQS
//! - **Concurrent Generation**: Bounded, order-preserving fan-out with per-resource isolation
//! - **Memory Budget**: Optional ceiling enforced while generation runs
//! - **Reports**: JSON and HTML output, secrets redacted from resource properties
//!
//! ## Example
//!
//! ```rust,no_run
//! use cfn_metrics::{AnalysisOptions, MetricsAnalyzer};
//! use std::path::Path;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let analyzer = MetricsAnalyzer::new();
//! let result = analyzer
//!     .analyze(Path::new("./template.yaml"), &AnalysisOptions::default())
//!     .await?;
//! println!("{} metrics recommended", result.metric_count());
//! # Ok(())
//! # }
//! ```

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;

// Re-export commonly used types and functions
pub use analyzer::{AnalysisOptions, AnalysisResult, MetricsAnalyzer};
pub use error::{AnalyzerError, Result};

/// The current version of the CLI tool
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
