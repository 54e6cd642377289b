use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cfn-metrics")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Recommend CloudWatch metrics for CloudFormation templates")]
#[command(long_about = "Analyzes an AWS CloudFormation template and recommends CloudWatch metrics, alarm thresholds and dimensions for every supported resource.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a template and recommend metrics
    Analyze {
        /// Path to the CloudFormation template (JSON or YAML)
        #[arg(value_name = "TEMPLATE")]
        template: PathBuf,

        /// Report format
        #[arg(short, long, value_enum)]
        format: Option<ReportFormat>,

        /// Write the report to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Only analyze these resource types
        #[arg(long, value_delimiter = ',')]
        resource_types: Option<Vec<String>>,

        /// Leave unsupported resources out of the report
        #[arg(long)]
        no_unsupported: bool,

        /// Number of resources processed concurrently
        #[arg(long)]
        concurrency: Option<usize>,

        /// Record failing resources and keep going
        #[arg(long)]
        continue_on_error: bool,

        /// Attach timing and throughput figures to the report
        #[arg(long)]
        collect_metrics: bool,

        /// Abort when process memory exceeds this many MB
        #[arg(long, value_name = "MB")]
        memory_limit_mb: Option<u64>,
    },

    /// List registered metric generators and their resource types
    Generators,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Json,
    Html,
}

impl From<ReportFormat> for crate::analyzer::OutputFormat {
    fn from(format: ReportFormat) -> Self {
        match format {
            ReportFormat::Json => Self::Json,
            ReportFormat::Html => Self::Html,
        }
    }
}

impl Cli {
    /// Initialize logging based on verbosity level
    pub fn init_logging(&self) {
        if self.quiet {
            return;
        }

        let level = match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };

        env_logger::Builder::from_default_env()
            .filter_level(level)
            .init();
    }
}
