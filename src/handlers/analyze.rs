//! Handler for the `analyze` command.
//!
//! Merges CLI flags over the loaded configuration, runs the analyzer and
//! writes the report to stdout or a file.

use crate::analyzer::{
    AnalysisOptions, AnalysisResult, CfnTemplateParser, MetricsAnalyzer, OutputFormat,
    format_result_to_string,
};
use crate::config::types::Config;
use crate::error::{AnalyzerError, Result};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

/// Configuration for the analyze command
#[derive(Debug, Clone, Default)]
pub struct AnalyzeOptions {
    /// Template to analyze
    pub template: PathBuf,
    /// Report format (falls back to the config file)
    pub format: Option<OutputFormat>,
    /// Output file
    pub output: Option<PathBuf>,
    /// Resource type allow-list
    pub resource_types: Option<Vec<String>>,
    /// Drop unsupported resources from the report
    pub no_unsupported: bool,
    pub concurrency: Option<usize>,
    pub continue_on_error: bool,
    pub collect_metrics: bool,
    pub memory_limit_mb: Option<u64>,
    pub verbose: bool,
}

/// Resolved settings for one run.
#[derive(Debug, Clone)]
pub struct ResolvedAnalyze {
    pub analysis: AnalysisOptions,
    pub format: OutputFormat,
    pub pretty: bool,
    pub max_template_size: u64,
}

/// Combine command-line flags with the configuration file. Flags win.
pub fn resolve(options: &AnalyzeOptions, config: &Config) -> Result<ResolvedAnalyze> {
    let format = match options.format {
        Some(format) => format,
        None => OutputFormat::parse(&config.output.format).ok_or_else(|| {
            AnalyzerError::Config(format!(
                "Unknown output format '{}' (expected json or html)",
                config.output.format
            ))
        })?,
    };

    let section = &config.analysis;
    let mut analysis = AnalysisOptions::new()
        .with_include_unsupported(section.include_unsupported && !options.no_unsupported)
        .with_concurrency(options.concurrency.unwrap_or(section.concurrency))
        .with_continue_on_error(section.continue_on_error || options.continue_on_error)
        .with_collect_metrics(section.collect_metrics || options.collect_metrics)
        .with_verbose(options.verbose);

    if let Some(types) = options
        .resource_types
        .clone()
        .or_else(|| section.resource_types.clone())
    {
        analysis = analysis.with_resource_types(types);
    }
    if let Some(limit) = options.memory_limit_mb.or(section.memory_limit_mb) {
        analysis = analysis.with_memory_limit_mb(limit);
    }

    Ok(ResolvedAnalyze {
        analysis,
        format,
        pretty: config.output.pretty,
        max_template_size: section.max_template_size_bytes,
    })
}

/// Handle the analyze command.
pub async fn handle_analyze(options: AnalyzeOptions, config: &Config) -> Result<()> {
    let resolved = resolve(&options, config)?;
    log::debug!("Resolved analysis options: {:?}", resolved.analysis);

    let parser = CfnTemplateParser::new().with_max_size(resolved.max_template_size);
    let analyzer = MetricsAnalyzer::new().with_parser(Arc::new(parser));
    let result = analyzer
        .analyze(&options.template, &resolved.analysis)
        .await?;

    let report = format_result_to_string(&result, resolved.format, resolved.pretty)?;

    match &options.output {
        Some(path) => {
            fs::write(path, report).map_err(|e| {
                AnalyzerError::Output(format!("Cannot write {}: {}", path.display(), e))
            })?;
            print_summary(&result, path);
        }
        None => println!("{}", report.trim_end()),
    }

    Ok(())
}

fn print_summary(result: &AnalysisResult, path: &std::path::Path) {
    use colored::Colorize;

    let meta = &result.metadata;
    eprintln!(
        "{} {} metric(s) for {}/{} supported resource(s) in {} ms",
        "✅".green(),
        result.metric_count().to_string().bold(),
        meta.supported_resources,
        meta.total_resources,
        meta.processing_time_ms
    );
    if !result.unsupported_resources.is_empty() {
        eprintln!(
            "   {} unsupported: {}",
            result.unsupported_resources.len().to_string().yellow(),
            result.unsupported_resources.join(", ")
        );
    }
    if let Some(errors) = &result.errors {
        for error in errors {
            eprintln!(
                "   {} {} ({}): {}",
                "✗".red().bold(),
                error.resource_id,
                error.resource_type,
                error.message
            );
        }
    }
    eprintln!("   Report written to {}", path.display().to_string().cyan());
}
