use cfn_metrics::{
    cli::{Cli, Commands},
    config,
    handlers::{self, AnalyzeOptions},
};
use clap::Parser;
use std::process;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> cfn_metrics::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    cli.init_logging();

    match cli.command {
        Commands::Analyze {
            template,
            format,
            output,
            resource_types,
            no_unsupported,
            concurrency,
            continue_on_error,
            collect_metrics,
            memory_limit_mb,
        } => {
            let config = config::load_config(cli.config.as_deref(), template.parent())?;
            let options = AnalyzeOptions {
                template,
                format: format.map(Into::into),
                output,
                resource_types,
                no_unsupported,
                concurrency,
                continue_on_error,
                collect_metrics,
                memory_limit_mb,
                verbose: cli.verbose > 0,
            };
            handlers::handle_analyze(options, &config).await
        }
        Commands::Generators => {
            handlers::handle_generators();
            Ok(())
        }
    }
}
