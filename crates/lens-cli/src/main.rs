//! Lens CLI binary entrypoint.
//!
//! This is the main entry point for the `lens` command-line tool.

use std::io;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use lens_cli::cli::{Cli, Commands};
use lens_cli::commands::{GetCommand, ListCommand, ServeMockCommand};
use lens_cli::output::OutputFormat;
use lens_client::{ClientConfig, HttpFetcher, PageFetcher};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn fetcher(cli: &Cli) -> anyhow::Result<Arc<dyn PageFetcher>> {
    let config = ClientConfig::new(&cli.api).with_request_timeout(Duration::from_secs(cli.timeout));
    let fetcher = HttpFetcher::new(&config).map_err(lens_cli::CliError::from)?;
    Ok(Arc::new(fetcher))
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let format = OutputFormat::new(cli.format);
    let mut stdout = io::stdout().lock();

    match &cli.command {
        Commands::List(args) => {
            let cmd = ListCommand::new(fetcher(&cli)?);
            cmd.execute(&mut stdout, &format, args)
                .await
                .with_context(|| format!("listing {} from {}", args.kind, cli.api))?;
        }
        Commands::Get(args) => {
            let cmd = GetCommand::new(fetcher(&cli)?);
            cmd.execute(&mut stdout, &format, args).await?;
        }
        Commands::ServeMock(args) => {
            let cmd = ServeMockCommand::new(args.clone());
            cmd.execute().await?;
        }
    }

    Ok(())
}
