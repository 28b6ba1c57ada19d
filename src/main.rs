mod cli;

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use clap::Parser;
use cli::{Cli, Commands, ReportArgs, ReportsArgs};
use hackerone_client::common::utils::{report_detail, report_summary};
use hackerone_client::{Config, Error, HackerOneClient, reports_since_default};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Load config
    let config = Arc::new(Config::from_env());
    let client = HackerOneClient::new(config);

    let result = match cli.command {
        Commands::Reports(args) => handle_reports(&client, args).await,
        Commands::Report(args) => handle_report(&client, args).await,
    };

    if let Err(err) = result {
        eprintln!("Error: {:#}", err);
        let exit_code = match err.downcast_ref::<Error>() {
            Some(Error::NotConfigured(_)) | Some(Error::InvalidArgument(_)) => 2,
            _ => 1,
        };
        std::process::exit(exit_code);
    }
}

async fn handle_reports(client: &HackerOneClient, args: ReportsArgs) -> Result<()> {
    let client = match args.program {
        Some(program) => client.for_program(program),
        None => client.clone(),
    };
    let since = match (args.since, args.days) {
        (Some(since), _) => since,
        (None, Some(days)) => Utc::now() - Duration::days(days),
        (None, None) => reports_since_default(),
    };

    let reports = client.reports(since).await?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&reports).context("Failed to serialize reports")?
        );
    } else if reports.is_empty() {
        println!("No new reports since {}", since.to_rfc3339());
    } else {
        for report in &reports {
            println!("{}", report_summary(report));
        }
    }
    Ok(())
}

async fn handle_report(client: &HackerOneClient, args: ReportArgs) -> Result<()> {
    let report = client.report(&args.id).await?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        );
    } else {
        println!("{}", report_detail(&report));
    }
    Ok(())
}
