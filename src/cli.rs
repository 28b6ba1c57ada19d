use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "h1", version, about = "HackerOne report client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List new reports for a program
    Reports(ReportsArgs),
    /// Show a single report
    Report(ReportArgs),
}

#[derive(Args, Clone)]
pub struct ReportsArgs {
    /// Program handle (defaults to HACKERONE_PROGRAM)
    #[arg(short, long)]
    pub program: Option<String>,

    /// Only reports created after this RFC 3339 timestamp
    #[arg(long, conflicts_with = "days")]
    pub since: Option<DateTime<Utc>>,

    /// Only reports created in the last N days
    #[arg(long)]
    pub days: Option<i64>,

    /// Print JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone)]
pub struct ReportArgs {
    /// Report id
    pub id: String,

    /// Print JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}
