mod commands;
mod config;
mod input;
mod logging;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::analysis::AnalyzeArgs;
use commands::config::ConfigArgs;
use commands::planning::CalculateArgs;
use logging::LogFormat;

/// Idle-cash allocation planning and rebalancing analysis
#[derive(Parser)]
#[command(
    name = "icash",
    version,
    about = "Idle-cash allocation planning and rebalancing analysis",
    long_about = "Splits newly investable cash across a fixed framework of buckets and \
                  fund types, builds a weekly contribution schedule, suggests add-position \
                  and take-profit trades from fund holdings, and compares current holdings \
                  against target ratios. All arithmetic uses decimal precision."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Strategy configuration file (JSON or YAML); defaults apply when omitted
    #[arg(long, global = true)]
    config: Option<String>,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log line format on stderr
    #[arg(long, default_value = "pretty", global = true)]
    log_format: LogFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the allocation plan, weekly schedule and holding suggestions
    Calculate(CalculateArgs),
    /// Compare current holdings against target ratios
    Analyze(AnalyzeArgs),
    /// Show or update the strategy configuration
    Config(ConfigArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.log_format);

    let config_path = cli.config.as_deref();
    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Calculate(args) => config::load_config(config_path)
            .and_then(|cfg| commands::planning::run_calculate(args, &cfg)),
        Commands::Analyze(args) => config::load_config(config_path)
            .and_then(|cfg| commands::analysis::run_analyze(args, &cfg)),
        Commands::Config(args) => config::load_config(config_path)
            .and_then(|cfg| commands::config::run_config(args, cfg)),
        Commands::Version => {
            println!("icash {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
