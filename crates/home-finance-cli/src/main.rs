mod commands;
mod input;
mod logging;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::mortgage::{AffordabilityArgs, CompareArgs, PaymentArgs, ScheduleArgs};

/// Mortgage payment, affordability and loan comparison calculations
#[derive(Parser)]
#[command(
    name = "homecalc",
    version,
    about = "Mortgage payment, affordability and loan comparison calculations",
    long_about = "A CLI for home-buying arithmetic with decimal precision. Computes \
                  level monthly payments and amortisation schedules, the maximum \
                  home price a household can afford under the 28/36 rule, and the \
                  total cost of competing loan offers."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Enable debug logging on stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Monthly payment, total paid and total interest for a fixed-rate loan
    Payment(PaymentArgs),
    /// Month-by-month amortisation schedule
    Schedule(ScheduleArgs),
    /// Maximum affordable home price under the 28/36 debt-to-income rule
    Affordability(AffordabilityArgs),
    /// Compare the total cost of up to three loan offers
    Compare(CompareArgs),
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

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Payment(args) => commands::mortgage::run_payment(args).await,
        Commands::Schedule(args) => commands::mortgage::run_schedule(args),
        Commands::Affordability(args) => commands::mortgage::run_affordability(args),
        Commands::Compare(args) => commands::mortgage::run_compare(args),
        Commands::Version => {
            println!("homecalc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
