mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::amortize::{BalanceArgs, PaymentArgs, ScheduleArgs};

/// Fixed-payment loan amortization with decimal precision
#[derive(Parser)]
#[command(
    name = "amort",
    version,
    about = "Fixed-payment loan amortization with decimal precision",
    long_about = "A CLI for computing fixed-payment loan amortization schedules \
                  with decimal precision. Supports declining-balance annuity and \
                  flat-rate interest, configurable due-date stepping, and JSON, \
                  table, CSV and minimal output."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a full period-by-period amortization schedule
    Schedule(ScheduleArgs),
    /// Compute the monthly payment and totals without the schedule
    Payment(PaymentArgs),
    /// Outstanding balance after a number of on-schedule payments
    Balance(BalanceArgs),
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

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Schedule(args) => commands::amortize::run_schedule(args),
        Commands::Payment(args) => commands::amortize::run_payment(args),
        Commands::Balance(args) => commands::amortize::run_balance(args),
        Commands::Version => {
            println!("amort {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
