use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::debug;

use tax_cli::{commands, logging, utils::parse_amount};
use tax_core::TaxYearRegistry;
use tax_data::TaxYearLoader;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Progressive income tax calculator.
///
/// Uses the compiled-in tax year tables unless `--brackets` points at a CSV
/// file with `year_label,ceiling,rate,base_tax` rows.
#[derive(Debug, Parser)]
#[command(name = "tax-calc", version)]
struct Cli {
    /// CSV file with bracket rows, replacing the built-in tables.
    #[arg(long)]
    brackets: Option<PathBuf>,

    /// CSV file with `year_label,threshold_income,rate` surcharge rows.
    #[arg(long, requires = "brackets")]
    surcharges: Option<PathBuf>,

    /// Log level or EnvFilter directive; `RUST_LOG` takes precedence.
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Tax owed on a yearly income.
    Tax {
        /// Tax year label, e.g. 2026.
        #[arg(long)]
        year: String,

        /// Yearly income; thousands separators are accepted.
        #[arg(long, value_parser = parse_amount)]
        income: Decimal,
    },

    /// Minimum yearly income that produces a monthly tax.
    Income {
        #[arg(long)]
        year: String,

        #[arg(long, value_parser = parse_amount)]
        monthly_tax: Decimal,
    },

    /// List the configured tax years.
    Years,

    /// Show the bracket table for a tax year.
    Brackets {
        #[arg(long)]
        year: String,
    },
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init_logging(&cli.log_level)?;

    let loaded;
    let registry = match &cli.brackets {
        Some(path) => {
            debug!("loading tax tables from {}", path.display());
            loaded = TaxYearLoader::load_registry(path, cli.surcharges.as_deref())
                .with_context(|| format!("Failed to load tax tables: {}", path.display()))?;
            &loaded
        }
        None => TaxYearRegistry::builtin(),
    };

    let mut out = io::stdout().lock();

    match cli.command {
        Command::Tax { year, income } => commands::tax(registry, &year, income, &mut out),
        Command::Income { year, monthly_tax } => {
            commands::income(registry, &year, monthly_tax, &mut out)
        }
        Command::Years => commands::years(registry, &mut out),
        Command::Brackets { year } => commands::brackets(registry, &year, &mut out),
    }
}
