mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "rulecheck")]
#[command(version, about = "Validator profile CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a JSON payload against a validator profile
    Validate {
        /// Path to the profile file (YAML or TOML)
        profile: String,

        /// Path to the JSON payload
        data: String,

        /// Operation whose rules apply (defaults to the profile's rules)
        #[arg(short, long, conflicts_with = "call")]
        operation: Option<String>,

        /// Conventional call name, e.g. validateUpdateForExisting
        #[arg(long)]
        call: Option<String>,

        /// Identifier of the record being updated
        #[arg(short, long)]
        existing: Option<String>,

        /// Key column of the record being updated
        #[arg(long, default_value = "id")]
        key_name: String,

        /// JSON file with existing rows for unique rules
        #[arg(long)]
        store: Option<String>,

        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Check a validator profile without validating data
    Check {
        /// Path to the profile file (YAML or TOML)
        profile: String,

        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    match cli.command {
        Commands::Validate {
            profile,
            data,
            operation,
            call,
            existing,
            key_name,
            store,
            format,
        } => commands::validate::execute(commands::validate::ValidateArgs {
            profile: &profile,
            data: &data,
            operation: operation.as_deref(),
            call: call.as_deref(),
            existing: existing.as_deref(),
            key_name: &key_name,
            store: store.as_deref(),
            format: &format,
        }),

        Commands::Check { profile, format } => commands::check::execute(&profile, &format),
    }
}
