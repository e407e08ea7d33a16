// SPDX-FileCopyrightText: 2026 Yolchi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Yolchi - driver-acquisition campaign funnel service.
//!
//! This is the binary entry point: the HTTP server plus one-shot report and
//! import commands over the same database.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod commands;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Yolchi - driver-acquisition campaign funnel service.
#[derive(Parser, Debug)]
#[command(name = "yolchi", version, about, long_about = None)]
struct Cli {
    /// Read this configuration file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP gateway.
    Serve,
    /// Print one report as JSON.
    Report {
        #[arg(value_enum)]
        kind: ReportKind,
    },
    /// Replace an uploaded list with the contents of a file.
    Import {
        #[arg(value_enum)]
        list: ImportKind,
        file: PathBuf,
        /// Column holding the phone number (SMS lists only).
        #[arg(long)]
        phone_column: Option<usize>,
    },
    /// Inspect the configuration.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportKind {
    Corridor,
    AllRegions,
    Sms,
    CallCenter,
    Budget,
    Target,
    Channels,
    Reactivation,
    Dashboard,
    Campaigns,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImportKind {
    Sms,
    CallCenter,
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Validate the configuration and report problems.
    Check,
    /// Print the effective configuration as TOML.
    Show,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => yolchi_config::load_and_validate_path(path),
        None => yolchi_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            yolchi_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Report { kind }) => commands::run_report(config, kind).await,
        Some(Commands::Import {
            list,
            file,
            phone_column,
        }) => commands::run_import(config, list, &file, phone_column).await,
        Some(Commands::Config { action }) => match action {
            ConfigAction::Check => {
                println!("yolchi: configuration is valid");
                Ok(())
            }
            ConfigAction::Show => commands::show_config(&config),
        },
        None => {
            println!("yolchi: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("yolchi: {e}");
        std::process::exit(1);
    }
}
