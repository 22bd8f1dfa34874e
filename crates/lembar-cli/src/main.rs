// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Lembar — paginated delivery-note renderer.
//
// Entry point. Initialises logging, parses arguments and dispatches to the
// subcommand handlers in `lembar_cli::commands`.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use lembar_cli::commands;
use lembar_core::error::Result;
use lembar_core::human_errors::{Severity, humanize_error};

#[derive(Parser, Debug)]
#[command(name = "lembar", version, about = "Render delivery notes to print-ready PDF")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a document bundle to PDF
    Render {
        /// Bundle JSON file (header, items, optional logo_path)
        #[arg(value_name = "FILE")]
        bundle: PathBuf,

        /// Print format: standard or dot-matrix
        #[arg(short, long, default_value = "standard")]
        variant: String,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        out_dir: PathBuf,

        /// Template JSON file (labels and signature parties)
        #[arg(short, long, value_name = "FILE")]
        template: Option<PathBuf>,
    },

    /// Write the default template for editing
    Template {
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },

    /// Show how a bundle paginates without rendering
    Inspect {
        #[arg(value_name = "FILE")]
        bundle: PathBuf,

        #[arg(short, long, default_value = "standard")]
        variant: String,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let human = humanize_error(&err);
            eprintln!("error: {}", human.message);
            eprintln!("  {}", human.suggestion);
            match human.severity {
                Severity::CallerError => ExitCode::from(2),
                Severity::Defect | Severity::Environment => ExitCode::FAILURE,
            }
        }
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Render {
            bundle,
            variant,
            out_dir,
            template,
        } => {
            let outcome = commands::render(&bundle, &variant, &out_dir, template.as_deref())?;
            println!("{}", outcome.path.display());
            println!("  pages:  {}", outcome.page_count);
            println!("  sha256: {}", outcome.sha256);
            for warning in &outcome.warnings {
                println!("  warning: {warning}");
            }
        }
        Commands::Template { path } => {
            commands::write_template(&path)?;
            println!("{}", path.display());
        }
        Commands::Inspect { bundle, variant } => {
            print!("{}", commands::inspect(&bundle, &variant)?);
        }
    }
    Ok(())
}
