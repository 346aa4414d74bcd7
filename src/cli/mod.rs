// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod serve;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crate::pathology::{display_name, PathologyCatalog};

/// Hoppr DICOM analysis gateway
#[derive(Parser, Debug)]
#[command(name = "hoppr-dicom-gateway")]
#[command(version)]
#[command(about = "HTTP gateway that scores DICOM uploads with Hoppr AI models", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP API server
    Serve(serve::ServeArgs),

    /// List the pathology catalog
    Pathologies,

    /// Guess the pathology from a DICOM filename
    Detect(DetectArgs),
}

/// Arguments for the detect command
#[derive(Args, Debug)]
pub struct DetectArgs {
    /// Filename or path to inspect
    pub filename: String,
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Serve(args) => serve::run(args).await,
        Commands::Pathologies => {
            let catalog = PathologyCatalog::default();
            for (pathology, model_id) in catalog.iter() {
                println!("{:<20} {:<22} {}", pathology, display_name(pathology), model_id);
            }
            Ok(())
        }
        Commands::Detect(args) => {
            let catalog = PathologyCatalog::default();
            let pathology = catalog.detect_from_filename(&args.filename);
            println!("{} {}", pathology, catalog.resolve_model(pathology));
            Ok(())
        }
    }
}
