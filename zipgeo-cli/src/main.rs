use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

/// Zipcode coordinate lookup CLI tool
#[derive(Parser)]
#[command(name = "zipgeo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the dataset snapshot file
    #[arg(short, long, env = "ZIPGEO_DATASET", global = true)]
    dataset: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up coordinates for a single zipcode
    Lookup {
        /// Zipcode, e.g. 30019
        zipcode: String,

        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Look up coordinates for every row of a CSV file
    Batch {
        /// Input CSV file
        input: PathBuf,

        /// Output file (defaults to <input>_geo.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Column name holding the zipcode
        #[arg(long, default_value = "zipcode")]
        zip_col: String,
    },

    /// Display information about the dataset
    Info,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Lookup { zipcode, json } => commands::lookup::run(cli.dataset, zipcode, json),
        Commands::Batch {
            input,
            output,
            zip_col,
        } => commands::batch::run(cli.dataset, input, output, zip_col),
        Commands::Info => commands::info::run(cli.dataset),
    }
}
