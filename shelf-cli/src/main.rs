use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

mod commands;
mod dataset;
mod resource;

use commands::{dupe::DupeArgs, list::ListArgs};
use resource::Resource;
use shelf_query::config::Config;

/// shelf - page, sort and filter catalog records from the command line
#[derive(Parser)]
#[command(name = "shelf")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (defaults to ./shelf.toml)
    #[arg(long, global = true, value_name = "FILE", env = "SHELF_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print one page of records as JSON
    List(ListArgs),
    /// Check whether another record already holds a field value
    Dupe(DupeArgs),
    /// List the sortable and filterable columns of a resource
    Fields {
        /// Record type
        #[arg(value_enum)]
        resource: Resource,
    },
}

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    let result = run(cli).await;

    // Handle result
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);

            // Show context if available
            if let Some(source) = e.source() {
                eprintln!("\n{} {}", "Caused by:".yellow(), source);
            }

            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    shelf_query::observability::init_tracing(&config);

    match cli.command {
        Commands::List(args) => commands::list::execute(args, &config).await,
        Commands::Dupe(args) => commands::dupe::execute(args).await,
        Commands::Fields { resource } => commands::fields::execute(resource),
    }
}
