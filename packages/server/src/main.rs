#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Bike accident dashboard server.
//!
//! ```text
//! dashbike_server serve [--config dashbike.toml] [--data-dir data] [--port 8071]
//! dashbike_server check [--config dashbike.toml] [--data-dir data]
//! ```
//!
//! Running with no subcommand enters interactive mode.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dashbike_server::{Overrides, ServerConfig, load_context, run_server, summarize};

#[derive(Parser)]
#[command(name = "dashbike_server", about = "Bike accident dashboard server")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the dataset and serve the dashboard API
    Serve {
        /// TOML configuration file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Directory holding the input CSV files
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,
        /// Address to bind to
        #[arg(long)]
        bind_addr: Option<String>,
    },
    /// Load the dataset, print a summary and exit
    Check {
        /// TOML configuration file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Directory holding the input CSV files
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
}

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        return Ok(dashbike_server::interactive::run().await?);
    };

    match command {
        Commands::Serve {
            config,
            data_dir,
            port,
            bind_addr,
        } => {
            let overrides = Overrides {
                bind_addr,
                port,
                data_dir,
            };
            let config = ServerConfig::resolve(config.as_deref(), &overrides)?;
            run_server(config).await?;
        }
        Commands::Check { config, data_dir } => {
            let overrides = Overrides {
                data_dir,
                ..Overrides::default()
            };
            let config = ServerConfig::resolve(config.as_deref(), &overrides)?;
            let ctx = load_context(&config.dataset)?;
            let summary = summarize(&ctx);

            println!("Records:      {}", summary.records);
            if let Some((first, last)) = summary.years {
                println!("Years:        {first}-{last}");
            }
            println!("Columns:      {}", summary.columns.join(", "));
            println!(
                "Departments:  {} ({} with population)",
                summary.departments, summary.departments_with_population
            );
            println!("Regions:      {}", summary.regions);
        }
    }

    Ok(())
}
