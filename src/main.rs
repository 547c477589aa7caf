//! Orgtree binary: map government open-data portals into an agency
//! subordination tree and render it.

use anyhow::Result;
use clap::{Parser, Subcommand};
use orgtree::cli::{map_cmd, sources_cmd};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "orgtree",
    version,
    about = "Map government open-data portals into an agency subordination tree"
)]
struct Cli {
    /// Suppress progress output.
    #[arg(long, global = true)]
    quiet: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scrape the sources and render the subordination tree.
    Map {
        /// JSON config file replacing the built-in source table.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write the chart to an HTML file instead of opening a browser.
        #[arg(long)]
        out: Option<PathBuf>,

        /// Build the tree from already-downloaded CSV files in this
        /// directory, skipping the network.
        #[arg(long)]
        offline: Option<PathBuf>,

        /// Directory downloaded CSV files are stored in.
        #[arg(long)]
        downloads: Option<PathBuf>,

        /// Fan-out width across sources.
        #[arg(long)]
        concurrency: Option<usize>,
    },
    /// Print the configured source table.
    Sources {
        /// JSON config file replacing the built-in source table.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Global flags travel as env vars so any module can check them
    if cli.quiet {
        std::env::set_var("ORGTREE_QUIET", "1");
    }
    if cli.no_color {
        std::env::set_var("ORGTREE_NO_COLOR", "1");
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("orgtree=info".parse()?),
        )
        .init();

    match cli.command {
        Command::Map {
            config,
            out,
            offline,
            downloads,
            concurrency,
        } => {
            map_cmd::run(map_cmd::MapArgs {
                config,
                out,
                offline,
                downloads,
                concurrency,
            })
            .await
        }
        Command::Sources { config } => sources_cmd::run(config.as_deref()),
    }
}
