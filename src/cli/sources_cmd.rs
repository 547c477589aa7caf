//! `orgtree sources` — print the configured source table.

use crate::cli::output::Styled;
use crate::config::HarvestConfig;
use anyhow::{Context, Result};
use std::path::Path;

/// Run the sources command.
pub fn run(config_path: Option<&Path>) -> Result<()> {
    let config = match config_path {
        Some(path) => HarvestConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => HarvestConfig::default(),
    };

    let s = Styled::new();
    println!("{}", s.bold(&config.ministry));
    for source in &config.sources {
        println!("  {:<12} {}", source.name, source.url);
    }
    Ok(())
}
