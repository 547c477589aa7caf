//! `orgtree map` — scrape the sources and render the subordination tree.

use crate::acquisition::http_client::HttpClient;
use crate::cli::output::{self, Styled};
use crate::config::HarvestConfig;
use crate::harvest;
use crate::render::chart;
use crate::tree::flatten::TreeIndex;
use crate::tree::layout;
use crate::tree::node::OrgNode;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Arguments for the map command.
pub struct MapArgs {
    pub config: Option<PathBuf>,
    pub out: Option<PathBuf>,
    pub offline: Option<PathBuf>,
    pub downloads: Option<PathBuf>,
    pub concurrency: Option<usize>,
}

/// Run the map command.
pub async fn run(args: MapArgs) -> Result<()> {
    let s = Styled::new();
    let start = Instant::now();

    let mut config = match &args.config {
        Some(path) => HarvestConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => HarvestConfig::default(),
    };
    if let Some(dir) = args.downloads {
        config.download_dir = dir;
    }
    if let Some(width) = args.concurrency {
        config.concurrency = width;
    }

    let dataset = match &args.offline {
        Some(dir) => harvest::harvest_offline(&config, dir)
            .with_context(|| format!("building tree from {}", dir.display()))?,
        None => {
            let client = HttpClient::default();
            harvest::harvest_sources(&client, &config)
                .await
                .context("harvesting sources")?
        }
    };

    let tree = TreeIndex::from_root(&dataset);
    let positions = layout::layered_positions(&tree);
    let plot = chart::build_figure(&tree, &positions, &config.title);

    if !output::is_quiet() {
        report(&s, &dataset, &tree, start.elapsed());
    }

    chart::present(&plot, args.out.as_deref()).context("presenting chart")?;
    if let Some(out) = &args.out {
        if !output::is_quiet() {
            eprintln!("  Chart written to {}", out.display());
        }
    }

    Ok(())
}

/// Per-source summary after the harvest.
fn report(s: &Styled, dataset: &OrgNode, tree: &TreeIndex, elapsed: Duration) {
    eprintln!("  Harvest complete in {:.1}s", elapsed.as_secs_f64());
    eprintln!();
    eprintln!("  {}", s.bold(dataset.label()));
    for agency in dataset.children() {
        let count = agency.children().len();
        let sym = if count > 0 { s.ok_sym() } else { s.warn_sym() };
        eprintln!("  {sym} {:<12} {count} organizations", agency.label());
    }
    eprintln!();
    eprintln!(
        "  {}",
        s.dim(&format!(
            "Vertices: {}   Edges: {}",
            tree.records.len(),
            tree.edges.len()
        ))
    );
}
