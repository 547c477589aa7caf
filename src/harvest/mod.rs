//! Per-source harvest pipeline.
//!
//! Each source runs the same chain: fetch the landing page, follow the
//! subordinate-organization listing link, find the `.csv` link there,
//! download it, and extract the organization column. Sources are fanned out
//! with bounded concurrency and fanned back in by source key, so agency
//! order in the result follows the configured order rather than completion
//! order; no state is shared between sources.

use crate::acquisition::http_client::HttpClient;
use crate::acquisition::{link_discovery, tabular};
use crate::config::{HarvestConfig, Source};
use crate::error::{DiscoveryError, FetchError, HarvestError};
use crate::tree::node::OrgNode;
use futures::stream::{self, StreamExt};
use std::path::Path;
use tracing::info;

/// Scrape every configured source and assemble the dataset root.
///
/// Any fetch or discovery failure aborts the whole run. A CSV that defeats
/// every parse combination degrades to a childless agency branch instead.
pub async fn harvest_sources(
    client: &HttpClient,
    config: &HarvestConfig,
) -> Result<OrgNode, HarvestError> {
    let width = config.concurrency.max(1);

    tokio::fs::create_dir_all(&config.download_dir)
        .await
        .map_err(|source| FetchError::Io {
            path: config.download_dir.clone(),
            source,
        })?;

    let branches: Vec<OrgNode> = stream::iter(config.sources.iter())
        .map(|source| harvest_source(client, source, &config.download_dir))
        .buffered(width)
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .collect::<Result<_, _>>()?;

    Ok(OrgNode::branch(config.ministry.clone(), branches))
}

/// Build the dataset from CSV files already on disk, skipping the network.
/// Expects the same `<host>.csv` naming the online harvest produces.
pub fn harvest_offline(config: &HarvestConfig, dir: &Path) -> Result<OrgNode, HarvestError> {
    let mut branches = Vec::with_capacity(config.sources.len());
    for source in &config.sources {
        let path = dir.join(csv_filename(&source.url)?);
        let orgs = tabular::extract_second_column(&path);
        info!("{}: {} organizations (offline)", source.name, orgs.len());
        branches.push(agency_branch(source, orgs));
    }
    Ok(OrgNode::branch(config.ministry.clone(), branches))
}

/// One source: landing page -> listing page -> csv download -> extraction.
async fn harvest_source(
    client: &HttpClient,
    source: &Source,
    download_dir: &Path,
) -> Result<OrgNode, HarvestError> {
    let landing = client.get_bytes(&source.url).await?;
    let listing_url = link_discovery::find_listing_link(&landing, &source.url)?;

    let listing = client.get_bytes(&listing_url).await?;
    // Both hrefs resolve against the landing page's site, like the portals
    // themselves link
    let csv_url = link_discovery::find_csv_link(&listing, &source.url)?;

    let path = download_dir.join(csv_filename(&source.url)?);
    client.download(&csv_url, &path).await?;

    let orgs = tabular::extract_second_column(&path);
    info!("{}: {} organizations", source.name, orgs.len());

    Ok(agency_branch(source, orgs))
}

fn agency_branch(source: &Source, orgs: Vec<String>) -> OrgNode {
    OrgNode::branch(source.name.clone(), orgs.into_iter().map(OrgNode::Leaf).collect())
}

/// `<host>.csv`, named after the source URL's host.
fn csv_filename(url: &str) -> Result<String, DiscoveryError> {
    let parsed = url::Url::parse(url).map_err(|_| DiscoveryError::MalformedUrl {
        url: url.to_string(),
    })?;
    let host = parsed
        .host_str()
        .ok_or_else(|| DiscoveryError::MalformedUrl {
            url: url.to_string(),
        })?;
    Ok(format!("{host}.csv"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_filename() {
        assert_eq!(
            csv_filename("http://roskazna.ru/opendata/").unwrap(),
            "roskazna.ru.csv"
        );
        assert_eq!(
            csv_filename("http://www.customs.ru/opendata/").unwrap(),
            "www.customs.ru.csv"
        );
        assert!(csv_filename("not a url").is_err());
    }

    #[test]
    fn test_agency_branch() {
        let source = Source {
            name: "ФК".to_string(),
            url: "http://roskazna.ru/opendata/".to_string(),
        };
        let branch = agency_branch(&source, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(branch.label(), "ФК");
        assert_eq!(branch.children().len(), 2);

        let empty = agency_branch(&source, Vec::new());
        assert!(empty.children().is_empty());
    }
}
