//! Harvest configuration: the ministry root, the source table, and runtime
//! knobs. The default reproduces the built-in four-agency table; a JSON file
//! can replace any part of it.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One scraped portal: an agency name and its landing-page URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    pub name: String,
    pub url: String,
}

/// Full pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvestConfig {
    /// Root label the agencies hang under.
    pub ministry: String,
    /// Chart title.
    pub title: String,
    /// Sources in render order.
    pub sources: Vec<Source>,
    /// Directory downloaded CSV files land in. Files are left behind after
    /// the run as a discardable cache.
    pub download_dir: PathBuf,
    /// Fan-out width across sources.
    pub concurrency: usize,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            ministry: "МинФин".to_string(),
            title: "Подведомственные министерству финансов учреждения".to_string(),
            sources: vec![
                Source {
                    name: "ФК".to_string(),
                    url: "http://roskazna.ru/opendata/".to_string(),
                },
                Source {
                    name: "ФНС".to_string(),
                    url: "http://nalog.ru/opendata/".to_string(),
                },
                Source {
                    name: "ФТС".to_string(),
                    url: "http://www.customs.ru/opendata/".to_string(),
                },
                Source {
                    name: "ФСРАР".to_string(),
                    url: "http://www.fsrar.ru/opendata/".to_string(),
                },
            ],
            download_dir: PathBuf::from("."),
            concurrency: 4,
        }
    }
}

impl HarvestConfig {
    /// Load a config from a JSON file and validate it.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject unparseable or non-http(s) source URLs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for source in &self.sources {
            let invalid = || ConfigError::InvalidUrl {
                name: source.name.clone(),
                url: source.url.clone(),
            };
            let parsed = url::Url::parse(&source.url).map_err(|_| invalid())?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(invalid());
            }
        }
        Ok(())
    }
}
