use std::{
    collections::HashSet,
    env,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use url::Url;

use crate::error::Error;

const DEFAULT_SOURCES: &str = "sources.json";
const DEFAULT_OUT_DIR: &str = "data";

/// One canteen whose menu page is scraped.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Source {
    /// Stable key used in the output documents.
    pub slug: String,
    pub name: String,
    pub url: Url,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Processed in this order.
    pub sources: Vec<Source>,
    pub out_dir: PathBuf,
}

impl Config {
    /// Reads `MENU_SOURCES` (path to the JSON source list) and `MENU_OUT_DIR`.
    pub fn from_env() -> crate::Result<Self> {
        let sources_path = env::var("MENU_SOURCES").unwrap_or_else(|_| {
            log::info!("env var MENU_SOURCES not set, using {DEFAULT_SOURCES}");
            DEFAULT_SOURCES.to_string()
        });
        let out_dir = env::var("MENU_OUT_DIR").unwrap_or_else(|_| DEFAULT_OUT_DIR.to_string());
        Ok(Self {
            sources: load_sources(sources_path)?,
            out_dir: out_dir.into(),
        })
    }
}

pub fn load_sources(path: impl AsRef<Path>) -> crate::Result<Vec<Source>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
    parse_sources(&text)
}

pub fn parse_sources(json: &str) -> crate::Result<Vec<Source>> {
    let sources: Vec<Source> = serde_json::from_str(json)?;
    if sources.is_empty() {
        return Err(Error::Config("no sources configured".into()));
    }
    let mut seen = HashSet::new();
    for source in &sources {
        if source.slug.is_empty() {
            return Err(Error::Config(format!("source {:?} has an empty slug", source.name)));
        }
        if !seen.insert(source.slug.as_str()) {
            return Err(Error::Config(format!("duplicate source slug {:?}", source.slug)));
        }
    }
    Ok(sources)
}
