//! Dataset acquisition: one fetch at startup, HTTP or local file, then the
//! raw CSV text is handed to the parser. No re-fetch during a run.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::config::Config;
use crate::data::text_sha256;
use crate::logging::{log, obj, v_num, v_str, Domain, Level};
use crate::records::{LoadError, RecordStore};

#[derive(Clone, Copy, Debug)]
pub enum SourceKind {
    Http,
    File,
}

impl SourceKind {
    /// A configured local path wins over the remote URL.
    pub fn from_config(cfg: &Config) -> Self {
        if cfg.dataset_path.is_some() {
            SourceKind::File
        } else {
            SourceKind::Http
        }
    }

    pub fn build(self, cfg: &Config) -> Result<Box<dyn DatasetSource + Send + Sync>> {
        match self {
            SourceKind::Http => Ok(Box::new(HttpSource::new(
                &cfg.dataset_url,
                cfg.fetch_timeout_secs,
            )?)),
            SourceKind::File => Ok(Box::new(FileSource::new(
                cfg.dataset_path.clone().unwrap_or_default(),
            ))),
        }
    }
}

#[async_trait]
pub trait DatasetSource {
    async fn fetch(&self) -> Result<String>;
    fn describe(&self) -> String;
}

pub struct HttpSource {
    url: Url,
    client: Client,
}

impl HttpSource {
    pub fn new(url: &str, timeout_secs: u64) -> Result<Self> {
        let url = Url::parse(url)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_else(|_| Client::new());
        Ok(Self { url, client })
    }
}

#[async_trait]
impl DatasetSource for HttpSource {
    async fn fetch(&self) -> Result<String> {
        let resp = self.client.get(self.url.clone()).send().await?;
        if !resp.status().is_success() {
            return Err(anyhow::anyhow!("dataset fetch returned {}", resp.status()));
        }
        Ok(resp.text().await?)
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}

pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DatasetSource for FileSource {
    async fn fetch(&self) -> Result<String> {
        Ok(std::fs::read_to_string(&self.path)?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Fetch, parse, and index the dataset. Transport failures and timeouts
/// surface as `LoadError::Source`; everything after the text arrives is the
/// parser's problem.
pub async fn load_store(cfg: &Config) -> Result<RecordStore, LoadError> {
    let source = SourceKind::from_config(cfg)
        .build(cfg)
        .map_err(|e| LoadError::Source(e.to_string()))?;

    log(
        Level::Info,
        Domain::Dataset,
        "fetch_start",
        obj(&[("source", v_str(&source.describe()))]),
    );

    let fetched = tokio::time::timeout(
        Duration::from_secs(cfg.fetch_timeout_secs),
        source.fetch(),
    )
    .await
    .map_err(|_| LoadError::Source(format!("timed out after {}s", cfg.fetch_timeout_secs)))?
    .map_err(|e| LoadError::Source(e.to_string()))?;

    let store = RecordStore::from_csv(&fetched)?;
    let years = store.available_years();
    log(
        Level::Info,
        Domain::Dataset,
        "loaded",
        obj(&[
            ("source", v_str(&source.describe())),
            ("sha256", v_str(&text_sha256(&fetched))),
            ("rows", v_num(store.len() as f64)),
            ("year_min", v_num(years.first().copied().unwrap_or(0) as f64)),
            ("year_max", v_num(years.last().copied().unwrap_or(0) as f64)),
        ]),
    );
    Ok(store)
}
