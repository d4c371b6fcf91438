use std::collections::HashSet;
use std::path::PathBuf;

use crate::crawl::SitemapCrawler;
use crate::fetch::{FetchSettings, ReqwestFetcher};
use crate::ledger::Ledger;
use crate::persist::{write_url_list, PersistError};
use crate::submit::{IndexNowClient, SiteIdentity, SubmitReport, SubmitSettings};
use crate::{EngineError, FailureKind};

pub const LEDGER_FILENAME: &str = "submitted_urls.txt";
pub const STAGED_FILENAME: &str = "urls_to_submit.txt";

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub fetch: FetchSettings,
    pub submit: SubmitSettings,
    pub site: SiteIdentity,
    pub ledger_path: PathBuf,
    pub staged_path: PathBuf,
}

impl EngineConfig {
    /// Default settings with the history and staging files placed in `work_dir`.
    pub fn default_with_dir(site: SiteIdentity, work_dir: PathBuf) -> Self {
        Self {
            fetch: FetchSettings::default(),
            submit: SubmitSettings::default(),
            site,
            ledger_path: work_dir.join(LEDGER_FILENAME),
            staged_path: work_dir.join(STAGED_FILENAME),
        }
    }
}

/// Blocking front for the async HTTP stack. Every call runs to completion on the
/// handle's own single-threaded runtime.
pub struct EngineHandle {
    runtime: tokio::runtime::Runtime,
    crawler: SitemapCrawler,
    client: IndexNowClient,
    ledger: Ledger,
    staged_path: PathBuf,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| EngineError::new(FailureKind::ConfigInvalid, err.to_string()))?;
        let fetcher = ReqwestFetcher::new(&config.fetch)?;
        let crawler = SitemapCrawler::new(Box::new(fetcher), config.fetch.index_delay);
        let client = IndexNowClient::new(config.submit, config.site)?;

        Ok(Self {
            runtime,
            crawler,
            client,
            ledger: Ledger::new(config.ledger_path),
            staged_path: config.staged_path,
        })
    }

    pub fn fetch_sitemap(&self, url: &str) -> Vec<String> {
        self.runtime.block_on(self.crawler.crawl(url))
    }

    pub fn load_history(&self) -> Result<HashSet<String>, PersistError> {
        self.ledger.load()
    }

    pub fn stage_batch(&self, urls: &[String]) -> Result<PathBuf, PersistError> {
        write_url_list(&self.staged_path, urls)?;
        Ok(self.staged_path.clone())
    }

    pub fn submit(&self, urls: &[String]) -> Result<SubmitReport, EngineError> {
        self.runtime.block_on(self.client.submit(urls))
    }

    pub fn record_submitted(&self, urls: &[String]) -> Result<(), PersistError> {
        self.ledger.append(urls)
    }
}
