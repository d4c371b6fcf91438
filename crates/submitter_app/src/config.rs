//! Run configuration read from a RON file.
//!
//! Every field is optional. A missing file yields the shipped placeholders, which
//! then fail validation and stop the run before any network traffic.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use submitter_core::SubmitterConfig;
use submitter_engine::{
    EngineConfig, FetchSettings, SiteIdentity, SubmitSettings, DEFAULT_ENDPOINT,
    LEDGER_FILENAME, STAGED_FILENAME,
};

pub const DEFAULT_CONFIG_FILENAME: &str = "indexnow.ron";
pub const DEFAULT_LOG_FILENAME: &str = "indexnow_log.txt";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub api_key: String,
    pub site_url: String,
    pub sitemap_url: String,
    pub endpoint: String,
    pub ledger_file: PathBuf,
    pub staged_file: PathBuf,
    pub log_file: PathBuf,
    pub fetch_timeout_secs: u64,
    pub submit_timeout_secs: u64,
    pub rate_limit_cooldown_secs: u64,
    pub max_submit_attempts: u32,
    pub sub_sitemap_delay_ms: u64,
}

impl Default for ConfigFile {
    fn default() -> Self {
        let core = SubmitterConfig::default();
        let fetch = FetchSettings::default();
        let submit = SubmitSettings::default();
        Self {
            api_key: core.api_key,
            site_url: core.site_url,
            sitemap_url: core.sitemap_url,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            ledger_file: PathBuf::from(LEDGER_FILENAME),
            staged_file: PathBuf::from(STAGED_FILENAME),
            log_file: PathBuf::from(DEFAULT_LOG_FILENAME),
            fetch_timeout_secs: fetch.request_timeout.as_secs(),
            submit_timeout_secs: submit.request_timeout.as_secs(),
            rate_limit_cooldown_secs: submit.rate_limit_cooldown.as_secs(),
            max_submit_attempts: submit.max_attempts,
            sub_sitemap_delay_ms: fetch.index_delay.as_millis() as u64,
        }
    }
}

impl ConfigFile {
    /// Reads `path`, falling back to defaults when it does not exist.
    pub fn load(path: &Path) -> anyhow::Result<(Self, bool)> {
        if !path.exists() {
            return Ok((Self::default(), false));
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config = ron::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok((config, true))
    }

    pub fn submitter(&self) -> SubmitterConfig {
        SubmitterConfig {
            api_key: self.api_key.clone(),
            site_url: self.site_url.clone(),
            sitemap_url: self.sitemap_url.clone(),
        }
    }

    pub fn engine(&self) -> EngineConfig {
        EngineConfig {
            fetch: FetchSettings {
                request_timeout: Duration::from_secs(self.fetch_timeout_secs),
                index_delay: Duration::from_millis(self.sub_sitemap_delay_ms),
                ..FetchSettings::default()
            },
            submit: SubmitSettings {
                endpoint: self.endpoint.clone(),
                request_timeout: Duration::from_secs(self.submit_timeout_secs),
                rate_limit_cooldown: Duration::from_secs(self.rate_limit_cooldown_secs),
                max_attempts: self.max_submit_attempts,
                ..SubmitSettings::default()
            },
            site: SiteIdentity::new(&self.site_url, &self.api_key),
            ledger_path: self.ledger_file.clone(),
            staged_path: self.staged_file.clone(),
        }
    }
}
