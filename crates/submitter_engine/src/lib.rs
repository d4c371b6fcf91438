//! Submitter engine: sitemap crawling, submission history and the IndexNow client.
mod crawl;
mod engine;
mod fetch;
mod ledger;
mod persist;
mod sitemap;
mod submit;
mod types;

pub use crawl::SitemapCrawler;
pub use engine::{EngineConfig, EngineHandle, LEDGER_FILENAME, STAGED_FILENAME};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use ledger::Ledger;
pub use persist::{ensure_output_dir, write_url_list, PersistError};
pub use sitemap::{parse_sitemap, SitemapDocument, SITEMAP_NAMESPACE};
pub use submit::{
    IndexNowClient, SiteIdentity, SubmitReport, SubmitSettings, DEFAULT_ENDPOINT,
    MAX_URLS_PER_REQUEST,
};
pub use types::{EngineError, FailureKind};
