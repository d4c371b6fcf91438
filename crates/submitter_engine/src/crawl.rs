use std::time::Duration;

use futures_util::future::{FutureExt, LocalBoxFuture};
use submitter_logging::{submitter_error, submitter_info, submitter_warn};

use crate::sitemap::{parse_sitemap, SitemapDocument};
use crate::{EngineError, FailureKind, Fetcher};

/// Walks a sitemap and every sitemap index below it, depth first.
pub struct SitemapCrawler {
    fetcher: Box<dyn Fetcher>,
    index_delay: Duration,
}

impl SitemapCrawler {
    pub fn new(fetcher: Box<dyn Fetcher>, index_delay: Duration) -> Self {
        Self {
            fetcher,
            index_delay,
        }
    }

    /// All page URLs reachable from `url`, in document order. Failures are logged and
    /// produce an empty list.
    pub async fn crawl(&self, url: &str) -> Vec<String> {
        let mut chain = Vec::new();
        match self.crawl_from(url, &mut chain).await {
            Ok(urls) => {
                if urls.is_empty() {
                    submitter_info!("No URLs found in sitemap.");
                } else {
                    submitter_info!("Found {} URLs in sitemap.", urls.len());
                }
                urls
            }
            Err(err) => {
                submitter_error!("Failed to read sitemap {}: {}", url, err);
                Vec::new()
            }
        }
    }

    /// `chain` holds the index URLs from the root down to the document being fetched.
    fn crawl_from<'a>(
        &'a self,
        url: &'a str,
        chain: &'a mut Vec<String>,
    ) -> LocalBoxFuture<'a, Result<Vec<String>, EngineError>> {
        async move {
            if chain.iter().any(|seen| seen == url) {
                return Err(EngineError::new(
                    FailureKind::SitemapCycle,
                    format!("{url} is referenced by its own index chain"),
                ));
            }

            submitter_info!("Fetching sitemap from {}", url);
            let body = self.fetcher.fetch(url).await?;
            let xml = String::from_utf8(body).map_err(|err| {
                EngineError::new(FailureKind::Parse, format!("sitemap is not UTF-8: {err}"))
            })?;

            match parse_sitemap(&xml)? {
                SitemapDocument::UrlSet(urls) => Ok(urls),
                SitemapDocument::Empty => Ok(Vec::new()),
                SitemapDocument::Index(children) => {
                    chain.push(url.to_string());
                    let mut urls = Vec::new();
                    for (position, child) in children.iter().enumerate() {
                        if position > 0 && !self.index_delay.is_zero() {
                            tokio::time::sleep(self.index_delay).await;
                        }
                        submitter_info!("Found sub-sitemap: {}", child);
                        match self.crawl_from(child, chain).await {
                            Ok(found) => {
                                submitter_info!("Found {} URLs in {}", found.len(), child);
                                urls.extend(found);
                            }
                            Err(err) => {
                                submitter_warn!("Skipping sub-sitemap {}: {}", child, err);
                            }
                        }
                    }
                    chain.pop();
                    Ok(urls)
                }
            }
        }
        .boxed_local()
    }
}
