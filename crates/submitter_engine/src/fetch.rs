use std::time::Duration;

use futures_util::StreamExt;
use reqwest::StatusCode;

use crate::{EngineError, FailureKind};

const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    pub user_agent: String,
    /// Pause between consecutive sub-sitemap fetches of one index.
    pub index_delay: Duration,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            // Uncompressed size limit from the sitemap protocol.
            max_bytes: 50 * 1024 * 1024,
            user_agent: BROWSER_USER_AGENT.to_string(),
            index_delay: Duration::from_secs(1),
        }
    }
}

#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    /// The response body of a successful GET.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, EngineError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
    max_bytes: u64,
}

impl ReqwestFetcher {
    pub fn new(settings: &FetchSettings) -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(|err| EngineError::new(FailureKind::ConfigInvalid, err.to_string()))?;
        Ok(Self {
            client,
            max_bytes: settings.max_bytes,
        })
    }

    fn too_large(&self, actual: u64) -> EngineError {
        EngineError::new(
            FailureKind::TooLarge {
                max_bytes: self.max_bytes,
                actual: Some(actual),
            },
            "response too large",
        )
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, EngineError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|err| EngineError::new(FailureKind::InvalidUrl, err.to_string()))?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        // Only a plain 200 carries a sitemap; 204 and friends are treated as failures.
        let status = response.status();
        if status != StatusCode::OK {
            return Err(EngineError::new(
                FailureKind::Protocol(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.max_bytes {
                return Err(self.too_large(content_len));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.max_bytes {
                return Err(self.too_large(next_len));
            }
            bytes.extend_from_slice(&chunk);
        }

        Ok(bytes)
    }
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> EngineError {
    if err.is_timeout() {
        return EngineError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_redirect() {
        return EngineError::new(FailureKind::RedirectLimitExceeded, err.to_string());
    }
    EngineError::new(FailureKind::Connection, err.to_string())
}
