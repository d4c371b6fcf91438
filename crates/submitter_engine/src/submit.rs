use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use submitter_logging::{submitter_error, submitter_info, submitter_warn};

use crate::fetch::map_reqwest_error;
use crate::{EngineError, FailureKind};

pub const DEFAULT_ENDPOINT: &str = "https://api.indexnow.org/indexnow";

/// Upper bound the bulk endpoint accepts in one request.
pub const MAX_URLS_PER_REQUEST: usize = 10_000;

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

#[derive(Debug, Clone)]
pub struct SubmitSettings {
    pub endpoint: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub rate_limit_cooldown: Duration,
    /// Total POSTs allowed for one batch, counting the first.
    pub max_attempts: u32,
}

impl Default for SubmitSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
            rate_limit_cooldown: Duration::from_secs(5 * 60),
            max_attempts: 5,
        }
    }
}

/// Who is submitting: the host, its key and where the key file is published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteIdentity {
    pub host: String,
    pub key: String,
    pub key_location: String,
}

impl SiteIdentity {
    pub fn new(site_url: &str, api_key: &str) -> Self {
        let site = site_url.trim().trim_end_matches('/');
        let host = site
            .strip_prefix("https://")
            .or_else(|| site.strip_prefix("http://"))
            .unwrap_or(site);
        Self {
            host: host.to_string(),
            key: api_key.trim().to_string(),
            key_location: format!("{site}/{}.txt", api_key.trim()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmissionPayload<'a> {
    host: &'a str,
    key: &'a str,
    key_location: &'a str,
    url_list: &'a [String],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReport {
    /// Exactly the URLs that were sent.
    pub submitted: Vec<String>,
    pub status: u16,
    pub attempts: u32,
}

pub struct IndexNowClient {
    client: reqwest::Client,
    settings: SubmitSettings,
    site: SiteIdentity,
}

impl IndexNowClient {
    pub fn new(settings: SubmitSettings, site: SiteIdentity) -> Result<Self, EngineError> {
        reqwest::Url::parse(&settings.endpoint).map_err(|err| {
            EngineError::new(
                FailureKind::ConfigInvalid,
                format!("endpoint {}: {err}", settings.endpoint),
            )
        })?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| EngineError::new(FailureKind::ConfigInvalid, err.to_string()))?;
        Ok(Self {
            client,
            settings,
            site,
        })
    }

    /// Send up to [`MAX_URLS_PER_REQUEST`] URLs in one request, waiting out rate limits.
    pub async fn submit(&self, urls: &[String]) -> Result<SubmitReport, EngineError> {
        if urls.is_empty() {
            submitter_error!("No URLs to submit");
            return Err(EngineError::new(FailureKind::EmptyBatch, "no URLs to submit"));
        }

        let batch = if urls.len() > MAX_URLS_PER_REQUEST {
            submitter_warn!(
                "WARNING: You have {} URLs. IndexNow allows max {} per request.",
                urls.len(),
                MAX_URLS_PER_REQUEST
            );
            submitter_warn!("Submitting first {} URLs only.", MAX_URLS_PER_REQUEST);
            &urls[..MAX_URLS_PER_REQUEST]
        } else {
            urls
        };

        let payload = SubmissionPayload {
            host: &self.site.host,
            key: &self.site.key,
            key_location: &self.site.key_location,
            url_list: batch,
        };
        let body = serde_json::to_vec(&payload)
            .map_err(|err| EngineError::new(FailureKind::Parse, err.to_string()))?;

        let max_attempts = self.settings.max_attempts.max(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            submitter_info!(
                "Submitting {} URLs to IndexNow (attempt {}/{}, {} bytes)...",
                batch.len(),
                attempt,
                max_attempts,
                body.len()
            );

            let response = match self
                .client
                .post(&self.settings.endpoint)
                .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
                .body(body.clone())
                .send()
                .await
            {
                Ok(response) => response,
                Err(err) => {
                    let err = map_reqwest_error(err);
                    if err.kind == FailureKind::Timeout {
                        submitter_error!(
                            "Request timed out. Try reducing the number of URLs or check your connection."
                        );
                    } else {
                        submitter_error!("Submission request failed: {}", err);
                    }
                    return Err(err);
                }
            };

            let status = response.status().as_u16();
            match status {
                200 | 202 => {
                    submitter_info!(
                        "SUCCESS: {} URLs submitted successfully (HTTP {})",
                        batch.len(),
                        status
                    );
                    return Ok(SubmitReport {
                        submitted: batch.to_vec(),
                        status,
                        attempts: attempt,
                    });
                }
                429 => {
                    submitter_warn!("ERROR 429: Too Many Requests - Rate limited");
                    if attempt >= max_attempts {
                        submitter_error!("Giving up after {} rate-limited attempts", attempt);
                        return Err(EngineError::new(
                            FailureKind::RateLimited { attempts: attempt },
                            "endpoint kept answering 429",
                        ));
                    }
                    submitter_info!(
                        "Waiting {:?} before retry...",
                        self.settings.rate_limit_cooldown
                    );
                    tokio::time::sleep(self.settings.rate_limit_cooldown).await;
                }
                _ => {
                    let text = response.text().await.unwrap_or_default();
                    self.log_rejection(status, &text);
                    return Err(EngineError::new(FailureKind::Protocol(status), text));
                }
            }
        }
    }

    fn log_rejection(&self, status: u16, body: &str) {
        match status {
            400 => {
                submitter_error!("ERROR 400: Bad Request - Invalid payload format");
                submitter_error!("Response: {}", body);
            }
            403 => {
                submitter_error!("ERROR 403: Forbidden - Invalid or missing key file");
                submitter_error!(
                    "Make sure {} exists and contains: {}",
                    self.site.key_location,
                    self.site.key
                );
            }
            422 => {
                submitter_error!(
                    "ERROR 422: Unprocessable Entity - URLs don't match host or key mismatch"
                );
                submitter_error!("Response: {}", body);
            }
            _ => submitter_error!("Unexpected error HTTP {}: {}", status, body),
        }
    }
}
