use std::fmt;

use url::Url;

/// API key value shipped in the default configuration.
pub const PLACEHOLDER_API_KEY: &str = "your-api-key-here";
/// Domain used by the default site and sitemap URLs.
pub const PLACEHOLDER_DOMAIN: &str = "yourdomain.com";

/// The three values a run cannot start without.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitterConfig {
    pub api_key: String,
    pub site_url: String,
    pub sitemap_url: String,
}

impl Default for SubmitterConfig {
    fn default() -> Self {
        Self {
            api_key: PLACEHOLDER_API_KEY.to_string(),
            site_url: format!("https://{PLACEHOLDER_DOMAIN}"),
            sitemap_url: format!("https://{PLACEHOLDER_DOMAIN}/sitemap.xml"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigField {
    ApiKey,
    SiteUrl,
    SitemapUrl,
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigField::ApiKey => write!(f, "api_key"),
            ConfigField::SiteUrl => write!(f, "site_url"),
            ConfigField::SitemapUrl => write!(f, "sitemap_url"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Still empty or carrying the shipped placeholder.
    Unset(ConfigField),
    /// Present but not usable.
    Invalid { field: ConfigField, reason: String },
}

impl ConfigError {
    pub fn field(&self) -> ConfigField {
        match self {
            ConfigError::Unset(field) | ConfigError::Invalid { field, .. } => *field,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Unset(field) => write!(f, "{field} has not been configured"),
            ConfigError::Invalid { field, reason } => write!(f, "{field} is invalid: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl SubmitterConfig {
    /// Checks fields in declaration order and reports the first one that blocks a run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let api_key = self.api_key.trim();
        if api_key.is_empty() || api_key == PLACEHOLDER_API_KEY {
            return Err(ConfigError::Unset(ConfigField::ApiKey));
        }
        if api_key.chars().any(|c| c.is_whitespace() || c == '/') {
            return Err(ConfigError::Invalid {
                field: ConfigField::ApiKey,
                reason: "must not contain whitespace or '/'".to_string(),
            });
        }
        check_url(ConfigField::SiteUrl, &self.site_url)?;
        check_url(ConfigField::SitemapUrl, &self.sitemap_url)?;
        Ok(())
    }
}

fn check_url(field: ConfigField, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() || value.contains(PLACEHOLDER_DOMAIN) {
        return Err(ConfigError::Unset(field));
    }
    let parsed = Url::parse(value).map_err(|err| ConfigError::Invalid {
        field,
        reason: err.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::Invalid {
            field,
            reason: format!("unsupported scheme {other}"),
        }),
    }
}
