use std::fmt;

/// Every failure the engine reports, tagged with its kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct EngineError {
    pub kind: FailureKind,
    pub message: String,
}

impl EngineError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    Timeout,
    Connection,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Parse,
    /// A sitemap index that leads back to one of its own ancestors.
    SitemapCycle,
    /// Non-success HTTP status from the sitemap host or the submission endpoint.
    Protocol(u16),
    /// Still rate limited after the last permitted attempt.
    RateLimited { attempts: u32 },
    EmptyBatch,
    ConfigInvalid,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Connection => write!(f, "connection error"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Parse => write!(f, "parse error"),
            FailureKind::SitemapCycle => write!(f, "sitemap cycle"),
            FailureKind::Protocol(code) => write!(f, "http status {code}"),
            FailureKind::RateLimited { attempts } => {
                write!(f, "rate limited after {attempts} attempts")
            }
            FailureKind::EmptyBatch => write!(f, "empty batch"),
            FailureKind::ConfigInvalid => write!(f, "invalid configuration"),
        }
    }
}
