//! Submitter core: configuration checks, URL diffing and the pure run state machine.
mod config;
mod diff;
mod effect;
mod msg;
mod state;
mod update;

pub use config::{
    ConfigError, ConfigField, SubmitterConfig, PLACEHOLDER_API_KEY, PLACEHOLDER_DOMAIN,
};
pub use diff::new_urls;
pub use effect::Effect;
pub use msg::{Msg, SubmissionResult};
pub use state::{Phase, RunState, RunStatus, RunSummary};
pub use update::update;
