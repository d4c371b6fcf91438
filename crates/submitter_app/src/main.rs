mod config;
mod logging;
mod runner;

use std::path::PathBuf;
use std::process::ExitCode;

use submitter_core::{RunStatus, RunSummary};
use submitter_engine::EngineHandle;
use submitter_logging::{submitter_error, submitter_info, SEPARATOR};

use crate::config::{ConfigFile, DEFAULT_CONFIG_FILENAME};
use crate::logging::LogDestination;
use crate::runner::EffectRunner;

fn main() -> ExitCode {
    let config_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILENAME));

    let (config, found) = match ConfigFile::load(&config_path) {
        Ok(loaded) => loaded,
        Err(err) => {
            logging::initialize(LogDestination::Terminal);
            submitter_error!("{:#}", err);
            return ExitCode::FAILURE;
        }
    };
    logging::initialize(LogDestination::Both(&config.log_file));

    submitter_info!("{}", SEPARATOR);
    submitter_info!("IndexNow Auto Submitter - Starting");
    submitter_info!("{}", SEPARATOR);
    if !found {
        submitter_info!(
            "No config file at {}, using defaults",
            config_path.display()
        );
    }

    if let Err(err) = config.submitter().validate() {
        submitter_error!("ERROR: {}", err);
        submitter_error!(
            "Please set {} in {} before running.",
            err.field(),
            config_path.display()
        );
        submitter_info!("{}", SEPARATOR);
        return ExitCode::FAILURE;
    }

    let engine = match EngineHandle::new(config.engine()) {
        Ok(engine) => engine,
        Err(err) => {
            submitter_error!("Could not start: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let summary = EffectRunner::new(engine).run(&config.sitemap_url);
    log_summary(&summary, &config);

    if summary.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn log_summary(summary: &RunSummary, config: &ConfigFile) {
    let status = match summary.status {
        RunStatus::Submitted if summary.history_updated => "SUCCESS",
        RunStatus::Submitted => "SUCCESS (history not updated)",
        RunStatus::NothingNew => "NOTHING NEW",
        RunStatus::NoUrlsInSitemap => "NO URLS IN SITEMAP",
        RunStatus::HistoryUnavailable => "FAILED (history unreadable)",
        RunStatus::SubmissionFailed => "FAILED",
        RunStatus::Pending => "INCOMPLETE",
    };

    submitter_info!("{}", SEPARATOR);
    submitter_info!("Submission Summary");
    submitter_info!("{}", SEPARATOR);
    submitter_info!("Total URLs in sitemap: {}", summary.total_in_sitemap);
    submitter_info!("Previously submitted: {}", summary.previously_submitted);
    submitter_info!("New URLs found: {}", summary.new_found);
    submitter_info!("Submitted this run: {}", summary.submitted);
    submitter_info!("Submission status: {}", status);
    if let Some(reason) = &summary.failure {
        submitter_info!("Failure: {}", reason);
    }
    submitter_info!("New URLs file: {}", config.staged_file.display());
    submitter_info!("History file: {}", config.ledger_file.display());
    submitter_info!("{}", SEPARATOR);
}
