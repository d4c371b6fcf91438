use std::collections::VecDeque;

use submitter_core::{update, Effect, Msg, RunState, RunSummary, SubmissionResult};
use submitter_engine::EngineHandle;
use submitter_logging::{submitter_error, submitter_info, submitter_warn};

/// Drives one run: feeds messages to the core state machine and carries out the
/// effects it asks for against the engine, strictly one at a time.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn run(&self, sitemap_url: &str) -> RunSummary {
        let mut state = RunState::new(sitemap_url);
        let mut inbox = VecDeque::from([Msg::Start]);

        while let Some(msg) = inbox.pop_front() {
            let (next, effects) = update(state, msg);
            state = next;
            for effect in effects {
                if let Effect::Finish(summary) = effect {
                    return summary;
                }
                if let Some(reply) = self.execute(effect) {
                    inbox.push_back(reply);
                }
            }
        }

        state.summary().clone()
    }

    fn execute(&self, effect: Effect) -> Option<Msg> {
        match effect {
            Effect::FetchSitemap { url } => {
                submitter_info!("Step 1: Fetching URLs from sitemap...");
                let urls = self.engine.fetch_sitemap(&url);
                if urls.is_empty() {
                    submitter_info!("No URLs found in sitemap. Exiting.");
                } else {
                    submitter_info!("Total URLs in sitemap: {}", urls.len());
                }
                Some(Msg::SitemapFetched(urls))
            }
            Effect::LoadHistory => {
                submitter_info!("Step 2: Loading submission history...");
                match self.engine.load_history() {
                    Ok(submitted) => Some(Msg::HistoryLoaded(submitted)),
                    Err(err) => {
                        submitter_error!("Error loading submitted URLs: {}", err);
                        Some(Msg::HistoryUnavailable(err.to_string()))
                    }
                }
            }
            Effect::StageBatch { urls } => {
                submitter_info!("Step 3: Found {} NEW URLs to submit", urls.len());
                match self.engine.stage_batch(&urls) {
                    Ok(path) => submitter_info!("Saved {} URLs to {}", urls.len(), path.display()),
                    Err(err) => submitter_warn!("Could not save staged URLs: {}", err),
                }
                None
            }
            Effect::Submit { urls } => {
                submitter_info!("Step 4: Submitting new URLs to IndexNow...");
                let result = match self.engine.submit(&urls) {
                    Ok(report) => SubmissionResult::Accepted {
                        submitted: report.submitted,
                    },
                    Err(err) => SubmissionResult::Rejected {
                        reason: err.to_string(),
                    },
                };
                if matches!(result, SubmissionResult::Rejected { .. }) {
                    submitter_info!("Submission failed. URLs not added to history.");
                    submitter_info!("You can retry by running the submitter again.");
                }
                Some(Msg::SubmissionFinished(result))
            }
            Effect::RecordSubmitted { urls } => {
                submitter_info!("Step 5: Updating submission history...");
                let result = self.engine.record_submitted(&urls).map_err(|err| {
                    submitter_error!("Error saving submitted URLs: {}", err);
                    err.to_string()
                });
                Some(Msg::HistoryRecorded(result))
            }
            Effect::Finish(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use submitter_core::RunStatus;
    use submitter_engine::{EngineConfig, SiteIdentity};
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    const SITE: &str = "https://blog.example.org";

    /// The mock server lives on its own runtime; the engine brings another.
    struct Harness {
        server: MockServer,
        runtime: tokio::runtime::Runtime,
        temp: TempDir,
    }

    impl Harness {
        fn new() -> Self {
            submitter_logging::initialize_for_tests();
            let runtime = tokio::runtime::Runtime::new().unwrap();
            let server = runtime.block_on(MockServer::start());
            Self {
                server,
                runtime,
                temp: TempDir::new().unwrap(),
            }
        }

        fn serve_sitemap(&self, locs: &[&str]) {
            let entries: String = locs
                .iter()
                .map(|loc| format!("<url><loc>{loc}</loc></url>"))
                .collect();
            let body = format!(
                r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{entries}</urlset>"#
            );
            self.runtime.block_on(
                Mock::given(method("GET"))
                    .and(path("/sitemap.xml"))
                    .respond_with(ResponseTemplate::new(200).set_body_string(body))
                    .mount(&self.server),
            );
        }

        fn endpoint_answers(&self, status: u16, expected_calls: u64) {
            self.runtime.block_on(
                Mock::given(method("POST"))
                    .and(path("/indexnow"))
                    .respond_with(ResponseTemplate::new(status))
                    .expect(expected_calls)
                    .mount(&self.server),
            );
        }

        fn ledger_path(&self) -> std::path::PathBuf {
            self.temp.path().join("submitted_urls.txt")
        }

        fn run(&self) -> RunSummary {
            self.run_with(|_| {})
        }

        fn run_with(&self, adjust: impl FnOnce(&mut EngineConfig)) -> RunSummary {
            let mut config = EngineConfig::default_with_dir(
                SiteIdentity::new(SITE, "0123456789abcdef"),
                self.temp.path().to_path_buf(),
            );
            config.submit.endpoint = format!("{}/indexnow", self.server.uri());
            config.submit.rate_limit_cooldown = Duration::from_millis(10);
            config.fetch.index_delay = Duration::ZERO;
            adjust(&mut config);

            let runner = EffectRunner::new(EngineHandle::new(config).unwrap());
            runner.run(&format!("{}/sitemap.xml", self.server.uri()))
        }

        fn verify(&self) {
            self.runtime.block_on(self.server.verify());
        }
    }

    fn read_lines(path: &Path) -> Vec<String> {
        fs::read_to_string(path)
            .unwrap_or_default()
            .lines()
            .map(ToOwned::to_owned)
            .collect()
    }

    #[test]
    fn first_run_submits_everything_and_records_it() {
        let harness = Harness::new();
        harness.serve_sitemap(&["https://blog.example.org/a", "https://blog.example.org/b"]);
        harness.endpoint_answers(200, 1);

        let summary = harness.run();

        assert_eq!(summary.status, RunStatus::Submitted);
        assert_eq!(summary.total_in_sitemap, 2);
        assert_eq!(summary.new_found, 2);
        assert_eq!(summary.submitted, 2);
        assert!(summary.history_updated);
        assert_eq!(
            read_lines(&harness.ledger_path()),
            vec!["https://blog.example.org/a", "https://blog.example.org/b"]
        );
        assert_eq!(
            read_lines(&harness.temp.path().join("urls_to_submit.txt")),
            vec!["https://blog.example.org/a", "https://blog.example.org/b"]
        );
        harness.verify();
    }

    #[test]
    fn second_run_only_submits_new_urls() {
        let harness = Harness::new();
        fs::write(harness.ledger_path(), "https://blog.example.org/a\n").unwrap();
        harness.serve_sitemap(&["https://blog.example.org/a", "https://blog.example.org/c"]);
        harness.endpoint_answers(202, 1);

        let summary = harness.run();

        assert_eq!(summary.status, RunStatus::Submitted);
        assert_eq!(summary.previously_submitted, 1);
        assert_eq!(summary.submitted, 1);
        assert_eq!(
            read_lines(&harness.ledger_path()),
            vec!["https://blog.example.org/a", "https://blog.example.org/c"]
        );
        harness.verify();
    }

    #[test]
    fn nothing_new_makes_no_submission() {
        let harness = Harness::new();
        fs::write(harness.ledger_path(), "https://blog.example.org/a\n").unwrap();
        harness.serve_sitemap(&["https://blog.example.org/a"]);
        harness.endpoint_answers(200, 0);

        let summary = harness.run();

        assert_eq!(summary.status, RunStatus::NothingNew);
        assert_eq!(summary.new_found, 0);
        assert!(summary.is_success());
        harness.verify();
    }

    #[test]
    fn forbidden_leaves_history_untouched() {
        let harness = Harness::new();
        harness.serve_sitemap(&["https://blog.example.org/a"]);
        harness.endpoint_answers(403, 1);

        let summary = harness.run();

        assert_eq!(summary.status, RunStatus::SubmissionFailed);
        assert!(!summary.is_success());
        assert!(read_lines(&harness.ledger_path()).is_empty());
        harness.verify();
    }

    #[test]
    fn unreachable_sitemap_ends_the_run_early() {
        let harness = Harness::new();
        harness.runtime.block_on(
            Mock::given(method("GET"))
                .respond_with(ResponseTemplate::new(404))
                .mount(&harness.server),
        );
        harness.endpoint_answers(200, 0);

        let summary = harness.run();

        assert_eq!(summary.status, RunStatus::NoUrlsInSitemap);
        assert!(!harness.ledger_path().exists());
        harness.verify();
    }

    #[test]
    fn unwritable_staged_file_does_not_stop_the_run() {
        let harness = Harness::new();
        let blocker = harness.temp.path().join("not_a_dir");
        fs::write(&blocker, "file").unwrap();
        harness.serve_sitemap(&["https://blog.example.org/a"]);
        harness.endpoint_answers(200, 1);

        let summary = harness.run_with(|config| {
            config.staged_path = blocker.join("urls_to_submit.txt");
        });

        assert_eq!(summary.status, RunStatus::Submitted);
        assert_eq!(summary.submitted, 1);
        assert!(summary.history_updated);
        assert_eq!(
            read_lines(&harness.ledger_path()),
            vec!["https://blog.example.org/a"]
        );
        harness.verify();
    }
}
