#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    FetchingSitemap,
    LoadingHistory,
    Submitting,
    RecordingHistory,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunStatus {
    #[default]
    Pending,
    NoUrlsInSitemap,
    HistoryUnavailable,
    NothingNew,
    SubmissionFailed,
    Submitted,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub total_in_sitemap: usize,
    pub previously_submitted: usize,
    pub new_found: usize,
    pub submitted: usize,
    pub history_updated: bool,
    pub status: RunStatus,
    pub failure: Option<String>,
}

impl RunSummary {
    /// A run that found nothing to do still counts as successful.
    pub fn is_success(&self) -> bool {
        matches!(
            self.status,
            RunStatus::NoUrlsInSitemap | RunStatus::NothingNew | RunStatus::Submitted
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunState {
    sitemap_url: String,
    phase: Phase,
    sitemap_urls: Vec<String>,
    summary: RunSummary,
}

impl RunState {
    pub fn new(sitemap_url: impl Into<String>) -> Self {
        Self {
            sitemap_url: sitemap_url.into(),
            phase: Phase::Idle,
            sitemap_urls: Vec::new(),
            summary: RunSummary::default(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    pub(crate) fn sitemap_url(&self) -> &str {
        &self.sitemap_url
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub(crate) fn summary_mut(&mut self) -> &mut RunSummary {
        &mut self.summary
    }

    pub(crate) fn store_sitemap_urls(&mut self, urls: Vec<String>) {
        self.summary.total_in_sitemap = urls.len();
        self.sitemap_urls = urls;
    }

    pub(crate) fn take_sitemap_urls(&mut self) -> Vec<String> {
        std::mem::take(&mut self.sitemap_urls)
    }

    /// Moves to `Finished` and returns the final summary.
    pub(crate) fn finish(&mut self, status: RunStatus) -> RunSummary {
        self.phase = Phase::Finished;
        self.summary.status = status;
        self.summary.clone()
    }
}
