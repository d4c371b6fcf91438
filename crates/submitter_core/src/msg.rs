use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Begin a run.
    Start,
    /// Flattened sitemap contents; empty when the sitemap could not be read.
    SitemapFetched(Vec<String>),
    /// Submission history read from disk.
    HistoryLoaded(HashSet<String>),
    /// Submission history exists but could not be read.
    HistoryUnavailable(String),
    /// The bulk endpoint answered (or failed to).
    SubmissionFinished(SubmissionResult),
    /// Result of appending the submitted batch to the history.
    HistoryRecorded(Result<(), String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionResult {
    /// `submitted` is what was actually sent, which may be shorter than the batch.
    Accepted { submitted: Vec<String> },
    Rejected { reason: String },
}
