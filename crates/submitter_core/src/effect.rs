use crate::RunSummary;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchSitemap { url: String },
    LoadHistory,
    /// Write the pending batch to the staging file.
    StageBatch { urls: Vec<String> },
    Submit { urls: Vec<String> },
    RecordSubmitted { urls: Vec<String> },
    Finish(RunSummary),
}
