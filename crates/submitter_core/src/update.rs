use crate::{new_urls, Effect, Msg, Phase, RunState, RunStatus, SubmissionResult};

/// Pure update function: applies a message to state and returns any effects.
///
/// Messages that do not belong to the current phase are dropped without effects.
pub fn update(mut state: RunState, msg: Msg) -> (RunState, Vec<Effect>) {
    let effects = match (state.phase(), msg) {
        (Phase::Idle, Msg::Start) => {
            state.set_phase(Phase::FetchingSitemap);
            vec![Effect::FetchSitemap {
                url: state.sitemap_url().to_string(),
            }]
        }
        (Phase::FetchingSitemap, Msg::SitemapFetched(urls)) => {
            if urls.is_empty() {
                vec![Effect::Finish(state.finish(RunStatus::NoUrlsInSitemap))]
            } else {
                state.store_sitemap_urls(urls);
                state.set_phase(Phase::LoadingHistory);
                vec![Effect::LoadHistory]
            }
        }
        (Phase::LoadingHistory, Msg::HistoryLoaded(submitted)) => {
            let all_urls = state.take_sitemap_urls();
            let fresh = new_urls(&all_urls, &submitted);
            let summary = state.summary_mut();
            summary.previously_submitted = submitted.len();
            summary.new_found = fresh.len();

            if fresh.is_empty() {
                vec![Effect::Finish(state.finish(RunStatus::NothingNew))]
            } else {
                state.set_phase(Phase::Submitting);
                vec![
                    Effect::StageBatch {
                        urls: fresh.clone(),
                    },
                    Effect::Submit { urls: fresh },
                ]
            }
        }
        (Phase::LoadingHistory, Msg::HistoryUnavailable(reason)) => {
            state.take_sitemap_urls();
            state.summary_mut().failure = Some(reason);
            vec![Effect::Finish(state.finish(RunStatus::HistoryUnavailable))]
        }
        (Phase::Submitting, Msg::SubmissionFinished(result)) => match result {
            SubmissionResult::Accepted { submitted } => {
                state.summary_mut().submitted = submitted.len();
                state.set_phase(Phase::RecordingHistory);
                vec![Effect::RecordSubmitted { urls: submitted }]
            }
            SubmissionResult::Rejected { reason } => {
                state.summary_mut().failure = Some(reason);
                vec![Effect::Finish(state.finish(RunStatus::SubmissionFailed))]
            }
        },
        (Phase::RecordingHistory, Msg::HistoryRecorded(result)) => {
            let summary = state.summary_mut();
            match result {
                Ok(()) => summary.history_updated = true,
                // Accepted URLs missing from the history are resent next run.
                Err(reason) => summary.failure = Some(reason),
            }
            vec![Effect::Finish(state.finish(RunStatus::Submitted))]
        }
        _ => Vec::new(),
    };

    (state, effects)
}
