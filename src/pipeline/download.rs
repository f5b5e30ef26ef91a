// src/pipeline/download.rs

//! Batch download pipeline.
//!
//! The winners index is built once and must be complete before any contest
//! job starts; after that every contest runs as its own task. A job that
//! errors or panics is recorded as failed and never cancels its siblings.

use std::any::Any;
use std::collections::BTreeSet;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use chrono::Utc;
use futures::FutureExt;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::error::{AppError, Result};
use crate::models::{Config, ContestId, Outcome, ResourceUrls, RunSummary};
use crate::pipeline::progress::{Progress, ProgressReporter};
use crate::services::{ContestMaterializer, WinnersIndex};
use crate::utils::http::HttpClient;

/// Download every contest in `identifiers`.
///
/// Only a broken winners document aborts the run; per-contest problems end up
/// in the returned summary.
pub async fn run_download(
    config: &Config,
    client: Arc<dyn HttpClient>,
    identifiers: &BTreeSet<ContestId>,
    override_existing: bool,
    reporter: &dyn ProgressReporter,
) -> Result<RunSummary> {
    let summary = RunSummary::new(Utc::now());

    log::info!(
        "Downloading {} contests into {}",
        identifiers.len(),
        config.output.data_dir.display()
    );

    let winners_url = config.remote.winners_url();
    let winners = Arc::new(WinnersIndex::build(client.as_ref(), &winners_url).await?);

    let materializer =
        ContestMaterializer::new(client, config.output.data_dir.clone(), override_existing);
    let limit = config
        .download
        .max_concurrent
        .map(|n| Arc::new(Semaphore::new(n)));

    let mut jobs = JoinSet::new();
    for &id in identifiers {
        let urls = ResourceUrls::for_contest(&config.remote, id);
        let materializer = materializer.clone();
        let winners = Arc::clone(&winners);
        let limit = limit.clone();

        jobs.spawn(async move {
            let _permit = match limit {
                Some(semaphore) => semaphore.acquire_owned().await.ok(),
                None => None,
            };
            let result = AssertUnwindSafe(materializer.materialize(id, &urls, &winners))
                .catch_unwind()
                .await;
            (id, result)
        });
    }

    let mut tally = Tally::new(summary, reporter, identifiers);
    while let Some(joined) = jobs.join_next().await {
        match joined {
            Ok((id, Ok(Ok(outcome)))) => tally.finish(id, outcome),
            Ok((id, Ok(Err(e)))) => tally.abort(id, e),
            Ok((id, Err(panic))) => {
                tally.abort(id, format!("panicked: {}", panic_message(&*panic)))
            }
            // The id is lost with the task; it stays pending and is settled below.
            Err(e) => log::error!("Contest task could not be joined: {}", e),
        }
    }
    let mut summary = tally.settle_unjoined();

    summary.end_time = Utc::now();
    log::info!(
        "Finished {} contests in {}s: {} written, {} skipped, {} failed",
        summary.total(),
        (summary.end_time - summary.start_time).num_seconds(),
        summary.count(Outcome::Written),
        summary.count(Outcome::Skipped),
        summary.count(Outcome::Failed)
    );

    Ok(summary)
}

/// Records job results and keeps track of contests still owed an outcome.
struct Tally<'a> {
    summary: RunSummary,
    reporter: &'a dyn ProgressReporter,
    pending: BTreeSet<ContestId>,
    total: usize,
    completed: usize,
}

impl<'a> Tally<'a> {
    fn new(
        summary: RunSummary,
        reporter: &'a dyn ProgressReporter,
        identifiers: &BTreeSet<ContestId>,
    ) -> Self {
        Self {
            summary,
            reporter,
            pending: identifiers.clone(),
            total: identifiers.len(),
            completed: 0,
        }
    }

    fn finish(&mut self, id: ContestId, outcome: Outcome) {
        self.summary.record(id, outcome);
        self.advance(id, outcome);
    }

    fn abort(&mut self, id: ContestId, cause: impl std::fmt::Display) {
        let error = AppError::job(id, cause);
        log::error!("{}", error);
        self.summary.record_error(id, error.to_string());
        self.advance(id, Outcome::Failed);
    }

    /// Mark every contest that never reported back as failed.
    fn settle_unjoined(mut self) -> RunSummary {
        for id in std::mem::take(&mut self.pending) {
            self.abort(id, "task could not be joined");
        }
        self.summary
    }

    fn advance(&mut self, id: ContestId, outcome: Outcome) {
        self.pending.remove(&id);
        self.completed += 1;
        self.reporter.report(&Progress {
            completed: self.completed,
            total: self.total,
            contest: id,
            outcome,
        });
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
