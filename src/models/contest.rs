// src/models/contest.rs

//! Contest identifiers, resource URLs, and job outcomes.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::models::RemoteConfig;

/// Numeric identifier naming one contest.
pub type ContestId = u32;

/// Remote resources fetched for a single contest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceUrls {
    /// Cartoon image URL
    pub image: String,

    /// Caption summary CSV URL
    pub captions: String,
}

impl ResourceUrls {
    /// Build the URL pair for a contest from the remote layout.
    pub fn for_contest(remote: &RemoteConfig, id: ContestId) -> Self {
        Self {
            image: remote.cartoon_url(id),
            captions: remote.summary_url(id),
        }
    }
}

/// Terminal status of one contest job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// All three files were written
    Written,
    /// The directory already existed and override was off
    Skipped,
    /// A fetch failed or the job aborted
    Failed,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Outcome::Written => "written",
            Outcome::Skipped => "skipped",
            Outcome::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Aggregated result of a batch run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,

    /// Outcome per contest
    pub outcomes: BTreeMap<ContestId, Outcome>,

    /// Error messages for jobs that aborted unexpectedly
    pub errors: BTreeMap<ContestId, String>,
}

impl RunSummary {
    pub fn new(start_time: DateTime<Utc>) -> Self {
        Self {
            start_time,
            end_time: start_time,
            outcomes: BTreeMap::new(),
            errors: BTreeMap::new(),
        }
    }

    /// Record a job outcome.
    pub fn record(&mut self, id: ContestId, outcome: Outcome) {
        self.outcomes.insert(id, outcome);
    }

    /// Record a job that aborted with an error; counted as failed.
    pub fn record_error(&mut self, id: ContestId, message: impl Into<String>) {
        self.outcomes.insert(id, Outcome::Failed);
        self.errors.insert(id, message.into());
    }

    /// Number of contests with the given outcome.
    pub fn count(&self, outcome: Outcome) -> usize {
        self.outcomes.values().filter(|o| **o == outcome).count()
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn outcome(&self, id: ContestId) -> Option<Outcome> {
        self.outcomes.get(&id).copied()
    }

    /// Write the summary as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
