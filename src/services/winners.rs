// src/services/winners.rs

//! Winners index.
//!
//! The winners document is a single JSON array covering every contest. Each
//! record names its contest only inside `data.cartoon.title` (e.g.
//! `"Contest #742 ..."`), so the index keys records by the number parsed out
//! of that title. Records whose title carries no number are kept in a
//! separate `unavailable` bucket instead of being dropped.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::ContestId;
use crate::utils::http::{self, HttpClient};

static CONTEST_TAG: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"#(\d+)").ok());

/// Extract the contest ID from a winner title (first `#<digits>` occurrence).
pub fn extract_contest_id(title: &str) -> Option<ContestId> {
    let caps = CONTEST_TAG.as_ref()?.captures(title)?;
    caps.get(1)?.as_str().parse().ok()
}

/// Read-only mapping from contest ID to its winner record.
#[derive(Debug, Clone, Default)]
pub struct WinnersIndex {
    by_contest: HashMap<ContestId, Value>,
    unavailable: Vec<Value>,
}

impl WinnersIndex {
    /// Fetch the winners document and index it.
    ///
    /// A failed fetch, including a body cut off mid-transfer, yields an empty
    /// index. A document that is not a JSON array, or a record without
    /// `data.cartoon.title`, is an error.
    pub async fn build(client: &dyn HttpClient, url: &str) -> Result<Self> {
        let body = match http::fetch(client, url).await {
            Some(response) => http::read_body(response, url).await,
            None => None,
        };
        let Some(body) = body else {
            log::warn!("Winners document unavailable; continuing without winner data");
            return Ok(Self::default());
        };

        // The server labels the document text/plain, so parse the bytes directly.
        let records: Vec<Value> = serde_json::from_slice(&body)?;
        let index = Self::from_records(records)?;

        log::info!(
            "Indexed winners for {} contests ({} without a contest number)",
            index.len(),
            index.unavailable.len()
        );
        Ok(index)
    }

    /// Index already-parsed winner records. Later records win on duplicate IDs.
    pub fn from_records(records: Vec<Value>) -> Result<Self> {
        let mut index = Self::default();

        for record in records {
            let title = record
                .pointer("/data/cartoon/title")
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    AppError::winner_record(format!("missing data.cartoon.title in {record}"))
                })?;

            match extract_contest_id(title) {
                Some(id) => {
                    index.by_contest.insert(id, record);
                }
                None => {
                    log::warn!("No contest number in winner title, filing as unavailable: {record}");
                    index.unavailable.push(record);
                }
            }
        }

        Ok(index)
    }

    /// Winner record for a contest, if any.
    pub fn get(&self, id: ContestId) -> Option<&Value> {
        self.by_contest.get(&id)
    }

    /// Records whose contest could not be determined.
    pub fn unavailable(&self) -> &[Value] {
        &self.unavailable
    }

    /// Number of contests with a winner record.
    ///
    /// Records in [`unavailable`](Self::unavailable) are not counted here or
    /// in [`is_empty`](Self::is_empty).
    pub fn len(&self) -> usize {
        self.by_contest.len()
    }

    /// True when no contest has a winner record.
    pub fn is_empty(&self) -> bool {
        self.by_contest.is_empty()
    }
}
