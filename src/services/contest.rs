// src/services/contest.rs

//! Per-contest download job.
//!
//! Each job owns `<data_dir>/<id>/` exclusively, so jobs for different
//! contests never touch the same files.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;

use crate::error::Result;
use crate::models::{ContestId, Outcome, ResourceUrls};
use crate::services::WinnersIndex;
use crate::utils::http::{self, HttpClient};

pub const CARTOON_FILE: &str = "cartoon.jpg";
pub const CAPTIONS_FILE: &str = "captions.csv";
pub const WINNERS_FILE: &str = "winners.json";

/// Fetches and persists everything belonging to one contest.
#[derive(Clone)]
pub struct ContestMaterializer {
    client: Arc<dyn HttpClient>,
    data_dir: PathBuf,
    override_existing: bool,
}

impl ContestMaterializer {
    /// Create a materializer writing under `data_dir`.
    ///
    /// With `override_existing`, an existing contest directory is deleted and
    /// downloaded again; otherwise the contest is skipped.
    pub fn new(
        client: Arc<dyn HttpClient>,
        data_dir: impl Into<PathBuf>,
        override_existing: bool,
    ) -> Self {
        Self {
            client,
            data_dir: data_dir.into(),
            override_existing,
        }
    }

    /// Directory holding the files of a contest.
    pub fn contest_dir(&self, id: ContestId) -> PathBuf {
        self.data_dir.join(id.to_string())
    }

    /// Download one contest and write its three files.
    ///
    /// Returns `Failed` without writing anything when either download fails,
    /// including a body that breaks off mid-transfer.
    /// Filesystem errors are returned as `Err`.
    pub async fn materialize(
        &self,
        id: ContestId,
        urls: &ResourceUrls,
        winners: &WinnersIndex,
    ) -> Result<Outcome> {
        let dir = self.contest_dir(id);

        if tokio::fs::try_exists(&dir).await? {
            if !self.override_existing {
                log::debug!("Contest {} already downloaded, skipping", id);
                return Ok(Outcome::Skipped);
            }
            log::debug!("Removing existing data for contest {}", id);
            tokio::fs::remove_dir_all(&dir).await?;
        }

        let client = self.client.as_ref();
        let (image, captions) = futures::join!(
            http::fetch(client, &urls.image),
            http::fetch(client, &urls.captions)
        );
        let (Some(image), Some(captions)) = (image, captions) else {
            log::info!("Could not download resources for contest {}", id);
            return Ok(Outcome::Failed);
        };

        let (image, captions) = futures::join!(
            http::read_body(image, &urls.image),
            http::read_body(captions, &urls.captions)
        );
        let (Some(image), Some(captions)) = (image, captions) else {
            log::info!("Download of contest {} was cut short", id);
            return Ok(Outcome::Failed);
        };

        let empty = Value::Object(Default::default());
        let winner = winners.get(id).unwrap_or(&empty);
        let winner_json = serde_json::to_string_pretty(winner)?;

        tokio::fs::create_dir_all(&dir).await?;
        futures::try_join!(
            write_file(&dir, CARTOON_FILE, &image),
            write_file(&dir, CAPTIONS_FILE, &captions),
            write_file(&dir, WINNERS_FILE, winner_json.as_bytes())
        )?;

        log::debug!("Contest {} written to {}", id, dir.display());
        Ok(Outcome::Written)
    }
}

async fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> Result<()> {
    tokio::fs::write(dir.join(name), bytes).await?;
    Ok(())
}
