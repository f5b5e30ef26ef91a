//! Service layer for the downloader.
//!
//! This module contains the business logic for:
//! - Winner record indexing (`WinnersIndex`)
//! - Per-contest fetching and persistence (`ContestMaterializer`)

mod contest;
mod winners;

pub use contest::{CAPTIONS_FILE, CARTOON_FILE, ContestMaterializer, WINNERS_FILE};
pub use winners::{WinnersIndex, extract_contest_id};
