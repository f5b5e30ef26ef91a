//! Pipeline entry points for downloader operations.
//!
//! - `run_download`: Fetch and persist every selected contest
//! - `progress`: Per-contest completion reporting

pub mod download;
pub mod progress;

pub use download::run_download;
pub use progress::{LogProgress, NoProgress, Progress, ProgressReporter};
