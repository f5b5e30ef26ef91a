// src/models/mod.rs

//! Domain models for the downloader.
//!
//! This module contains the data structures shared across the pipeline,
//! organized by their primary purpose.

mod config;
mod contest;

// Re-export all public types
pub use config::{Config, DownloadConfig, HttpConfig, OutputConfig, RemoteConfig, Selection};
pub use contest::{ContestId, Outcome, ResourceUrls, RunSummary};
