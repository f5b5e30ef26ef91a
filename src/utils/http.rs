// src/utils/http.rs

//! HTTP client capability and failure-classifying fetch.
//!
//! Callers never see transport errors: [`fetch`] logs the failure once and
//! hands back `None`, which downstream code reads as "could not fetch".

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::HttpConfig;

/// Create a configured asynchronous HTTP client.
pub fn create_client(config: &HttpConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Broad category of a failed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Connection, TLS, timeout or body transfer error
    Network,
    /// The server answered with a status code >= 400
    HttpStatus,
    /// Anything the transport could not classify
    Unknown,
}

/// A fetch that did not produce a usable response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub kind: FailureKind,
    pub status: Option<u16>,
    pub detail: String,
}

impl FetchFailure {
    pub fn network(detail: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Network,
            status: None,
            detail: detail.into(),
        }
    }

    pub fn http_status(status: u16) -> Self {
        let reason = reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("unrecognized status");
        Self {
            kind: FailureKind::HttpStatus,
            status: Some(status),
            detail: reason.to_string(),
        }
    }

    pub fn unknown(detail: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Unknown,
            status: None,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{:?} ({}): {}", self.kind, status, self.detail),
            None => write!(f, "{:?}: {}", self.kind, self.detail),
        }
    }
}

impl From<reqwest::Error> for FetchFailure {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            let mut failure = Self::http_status(status.as_u16());
            failure.detail = e.to_string();
            failure
        } else if e.is_connect() || e.is_timeout() || e.is_request() || e.is_body() {
            Self::network(e.to_string())
        } else {
            Self::unknown(format!("{e:?}"))
        }
    }
}

enum Body {
    Stream(reqwest::Response),
    Buffered(Vec<u8>),
    #[cfg(test)]
    Broken(FetchFailure),
}

/// Response handle whose body has not necessarily been read yet.
pub struct HttpResponse {
    status: u16,
    body: Body,
}

impl HttpResponse {
    /// Build a response from an already-buffered body.
    pub fn from_bytes(status: u16, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: Body::Buffered(bytes.into()),
        }
    }

    /// Build a response whose body read fails with `failure`.
    #[cfg(test)]
    pub(crate) fn with_broken_body(status: u16, failure: FetchFailure) -> Self {
        Self {
            status,
            body: Body::Broken(failure),
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// Read the whole body as raw bytes.
    ///
    /// A connection dropped or timed out mid-body is a transport failure,
    /// not a decoding problem.
    pub async fn bytes(self) -> std::result::Result<Vec<u8>, FetchFailure> {
        match self.body {
            Body::Stream(response) => Ok(response.bytes().await?.to_vec()),
            Body::Buffered(bytes) => Ok(bytes),
            #[cfg(test)]
            Body::Broken(failure) => Err(failure),
        }
    }
}

impl From<reqwest::Response> for HttpResponse {
    fn from(response: reqwest::Response) -> Self {
        Self {
            status: response.status().as_u16(),
            body: Body::Stream(response),
        }
    }
}

impl fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// Capability to issue GET requests.
///
/// Status codes are not interpreted here; [`fetch`] applies the >= 400 rule.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, url: &str) -> std::result::Result<HttpResponse, FetchFailure>;
}

#[async_trait]
impl HttpClient for reqwest::Client {
    async fn get(&self, url: &str) -> std::result::Result<HttpResponse, FetchFailure> {
        let response = reqwest::Client::get(self, url).send().await?;
        Ok(HttpResponse::from(response))
    }
}

/// GET `url`, logging and swallowing any failure.
pub async fn fetch(client: &dyn HttpClient, url: &str) -> Option<HttpResponse> {
    let result = match client.get(url).await {
        Ok(response) if response.status() >= 400 => {
            Err(FetchFailure::http_status(response.status()))
        }
        other => other,
    };

    match result {
        Ok(response) => Some(response),
        Err(failure) => {
            log_failure(url, &failure);
            None
        }
    }
}

/// Read the body of a fetched response, logging and swallowing a failed read.
pub async fn read_body(response: HttpResponse, url: &str) -> Option<Vec<u8>> {
    match response.bytes().await {
        Ok(bytes) => Some(bytes),
        Err(failure) => {
            log_failure(url, &failure);
            None
        }
    }
}

fn log_failure(url: &str, failure: &FetchFailure) {
    match failure.kind {
        FailureKind::Network | FailureKind::HttpStatus => {
            log::error!("Failed to fetch {}: {}", url, failure);
        }
        FailureKind::Unknown => {
            log::error!("Unexpected error fetching {}: {:?}", url, failure);
        }
    }
}
