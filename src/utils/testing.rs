//! In-memory `HttpClient` and log capture used by unit tests.

use std::collections::HashMap;
use std::sync::{Mutex, Once};

use async_trait::async_trait;

use crate::utils::http::{FetchFailure, HttpClient, HttpResponse};

#[derive(Clone)]
enum Route {
    Body(u16, Vec<u8>),
    Failure(FetchFailure),
    BrokenBody(FetchFailure),
    Panic,
}

/// Serves canned responses keyed by exact URL and records every request.
#[derive(Default)]
pub struct FakeClient {
    routes: HashMap<String, Route>,
    requests: Mutex<Vec<String>>,
}

impl FakeClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.routes
            .insert(url.to_string(), Route::Body(200, body.into()));
        self
    }

    pub fn with_status(mut self, url: &str, status: u16) -> Self {
        self.routes
            .insert(url.to_string(), Route::Body(status, Vec::new()));
        self
    }

    pub fn with_failure(mut self, url: &str, failure: FetchFailure) -> Self {
        self.routes.insert(url.to_string(), Route::Failure(failure));
        self
    }

    /// Answer 200 but fail while the body is being read.
    pub fn with_broken_body(mut self, url: &str, failure: FetchFailure) -> Self {
        self.routes
            .insert(url.to_string(), Route::BrokenBody(failure));
        self
    }

    pub fn panic_on(mut self, url: &str) -> Self {
        self.routes.insert(url.to_string(), Route::Panic);
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requested(&self, url: &str) -> bool {
        self.requests.lock().unwrap().iter().any(|u| u == url)
    }
}

#[async_trait]
impl HttpClient for FakeClient {
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchFailure> {
        self.requests.lock().unwrap().push(url.to_string());
        match self.routes.get(url).cloned() {
            Some(Route::Body(status, body)) => Ok(HttpResponse::from_bytes(status, body)),
            Some(Route::Failure(failure)) => Err(failure),
            Some(Route::BrokenBody(failure)) => Ok(HttpResponse::with_broken_body(200, failure)),
            Some(Route::Panic) => panic!("fake client told to panic on {url}"),
            None => Ok(HttpResponse::from_bytes(404, Vec::new())),
        }
    }
}

/// Process-wide logger that keeps every record for later inspection.
///
/// Tests run concurrently in one process, so assertions must filter on
/// something unique to the test (usually the URL).
struct CaptureLogger {
    records: Mutex<Vec<(log::Level, String)>>,
}

static CAPTURE: CaptureLogger = CaptureLogger {
    records: Mutex::new(Vec::new()),
};
static INSTALL: Once = Once::new();

impl log::Log for CaptureLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        self.records
            .lock()
            .unwrap()
            .push((record.level(), record.args().to_string()));
    }

    fn flush(&self) {}
}

/// Install the capturing logger (once per process).
pub fn capture_logs() {
    INSTALL.call_once(|| {
        log::set_logger(&CAPTURE).unwrap();
        log::set_max_level(log::LevelFilter::Trace);
    });
}

/// Captured messages at `level` that mention `needle`.
pub fn logged(level: log::Level, needle: &str) -> Vec<String> {
    CAPTURE
        .records
        .lock()
        .unwrap()
        .iter()
        .filter(|(l, msg)| *l == level && msg.contains(needle))
        .map(|(_, msg)| msg.clone())
        .collect()
}
