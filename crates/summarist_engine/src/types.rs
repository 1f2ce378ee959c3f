use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;

pub type PaperId = i64;
pub type SessionToken = u64;

/// Paper record as returned by the registry endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaperRecord {
    pub id: PaperId,
    pub filename: String,
    #[serde(default)]
    pub upload_date: Option<DateTime<Utc>>,
}

/// Stored summary record as returned by the snapshot endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SummaryRecord {
    pub section_title: String,
    pub summary_text: String,
    pub page: i64,
}

/// Section payload inside a `saving` stream record. The stream's field
/// names differ from the stored-summary shape.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SectionRecord {
    pub title: String,
    pub summary: String,
    pub page: i64,
}

/// One parsed line of the processing stream.
///
/// A closed union: any line that does not match one of these shapes is
/// discarded by the decoder, never surfaced as a fourth variant.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum StreamEvent {
    Saving {
        progress: i64,
        section: SectionRecord,
    },
    Complete,
    Error {
        message: String,
    },
}

/// Events emitted by the engine toward the state machine.
///
/// Session-scoped events carry the token of their originating session;
/// the state machine drops events whose token is stale.
#[derive(Debug)]
pub enum EngineEvent {
    PapersLoaded {
        result: Result<Vec<PaperRecord>, ApiError>,
    },
    UploadFinished {
        result: Result<PaperRecord, ApiError>,
    },
    SnapshotLoaded {
        token: SessionToken,
        result: Result<Vec<SummaryRecord>, ApiError>,
    },
    StreamProgress {
        token: SessionToken,
        progress: i64,
        section_title: String,
    },
    RowReady {
        token: SessionToken,
        section: SectionRecord,
    },
    StreamCompleted {
        token: SessionToken,
    },
    StreamFailed {
        token: SessionToken,
        message: String,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid request url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("only PDF files can be uploaded: {0}")]
    NotPdf(String),
    #[error("could not read {path}: {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("invalid request url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("processing request failed: {0}")]
    Open(#[source] reqwest::Error),
    #[error("processing endpoint returned status {0}")]
    OpenStatus(reqwest::StatusCode),
    #[error("processing stream failed mid-read: {0}")]
    Read(#[source] reqwest::Error),
}

/// Delays shaping how fast streamed results become visible.
///
/// The reference behavior is 2000 ms reveal / 500 ms accept; both are
/// presentation tuning, so they are configurable. Ordering of delivered
/// rows never depends on the chosen values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingConfig {
    /// Delay between accepting a saving event and appending its row to
    /// the visible results.
    pub reveal_delay: Duration,
    /// Delay before pulling the next event from the decoder.
    pub accept_delay: Duration,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            reveal_delay: Duration::from_millis(2000),
            accept_delay: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Base URL of the summarization service, e.g. `http://localhost:8000/api`.
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Applied to plain request/response calls only. The processing
    /// stream has no overall timeout; a silently hanging stream is an
    /// accepted limitation.
    pub request_timeout: Duration,
    pub pacing: PacingConfig,
}

impl EngineConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            pacing: PacingConfig::default(),
        }
    }
}
