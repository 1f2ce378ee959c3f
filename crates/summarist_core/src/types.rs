use chrono::{DateTime, Utc};

pub type PaperId = i64;

/// Monotonically increasing token minted for every stream open, snapshot
/// selection, and shutdown. In-flight effects carry the token of their
/// originating session; `update` drops any effect whose token is stale.
pub type SessionToken = u64;

/// One entry in the uploaded-paper registry. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paper {
    pub id: PaperId,
    pub filename: String,
    pub upload_date: Option<DateTime<Utc>>,
}

/// One visible summary row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub section_title: String,
    pub summary_text: String,
    pub page: i64,
}

/// Lifecycle phase of the current processing session.
///
/// `Complete` and `Error` both relax back to accepting a new upload or
/// selection; `Idle` is also re-entered when a stored paper is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Uploading,
    Processing,
    Complete,
    Error,
}
