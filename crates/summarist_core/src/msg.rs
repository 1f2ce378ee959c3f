use std::path::PathBuf;

use crate::{Paper, PaperId, SessionToken, SummaryRow};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// App startup: kick off the initial registry load.
    Started,
    /// Registry listing finished.
    PapersLoaded {
        result: Result<Vec<Paper>, String>,
    },
    /// User picked a file to upload.
    UploadRequested { path: PathBuf },
    /// Upload request finished.
    UploadFinished { result: Result<Paper, String> },
    /// User clicked a paper in the registry.
    PaperSelected { paper_id: PaperId },
    /// Stored-summary snapshot fetch finished.
    SnapshotLoaded {
        token: SessionToken,
        result: Result<Vec<SummaryRow>, String>,
    },
    /// A saving event was accepted from the processing stream.
    StreamProgress {
        token: SessionToken,
        progress: i64,
        section_title: String,
    },
    /// A paced delivery is due: append one row to the visible results.
    RowReady { token: SessionToken, row: SummaryRow },
    /// The stream ended with a complete record, after all pending
    /// deliveries were applied.
    StreamCompleted { token: SessionToken },
    /// The stream ended with an error record or failed in transit.
    StreamFailed {
        token: SessionToken,
        message: String,
    },
    /// View teardown: invalidate the session and drop pending work.
    Shutdown,
}
