use std::path::PathBuf;

use crate::{PaperId, SessionToken};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    LoadPapers,
    UploadPaper { path: PathBuf },
    OpenStream { token: SessionToken, paper_id: PaperId },
    FetchSnapshot { token: SessionToken, paper_id: PaperId },
    CancelSession,
}
