use crate::{Paper, PaperId, Phase, SummaryRow};

/// Read-only snapshot of [`crate::AppState`] handed to the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub phase: Phase,
    pub progress: u8,
    pub message: String,
    pub papers: Vec<Paper>,
    pub selected: Option<PaperId>,
    pub rows: Vec<SummaryRow>,
    pub dirty: bool,
}
