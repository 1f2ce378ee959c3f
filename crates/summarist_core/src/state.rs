use crate::view_model::AppViewModel;
use crate::{Paper, PaperId, Phase, SessionToken, SummaryRow};

/// Shared application state. Single writer (the `update` function for the
/// currently valid session), many readers via [`AppViewModel`] snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    phase: Phase,
    progress: u8,
    message: String,
    papers: Vec<Paper>,
    selected: Option<PaperId>,
    rows: Vec<SummaryRow>,
    session_token: SessionToken,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            phase: self.phase,
            progress: self.progress,
            message: self.message.clone(),
            papers: self.papers.clone(),
            selected: self.selected,
            rows: self.rows.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether the state changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// The token of the current session. Events carrying any other token
    /// belong to a superseded session and must not apply.
    pub fn session_token(&self) -> SessionToken {
        self.session_token
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn selected(&self) -> Option<PaperId> {
        self.selected
    }

    pub(crate) fn is_current(&self, token: SessionToken) -> bool {
        token == self.session_token
    }

    /// Mint the next session token, invalidating every in-flight callback
    /// and scheduled delivery of the previous session.
    pub(crate) fn mint_token(&mut self) -> SessionToken {
        self.session_token += 1;
        self.session_token
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
        self.dirty = true;
    }

    pub(crate) fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
        self.dirty = true;
    }

    /// Progress is advisory and need not be monotonic; out-of-range input
    /// is clamped, never rejected.
    pub(crate) fn set_progress(&mut self, progress: i64) {
        self.progress = progress.clamp(0, 100) as u8;
        self.dirty = true;
    }

    pub(crate) fn set_papers(&mut self, papers: Vec<Paper>) {
        self.papers = papers;
        self.dirty = true;
    }

    /// Identifiers are unique in the registry; a record with a known id
    /// replaces the existing entry, otherwise insertion order is kept.
    pub(crate) fn register_paper(&mut self, paper: Paper) {
        match self.papers.iter_mut().find(|p| p.id == paper.id) {
            Some(existing) => *existing = paper,
            None => self.papers.push(paper),
        }
        self.dirty = true;
    }

    pub(crate) fn knows_paper(&self, paper_id: PaperId) -> bool {
        self.papers.iter().any(|p| p.id == paper_id)
    }

    pub(crate) fn select(&mut self, paper_id: PaperId) {
        self.selected = Some(paper_id);
        self.dirty = true;
    }

    pub(crate) fn clear_rows(&mut self) {
        self.rows.clear();
        self.dirty = true;
    }

    pub(crate) fn push_row(&mut self, row: SummaryRow) {
        self.rows.push(row);
        self.dirty = true;
    }

    pub(crate) fn set_rows(&mut self, rows: Vec<SummaryRow>) {
        self.rows = rows;
        self.dirty = true;
    }
}
