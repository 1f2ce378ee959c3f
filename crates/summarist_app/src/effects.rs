use std::time::Duration;

use summarist_core::{Effect, Msg, Paper, PaperId, SummaryRow};
use summarist_engine::{
    ApiError, EngineConfig, EngineEvent, EngineHandle, PaperRecord, SectionRecord, SummaryRecord,
};

/// Executes core effects against the engine and translates engine events
/// back into core messages. Engine failure types become plain messages at
/// this seam; the core never sees transport-level detail.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(config: EngineConfig) -> Result<Self, ApiError> {
        Ok(Self {
            engine: EngineHandle::new(config)?,
        })
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::LoadPapers => self.engine.load_papers(),
                Effect::UploadPaper { path } => self.engine.upload(path),
                Effect::OpenStream { token, paper_id } => {
                    client_logging::client_info!(
                        "opening processing stream for paper {paper_id} (session {token})"
                    );
                    self.engine.open_stream(token, paper_id);
                }
                Effect::FetchSnapshot { token, paper_id } => {
                    self.engine.fetch_snapshot(token, paper_id);
                }
                Effect::CancelSession => self.engine.cancel_session(),
            }
        }
    }

    pub fn recv(&self, timeout: Duration) -> Option<Msg> {
        self.engine.recv_timeout(timeout).map(map_event)
    }

    pub fn view_url(&self, paper_id: PaperId, page: i64) -> String {
        self.engine.view_url(paper_id, page)
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::PapersLoaded { result } => Msg::PapersLoaded {
            result: result
                .map(|papers| papers.into_iter().map(map_paper).collect())
                .map_err(|err| format!("could not list papers: {err}")),
        },
        EngineEvent::UploadFinished { result } => Msg::UploadFinished {
            result: result
                .map(map_paper)
                .map_err(|err| format!("upload failed: {err}")),
        },
        EngineEvent::SnapshotLoaded { token, result } => Msg::SnapshotLoaded {
            token,
            result: result
                .map(|records| records.into_iter().map(map_summary).collect())
                .map_err(|err| format!("could not load stored summaries: {err}")),
        },
        EngineEvent::StreamProgress {
            token,
            progress,
            section_title,
        } => Msg::StreamProgress {
            token,
            progress,
            section_title,
        },
        EngineEvent::RowReady { token, section } => Msg::RowReady {
            token,
            row: map_section(section),
        },
        EngineEvent::StreamCompleted { token } => Msg::StreamCompleted { token },
        EngineEvent::StreamFailed { token, message } => Msg::StreamFailed { token, message },
    }
}

fn map_paper(record: PaperRecord) -> Paper {
    Paper {
        id: record.id,
        filename: record.filename,
        upload_date: record.upload_date,
    }
}

fn map_summary(record: SummaryRecord) -> SummaryRow {
    SummaryRow {
        section_title: record.section_title,
        summary_text: record.summary_text,
        page: record.page,
    }
}

fn map_section(section: SectionRecord) -> SummaryRow {
    SummaryRow {
        section_title: section.title,
        summary_text: section.summary,
        page: section.page,
    }
}
