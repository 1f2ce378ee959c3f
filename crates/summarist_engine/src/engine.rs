use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::api::ApiClient;
use crate::session::run_session;
use crate::types::{ApiError, EngineConfig, EngineEvent, PaperId, SessionToken};

enum EngineCommand {
    LoadPapers,
    Upload { path: PathBuf },
    OpenStream { token: SessionToken, paper_id: PaperId },
    FetchSnapshot { token: SessionToken, paper_id: PaperId },
    CancelSession,
}

/// Handle to the background engine thread.
///
/// Commands go in over a channel and are executed on the engine's own
/// tokio runtime; events come back over a second channel, polled with
/// [`EngineHandle::try_recv`] / [`EngineHandle::recv_timeout`].
///
/// Only one session is active at a time: opening a stream, fetching a
/// snapshot, or cancelling all cancel the previous session's tasks. No
/// abort is sent upstream; an abandoned stream simply stops being
/// drained, and the state machine's token check drops anything it still
/// emits.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
    api: ApiClient,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config)?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let pacing = config.pacing;
        let thread_api = api.clone();

        thread::spawn(move || {
            let api = thread_api;
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    log::error!("could not start engine runtime: {err}");
                    return;
                }
            };

            let mut active: Option<CancellationToken> = None;
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::LoadPapers => {
                        let api = api.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            let result = api.list_papers().await;
                            let _ = event_tx.send(EngineEvent::PapersLoaded { result });
                        });
                    }
                    EngineCommand::Upload { path } => {
                        let api = api.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            let result = api.upload_paper(&path).await;
                            let _ = event_tx.send(EngineEvent::UploadFinished { result });
                        });
                    }
                    EngineCommand::OpenStream { token, paper_id } => {
                        let cancel = supersede(&mut active);
                        let api = api.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(run_session(
                            api, paper_id, token, pacing, event_tx, cancel,
                        ));
                    }
                    EngineCommand::FetchSnapshot { token, paper_id } => {
                        let cancel = supersede(&mut active);
                        let api = api.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            let result = tokio::select! {
                                _ = cancel.cancelled() => return,
                                result = api.fetch_summaries(paper_id) => result,
                            };
                            let _ = event_tx.send(EngineEvent::SnapshotLoaded { token, result });
                        });
                    }
                    EngineCommand::CancelSession => {
                        if let Some(previous) = active.take() {
                            previous.cancel();
                        }
                    }
                }
            }
        });

        Ok(Self {
            cmd_tx,
            event_rx,
            api,
        })
    }

    /// URL for viewing a paper's original document at a given page.
    pub fn view_url(&self, paper_id: PaperId, page: i64) -> String {
        self.api.view_url(paper_id, page)
    }

    pub fn load_papers(&self) {
        let _ = self.cmd_tx.send(EngineCommand::LoadPapers);
    }

    pub fn upload(&self, path: PathBuf) {
        let _ = self.cmd_tx.send(EngineCommand::Upload { path });
    }

    pub fn open_stream(&self, token: SessionToken, paper_id: PaperId) {
        let _ = self.cmd_tx.send(EngineCommand::OpenStream { token, paper_id });
    }

    pub fn fetch_snapshot(&self, token: SessionToken, paper_id: PaperId) {
        let _ = self
            .cmd_tx
            .send(EngineCommand::FetchSnapshot { token, paper_id });
    }

    pub fn cancel_session(&self) {
        let _ = self.cmd_tx.send(EngineCommand::CancelSession);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

/// Cancels the previous session, if any, and installs a fresh token for
/// the next one.
fn supersede(active: &mut Option<CancellationToken>) -> CancellationToken {
    if let Some(previous) = active.take() {
        previous.cancel();
    }
    let next = CancellationToken::new();
    *active = Some(next.clone());
    next
}
