use std::sync::mpsc;
use std::time::Duration;

use tokio::sync::mpsc as async_mpsc;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

use crate::api::ApiClient;
use crate::stream::EventStream;
use crate::types::{
    EngineEvent, PacingConfig, PaperId, SectionRecord, SessionToken, StreamError, StreamEvent,
};

struct ScheduledRow {
    due: Instant,
    section: SectionRecord,
}

enum SessionEnd {
    Complete,
    Failed(String),
    Superseded,
}

/// Drives one processing session for one paper: decoder events in, state
/// events out, with paced ordered row delivery. Runs until a terminal
/// record, end-of-stream, transport failure, or supersession.
///
/// Every emitted event carries `token`; the state machine ignores events
/// from superseded sessions, so a late event here is harmless.
pub async fn run_session(
    api: ApiClient,
    paper_id: PaperId,
    token: SessionToken,
    pacing: PacingConfig,
    events: mpsc::Sender<EngineEvent>,
    cancel: CancellationToken,
) {
    let mut stream = match api.open_processing_stream(paper_id).await {
        Ok(stream) => stream,
        Err(err) => {
            let _ = events.send(EngineEvent::StreamFailed {
                token,
                message: err.to_string(),
            });
            return;
        }
    };

    let (row_tx, row_rx) = async_mpsc::unbounded_channel();
    let deliverer = tokio::spawn(deliver_rows(row_rx, events.clone(), token, cancel.clone()));

    // No delay before the first pull; the accept delay throttles the rate
    // of acceptance between consecutive events, independent of the rate
    // of display.
    let mut throttle = Duration::ZERO;
    let end = loop {
        let next = tokio::select! {
            _ = cancel.cancelled() => break SessionEnd::Superseded,
            next = throttled_pull(&mut stream, throttle) => next,
        };
        throttle = pacing.accept_delay;
        match next {
            Ok(Some(StreamEvent::Saving { progress, section })) => {
                let _ = events.send(EngineEvent::StreamProgress {
                    token,
                    progress,
                    section_title: section.title.clone(),
                });
                let _ = row_tx.send(ScheduledRow {
                    due: Instant::now() + pacing.reveal_delay,
                    section,
                });
            }
            Ok(Some(StreamEvent::Complete)) => break SessionEnd::Complete,
            Ok(Some(StreamEvent::Error { message })) => break SessionEnd::Failed(message),
            Ok(None) => {
                break SessionEnd::Failed("processing stream ended unexpectedly".to_string())
            }
            Err(err) => break SessionEnd::Failed(describe_stream_error(err)),
        }
    };

    // Closing the channel lets the deliverer drain its queue and finish.
    drop(row_tx);
    match end {
        SessionEnd::Complete => {
            // The phase must not flip to complete until every pending row
            // is visible, so the flush happens first.
            let _ = deliverer.await;
            if !cancel.is_cancelled() {
                let _ = events.send(EngineEvent::StreamCompleted { token });
            }
        }
        SessionEnd::Failed(message) => {
            // The failure surfaces immediately; rows accepted before the
            // failure still drain afterwards.
            let _ = events.send(EngineEvent::StreamFailed { token, message });
            let _ = deliverer.await;
        }
        SessionEnd::Superseded => {
            let _ = deliverer.await;
        }
    }
}

async fn throttled_pull(
    stream: &mut EventStream,
    delay: Duration,
) -> Result<Option<StreamEvent>, StreamError> {
    if !delay.is_zero() {
        time::sleep(delay).await;
    }
    stream.next_event().await
}

/// Single FIFO drain: rows become visible in acceptance order regardless
/// of how the pacing delays land.
async fn deliver_rows(
    mut rows: async_mpsc::UnboundedReceiver<ScheduledRow>,
    events: mpsc::Sender<EngineEvent>,
    token: SessionToken,
    cancel: CancellationToken,
) {
    while let Some(row) = rows.recv().await {
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = time::sleep_until(row.due) => {}
        }
        let _ = events.send(EngineEvent::RowReady {
            token,
            section: row.section,
        });
    }
}

fn describe_stream_error(err: StreamError) -> String {
    log::warn!("processing stream error: {err}");
    match err {
        StreamError::Read(_) => "processing stream ended unexpectedly".to_string(),
        other => other.to_string(),
    }
}
