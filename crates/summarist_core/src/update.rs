use crate::{AppState, Effect, Msg, Phase};

/// Pure update function: applies a message to state and returns any effects.
///
/// Every message that originates from a session (stream progress, paced row
/// deliveries, snapshot loads) carries the token of that session and is
/// dropped here when the token is no longer current. This is the only place
/// shared state mutates, so the check guards every mutation.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Started => vec![Effect::LoadPapers],
        Msg::PapersLoaded { result } => {
            match result {
                Ok(papers) => state.set_papers(papers),
                Err(message) => state.set_message(message),
            }
            Vec::new()
        }
        Msg::UploadRequested { path } => {
            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            state.set_phase(Phase::Uploading);
            state.set_progress(0);
            state.set_message(format!("Uploading \"{filename}\""));
            vec![Effect::UploadPaper { path }]
        }
        Msg::UploadFinished { result } => match result {
            Ok(paper) => {
                let paper_id = paper.id;
                let filename = paper.filename.clone();
                state.register_paper(paper);
                state.select(paper_id);
                state.clear_rows();
                let token = state.mint_token();
                state.set_phase(Phase::Processing);
                state.set_progress(0);
                state.set_message(format!("Processing \"{filename}\""));
                vec![Effect::OpenStream { token, paper_id }]
            }
            Err(message) => {
                state.set_phase(Phase::Error);
                state.set_message(message);
                Vec::new()
            }
        },
        Msg::PaperSelected { paper_id } => {
            if !state.knows_paper(paper_id) {
                return (state, Vec::new());
            }
            if state.selected() == Some(paper_id) && state.phase() == Phase::Processing {
                // Re-clicking the paper that is mid-stream changes nothing.
                return (state, Vec::new());
            }
            // Supersedes any active session: pending deliveries for the old
            // token can no longer apply.
            let token = state.mint_token();
            state.select(paper_id);
            state.clear_rows();
            state.set_phase(Phase::Idle);
            state.set_progress(0);
            state.set_message(String::new());
            vec![Effect::FetchSnapshot { token, paper_id }]
        }
        Msg::SnapshotLoaded { token, result } => {
            if state.is_current(token) {
                match result {
                    Ok(rows) => state.set_rows(rows),
                    Err(message) => {
                        state.set_phase(Phase::Error);
                        state.set_message(message);
                    }
                }
            }
            Vec::new()
        }
        Msg::StreamProgress {
            token,
            progress,
            section_title,
        } => {
            // Saving events after a terminal phase are ignored.
            if state.is_current(token) && state.phase() == Phase::Processing {
                state.set_progress(progress);
                state.set_message(format!("Summarized \"{section_title}\""));
            }
            Vec::new()
        }
        Msg::RowReady { token, row } => {
            // Rows accepted before a stream error still surface, so this is
            // gated on the token alone, not on the phase.
            if state.is_current(token) {
                state.push_row(row);
            }
            Vec::new()
        }
        Msg::StreamCompleted { token } => {
            if state.is_current(token) && state.phase() == Phase::Processing {
                state.set_phase(Phase::Complete);
                state.set_message("Processing complete");
            }
            Vec::new()
        }
        Msg::StreamFailed { token, message } => {
            if state.is_current(token) && state.phase() == Phase::Processing {
                state.set_phase(Phase::Error);
                state.set_message(message);
            }
            Vec::new()
        }
        Msg::Shutdown => {
            state.mint_token();
            state.set_phase(Phase::Idle);
            vec![Effect::CancelSession]
        }
    };

    (state, effects)
}
