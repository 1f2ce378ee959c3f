use std::sync::Once;

use summarist_core::{update, AppState, Effect, Msg, Paper, Phase, SummaryRow};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(client_logging::initialize_for_tests);
}

fn paper(id: i64, filename: &str) -> Paper {
    Paper {
        id,
        filename: filename.to_string(),
        upload_date: None,
    }
}

fn row(title: &str, page: i64) -> SummaryRow {
    SummaryRow {
        section_title: title.to_string(),
        summary_text: format!("{title} summary"),
        page,
    }
}

fn with_registry(papers: Vec<Paper>) -> AppState {
    let (state, _effects) = update(
        AppState::new(),
        Msg::PapersLoaded { result: Ok(papers) },
    );
    state
}

#[test]
fn selecting_known_paper_fetches_snapshot() {
    init_logging();
    let state = with_registry(vec![paper(1, "a.pdf"), paper(2, "b.pdf")]);

    let (state, effects) = update(state, Msg::PaperSelected { paper_id: 2 });
    let view = state.view();

    assert_eq!(view.selected, Some(2));
    assert_eq!(view.phase, Phase::Idle);
    assert!(view.rows.is_empty());
    assert_eq!(
        effects,
        vec![Effect::FetchSnapshot {
            token: state.session_token(),
            paper_id: 2,
        }]
    );
}

#[test]
fn selecting_unknown_paper_is_noop() {
    init_logging();
    let state = with_registry(vec![paper(1, "a.pdf")]);

    let (next, effects) = update(state.clone(), Msg::PaperSelected { paper_id: 99 });

    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn snapshot_replaces_rows_atomically() {
    init_logging();
    let state = with_registry(vec![paper(1, "a.pdf")]);
    let (state, effects) = update(state, Msg::PaperSelected { paper_id: 1 });
    let token = match effects.as_slice() {
        [Effect::FetchSnapshot { token, .. }] => *token,
        other => panic!("unexpected effects: {other:?}"),
    };

    let (state, _effects) = update(
        state,
        Msg::SnapshotLoaded {
            token,
            result: Ok(vec![row("Intro", 1), row("Results", 5)]),
        },
    );

    assert_eq!(state.view().rows, vec![row("Intro", 1), row("Results", 5)]);
    assert_eq!(state.view().phase, Phase::Idle);
}

#[test]
fn snapshot_failure_leaves_rows_empty() {
    init_logging();
    let state = with_registry(vec![paper(1, "a.pdf")]);
    let (state, effects) = update(state, Msg::PaperSelected { paper_id: 1 });
    let token = match effects.as_slice() {
        [Effect::FetchSnapshot { token, .. }] => *token,
        other => panic!("unexpected effects: {other:?}"),
    };

    let (state, _effects) = update(
        state,
        Msg::SnapshotLoaded {
            token,
            result: Err("could not load stored summaries".to_string()),
        },
    );
    let view = state.view();

    assert!(view.rows.is_empty());
    assert_eq!(view.phase, Phase::Error);
    assert_eq!(view.message, "could not load stored summaries");
}

#[test]
fn selection_is_idempotent() {
    init_logging();
    let snapshot = vec![row("Intro", 1), row("Results", 5)];
    let state = with_registry(vec![paper(1, "a.pdf")]);

    let mut rows_per_pass = Vec::new();
    let mut state = state;
    for _ in 0..2 {
        let (next, effects) = update(state, Msg::PaperSelected { paper_id: 1 });
        let token = match effects.as_slice() {
            [Effect::FetchSnapshot { token, .. }] => *token,
            other => panic!("unexpected effects: {other:?}"),
        };
        let (next, _effects) = update(
            next,
            Msg::SnapshotLoaded {
                token,
                result: Ok(snapshot.clone()),
            },
        );
        rows_per_pass.push(next.view().rows);
        state = next;
    }

    assert_eq!(rows_per_pass[0], rows_per_pass[1]);
    assert_eq!(rows_per_pass[1], snapshot);
}

#[test]
fn reselecting_streaming_paper_is_noop() {
    init_logging();
    let state = with_registry(vec![paper(1, "a.pdf")]);
    // Uploading paper 7 puts it mid-stream.
    let (state, effects) = update(
        state,
        Msg::UploadFinished {
            result: Ok(paper(7, "b.pdf")),
        },
    );
    assert_eq!(effects.len(), 1);
    let token_before = state.session_token();

    let (state, effects) = update(state, Msg::PaperSelected { paper_id: 7 });

    assert!(effects.is_empty());
    assert_eq!(state.session_token(), token_before);
    assert_eq!(state.phase(), Phase::Processing);
}

#[test]
fn selecting_other_paper_supersedes_stream() {
    init_logging();
    let state = with_registry(vec![paper(1, "a.pdf")]);
    let (state, effects) = update(
        state,
        Msg::UploadFinished {
            result: Ok(paper(7, "b.pdf")),
        },
    );
    let stream_token = match effects.as_slice() {
        [Effect::OpenStream { token, .. }] => *token,
        other => panic!("unexpected effects: {other:?}"),
    };

    let (state, effects) = update(state, Msg::PaperSelected { paper_id: 1 });
    let snapshot_token = match effects.as_slice() {
        [Effect::FetchSnapshot { token, paper_id: 1 }] => *token,
        other => panic!("unexpected effects: {other:?}"),
    };
    assert!(snapshot_token > stream_token);

    // Pending deliveries of the superseded stream no longer apply.
    let (state, _effects) = update(
        state,
        Msg::RowReady {
            token: stream_token,
            row: row("Stale", 2),
        },
    );
    assert!(state.view().rows.is_empty());

    // The snapshot for the newly selected paper does.
    let (state, _effects) = update(
        state,
        Msg::SnapshotLoaded {
            token: snapshot_token,
            result: Ok(vec![row("Stored", 4)]),
        },
    );
    assert_eq!(state.view().rows, vec![row("Stored", 4)]);
}

#[test]
fn shutdown_invalidates_session_and_cancels() {
    init_logging();
    let state = with_registry(vec![paper(1, "a.pdf")]);
    let (state, effects) = update(
        state,
        Msg::UploadFinished {
            result: Ok(paper(7, "b.pdf")),
        },
    );
    let stream_token = match effects.as_slice() {
        [Effect::OpenStream { token, .. }] => *token,
        other => panic!("unexpected effects: {other:?}"),
    };

    let (state, effects) = update(state, Msg::Shutdown);
    assert_eq!(effects, vec![Effect::CancelSession]);
    assert_eq!(state.phase(), Phase::Idle);

    let (state, _effects) = update(
        state,
        Msg::RowReady {
            token: stream_token,
            row: row("Late", 1),
        },
    );
    assert!(state.view().rows.is_empty());
}
