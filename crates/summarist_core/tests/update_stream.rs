use std::sync::Once;

use summarist_core::{update, AppState, Effect, Msg, Paper, Phase, SessionToken, SummaryRow};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(client_logging::initialize_for_tests);
}

fn row(title: &str, page: i64) -> SummaryRow {
    SummaryRow {
        section_title: title.to_string(),
        summary_text: format!("{title} summary"),
        page,
    }
}

/// Uploads a paper and returns the state mid-stream plus its session token.
fn processing_session(state: AppState) -> (AppState, SessionToken) {
    let (state, effects) = update(
        state,
        Msg::UploadFinished {
            result: Ok(Paper {
                id: 7,
                filename: "attention.pdf".to_string(),
                upload_date: None,
            }),
        },
    );
    let token = match effects.as_slice() {
        [Effect::OpenStream { token, .. }] => *token,
        other => panic!("unexpected effects: {other:?}"),
    };
    (state, token)
}

#[test]
fn saving_updates_progress_and_message() {
    init_logging();
    let (state, token) = processing_session(AppState::new());

    let (state, effects) = update(
        state,
        Msg::StreamProgress {
            token,
            progress: 42,
            section_title: "Methods".to_string(),
        },
    );
    let view = state.view();

    assert_eq!(view.phase, Phase::Processing);
    assert_eq!(view.progress, 42);
    assert_eq!(view.message, "Summarized \"Methods\"");
    assert!(effects.is_empty());
}

#[test]
fn out_of_range_progress_is_clamped_not_rejected() {
    init_logging();
    let (state, token) = processing_session(AppState::new());

    let (state, _effects) = update(
        state,
        Msg::StreamProgress {
            token,
            progress: 250,
            section_title: "Overshoot".to_string(),
        },
    );
    assert_eq!(state.view().progress, 100);

    let (state, _effects) = update(
        state,
        Msg::StreamProgress {
            token,
            progress: -10,
            section_title: "Undershoot".to_string(),
        },
    );
    assert_eq!(state.view().progress, 0);
    assert_eq!(state.view().message, "Summarized \"Undershoot\"");
}

#[test]
fn rows_append_in_delivery_order() {
    init_logging();
    let (mut state, token) = processing_session(AppState::new());

    for (title, page) in [("Intro", 1), ("Methods", 3), ("Results", 5)] {
        let (next, _effects) = update(
            state,
            Msg::RowReady {
                token,
                row: row(title, page),
            },
        );
        state = next;
    }

    assert_eq!(
        state.view().rows,
        vec![row("Intro", 1), row("Methods", 3), row("Results", 5)]
    );
}

#[test]
fn stale_token_events_are_dropped() {
    init_logging();
    let (state, first_token) = processing_session(AppState::new());
    // A fresh upload supersedes the first session.
    let (state, second_token) = processing_session(state);
    assert_ne!(first_token, second_token);

    let (state, _effects) = update(
        state,
        Msg::RowReady {
            token: first_token,
            row: row("Stale", 1),
        },
    );
    let (state, _effects) = update(
        state,
        Msg::StreamCompleted { token: first_token },
    );
    let view = state.view();

    assert!(view.rows.is_empty());
    assert_eq!(view.phase, Phase::Processing);
}

#[test]
fn complete_flips_phase_after_rows_are_visible() {
    init_logging();
    let (state, token) = processing_session(AppState::new());

    // Reference scenario: two saving events, then complete.
    let (state, _) = update(
        state,
        Msg::StreamProgress {
            token,
            progress: 50,
            section_title: "Intro".to_string(),
        },
    );
    let (state, _) = update(
        state,
        Msg::RowReady {
            token,
            row: row("Intro", 1),
        },
    );
    let (state, _) = update(
        state,
        Msg::StreamProgress {
            token,
            progress: 100,
            section_title: "Results".to_string(),
        },
    );
    let (state, _) = update(
        state,
        Msg::RowReady {
            token,
            row: row("Results", 5),
        },
    );
    let (state, effects) = update(state, Msg::StreamCompleted { token });
    let view = state.view();

    assert_eq!(view.phase, Phase::Complete);
    assert_eq!(view.message, "Processing complete");
    assert_eq!(view.progress, 100);
    assert_eq!(view.rows, vec![row("Intro", 1), row("Results", 5)]);
    assert!(effects.is_empty());
}

#[test]
fn stream_error_surfaces_message() {
    init_logging();
    let (state, token) = processing_session(AppState::new());

    let (state, _effects) = update(
        state,
        Msg::StreamFailed {
            token,
            message: "boom".to_string(),
        },
    );
    let view = state.view();

    assert_eq!(view.phase, Phase::Error);
    assert_eq!(view.message, "boom");
}

#[test]
fn saving_after_error_is_ignored() {
    init_logging();
    let (state, token) = processing_session(AppState::new());
    let (state, _effects) = update(
        state,
        Msg::StreamFailed {
            token,
            message: "boom".to_string(),
        },
    );

    let (state, _effects) = update(
        state,
        Msg::StreamProgress {
            token,
            progress: 80,
            section_title: "Late".to_string(),
        },
    );
    let view = state.view();

    assert_eq!(view.phase, Phase::Error);
    assert_eq!(view.message, "boom");
    assert_eq!(view.progress, 0);
}

#[test]
fn rows_accepted_before_error_still_append() {
    init_logging();
    let (state, token) = processing_session(AppState::new());
    let (state, _effects) = update(
        state,
        Msg::StreamFailed {
            token,
            message: "boom".to_string(),
        },
    );

    // The delivery of an already-accepted row lands after the failure.
    let (state, _effects) = update(
        state,
        Msg::RowReady {
            token,
            row: row("Intro", 1),
        },
    );

    assert_eq!(state.view().phase, Phase::Error);
    assert_eq!(state.view().rows, vec![row("Intro", 1)]);
}
