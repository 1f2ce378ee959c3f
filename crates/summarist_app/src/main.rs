use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use client_logging::LogDestination;
use summarist_core::{update, AppState, Msg, Phase};
use summarist_engine::{EngineConfig, PacingConfig};

mod effects;
mod render;

use effects::EffectRunner;
use render::Renderer;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Summarist: stream research-paper summaries from the processing service.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Base URL of the summarization service
    #[arg(
        long,
        env = "SUMMARIST_SERVER",
        default_value = "http://localhost:8000/api"
    )]
    server_url: String,

    /// Milliseconds between a summary arriving and it being shown
    #[arg(long, default_value_t = 2000)]
    reveal_delay_ms: u64,

    /// Milliseconds between accepting consecutive stream events
    #[arg(long, default_value_t = 500)]
    accept_delay_ms: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the uploaded papers
    List,
    /// Upload a PDF and render its summaries as they are generated
    Upload { file: PathBuf },
    /// Show the stored summaries for a previously processed paper
    Show { paper_id: i64 },
}

fn main() -> anyhow::Result<()> {
    client_logging::initialize(LogDestination::File);
    let args = Args::parse();

    let mut config = EngineConfig::new(args.server_url);
    config.pacing = PacingConfig {
        reveal_delay: Duration::from_millis(args.reveal_delay_ms),
        accept_delay: Duration::from_millis(args.accept_delay_ms),
    };
    let pacing = config.pacing;

    let runner = EffectRunner::new(config).context("could not start engine")?;
    let app = App::new(runner);

    match args.command {
        Command::List => run_list(app),
        Command::Upload { file } => run_upload(app, file, pacing),
        Command::Show { paper_id } => run_show(app, paper_id),
    }
}

struct App {
    state: AppState,
    runner: EffectRunner,
    renderer: Renderer,
}

impl App {
    fn new(runner: EffectRunner) -> Self {
        Self {
            state: AppState::new(),
            runner,
            renderer: Renderer::new(),
        }
    }

    /// Runs one message through the state machine, renders if anything
    /// changed, and executes the returned effects.
    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        if state.consume_dirty() {
            self.renderer.render(&state.view(), &self.runner);
        }
        self.state = state;
        self.runner.run(effects);
    }

    /// Blocks until a message matching `stop` has been dispatched.
    fn pump_until(&mut self, stop: impl Fn(&Msg) -> bool) {
        loop {
            let Some(msg) = self.runner.recv(POLL_INTERVAL) else {
                continue;
            };
            let done = stop(&msg);
            self.dispatch(msg);
            if done {
                return;
            }
        }
    }
}

fn run_list(mut app: App) -> anyhow::Result<()> {
    app.dispatch(Msg::Started);
    app.pump_until(|msg| matches!(msg, Msg::PapersLoaded { .. }));

    if app.state.phase() == Phase::Idle && !app.state.view().message.is_empty() {
        anyhow::bail!(app.state.view().message);
    }
    app.renderer.print_papers(&app.state.view());
    Ok(())
}

fn run_upload(mut app: App, file: PathBuf, pacing: PacingConfig) -> anyhow::Result<()> {
    app.dispatch(Msg::UploadRequested { path: file });

    loop {
        if let Some(msg) = app.runner.recv(POLL_INTERVAL) {
            app.dispatch(msg);
        }
        match app.state.phase() {
            Phase::Complete => return Ok(()),
            Phase::Error => break,
            _ => {}
        }
    }

    // Rows accepted before the failure may still be pending delivery;
    // give them one pacing window to surface before tearing down.
    let message = app.state.view().message;
    let drain = pacing.reveal_delay + Duration::from_millis(250);
    while let Some(msg) = app.runner.recv(drain) {
        app.dispatch(msg);
    }
    app.dispatch(Msg::Shutdown);
    anyhow::bail!(message)
}

fn run_show(mut app: App, paper_id: i64) -> anyhow::Result<()> {
    app.dispatch(Msg::Started);
    app.pump_until(|msg| matches!(msg, Msg::PapersLoaded { .. }));

    app.dispatch(Msg::PaperSelected { paper_id });
    if app.state.selected() != Some(paper_id) {
        anyhow::bail!("unknown paper id {paper_id}");
    }
    app.pump_until(|msg| matches!(msg, Msg::SnapshotLoaded { .. }));

    if app.state.phase() == Phase::Error {
        anyhow::bail!(app.state.view().message);
    }
    if app.state.view().rows.is_empty() {
        println!("No summaries available");
    }
    Ok(())
}
