use summarist_core::{AppViewModel, Phase};

use crate::effects::EffectRunner;

/// Prints incremental changes of the view model to stdout: a status line
/// whenever phase, progress, or message change, and any newly appended
/// summary rows.
pub struct Renderer {
    printed_rows: usize,
    last_status: String,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            printed_rows: 0,
            last_status: String::new(),
        }
    }

    pub fn render(&mut self, view: &AppViewModel, runner: &EffectRunner) {
        let status = status_line(view);
        if !status.is_empty() && status != self.last_status {
            println!("{status}");
            self.last_status = status;
        }

        if view.rows.len() < self.printed_rows {
            // The visible results were reset by a new upload or selection.
            self.printed_rows = 0;
        }
        for row in &view.rows[self.printed_rows..] {
            println!("  {}  (p. {})", row.section_title, row.page);
            println!("      {}", row.summary_text);
            if let Some(paper_id) = view.selected {
                println!("      {}", runner.view_url(paper_id, row.page));
            }
        }
        self.printed_rows = view.rows.len();
    }

    pub fn print_papers(&self, view: &AppViewModel) {
        if view.papers.is_empty() {
            println!("No papers uploaded yet");
            return;
        }
        println!("{:>6}  {:<40}  uploaded", "id", "filename");
        for paper in &view.papers {
            let uploaded = paper
                .upload_date
                .map(|date| date.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string());
            println!("{:>6}  {:<40}  {}", paper.id, paper.filename, uploaded);
        }
    }
}

fn status_line(view: &AppViewModel) -> String {
    match view.phase {
        Phase::Idle | Phase::Uploading => view.message.clone(),
        Phase::Processing | Phase::Complete => {
            format!("[{:>3}%] {}", view.progress, view.message)
        }
        Phase::Error => format!("error: {}", view.message),
    }
}
