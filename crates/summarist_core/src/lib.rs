//! Summarist core: pure processing-session state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod types;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use state::AppState;
pub use types::{Paper, PaperId, Phase, SessionToken, SummaryRow};
pub use update::update;
pub use view_model::AppViewModel;
