//! Summarist engine: HTTP collaborators, stream decoding, and session driving.
mod api;
mod decode;
mod engine;
mod session;
mod stream;
mod types;

pub use api::ApiClient;
pub use decode::{parse_stream_line, LineBuffer};
pub use engine::EngineHandle;
pub use session::run_session;
pub use stream::EventStream;
pub use types::{
    ApiError, EngineConfig, EngineEvent, PacingConfig, PaperId, PaperRecord, SectionRecord,
    SessionToken, StreamError, StreamEvent, SummaryRecord,
};
