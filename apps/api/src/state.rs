use std::sync::Arc;

use crate::llm_client::staging::{PollPolicy, Sleeper};
use crate::llm_client::{FileService, GenerativeModel};
use crate::speech::Transcriber;
use crate::store::Store;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub llm: Arc<dyn GenerativeModel>,
    /// Provider file API used to stage uploaded documents.
    pub files: Arc<dyn FileService>,
    pub sleeper: Arc<dyn Sleeper>,
    /// `None` when no speech-to-text key is configured; transcription then answers 503.
    pub transcriber: Option<Arc<dyn Transcriber>>,
    pub poll_policy: PollPolicy,
}
