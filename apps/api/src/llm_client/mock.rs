//! Scripted test doubles for the model and file traits.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::llm_client::staging::Sleeper;
use crate::llm_client::{
    FileService, FileState, GenerationRequest, GenerativeModel, LlmError, RemoteFile,
};

/// Shared, ordered record of calls across doubles.
pub type EventLog = Arc<Mutex<Vec<String>>>;

/// Returns queued replies in order and records every request.
#[derive(Default)]
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    requests: Mutex<Vec<GenerationRequest>>,
    events: Option<EventLog>,
}

impl ScriptedModel {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(|r| Ok(r.into())).collect()),
            ..Default::default()
        }
    }

    pub fn failing(error: LlmError) -> Self {
        Self {
            replies: Mutex::new(VecDeque::from([Err(error)])),
            ..Default::default()
        }
    }

    pub fn with_events(mut self, events: EventLog) -> Self {
        self.events = Some(events);
        self
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl GenerativeModel for ScriptedModel {
    async fn generate(&self, request: GenerationRequest) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(request);
        if let Some(events) = &self.events {
            events.lock().unwrap().push("generate".to_string());
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::EmptyContent))
    }
}

/// File service whose `get` walks through a scripted list of states.
/// The last state repeats once the script runs out.
#[derive(Default)]
pub struct ScriptedFiles {
    states: Mutex<VecDeque<FileState>>,
    last: Mutex<FileState>,
    fail_upload: bool,
    gets: Mutex<usize>,
    staged: Mutex<Option<(PathBuf, bool, Vec<u8>)>>,
    events: Option<EventLog>,
}

impl ScriptedFiles {
    pub fn new(states: Vec<FileState>) -> Self {
        Self {
            states: Mutex::new(states.into()),
            ..Default::default()
        }
    }

    pub fn failing_upload() -> Self {
        Self {
            fail_upload: true,
            ..Default::default()
        }
    }

    pub fn with_events(mut self, events: EventLog) -> Self {
        self.events = Some(events);
        self
    }

    pub fn get_calls(&self) -> usize {
        *self.gets.lock().unwrap()
    }

    pub fn staged_path(&self) -> Option<PathBuf> {
        self.staged.lock().unwrap().as_ref().map(|(p, _, _)| p.clone())
    }

    pub fn existed_during_upload(&self) -> bool {
        self.staged
            .lock()
            .unwrap()
            .as_ref()
            .map(|(_, existed, _)| *existed)
            .unwrap_or(false)
    }

    pub fn staged_content(&self) -> Option<Vec<u8>> {
        self.staged.lock().unwrap().as_ref().map(|(_, _, c)| c.clone())
    }

    fn file(name: &str, state: FileState) -> RemoteFile {
        RemoteFile {
            name: name.to_string(),
            display_name: None,
            mime_type: "application/pdf".to_string(),
            uri: format!("https://files.test/{name}"),
            state,
        }
    }

    fn record(&self, event: String) {
        if let Some(events) = &self.events {
            events.lock().unwrap().push(event);
        }
    }
}

#[async_trait]
impl FileService for ScriptedFiles {
    async fn upload(
        &self,
        path: &Path,
        _mime_type: &str,
        _display_name: &str,
    ) -> Result<RemoteFile, LlmError> {
        let content = std::fs::read(path).unwrap_or_default();
        *self.staged.lock().unwrap() = Some((path.to_path_buf(), path.exists(), content));
        self.record("upload".to_string());
        if self.fail_upload {
            return Err(LlmError::Api {
                status: 400,
                message: "upload rejected".to_string(),
            });
        }
        Ok(Self::file("files/staged", FileState::Processing))
    }

    async fn get(&self, name: &str) -> Result<RemoteFile, LlmError> {
        *self.gets.lock().unwrap() += 1;
        let state = {
            let mut last = self.last.lock().unwrap();
            if let Some(next) = self.states.lock().unwrap().pop_front() {
                *last = next;
            }
            *last
        };
        self.record(format!("get:{}", state.as_str()));
        Ok(Self::file(name, state))
    }
}

/// Records requested sleeps without waiting.
#[derive(Default)]
pub struct RecordingSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}
