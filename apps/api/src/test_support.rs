//! Router-level test harness: real routes, scripted collaborators.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use crate::llm_client::mock::{RecordingSleeper, ScriptedFiles, ScriptedModel};
use crate::llm_client::staging::PollPolicy;
use crate::llm_client::FileState;
use crate::routes::build_router;
use crate::session::AUTH_EMAIL_HEADER;
use crate::speech::Transcriber;
use crate::state::AppState;
use crate::store::InMemoryUserStore;

const BOUNDARY: &str = "pathfinder-test-boundary";

pub struct Harness {
    pub model: Arc<ScriptedModel>,
    pub files: Arc<ScriptedFiles>,
    pub store: Arc<InMemoryUserStore>,
    pub sleeper: Arc<RecordingSleeper>,
    pub transcriber: Option<Arc<dyn Transcriber>>,
}

impl Harness {
    pub fn new(model: ScriptedModel) -> Self {
        Self {
            model: Arc::new(model),
            files: Arc::new(ScriptedFiles::new(vec![FileState::Active])),
            store: Arc::new(InMemoryUserStore::default()),
            sleeper: Arc::new(RecordingSleeper::default()),
            transcriber: None,
        }
    }

    pub fn with_files(mut self, files: ScriptedFiles) -> Self {
        self.files = Arc::new(files);
        self
    }

    pub fn with_store(mut self, store: InMemoryUserStore) -> Self {
        self.store = Arc::new(store);
        self
    }

    pub fn with_transcriber(mut self, transcriber: Arc<dyn Transcriber>) -> Self {
        self.transcriber = Some(transcriber);
        self
    }

    fn state(&self) -> AppState {
        AppState {
            store: self.store.clone(),
            llm: self.model.clone(),
            files: self.files.clone(),
            sleeper: self.sleeper.clone(),
            transcriber: self.transcriber.clone(),
            poll_policy: PollPolicy::default(),
        }
    }

    /// Sends one request through a fresh router and returns status plus JSON body.
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = build_router(self.state()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, body)
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn authed_get(uri: &str, email: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(AUTH_EMAIL_HEADER, email)
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    json_request(Method::POST, uri, body, None)
}

pub fn json_request(method: Method, uri: &str, body: Value, email: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(email) = email {
        builder = builder.header(AUTH_EMAIL_HEADER, email);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// One multipart field; `file` is `(file name, content type)` for file parts.
#[derive(Clone, Copy)]
pub struct Field<'a> {
    pub name: &'a str,
    pub file: Option<(&'a str, &'a str)>,
    pub data: &'a [u8],
}

impl<'a> Field<'a> {
    pub fn text(name: &'a str, value: &'a str) -> Self {
        Self {
            name,
            file: None,
            data: value.as_bytes(),
        }
    }

    pub fn file(name: &'a str, file_name: &'a str, content_type: &'a str, data: &'a [u8]) -> Self {
        Self {
            name,
            file: Some((file_name, content_type)),
            data,
        }
    }
}

pub fn multipart(uri: &str, fields: &[Field<'_>]) -> Request<Body> {
    let mut body = Vec::new();
    for field in fields {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match field.file {
            Some((file_name, content_type)) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n",
                        field.name
                    )
                    .as_bytes(),
                );
            }
            None => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                        field.name
                    )
                    .as_bytes(),
                );
            }
        }
        body.extend_from_slice(field.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}
