//! File staging: uploaded bytes → scoped temp file → provider file API → ACTIVE.
//!
//! The temp file is owned by a `TempPath` guard, so it is deleted on every exit
//! path, including early returns and a dropped request future.

use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempPath;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::llm_client::{FileService, FileState, LlmError, RemoteFile};

const TEMP_PREFIX: &str = "pathfinder-upload-";

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("failed to stage upload locally: {0}")]
    Io(#[from] std::io::Error),

    #[error("file service error: {0}")]
    Remote(#[from] LlmError),

    #[error("file {name} ended in state {state}")]
    Failed { name: String, state: String },

    #[error("file {name} still processing after {attempts} checks")]
    TimedOut { name: String, attempts: u32 },
}

/// How long to wait for a remote file to leave PROCESSING.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            max_attempts: 30,
        }
    }
}

#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// An uploaded file as received from a multipart form.
#[derive(Debug, Clone, Copy)]
pub struct Upload<'a> {
    pub bytes: &'a [u8],
    pub mime_type: &'a str,
    pub file_name: &'a str,
}

/// Stages `upload` with the provider and waits until it can be referenced in a prompt.
/// No temp file from this call exists once it returns.
pub async fn stage_upload(
    files: &dyn FileService,
    sleeper: &dyn Sleeper,
    policy: PollPolicy,
    upload: Upload<'_>,
) -> Result<RemoteFile, UploadError> {
    let staged = write_temp(upload.bytes).await?;
    let display_name = display_name(upload.file_name);

    let result = upload_and_wait(files, sleeper, policy, &staged, upload.mime_type, &display_name).await;

    if let Err(e) = staged.close() {
        warn!("Failed to remove staged upload: {e}");
    }
    result
}

async fn upload_and_wait(
    files: &dyn FileService,
    sleeper: &dyn Sleeper,
    policy: PollPolicy,
    staged: &TempPath,
    mime_type: &str,
    display_name: &str,
) -> Result<RemoteFile, UploadError> {
    let file = files.upload(staged, mime_type, display_name).await?;
    info!("Uploaded file {} as: {}", display_name, file.uri);
    wait_until_active(files, sleeper, policy, file).await
}

async fn write_temp(bytes: &[u8]) -> Result<TempPath, UploadError> {
    let (file, path) = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .tempfile()?
        .into_parts();
    let mut file = tokio::fs::File::from_std(file);
    file.write_all(bytes).await?;
    file.flush().await?;
    Ok(path)
}

/// Polls the file until it leaves PROCESSING, sleeping `policy.interval` between checks.
pub async fn wait_until_active(
    files: &dyn FileService,
    sleeper: &dyn Sleeper,
    policy: PollPolicy,
    file: RemoteFile,
) -> Result<RemoteFile, UploadError> {
    let max_attempts = policy.max_attempts.max(1);
    let mut current = files.get(&file.name).await?;
    let mut attempts = 1;

    while current.state == FileState::Processing {
        if attempts >= max_attempts {
            return Err(UploadError::TimedOut {
                name: file.name,
                attempts,
            });
        }
        debug!("File {} still processing (check {attempts})", file.name);
        sleeper.sleep(policy.interval).await;
        current = files.get(&file.name).await?;
        attempts += 1;
    }

    match current.state {
        FileState::Active => {
            debug!("File {} is active", current.name);
            Ok(current)
        }
        state => Err(UploadError::Failed {
            name: current.name,
            state: state.as_str().to_string(),
        }),
    }
}

/// Strips directory components and control characters from a client-supplied name.
fn display_name(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_control())
        .collect::<String>();
    let base = base.trim();
    if base.is_empty() {
        "upload".to_string()
    } else {
        base.to_string()
    }
}
