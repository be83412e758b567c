//! Buffered multipart forms for the document and audio endpoints.

use std::collections::HashMap;

use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use bytes::Bytes;

use crate::errors::AppError;

#[derive(Debug, Clone)]
pub struct FilePart {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// All fields of a multipart body: text fields by name, file fields by name.
#[derive(Debug, Default)]
pub struct UploadForm {
    text: HashMap<String, String>,
    files: HashMap<String, FilePart>,
}

impl From<MultipartError> for AppError {
    fn from(e: MultipartError) -> Self {
        AppError::Validation(format!("Invalid multipart body: {}", e.body_text()))
    }
}

impl UploadForm {
    pub async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = UploadForm::default();
        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let content_type = field
                        .content_type()
                        .unwrap_or("application/octet-stream")
                        .to_string();
                    let bytes = field.bytes().await?;
                    form.files.insert(
                        name,
                        FilePart {
                            file_name,
                            content_type,
                            bytes,
                        },
                    );
                }
                None => {
                    form.text.insert(name, field.text().await?);
                }
            }
        }
        Ok(form)
    }

    /// A text field, trimmed; blank counts as absent.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.text
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// A non-empty file field, or a 400 naming what is missing.
    pub fn file(&self, name: &str, missing: &str) -> Result<&FilePart, AppError> {
        self.files
            .get(name)
            .filter(|f| !f.bytes.is_empty())
            .ok_or_else(|| AppError::Validation(missing.to_string()))
    }
}

impl FilePart {
    pub fn is_pdf(&self) -> bool {
        self.content_type == "application/pdf"
            || self.file_name.to_ascii_lowercase().ends_with(".pdf")
            || self.bytes.starts_with(b"%PDF")
    }
}
