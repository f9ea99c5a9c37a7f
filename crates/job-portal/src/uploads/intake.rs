use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use axum::http::StatusCode;
use mime::Mime;
use tracing::debug;

use super::policy::UploadPolicy;
use super::UploadError;

/// File part accepted by the policy, still held in memory.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub field: String,
    pub original_name: String,
    pub content_type: Mime,
    pub bytes: Bytes,
}

/// Text fields plus at most one file from a multipart body.
#[derive(Debug, Default)]
pub struct IntakeForm {
    pub fields: HashMap<String, String>,
    pub file: Option<IncomingFile>,
}

impl IntakeForm {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Drains the multipart stream, enforcing `policy` on file parts as they arrive.
///
/// File parts with an empty file name are what browsers send for an untouched
/// file input; they are skipped.
pub async fn read_form(
    multipart: &mut Multipart,
    policy: &UploadPolicy,
) -> Result<IntakeForm, UploadError> {
    let mut form = IntakeForm::default();
    let mut files_seen = 0usize;

    while let Some(field) = multipart.next_field().await.map_err(|err| multipart_error(err, policy))? {
        let name = field.name().unwrap_or_default().to_string();

        let Some(original_name) = field.file_name().map(str::to_string) else {
            let value = field
                .text()
                .await
                .map_err(|err| multipart_error(err, policy))?;
            form.fields.insert(name, value);
            continue;
        };
        if original_name.is_empty() {
            continue;
        }

        if name != policy.field {
            return Err(UploadError::UnexpectedField {
                field: name,
                expected: policy.field,
            });
        }
        files_seen += 1;
        if files_seen > policy.max_files {
            return Err(UploadError::TooManyFiles {
                limit: policy.max_files,
            });
        }

        let raw_type = field.content_type().unwrap_or_default().to_string();
        let content_type = raw_type
            .parse::<Mime>()
            .ok()
            .filter(|parsed| policy.allows(parsed))
            .ok_or_else(|| UploadError::InvalidType {
                received: if raw_type.is_empty() {
                    "unknown".to_string()
                } else {
                    raw_type.clone()
                },
            })?;

        let bytes = read_bounded(field, policy).await?;
        debug!(
            field = %name,
            original_name = %original_name,
            content_type = %content_type,
            size = bytes.len(),
            "file part received"
        );
        form.file = Some(IncomingFile {
            field: name,
            original_name,
            content_type,
            bytes,
        });
    }

    Ok(form)
}

async fn read_bounded(mut field: Field<'_>, policy: &UploadPolicy) -> Result<Bytes, UploadError> {
    let mut buffer = Vec::new();
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|err| multipart_error(err, policy))?
    {
        if buffer.len() + chunk.len() > policy.max_file_bytes {
            return Err(UploadError::FileTooLarge {
                limit: policy.max_file_bytes,
            });
        }
        buffer.extend_from_slice(&chunk);
    }
    Ok(Bytes::from(buffer))
}

fn multipart_error(err: MultipartError, policy: &UploadPolicy) -> UploadError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        UploadError::FileTooLarge {
            limit: policy.max_file_bytes,
        }
    } else {
        UploadError::Malformed(err.body_text())
    }
}
