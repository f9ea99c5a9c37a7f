//! Resume intake: multipart parsing, type and size limits, and the content directory.

pub mod content;
pub mod intake;
pub mod policy;

#[cfg(test)]
pub(crate) mod testing;

use std::path::PathBuf;

use crate::error::{ApiError, ErrorKind};

pub use content::{ContentStore, StoredFile};
pub use intake::{read_form, IncomingFile, IntakeForm};
pub use policy::UploadPolicy;

/// Error raised while receiving or storing an uploaded file.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("file too large: maximum size is {} MB", .limit / (1024 * 1024))]
    FileTooLarge { limit: usize },
    #[error("too many files: only {limit} file may be uploaded")]
    TooManyFiles { limit: usize },
    #[error("invalid file type '{received}': only PDF, DOC, DOCX, JPG and PNG files are allowed")]
    InvalidType { received: String },
    #[error("unexpected file field '{field}': upload the file as '{expected}'")]
    UnexpectedField {
        field: String,
        expected: &'static str,
    },
    #[error("malformed multipart body: {0}")]
    Malformed(String),
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl UploadError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            UploadError::FileTooLarge { .. } => ErrorKind::FileTooLarge,
            UploadError::TooManyFiles { .. } => ErrorKind::TooManyFiles,
            UploadError::InvalidType { .. } => ErrorKind::FileTypeInvalid,
            UploadError::UnexpectedField { .. } | UploadError::Malformed(_) => ErrorKind::Upload,
            UploadError::Io { .. } => ErrorKind::Internal,
        }
    }
}

impl From<UploadError> for ApiError {
    fn from(error: UploadError) -> Self {
        ApiError::new(error.kind(), error.to_string())
    }
}
