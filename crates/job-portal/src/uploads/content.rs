use std::path::{Path, PathBuf};

use chrono::Utc;
use rand::Rng;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use super::intake::IncomingFile;
use super::policy::{canonical_extension, extension_matches};
use super::UploadError;

/// Route prefix the content directory is served under.
pub const PUBLIC_PREFIX: &str = "/uploads";

/// A file written to the content directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub filename: String,
    pub path: PathBuf,
    pub public_url: String,
}

/// Flat directory holding uploaded resumes.
#[derive(Debug, Clone)]
pub struct ContentStore {
    directory: PathBuf,
}

impl ContentStore {
    /// Creates the directory when missing.
    pub async fn open(directory: impl Into<PathBuf>) -> Result<Self, UploadError> {
        let directory = directory.into();
        tokio::fs::create_dir_all(&directory)
            .await
            .map_err(|source| UploadError::Io {
                path: directory.clone(),
                source,
            })?;
        info!(directory = %directory.display(), "content directory ready");
        Ok(Self { directory })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub async fn is_available(&self) -> bool {
        tokio::fs::metadata(&self.directory)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false)
    }

    pub async fn persist(&self, file: &IncomingFile) -> Result<StoredFile, UploadError> {
        let filename = storage_name(file);
        let path = self.directory.join(&filename);
        let io_error = |source: std::io::Error| UploadError::Io {
            path: path.clone(),
            source,
        };

        let mut handle = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(io_error)?;
        handle.write_all(&file.bytes).await.map_err(io_error)?;
        handle.flush().await.map_err(io_error)?;

        info!(filename = %filename, size = file.bytes.len(), "resume stored");
        Ok(StoredFile {
            public_url: public_url(&filename),
            filename,
            path,
        })
    }

    /// Best-effort removal of a file whose record never made it into the store.
    pub async fn discard(&self, stored: &StoredFile) {
        if let Err(err) = tokio::fs::remove_file(&stored.path).await {
            warn!(filename = %stored.filename, error = %err, "failed to remove orphaned upload");
        }
    }
}

/// Public URL for a stored file name or path.
pub fn public_url(stored: &str) -> String {
    let filename = Path::new(stored)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| stored.to_string());
    format!("{PUBLIC_PREFIX}/{filename}")
}

/// `{field}-{unix_millis}-{random}.{ext}`. The original extension is kept only
/// when it agrees with the accepted content type; otherwise the type's
/// canonical extension is used.
pub fn storage_name(file: &IncomingFile) -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
    let field: String = file
        .field
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    let field = if field.is_empty() { "file".to_string() } else { field };
    format!(
        "{field}-{}-{suffix}.{}",
        Utc::now().timestamp_millis(),
        extension_for(file)
    )
}

fn extension_for(file: &IncomingFile) -> String {
    let essence = file.content_type.essence_str();
    let from_name = Path::new(&file.original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| extension_matches(essence, ext))
        .map(str::to_ascii_lowercase);

    from_name
        .or_else(|| canonical_extension(essence).map(str::to_string))
        .unwrap_or_else(|| "bin".to_string())
}
