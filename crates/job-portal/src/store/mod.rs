//! Document store backing the user, job, and application collections.

pub mod collection;
pub mod database;

use std::path::PathBuf;

pub use collection::Collection;
pub use database::Database;

/// Where collections live, parsed from `DATABASE_URL`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    Memory,
    Directory(PathBuf),
}

impl StoreLocation {
    /// Accepts `memory://` (or bare `memory`) and `file://<dir>`.
    pub fn parse(url: &str) -> Option<Self> {
        let url = url.trim();
        if url == "memory" || url == "memory://" {
            return Some(Self::Memory);
        }
        let directory = url.strip_prefix("file://")?;
        if directory.is_empty() {
            return None;
        }
        Some(Self::Directory(PathBuf::from(directory)))
    }
}

/// Error raised by the document store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("a matching document already exists in '{collection}'")]
    Duplicate { collection: &'static str },
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("collection file {} is corrupt: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode '{collection}': {source}")]
    Encode {
        collection: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
