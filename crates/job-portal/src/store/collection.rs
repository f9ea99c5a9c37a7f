use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::debug;

use super::StoreError;

/// Ordered set of documents, optionally mirrored to `<dir>/<name>.json`.
///
/// Writers hold the lock across the uniqueness check, the push, and the file
/// rewrite, so a conflicting concurrent insert always observes the winner.
pub struct Collection<T> {
    name: &'static str,
    documents: RwLock<Vec<T>>,
    file: Option<PathBuf>,
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync,
{
    pub fn in_memory(name: &'static str) -> Self {
        Self {
            name,
            documents: RwLock::new(Vec::new()),
            file: None,
        }
    }

    /// Loads `<directory>/<name>.json` if present; a missing file is an empty collection.
    pub async fn open(name: &'static str, directory: &Path) -> Result<Self, StoreError> {
        let path = directory.join(format!("{name}.json"));
        let documents = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Vec::new(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
                path: path.clone(),
                source,
            })?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        debug!(collection = name, documents = documents.len(), "collection loaded");

        Ok(Self {
            name,
            documents: RwLock::new(documents),
            file: Some(path),
        })
    }

    /// Appends `document` unless an existing document satisfies `conflicts`.
    pub async fn insert_unique<F>(&self, document: T, conflicts: F) -> Result<T, StoreError>
    where
        F: Fn(&T) -> bool + Send,
    {
        let mut documents = self.documents.write().await;
        if documents.iter().any(|existing| conflicts(existing)) {
            return Err(StoreError::Duplicate {
                collection: self.name,
            });
        }

        documents.push(document.clone());
        if let Err(err) = self.flush(&documents).await {
            documents.pop();
            return Err(err);
        }
        Ok(document)
    }

    pub async fn find_one<F>(&self, predicate: F) -> Option<T>
    where
        F: Fn(&T) -> bool + Send,
    {
        let documents = self.documents.read().await;
        documents.iter().find(|document| predicate(document)).cloned()
    }

    /// Matching documents in insertion order.
    pub async fn filter<F>(&self, predicate: F) -> Vec<T>
    where
        F: Fn(&T) -> bool + Send,
    {
        let documents = self.documents.read().await;
        documents
            .iter()
            .filter(|document| predicate(document))
            .cloned()
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn flush(&self, documents: &[T]) -> Result<(), StoreError> {
        let Some(path) = &self.file else {
            return Ok(());
        };
        let encoded =
            serde_json::to_vec_pretty(documents).map_err(|source| StoreError::Encode {
                collection: self.name,
                source,
            })?;

        let staging = path.with_extension("json.tmp");
        tokio::fs::write(&staging, &encoded)
            .await
            .map_err(|source| StoreError::Io {
                path: staging.clone(),
                source,
            })?;
        tokio::fs::rename(&staging, path)
            .await
            .map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })
    }
}
