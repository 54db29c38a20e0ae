//! Document cache: where processed outlines are kept.
//!
//! The processor only sees the [`DocumentCache`] trait. The filesystem
//! implementation stores one pretty-printed `{key}.json` file per document,
//! UTF-8 with non-ASCII characters written as-is.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use miette::Diagnostic;
use thiserror::Error;

use crate::outline::model::Document;

#[derive(Debug, Error, Diagnostic)]
pub enum CacheError {
    #[error("cache I/O error at {path}: {source}")]
    #[diagnostic(
        code(bdrc::cache::io),
        help(
            "Failed to read or write a cached document. Check that the cache \
             directory exists and has correct permissions."
        )
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cached document {key} could not be (de)serialized: {message}")]
    #[diagnostic(
        code(bdrc::cache::serde),
        help("The cached file is corrupt or from an incompatible version. Delete it and re-run.")
    )]
    Serde { key: String, message: String },

    #[error("invalid cache key \"{key}\"")]
    #[diagnostic(
        code(bdrc::cache::invalid_key),
        help("Cache keys are outline ids plus a suffix and may not contain path separators.")
    )]
    InvalidKey { key: String },
}

pub type CacheResult<T> = std::result::Result<T, CacheError>;

/// Storage for processed documents.
pub trait DocumentCache {
    fn put(&self, key: &str, document: &Document) -> CacheResult<()>;
    fn get(&self, key: &str) -> CacheResult<Option<Document>>;
}

/// Cache key of the full document of an outline.
pub fn full_key(outline_id: &str) -> String {
    format!("{outline_id}_annotations_full")
}

/// Cache key of the public document of an outline.
pub fn public_key(outline_id: &str) -> String {
    format!("{outline_id}_annotations")
}

/// One JSON file per key in a directory.
#[derive(Debug, Clone)]
pub struct FsDocumentCache {
    dir: PathBuf,
}

impl FsDocumentCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> CacheResult<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(CacheError::InvalidKey { key: key.into() });
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl DocumentCache for FsDocumentCache {
    fn put(&self, key: &str, document: &Document) -> CacheResult<()> {
        let path = self.path_for(key)?;
        tracing::info!(path = %path.display(), "saving document");
        write_document(&path, document).map_err(|e| match e {
            CacheError::Serde { message, .. } => CacheError::Serde {
                key: key.into(),
                message,
            },
            other => other,
        })
    }

    fn get(&self, key: &str) -> CacheResult<Option<Document>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let data = std::fs::read_to_string(&path).map_err(|e| CacheError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        serde_json::from_str(&data)
            .map(Some)
            .map_err(|e| CacheError::Serde {
                key: key.into(),
                message: e.to_string(),
            })
    }
}

/// In-process cache, for tests and one-shot runs.
#[derive(Debug, Default)]
pub struct MemoryDocumentCache {
    documents: Mutex<HashMap<String, Document>>,
}

impl MemoryDocumentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.documents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DocumentCache for MemoryDocumentCache {
    fn put(&self, key: &str, document: &Document) -> CacheResult<()> {
        // A poisoned lock only means another writer panicked mid-insert.
        let mut documents = self
            .documents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        documents.insert(key.to_string(), document.clone());
        Ok(())
    }

    fn get(&self, key: &str) -> CacheResult<Option<Document>> {
        let documents = self
            .documents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(documents.get(key).cloned())
    }
}

/// Write a document as pretty JSON, creating parent directories.
pub fn write_document(path: &Path, document: &Document) -> CacheResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| CacheError::Io {
            path: parent.display().to_string(),
            source: e,
        })?;
    }
    let json = serde_json::to_string_pretty(document).map_err(|e| CacheError::Serde {
        key: path.display().to_string(),
        message: e.to_string(),
    })?;
    std::fs::write(path, json).map_err(|e| CacheError::Io {
        path: path.display().to_string(),
        source: e,
    })
}
