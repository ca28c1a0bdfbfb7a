//! Flat key-value store backed by a single JSON document on disk
//!
//! The document is one JSON object mapping arbitrary string keys to arbitrary
//! JSON values; clients define the shape of every value. Every mutation is a
//! full read-modify-write of the document, pretty-printed back to disk.

use crate::error::ApiError;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

/// The full store document: one flat JSON object.
pub type Document = Map<String, Value>;

pub struct Store {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process so concurrent
    // puts cannot drop each other's keys. Writers in other processes are not
    // coordinated; last writer wins.
    write_lock: Mutex<()>,
}

impl Store {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    /// Read the full document.
    ///
    /// Self-healing: an absent file, unreadable content, invalid JSON, or a
    /// non-object top level all yield an empty document instead of an error.
    /// The file is created with `{}` on first access.
    pub async fn get_all(&self) -> Document {
        self.ensure_file().await;
        self.read_document().await
    }

    /// Look up one key. `Ok(None)` when the key is absent.
    pub async fn get_one(&self, key: &str) -> Result<Option<Value>, ApiError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(ApiError::invalid("Missing key"));
        }
        Ok(self.get_all().await.get(key).cloned())
    }

    /// Merge `{key: value}` into the document and persist the whole document,
    /// overwriting any prior value for that key.
    pub async fn put(&self, key: &str, value: Value) -> Result<(), ApiError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(ApiError::invalid("Missing key"));
        }

        let _guard = self.write_lock.lock().await;
        let mut doc = {
            self.ensure_file().await;
            self.read_document().await
        };
        doc.insert(key.to_string(), value);
        self.write_document(&doc).await
    }

    async fn ensure_file(&self) {
        if !self.path.exists() {
            if let Err(e) = fs::write(&self.path, "{}").await {
                crate::logger::log_warning(&format!(
                    "Failed to bootstrap store file '{}': {e}",
                    self.path.display()
                ));
            }
        }
    }

    async fn read_document(&self) -> Document {
        match fs::read_to_string(&self.path).await {
            Ok(raw) => match serde_json::from_str::<Value>(&raw) {
                Ok(Value::Object(map)) => map,
                _ => Document::new(),
            },
            Err(_) => Document::new(),
        }
    }

    async fn write_document(&self, doc: &Document) -> Result<(), ApiError> {
        let json = serde_json::to_string_pretty(doc).map_err(std::io::Error::other)?;
        fs::write(&self.path, json).await?;
        Ok(())
    }
}
