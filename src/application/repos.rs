//! Repository traits describing content adapters.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::ContentEntry;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("content source error: {0}")]
    Source(String),
    #[error("entry `{id}` not found in collection `{collection}`")]
    NotFound { collection: String, id: String },
    #[error("invalid entry `{path}`: {message}")]
    InvalidEntry { path: String, message: String },
}

impl RepoError {
    pub fn from_source(err: impl std::fmt::Display) -> Self {
        Self::Source(err.to_string())
    }
}

/// Read access to content collections (`blog`, `notes`, …).
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// All entries of `collection`, ordered by id. Unknown collections are
    /// empty.
    async fn load_collection(&self, collection: &str) -> Result<Vec<ContentEntry>, RepoError>;

    async fn load_entry(&self, collection: &str, id: &str) -> Result<ContentEntry, RepoError> {
        self.load_collection(collection)
            .await?
            .into_iter()
            .find(|entry| entry.id == id)
            .ok_or_else(|| RepoError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })
    }
}
