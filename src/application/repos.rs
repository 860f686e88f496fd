//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::entities::Record;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Answers whether a slug value is already held by another record.
#[async_trait]
pub trait SlugLookup: Send + Sync {
    /// `true` when some record other than `exclude` stores `value` in `field`.
    async fn slug_taken(
        &self,
        field: &str,
        value: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, RepoError>;
}

#[async_trait]
pub trait RecordsRepo: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Record>, RepoError>;

    async fn list_all(&self) -> Result<Vec<Record>, RepoError>;
}

#[async_trait]
pub trait RecordsWriteRepo: Send + Sync {
    async fn insert(&self, record: Record) -> Result<Record, RepoError>;

    async fn update(&self, record: Record) -> Result<Record, RepoError>;
}
