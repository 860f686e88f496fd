use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::instrument;
use uuid::Uuid;

use crate::application::behavior::{BehaviorError, LifecycleEvent, SlugBehavior};
use crate::application::repos::{RecordsRepo, RecordsWriteRepo, RepoError, SlugLookup};
use crate::domain::entities::Record;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error(transparent)]
    Behavior(#[from] BehaviorError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Creates and updates records, running the slug behavior before each write.
#[derive(Clone)]
pub struct RecordService {
    reader: Arc<dyn RecordsRepo>,
    writer: Arc<dyn RecordsWriteRepo>,
    lookup: Arc<dyn SlugLookup>,
    behavior: SlugBehavior,
}

impl RecordService {
    pub fn new(
        reader: Arc<dyn RecordsRepo>,
        writer: Arc<dyn RecordsWriteRepo>,
        lookup: Arc<dyn SlugLookup>,
        behavior: SlugBehavior,
    ) -> Self {
        Self {
            reader,
            writer,
            lookup,
            behavior,
        }
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<Record>, RecordError> {
        self.reader.find_by_id(id).await.map_err(RecordError::from)
    }

    pub async fn list_all(&self) -> Result<Vec<Record>, RecordError> {
        self.reader.list_all().await.map_err(RecordError::from)
    }

    #[instrument(skip_all)]
    pub async fn create(&self, fields: BTreeMap<String, String>) -> Result<Record, RecordError> {
        let mut record = Record::new(Uuid::new_v4(), fields);
        self.behavior
            .apply(
                LifecycleEvent::BeforeInsert,
                &mut record,
                self.lookup.as_ref(),
            )
            .await?;

        let record = self.writer.insert(record).await?;
        Ok(record)
    }

    #[instrument(skip(self, fields))]
    pub async fn update(
        &self,
        id: Uuid,
        fields: BTreeMap<String, String>,
    ) -> Result<Record, RecordError> {
        let mut record = self
            .reader
            .find_by_id(id)
            .await?
            .ok_or(RepoError::NotFound)?;

        record.merge(fields);
        self.behavior
            .apply(
                LifecycleEvent::BeforeUpdate,
                &mut record,
                self.lookup.as_ref(),
            )
            .await?;

        let record = self.writer.update(record).await?;
        Ok(record)
    }
}
