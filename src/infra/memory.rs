//! In-memory record storage.
//!
//! Holds records by id plus a slug index over the configured target field.
//! The index is the storage-level uniqueness backstop: two writers that both
//! resolved the same free slug cannot both commit it.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::{DashMap, mapref::entry::Entry};
use tracing::warn;
use uuid::Uuid;

use crate::application::repos::{RecordsRepo, RecordsWriteRepo, RepoError, SlugLookup};
use crate::domain::entities::{FieldAccess, Record};

#[derive(Clone)]
pub struct InMemoryRecords {
    target_field: Arc<str>,
    records: Arc<DashMap<Uuid, Record>>,
    slugs: Arc<DashMap<String, Uuid>>,
}

impl InMemoryRecords {
    pub fn new(target_field: impl Into<Arc<str>>) -> Self {
        Self {
            target_field: target_field.into(),
            records: Arc::new(DashMap::new()),
            slugs: Arc::new(DashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn slug_of<'a>(&self, record: &'a Record) -> Option<&'a str> {
        record
            .get(&self.target_field)
            .filter(|value| !value.is_empty())
    }

    fn claim(&self, slug: &str, id: Uuid) -> Result<(), RepoError> {
        match self.slugs.entry(slug.to_string()) {
            Entry::Occupied(entry) if *entry.get() != id => {
                warn!(slug, owner = %entry.get(), "rejecting duplicate slug");
                Err(RepoError::Duplicate {
                    constraint: format!("{}_unique", self.target_field),
                })
            }
            Entry::Occupied(_) => Ok(()),
            Entry::Vacant(entry) => {
                entry.insert(id);
                Ok(())
            }
        }
    }

    fn release(&self, slug: &str, id: Uuid) {
        self.slugs.remove_if(slug, |_, owner| *owner == id);
    }
}

#[async_trait]
impl SlugLookup for InMemoryRecords {
    async fn slug_taken(
        &self,
        field: &str,
        value: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, RepoError> {
        if field == &*self.target_field {
            let owner = self.slugs.get(value).map(|entry| *entry.value());
            return Ok(owner.is_some_and(|owner| Some(owner) != exclude));
        }

        Ok(self.records.iter().any(|entry| {
            Some(*entry.key()) != exclude && entry.value().get(field) == Some(value)
        }))
    }
}

#[async_trait]
impl RecordsRepo for InMemoryRecords {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Record>, RepoError> {
        Ok(self.records.get(&id).map(|entry| entry.value().clone()))
    }

    async fn list_all(&self) -> Result<Vec<Record>, RepoError> {
        let mut records: Vec<Record> = self
            .records
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(records)
    }
}

#[async_trait]
impl RecordsWriteRepo for InMemoryRecords {
    async fn insert(&self, record: Record) -> Result<Record, RepoError> {
        if self.records.contains_key(&record.id) {
            return Err(RepoError::Duplicate {
                constraint: "records_pkey".to_string(),
            });
        }

        if let Some(slug) = self.slug_of(&record) {
            self.claim(slug, record.id)?;
        }

        self.records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update(&self, record: Record) -> Result<Record, RepoError> {
        let previous = self
            .records
            .get(&record.id)
            .map(|entry| self.slug_of(entry.value()).map(str::to_string))
            .ok_or(RepoError::NotFound)?;

        let next = self.slug_of(&record);
        if let Some(slug) = next {
            self.claim(slug, record.id)?;
        }
        if let Some(previous) = previous.as_deref()
            && next != Some(previous)
        {
            self.release(previous, record.id);
        }

        self.records.insert(record.id, record.clone());
        Ok(record)
    }
}
