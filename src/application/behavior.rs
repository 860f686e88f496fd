//! Slug behavior bound to record lifecycle events.
//!
//! Before a record is inserted or updated, the configured target field is
//! filled from the source field (or kept, when set by hand) and made unique
//! against every *other* stored record.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::{debug, info};

use crate::application::repos::{RepoError, SlugLookup};
use crate::config::SlugSettings;
use crate::domain::entities::{FieldAccess, Record};
use crate::domain::error::DomainError;
use crate::domain::slug::{SlugAsyncError, SlugError, get_value_async};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    BeforeInsert,
    BeforeUpdate,
}

impl LifecycleEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BeforeInsert => "before_insert",
            Self::BeforeUpdate => "before_update",
        }
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown lifecycle event `{0}`")]
pub struct UnknownEvent(pub String);

impl FromStr for LifecycleEvent {
    type Err = UnknownEvent;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "before_insert" => Ok(Self::BeforeInsert),
            "before_update" => Ok(Self::BeforeUpdate),
            other => Err(UnknownEvent(other.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum BehaviorError {
    #[error(transparent)]
    Slug(#[from] SlugError),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<SlugAsyncError<RepoError>> for BehaviorError {
    fn from(err: SlugAsyncError<RepoError>) -> Self {
        match err {
            SlugAsyncError::Slug(err) => Self::Slug(err),
            SlugAsyncError::Predicate(err) => Self::Repo(err),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SlugBehavior {
    settings: SlugSettings,
}

impl SlugBehavior {
    pub fn new(settings: SlugSettings) -> Self {
        Self { settings }
    }

    pub fn handles(&self, event: LifecycleEvent) -> bool {
        self.settings.events.contains(&event)
    }

    /// Run the behavior for `event`, writing the resolved slug into the
    /// record's target field. Returns the assigned value, or `None` when the
    /// event is not bound.
    pub async fn apply(
        &self,
        event: LifecycleEvent,
        record: &mut Record,
        lookup: &dyn SlugLookup,
    ) -> Result<Option<String>, BehaviorError> {
        if !self.handles(event) {
            return Ok(None);
        }

        let SlugSettings {
            source_field,
            target_field,
            validate_unique,
            max_attempts,
            ..
        } = &self.settings;

        let current = record.get(target_field).unwrap_or_default();
        let source = record.get(source_field).unwrap_or_default();
        let record_id = record.id;

        let value = get_value_async(
            current,
            source,
            *validate_unique,
            *max_attempts,
            |candidate| {
                let candidate = candidate.to_string();
                async move {
                    let taken = lookup
                        .slug_taken(target_field, &candidate, Some(record_id))
                        .await?;
                    if taken {
                        metrics::counter!("slugline_slug_collisions_total").increment(1);
                    }
                    Ok::<bool, RepoError>(taken)
                }
            },
        )
        .await?;

        debug!(
            event = %event,
            record_id = %record_id,
            field = %target_field,
            value = %value,
            "resolved slug"
        );

        record.set(target_field, value.clone())?;
        metrics::counter!("slugline_slugs_assigned_total").increment(1);
        info!(record_id = %record_id, slug = %value, "assigned slug");

        Ok(Some(value))
    }
}
