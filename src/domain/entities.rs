//! Records whose slug field is derived by the lifecycle hooks.

use std::collections::BTreeMap;

use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use super::error::DomainError;

/// Named-field access used to bind the slug behavior to a record type.
pub trait FieldAccess {
    /// Current value of `name`, or `None` when the field is absent.
    fn get(&self, name: &str) -> Option<&str>;

    fn set(&mut self, name: &str, value: String) -> Result<(), DomainError>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub id: Uuid,
    pub fields: BTreeMap<String, String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Record {
    pub fn new(id: Uuid, fields: BTreeMap<String, String>) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id,
            fields,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overlay `fields` onto this record, replacing values that share a name.
    pub fn merge(&mut self, fields: BTreeMap<String, String>) {
        self.fields.extend(fields);
        self.updated_at = OffsetDateTime::now_utc();
    }
}

impl FieldAccess for Record {
    fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    fn set(&mut self, name: &str, value: String) -> Result<(), DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::validation("field name must not be empty"));
        }
        self.fields.insert(name.to_string(), value);
        Ok(())
    }
}
