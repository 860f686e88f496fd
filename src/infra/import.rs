//! JSON input for the `import` command.

use std::collections::BTreeMap;
use std::path::Path;

use super::error::InfraError;

pub type FieldSet = BTreeMap<String, String>;

/// Read a JSON array of objects mapping field names to string values.
pub async fn read_field_sets(path: &Path) -> Result<Vec<FieldSet>, InfraError> {
    let contents = tokio::fs::read_to_string(path).await?;
    parse_field_sets(&contents)
}

pub fn parse_field_sets(contents: &str) -> Result<Vec<FieldSet>, InfraError> {
    serde_json::from_str(contents)
        .map_err(|err| InfraError::input(format!("expected an array of string maps: {err}")))
}
