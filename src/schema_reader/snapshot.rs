use std::path::Path;
use tracing::info;

use crate::error::{ModelGenError, ModelGenResult};
use crate::schema_reader::SchemaReader;
use crate::types::{ColumnDescriptor, SchemaSnapshot, TableDescriptor};

/// Serves schema metadata from a JSON snapshot instead of a live database
#[derive(Debug, Clone, Default)]
pub struct SnapshotSchemaReader {
    snapshot: SchemaSnapshot,
}

impl SnapshotSchemaReader {
    pub fn new(tables: Vec<TableDescriptor>) -> Self {
        Self {
            snapshot: SchemaSnapshot { tables },
        }
    }

    /// Load a snapshot file written by `modelgen snapshot`
    pub fn from_file(path: &Path) -> ModelGenResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ModelGenError::schema_access(format!(
                "Failed to read snapshot {}: {}",
                path.display(),
                e
            ))
        })?;
        let reader = Self::from_json(&contents)?;
        info!(
            path = %path.display(),
            tables = reader.snapshot.tables.len(),
            "Loaded schema snapshot"
        );
        Ok(reader)
    }

    pub fn from_json(json: &str) -> ModelGenResult<Self> {
        let snapshot: SchemaSnapshot = serde_json::from_str(json)?;
        Ok(Self { snapshot })
    }

    pub fn snapshot(&self) -> &SchemaSnapshot {
        &self.snapshot
    }
}

impl SchemaReader for SnapshotSchemaReader {
    async fn list_table_names(&self) -> ModelGenResult<Vec<String>> {
        Ok(self.snapshot.tables.iter().map(|t| t.name.clone()).collect())
    }

    /// A table listed more than once resolves to its last entry
    async fn list_columns(&self, table_name: &str) -> ModelGenResult<Vec<ColumnDescriptor>> {
        self.snapshot
            .tables
            .iter()
            .rfind(|t| t.name == table_name)
            .map(|t| t.columns.clone())
            .ok_or_else(|| {
                ModelGenError::schema_access(format!("Table '{}' not found in snapshot", table_name))
            })
    }
}

/// Serialize a schema as a pretty-printed JSON snapshot
pub fn snapshot_to_json(tables: Vec<TableDescriptor>) -> ModelGenResult<String> {
    Ok(serde_json::to_string_pretty(&SchemaSnapshot { tables })?)
}
