use serde::{Deserialize, Serialize};

use crate::error::{ModelGenError, ModelGenResult};

/// A table as reported by the schema catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDescriptor {
    /// Table name
    pub name: String,
    /// Columns in declaration order
    pub columns: Vec<ColumnDescriptor>,
}

/// A single column as reported by the schema catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Column name
    pub name: String,
    /// Raw SQL type token (e.g. "varchar", "int")
    pub source_type: String,
    /// Whether the column allows NULL values
    pub nullable: bool,
    /// Whether the catalog lists the column in the table's primary key
    #[serde(default)]
    pub primary_key: bool,
}

impl TableDescriptor {
    pub fn new(name: impl Into<String>, columns: Vec<ColumnDescriptor>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, source_type: impl Into<String>, nullable: bool) -> Self {
        Self {
            name: name.into(),
            source_type: source_type.into(),
            nullable,
            primary_key: false,
        }
    }

    /// Mark the column as part of the catalog primary key
    pub fn with_primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }
}

/// Serialized form of a whole schema, used for snapshot files
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaSnapshot {
    pub tables: Vec<TableDescriptor>,
}

/// Generated source for one table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedDeclaration {
    /// Table the declaration was generated from
    pub table_name: String,
    /// File name the declaration should be written under
    pub file_name: String,
    /// Full declaration text
    pub source_text: String,
    /// Number of field entries emitted
    pub field_count: usize,
    /// Columns whose type resolved to the fallback type
    pub fallback_columns: Vec<String>,
}

/// Result of processing a single table in a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TableOutcome {
    Generated {
        table: String,
        field_count: usize,
        fallback_columns: Vec<String>,
    },
    Failed {
        table: String,
        reason: String,
    },
}

impl TableOutcome {
    pub fn table(&self) -> &str {
        match self {
            Self::Generated { table, .. } | Self::Failed { table, .. } => table,
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, Self::Generated { .. })
    }

    /// Line written to the summary log for this outcome
    pub fn log_line(&self) -> String {
        match self {
            Self::Generated { table, .. } => format!("Model created for table: {}", table),
            Self::Failed { table, reason } => {
                format!("Model generation failed for table: {}: {}", table, reason)
            }
        }
    }
}

/// Overall status of a batch run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    Success,
    Partial,
    Failure,
}

/// Check that a name is a plain identifier: a letter or underscore followed by
/// letters, digits or underscores.
pub fn validate_identifier(name: &str) -> ModelGenResult<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|c| c.is_alphanumeric() || c == '_')
        }
        _ => false,
    };

    if valid {
        Ok(())
    } else {
        Err(ModelGenError::invalid_identifier(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_identifier() {
        assert!(validate_identifier("Customers").is_ok());
        assert!(validate_identifier("_audit_log2").is_ok());
        assert!(validate_identifier("Straße").is_ok());

        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("2fa_codes").is_err());
        assert!(validate_identifier("order items").is_err());
        assert!(validate_identifier("users'; DROP TABLE users; --").is_err());
        assert!(validate_identifier("public.users").is_err());
    }

    #[test]
    fn test_outcome_log_lines() {
        let ok = TableOutcome::Generated {
            table: "Orders".to_string(),
            field_count: 3,
            fallback_columns: vec![],
        };
        assert_eq!(ok.log_line(), "Model created for table: Orders");
        assert!(ok.is_generated());

        let failed = TableOutcome::Failed {
            table: "Bad Table".to_string(),
            reason: "Invalid identifier: 'Bad Table'".to_string(),
        };
        assert_eq!(
            failed.log_line(),
            "Model generation failed for table: Bad Table: Invalid identifier: 'Bad Table'"
        );
        assert_eq!(failed.table(), "Bad Table");
    }

    #[test]
    fn test_snapshot_primary_key_defaults_to_false() {
        let json = r#"{"tables":[{"name":"T","columns":[{"name":"c","source_type":"int","nullable":true}]}]}"#;
        let snapshot: SchemaSnapshot = serde_json::from_str(json).unwrap();
        assert!(!snapshot.tables[0].columns[0].primary_key);
        assert!(snapshot.tables[0].columns[0].nullable);
    }
}
