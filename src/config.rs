use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::codegen::type_mapper::{TypeMapping, TypeRule, DEFAULT_FALLBACK_TYPE};
use crate::codegen::{DeclarationOptions, KeyDetection};
use crate::error::{ModelGenError, ModelGenResult};
use crate::types::validate_identifier;

/// Top-level generator configuration, usually loaded from `modelgen.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Namespace the generated classes are placed in
    pub namespace: String,
    /// Directory generated files are written to
    pub output_dir: PathBuf,
    /// Name of the summary log file written next to the models
    pub log_file_name: String,
    /// Extension appended to each table name to form its file name
    pub file_extension: String,
    /// How `[Key]` markers are decided
    pub key_detection: KeyDetection,
    /// Column name treated as the key under `naming_convention` detection.
    /// This is a naming convention only; no schema metadata is consulted.
    pub key_column_name: String,
    /// Emit `[Table("name")]` above each class
    pub emit_table_attribute: bool,
    /// Emit `[Column("name")]` above each property
    pub emit_column_attributes: bool,
    /// Tables whose names start with any of these prefixes are skipped
    pub exclude_prefixes: Vec<String>,
    /// Type used for unrecognized source types
    pub fallback_type: String,
    /// Extra or replacement type rules, keyed by source type token
    pub type_overrides: BTreeMap<String, TypeRule>,
    /// Database connection settings
    pub database: DatabaseConfig,
}

/// Settings for the PostgreSQL schema reader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Schema (namespace) whose tables are read
    pub schema: String,
    /// Maximum pooled connections
    pub max_connections: usize,
    /// Seconds to wait for a connection
    pub connect_timeout_secs: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            namespace: "AIModelGen.Models".to_string(),
            output_dir: PathBuf::from("Models").join("GenDBModels"),
            log_file_name: "ModelLog.txt".to_string(),
            file_extension: ".cs".to_string(),
            key_detection: KeyDetection::NamingConvention,
            key_column_name: "Id".to_string(),
            emit_table_attribute: false,
            emit_column_attributes: false,
            exclude_prefixes: Vec::new(),
            fallback_type: DEFAULT_FALLBACK_TYPE.to_string(),
            type_overrides: BTreeMap::new(),
            database: DatabaseConfig::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            schema: "public".to_string(),
            max_connections: 2,
            connect_timeout_secs: 30,
        }
    }
}

impl DatabaseConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl GeneratorConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> ModelGenResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ModelGenError::configuration(format!(
                "Failed to read config {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parse configuration from TOML text and validate it
    pub fn from_toml_str(contents: &str) -> ModelGenResult<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would produce unusable output
    pub fn validate(&self) -> ModelGenResult<()> {
        if self.namespace.trim().is_empty() {
            return Err(ModelGenError::configuration("namespace must not be empty"));
        }
        if self
            .namespace
            .split('.')
            .any(|segment| validate_identifier(segment).is_err())
        {
            return Err(ModelGenError::configuration(format!(
                "namespace '{}' must be dot-separated identifiers",
                self.namespace
            )));
        }
        if self.file_extension.is_empty() {
            return Err(ModelGenError::configuration("file_extension must not be empty"));
        }
        if self.log_file_name.trim().is_empty() {
            return Err(ModelGenError::configuration("log_file_name must not be empty"));
        }
        if !is_type_name(&self.fallback_type) {
            return Err(ModelGenError::configuration(format!(
                "fallback_type '{}' is not a valid type name",
                self.fallback_type
            )));
        }
        if self.key_detection == KeyDetection::NamingConvention
            && self.key_column_name.is_empty()
        {
            return Err(ModelGenError::configuration(
                "key_column_name must be set for naming_convention key detection",
            ));
        }
        for (token, rule) in &self.type_overrides {
            if !is_type_name(&rule.target) {
                return Err(ModelGenError::configuration(format!(
                    "type override for '{}' has invalid target '{}'",
                    token, rule.target
                )));
            }
        }
        if self.database.max_connections == 0 {
            return Err(ModelGenError::configuration(
                "database.max_connections must be at least 1",
            ));
        }
        Ok(())
    }

    /// Build the type mapping: defaults, then fallback, then overrides
    pub fn type_mapping(&self) -> TypeMapping {
        let mut mapping = TypeMapping::default();
        mapping.set_fallback_type(self.fallback_type.clone());
        mapping.extend(self.type_overrides.clone());
        mapping
    }

    pub fn declaration_options(&self) -> DeclarationOptions {
        DeclarationOptions {
            namespace: self.namespace.clone(),
            file_extension: self.file_extension.clone(),
            key_detection: self.key_detection,
            key_column_name: self.key_column_name.clone(),
            emit_table_attribute: self.emit_table_attribute,
            emit_column_attributes: self.emit_column_attributes,
        }
    }
}

/// Type names may carry generic or array punctuation (`byte[]`, `List<int>`)
fn is_type_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '[' | ']' | '<' | '>' | '?' | ','))
}
