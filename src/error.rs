use thiserror::Error;

/// Main error type for the modelgen system
#[derive(Error, Debug)]
pub enum ModelGenError {
    #[error("Schema access error: {message}")]
    SchemaAccess { message: String },

    #[error("Invalid identifier: '{name}'")]
    InvalidIdentifier { name: String },

    #[error("Write error for {file_name}: {message}")]
    Write { file_name: String, message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    #[error("Connection pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    #[error("Connection pool setup error: {0}")]
    PoolCreation(#[from] deadpool_postgres::CreatePoolError),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type ModelGenResult<T> = Result<T, ModelGenError>;

impl ModelGenError {
    pub fn schema_access(message: impl Into<String>) -> Self {
        Self::SchemaAccess { message: message.into() }
    }

    pub fn invalid_identifier(name: impl Into<String>) -> Self {
        Self::InvalidIdentifier { name: name.into() }
    }

    pub fn write(file_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Write {
            file_name: file_name.into(),
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }

    /// Whether the error came from reading the schema source
    pub fn is_schema_access(&self) -> bool {
        matches!(
            self,
            Self::SchemaAccess { .. } | Self::Database(_) | Self::Pool(_) | Self::PoolCreation(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ModelGenError::write("Users.cs", "permission denied");
        assert_eq!(err.to_string(), "Write error for Users.cs: permission denied");

        let err = ModelGenError::invalid_identifier("users; drop table x");
        assert_eq!(err.to_string(), "Invalid identifier: 'users; drop table x'");
    }

    #[test]
    fn test_schema_access_classification() {
        assert!(ModelGenError::schema_access("unreachable").is_schema_access());
        assert!(!ModelGenError::configuration("bad").is_schema_access());
    }
}
