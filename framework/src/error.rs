//! Data source error types
//!
//! Provides a single error type for everything that can go wrong between
//! reading the environment and handing the connection record to the ORM.

use thiserror::Error;

/// Data source error type
///
/// Startup code is expected to abort on any of these. There is no recovery
/// path for a missing credential: a connection cannot be attempted without it.
///
/// # Example
///
/// ```rust,ignore
/// use datasource::{load_connection_config, DataSourceError};
///
/// match load_connection_config() {
///     Ok(config) => println!("connecting to {}", config.redacted_url()),
///     Err(DataSourceError::MissingConfiguration { key }) => {
///         eprintln!("set {key} before starting");
///         std::process::exit(1);
///     }
///     Err(e) => panic!("{e}"),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataSourceError {
    /// A required environment variable is absent or empty
    #[error("Missing required configuration: {key} is not set or empty")]
    MissingConfiguration {
        /// The environment variable that was missing
        key: String,
    },

    /// An environment variable is present but could not be parsed
    #[error("Invalid configuration for {key}: '{value}' is not a valid {expected}")]
    InvalidConfiguration {
        /// The environment variable that failed to parse
        key: String,
        /// The raw value found in the environment
        value: String,
        /// The expected type (e.g., "u16", "bool")
        expected: &'static str,
    },

    /// Error reported by the ORM while connecting or talking to the database
    #[error("Database error: {0}")]
    Database(String),

    /// The tracing subscriber could not be installed
    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}

impl DataSourceError {
    /// Create a MissingConfiguration error for a given key
    pub fn missing(key: impl Into<String>) -> Self {
        Self::MissingConfiguration { key: key.into() }
    }

    /// Create an InvalidConfiguration error
    pub fn invalid(key: impl Into<String>, value: impl Into<String>, expected: &'static str) -> Self {
        Self::InvalidConfiguration {
            key: key.into(),
            value: value.into(),
            expected,
        }
    }

    /// Create a Database error
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database(message.into())
    }

    /// Create a Logging error
    pub fn logging(message: impl Into<String>) -> Self {
        Self::Logging(message.into())
    }

    /// Check if this error reports a missing environment variable
    pub fn is_missing_configuration(&self) -> bool {
        matches!(self, Self::MissingConfiguration { .. })
    }
}

// Implement From<DbErr> for automatic error conversion with ?
impl From<sea_orm::DbErr> for DataSourceError {
    fn from(e: sea_orm::DbErr) -> Self {
        Self::Database(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_configuration_message_names_key() {
        let err = DataSourceError::missing("API_PG_DB_PASSWORD");

        assert!(err.is_missing_configuration());
        assert_eq!(
            err.to_string(),
            "Missing required configuration: API_PG_DB_PASSWORD is not set or empty"
        );
    }

    #[test]
    fn test_invalid_configuration_message() {
        let err = DataSourceError::invalid("DB_PORT", "abc", "u16");

        assert!(!err.is_missing_configuration());
        assert_eq!(
            err.to_string(),
            "Invalid configuration for DB_PORT: 'abc' is not a valid u16"
        );
    }

    #[test]
    fn test_db_err_converts_to_database() {
        let err: DataSourceError = sea_orm::DbErr::Custom("boom".to_string()).into();

        assert!(matches!(err, DataSourceError::Database(ref m) if m.contains("boom")));
    }
}
