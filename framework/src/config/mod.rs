//! Configuration module
//!
//! Loads `.env` files with environment-based precedence and builds the
//! connection record from the resulting process environment.
//!
//! # Example
//!
//! ```rust,no_run
//! use datasource::Config;
//!
//! fn main() -> Result<(), datasource::DataSourceError> {
//!     // Load .env files, then read the database credentials
//!     let config = Config::load(std::path::Path::new("."))?;
//!     println!("Database: {}", config.redacted_url());
//!     Ok(())
//! }
//! ```

pub mod env;

pub use env::{env, env_optional, env_required, load_dotenv, require, EnvSource, Environment, ProcessEnv};

use std::path::Path;

use crate::database::config::{load_connection_config, ConnectionConfig};
use crate::error::DataSourceError;

/// Main Config facade
///
/// There is no global registry behind this type. Whatever `load` returns is
/// the only copy of the record; pass it to the components that need it.
pub struct Config;

impl Config {
    /// Initialize the environment
    ///
    /// Loads `.env` files from `project_root` without overriding variables
    /// that are already set in the process.
    ///
    /// # Returns
    ///
    /// The detected environment (Local, Development, Production, etc.)
    pub fn init(project_root: &Path) -> Environment {
        let env = env::load_dotenv(project_root);
        tracing::debug!(environment = %env, "environment initialized");
        env
    }

    /// Initialize the environment and load the connection record
    ///
    /// # Errors
    ///
    /// Returns `MissingConfiguration` if a required credential variable is
    /// absent or empty after the `.env` files have been applied.
    pub fn load(project_root: &Path) -> Result<ConnectionConfig, DataSourceError> {
        Self::init(project_root);
        load_connection_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::config::REQUIRED_ENV;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_load_reads_credentials_from_env_file() {
        let _guard = env::lock_process_env();
        for key in REQUIRED_ENV {
            std::env::remove_var(key);
        }
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".env"),
            "API_PG_DB_USERNAME=kodus\nAPI_PG_DB_PASSWORD=secret\nAPI_PG_DB_DATABASE=kodus_db\n",
        )
        .unwrap();

        let result = Config::load(dir.path());

        for key in REQUIRED_ENV {
            std::env::remove_var(key);
        }

        let config = result.unwrap();
        assert_eq!(config.username(), "kodus");
        assert_eq!(config.password(), "secret");
        assert_eq!(config.database(), "kodus_db");
        assert_eq!(config.host(), "db_kodus_postgres");
    }

    #[test]
    fn test_load_fails_when_env_file_lacks_password() {
        let _guard = env::lock_process_env();
        for key in REQUIRED_ENV {
            std::env::remove_var(key);
        }
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".env"),
            "API_PG_DB_USERNAME=kodus\nAPI_PG_DB_DATABASE=kodus_db\n",
        )
        .unwrap();

        let result = Config::load(dir.path());

        for key in REQUIRED_ENV {
            std::env::remove_var(key);
        }

        assert_eq!(
            result.unwrap_err(),
            DataSourceError::missing("API_PG_DB_PASSWORD")
        );
    }
}
