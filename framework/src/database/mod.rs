//! Database module
//!
//! Builds the connection record from the environment and hands it to SeaORM,
//! which owns the live connection from then on.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use datasource::{Config, DataSource};
//!
//! // 1. Build the record once at startup
//! let config = Config::load(std::path::Path::new("."))?;
//!
//! // 2. Hand it to the ORM
//! let source = DataSource::new(config).initialize().await?;
//!
//! // 3. Pass the connection to whatever needs it
//! let users = User::find().all(source.connection().inner()).await?;
//! ```
//!
//! # Configuration
//!
//! Set these environment variables:
//!
//! ```env
//! API_PG_DB_USERNAME=kodus
//! API_PG_DB_PASSWORD=secret
//! API_PG_DB_DATABASE=kodus_db
//! ```
//!
//! Host, port, dialect, TLS and the discovery patterns are fixed.

pub mod config;
pub mod connection;

pub use config::{
    load_connection_config, load_connection_config_from, missing_variables, ConnectionConfig,
    ConnectionConfigBuilder, DatabaseType,
};
pub use connection::{DbConnection, CONNECT_TIMEOUT};

use std::time::Duration;

use crate::error::DataSourceError;

/// A connection record that has not been handed to the ORM yet
///
/// Creating one has no side effects. Call [`initialize`](Self::initialize)
/// to connect.
#[derive(Debug, Clone)]
pub struct DataSource {
    config: ConnectionConfig,
    connect_timeout: Duration,
}

impl DataSource {
    /// Wrap a connection record
    pub fn new(config: ConnectionConfig) -> Self {
        Self {
            config,
            connect_timeout: CONNECT_TIMEOUT,
        }
    }

    /// Give up on the initial connection after `timeout` (default 30s)
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Get the wrapped connection record
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Hand the record to SeaORM and open the connection
    ///
    /// # Errors
    ///
    /// Returns `DataSourceError::Database` if SeaORM cannot connect. The
    /// message never contains the password.
    pub async fn initialize(self) -> Result<InitializedDataSource, DataSourceError> {
        tracing::info!(url = %self.config.redacted_url(), "initializing data source");

        let connection = DbConnection::connect_with(&self.config, self.connect_timeout).await?;

        tracing::info!(
            database = self.config.database(),
            entities = ?self.config.entities(),
            migrations = ?self.config.migrations(),
            "data source initialized"
        );

        Ok(InitializedDataSource {
            config: self.config,
            connection,
        })
    }
}

/// A data source whose connection is open
#[derive(Clone)]
pub struct InitializedDataSource {
    config: ConnectionConfig,
    connection: DbConnection,
}

impl InitializedDataSource {
    /// Get the record the connection was opened with
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Get the database connection
    ///
    /// `DbConnection` is cheap to clone; clone it into components that need
    /// their own handle.
    pub fn connection(&self) -> &DbConnection {
        &self.connection
    }

    /// Check the server is reachable
    pub async fn ping(&self) -> Result<(), DataSourceError> {
        self.connection.ping().await
    }

    /// Close the connection
    pub async fn close(self) -> Result<(), DataSourceError> {
        tracing::info!(database = self.config.database(), "closing data source");
        self.connection.close().await
    }
}

// Re-export sea_orm types that users commonly need
pub use sea_orm;
