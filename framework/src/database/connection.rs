//! Database connection management

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::sync::Arc;
use std::time::Duration;

use crate::database::config::ConnectionConfig;
use crate::error::DataSourceError;

/// How long to wait for the first connection unless told otherwise
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Wrapper around SeaORM's DatabaseConnection
///
/// This provides a clonable, thread-safe connection that can be handed to
/// every component that needs database access.
///
/// # Example
///
/// ```rust,ignore
/// let conn = DbConnection::connect(&config).await?;
///
/// // Use with SeaORM queries
/// let users = User::find().all(conn.inner()).await?;
/// ```
#[derive(Clone)]
pub struct DbConnection {
    inner: Arc<DatabaseConnection>,
}

impl DbConnection {
    /// Open a connection pool described by the given record
    ///
    /// Pool sizing and reconnection are left to SeaORM's defaults. Errors
    /// are reported against the redacted URL so the password never reaches
    /// a log line.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self, DataSourceError> {
        Self::connect_with(config, CONNECT_TIMEOUT).await
    }

    /// Open a connection pool, giving up after `timeout`
    ///
    /// The timeout bounds both the TCP connect and the wait for the first
    /// pooled connection, which sqlx retries until it expires.
    pub async fn connect_with(
        config: &ConnectionConfig,
        timeout: Duration,
    ) -> Result<Self, DataSourceError> {
        let mut opt = ConnectOptions::new(config.url());
        opt.connect_timeout(timeout)
            .acquire_timeout(timeout)
            .sqlx_logging(tracing::enabled!(tracing::Level::DEBUG));

        let conn = Database::connect(opt).await.map_err(|e| {
            DataSourceError::database(format!(
                "failed to connect to {}: {}",
                config.redacted_url(),
                scrub(&e.to_string(), config.password())
            ))
        })?;

        Ok(Self {
            inner: Arc::new(conn),
        })
    }

    /// Get a reference to the underlying SeaORM connection
    pub fn inner(&self) -> &DatabaseConnection {
        &self.inner
    }

    /// Round-trip a trivial statement to check the server is reachable
    pub async fn ping(&self) -> Result<(), DataSourceError> {
        self.inner.ping().await?;
        Ok(())
    }

    /// Close the pool if this is the last handle to it
    pub async fn close(self) -> Result<(), DataSourceError> {
        match Arc::try_unwrap(self.inner) {
            Ok(conn) => conn.close().await.map_err(DataSourceError::from),
            Err(_) => {
                tracing::debug!("connection still shared, pool closes when the last clone drops");
                Ok(())
            }
        }
    }
}

impl AsRef<DatabaseConnection> for DbConnection {
    fn as_ref(&self) -> &DatabaseConnection {
        &self.inner
    }
}

impl std::ops::Deref for DbConnection {
    type Target = DatabaseConnection;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

fn scrub(message: &str, password: &str) -> String {
    if password.is_empty() {
        message.to_string()
    } else {
        message.replace(password, "****")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_scrub_removes_password() {
        assert_eq!(
            scrub("auth failed for kodus:secret", "secret"),
            "auth failed for kodus:****"
        );
        assert_eq!(scrub("no password here", ""), "no password here");
    }

    #[tokio::test]
    async fn test_connect_failure_is_redacted() {
        let config = ConnectionConfig::builder()
            .host("127.0.0.1")
            .port(1)
            .username("kodus")
            .password("very-secret-password")
            .database("kodus_db")
            .build()
            .unwrap();

        let started = std::time::Instant::now();
        let err = DbConnection::connect_with(&config, Duration::from_secs(1))
            .await
            .err()
            .unwrap();

        assert!(started.elapsed() < Duration::from_secs(10));
        assert!(matches!(err, DataSourceError::Database(_)));
        assert!(!err.to_string().contains("very-secret-password"));
        assert!(err.to_string().contains("127.0.0.1:1"));
    }
}
