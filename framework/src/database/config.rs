//! Database connection configuration
//!
//! Builds the record handed to the ORM: a fixed PostgreSQL endpoint plus
//! credentials taken from the environment, and the entity/migration
//! discovery patterns the ORM tooling scans.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;
use url::Url;

use crate::config::env::{require, EnvSource, ProcessEnv};
use crate::error::DataSourceError;

/// Environment variable holding the database user
pub const USERNAME_ENV: &str = "API_PG_DB_USERNAME";
/// Environment variable holding the database password
pub const PASSWORD_ENV: &str = "API_PG_DB_PASSWORD";
/// Environment variable holding the database name
pub const DATABASE_ENV: &str = "API_PG_DB_DATABASE";

/// Required variables, in the order they are checked
pub const REQUIRED_ENV: [&str; 3] = [USERNAME_ENV, PASSWORD_ENV, DATABASE_ENV];

pub const DEFAULT_HOST: &str = "db_kodus_postgres";
pub const DEFAULT_PORT: u16 = 5432;
pub const DEFAULT_SSL: bool = false;
pub const ENTITIES_PATTERN: &str = "./dist/modules/**/infra/typeorm/entities/*.js";
pub const MIGRATIONS_PATTERN: &str = "./dist/config/database/typeorm/migrations/*.js";

const REDACTED: &str = "****";

/// Everything except RFC 3986 unreserved characters, `%` included
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Supported database dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    Postgres,
    MySql,
    Sqlite,
}

impl DatabaseType {
    /// Name of the dialect as the ORM spells it
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::MySql => "mysql",
            Self::Sqlite => "sqlite",
        }
    }

    /// Port the server listens on unless told otherwise (0 for file databases)
    pub fn default_port(&self) -> u16 {
        match self {
            Self::Postgres => DEFAULT_PORT,
            Self::MySql => 3306,
            Self::Sqlite => 0,
        }
    }

    /// Whether this dialect needs a host and credentials
    pub fn is_networked(&self) -> bool {
        !matches!(self, Self::Sqlite)
    }
}

impl std::fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DatabaseType {
    type Err = DataSourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "mysql" => Ok(Self::MySql),
            "sqlite" => Ok(Self::Sqlite),
            _ => Err(DataSourceError::invalid("engine", s, "database type")),
        }
    }
}

/// Connection record handed to the ORM
///
/// Immutable once built. Construct it with [`load_connection_config`] at
/// startup or with [`ConnectionConfig::builder`] when the values come from
/// somewhere else. `Debug`, `Display` and `Serialize` never expose the
/// password.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionConfig {
    engine: DatabaseType,
    host: String,
    port: u16,
    username: String,
    #[serde(skip)]
    password: String,
    database: String,
    ssl: bool,
    entities: Vec<String>,
    migrations: Vec<String>,
    #[serde(skip)]
    url: Url,
}

impl ConnectionConfig {
    /// Create a builder for customizing config
    pub fn builder() -> ConnectionConfigBuilder {
        ConnectionConfigBuilder::default()
    }

    pub fn engine(&self) -> DatabaseType {
        self.engine
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    /// Whether the connection must negotiate TLS
    pub fn ssl(&self) -> bool {
        self.ssl
    }

    /// Globs locating entity-mapping definitions
    pub fn entities(&self) -> &[String] {
        &self.entities
    }

    /// Globs locating migration scripts
    pub fn migrations(&self) -> &[String] {
        &self.migrations
    }

    /// Connection URL understood by the ORM, credentials included
    ///
    /// Credentials are percent-encoded. Do not log this value; use
    /// [`redacted_url`](Self::redacted_url) instead.
    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Connection URL with the password masked as `****`
    pub fn redacted_url(&self) -> String {
        let mut url = self.url.clone();
        if url.password().is_some() {
            let _ = url.set_password(Some(REDACTED));
        }
        url.to_string()
    }
}

impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("engine", &self.engine)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &REDACTED)
            .field("database", &self.database)
            .field("ssl", &self.ssl)
            .field("entities", &self.entities)
            .field("migrations", &self.migrations)
            .finish()
    }
}

impl std::fmt::Display for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.redacted_url())
    }
}

/// Builder for ConnectionConfig
///
/// Fields that are not set take the fixed Kodus values. Credentials and the
/// database name have no default and must be provided.
#[derive(Default)]
pub struct ConnectionConfigBuilder {
    engine: Option<DatabaseType>,
    host: Option<String>,
    port: Option<u16>,
    username: Option<String>,
    password: Option<String>,
    database: Option<String>,
    ssl: Option<bool>,
    entities: Option<Vec<String>>,
    migrations: Option<Vec<String>>,
}

impl ConnectionConfigBuilder {
    /// Set the database dialect
    pub fn engine(mut self, engine: DatabaseType) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Set the server host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set the server port
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Set the database name (the file path for SQLite)
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Require TLS on the connection
    pub fn ssl(mut self, ssl: bool) -> Self {
        self.ssl = Some(ssl);
        self
    }

    /// Replace the entity discovery patterns
    pub fn entities<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entities = Some(patterns.into_iter().map(Into::into).collect());
        self
    }

    /// Replace the migration discovery patterns
    pub fn migrations<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.migrations = Some(patterns.into_iter().map(Into::into).collect());
        self
    }

    /// Build the ConnectionConfig
    ///
    /// # Errors
    ///
    /// `MissingConfiguration` when a credential or the database name is
    /// empty, `InvalidConfiguration` when the values do not form a valid
    /// connection URL.
    pub fn build(self) -> Result<ConnectionConfig, DataSourceError> {
        let engine = self.engine.unwrap_or(DatabaseType::Postgres);
        let non_empty = |value: Option<String>, field: &str| match value {
            Some(v) if !v.trim().is_empty() => Ok(v),
            _ => Err(DataSourceError::missing(field)),
        };

        let database = non_empty(self.database, "database")?;
        let (username, password) = if engine.is_networked() {
            (
                non_empty(self.username, "username")?,
                non_empty(self.password, "password")?,
            )
        } else {
            (self.username.unwrap_or_default(), self.password.unwrap_or_default())
        };

        let host = self.host.unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = self.port.unwrap_or(engine.default_port());
        let ssl = self.ssl.unwrap_or(DEFAULT_SSL);

        let url = connection_url(engine, &host, port, &username, &password, &database, ssl)?;

        Ok(ConnectionConfig {
            engine,
            host,
            port,
            username,
            password,
            database,
            ssl,
            entities: self
                .entities
                .unwrap_or_else(|| vec![ENTITIES_PATTERN.to_string()]),
            migrations: self
                .migrations
                .unwrap_or_else(|| vec![MIGRATIONS_PATTERN.to_string()]),
            url,
        })
    }
}

fn connection_url(
    engine: DatabaseType,
    host: &str,
    port: u16,
    username: &str,
    password: &str,
    database: &str,
    ssl: bool,
) -> Result<Url, DataSourceError> {
    if !engine.is_networked() {
        let mut url = Url::parse(&format!("sqlite:{}", database))
            .map_err(|_| DataSourceError::invalid("database", database, "sqlite path"))?;
        url.set_query(Some("mode=rwc"));
        return Ok(url);
    }

    let mut url = Url::parse(&format!("{}://{}:{}", engine.as_str(), host, port))
        .map_err(|_| DataSourceError::invalid("host", host, "host name"))?;
    // The `Url` setters leave `%` as-is.
    let username = utf8_percent_encode(username, COMPONENT).to_string();
    let password = utf8_percent_encode(password, COMPONENT).to_string();
    let database = utf8_percent_encode(database, COMPONENT).to_string();

    url.set_username(&username)
        .map_err(|_| DataSourceError::invalid("username", username.as_str(), "user name"))?;
    url.set_password(Some(&password))
        .map_err(|_| DataSourceError::invalid("password", REDACTED, "password"))?;
    url.set_path(&format!("/{}", database));

    let (key, value) = match (engine, ssl) {
        (DatabaseType::MySql, true) => ("ssl-mode", "REQUIRED"),
        (DatabaseType::MySql, false) => ("ssl-mode", "DISABLED"),
        (_, true) => ("sslmode", "require"),
        (_, false) => ("sslmode", "disable"),
    };
    url.query_pairs_mut().append_pair(key, value);

    Ok(url)
}

/// Load the connection record from the process environment
///
/// Reads `API_PG_DB_USERNAME`, `API_PG_DB_PASSWORD` and `API_PG_DB_DATABASE`
/// and combines them with the fixed host, port, dialect, TLS flag and
/// discovery patterns. Nothing is opened or scanned.
///
/// # Errors
///
/// `MissingConfiguration` naming the first variable (in that order) that is
/// absent or empty.
///
/// # Example
///
/// ```rust,no_run
/// use datasource::load_connection_config;
///
/// let config = load_connection_config().expect("database credentials not set");
/// assert_eq!(config.host(), "db_kodus_postgres");
/// ```
pub fn load_connection_config() -> Result<ConnectionConfig, DataSourceError> {
    load_connection_config_from(&ProcessEnv)
}

/// Load the connection record from an arbitrary environment source
pub fn load_connection_config_from<S: EnvSource + ?Sized>(
    source: &S,
) -> Result<ConnectionConfig, DataSourceError> {
    let config = ConnectionConfig::builder()
        .username(require(source, USERNAME_ENV)?)
        .password(require(source, PASSWORD_ENV)?)
        .database(require(source, DATABASE_ENV)?)
        .build()?;

    tracing::debug!(config = ?config, "connection config loaded");
    Ok(config)
}

/// List every required variable that is absent or empty in the source
pub fn missing_variables<S: EnvSource + ?Sized>(source: &S) -> Vec<&'static str> {
    REQUIRED_ENV
        .iter()
        .copied()
        .filter(|key| require(source, key).is_err())
        .collect()
}
