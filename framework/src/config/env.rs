use std::collections::HashMap;
use std::path::Path;

use crate::error::DataSourceError;

/// Environment type enumeration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Local,
    Development,
    Staging,
    Production,
    Testing,
    Custom(String),
}

impl Environment {
    /// Detect environment from APP_ENV or default to Local
    pub fn detect() -> Self {
        Self::from_source(&ProcessEnv)
    }

    /// Detect environment from APP_ENV in the given source
    pub fn from_source<S: EnvSource + ?Sized>(source: &S) -> Self {
        match source.var("APP_ENV").as_deref() {
            Some("production") => Self::Production,
            Some("staging") => Self::Staging,
            Some("development") => Self::Development,
            Some("testing") => Self::Testing,
            Some("local") | Some("") | None => Self::Local,
            Some(other) => Self::Custom(other.to_string()),
        }
    }

    /// Get the .env file suffix for this environment
    pub fn env_file_suffix(&self) -> &str {
        match self {
            Self::Local => "local",
            Self::Production => "production",
            Self::Staging => "staging",
            Self::Development => "development",
            Self::Testing => "testing",
            Self::Custom(name) => name.as_str(),
        }
    }

    /// Check if this is a production environment
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Check if this is a development environment (local or development)
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Local | Self::Development)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.env_file_suffix())
    }
}

/// A place environment variables can be read from
///
/// The loader only ever asks for single string values, so anything that can
/// answer "what is the value of X" works: the real process environment, a
/// map built in a test, or a fixed list of pairs.
pub trait EnvSource {
    /// Get the raw value of a variable, or None if it is not set
    fn var(&self, key: &str) -> Option<String>;
}

/// The real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl<const N: usize> EnvSource for [(&str, &str); N] {
    fn var(&self, key: &str) -> Option<String> {
        self.as_slice().var(key)
    }
}

impl EnvSource for [(&str, &str)] {
    fn var(&self, key: &str) -> Option<String> {
        self.iter()
            .rev()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string())
    }
}

/// Load environment variables from .env files with proper precedence
///
/// Files are loaded from most to least specific, and a variable that is
/// already set is never overwritten. The first source to define a variable
/// therefore wins:
/// 1. Actual system environment variables
/// 2. .env.{environment}.local (environment-specific local overrides)
/// 3. .env.{environment} (environment-specific)
/// 4. .env.local (local overrides, not committed)
/// 5. .env (base defaults)
pub fn load_dotenv(project_root: &Path) -> Environment {
    let env = Environment::detect();
    let suffix = env.env_file_suffix();

    let candidates = [
        project_root.join(format!(".env.{}.local", suffix)),
        project_root.join(format!(".env.{}", suffix)),
        project_root.join(".env.local"),
        project_root.join(".env"),
    ];

    for path in candidates.iter() {
        match dotenvy::from_path(path) {
            Ok(()) => tracing::debug!(path = %path.display(), "loaded env file"),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping unreadable env file"),
        }
    }

    env
}

/// Get a required, non-empty string from the given source
///
/// Whitespace-only values count as empty. The value itself is returned
/// untrimmed.
pub fn require<S: EnvSource + ?Sized>(source: &S, key: &str) -> Result<String, DataSourceError> {
    match source.var(key) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(DataSourceError::missing(key)),
    }
}

/// Get an environment variable with a default value
///
/// # Example
/// ```
/// use datasource::config::env;
///
/// let port: u16 = env("DB_PORT", 5432);
/// let host = env("DB_HOST", "127.0.0.1".to_string());
/// ```
pub fn env<T: std::str::FromStr>(key: &str, default: T) -> T {
    env_optional(key).unwrap_or(default)
}

/// Get a required environment variable
///
/// Returns `MissingConfiguration` if the variable is not set or empty and
/// `InvalidConfiguration` if it cannot be parsed.
///
/// # Example
/// ```no_run
/// use datasource::config::env_required;
///
/// let database: String = env_required("API_PG_DB_DATABASE")?;
/// # Ok::<(), datasource::DataSourceError>(())
/// ```
pub fn env_required<T: std::str::FromStr>(key: &str) -> Result<T, DataSourceError> {
    let raw = require(&ProcessEnv, key)?;
    raw.parse()
        .map_err(|_| DataSourceError::invalid(key, raw, std::any::type_name::<T>()))
}

/// Get an optional environment variable
///
/// # Example
/// ```
/// use datasource::config::env_optional;
///
/// let debug: Option<bool> = env_optional("APP_DEBUG");
/// ```
pub fn env_optional<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

/// Serializes tests that mutate the process environment
#[cfg(test)]
pub(crate) fn lock_process_env() -> std::sync::MutexGuard<'static, ()> {
    static LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
    LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
