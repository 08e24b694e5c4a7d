//! Application bootstrap
//!
//! The single place where the process environment is turned into a live
//! connection. Everything downstream receives the returned data source
//! instead of reaching for global state.

use anyhow::Context;
use datasource::{Config, DataSource, InitializedDataSource};
use std::path::Path;

/// Load the connection record and hand it to the ORM
///
/// Fails fast if a credential variable is missing; no connection is
/// attempted in that case.
pub async fn register(root: &Path) -> anyhow::Result<InitializedDataSource> {
    let config = Config::load(root).context("database configuration is incomplete")?;

    DataSource::new(config)
        .initialize()
        .await
        .context("could not initialize the data source")
}
