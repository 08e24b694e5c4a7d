//! db:ping command - Check the database answers

use console::style;
use datasource::ConnectionConfig;
use std::path::Path;
use std::time::Instant;

use crate::bootstrap;

/// Connect, ping and close. Returns the record that was used.
pub async fn run(root: &Path) -> anyhow::Result<ConnectionConfig> {
    let source = bootstrap::register(root).await?;

    let started = Instant::now();
    source.ping().await?;
    let elapsed = started.elapsed();

    println!(
        "{} {} answered in {:.1?}",
        style("->").cyan(),
        source.config().redacted_url(),
        elapsed
    );

    let config = source.config().clone();
    source.close().await?;
    Ok(config)
}
