//! init command - Build the connection record and open the connection

use console::style;
use std::path::Path;

use crate::commands::db_ping;

pub async fn run(root: &Path) -> anyhow::Result<()> {
    let config = db_ping::run(root).await?;

    println!("{} Data source ready", style("✓").green());
    for pattern in config.entities() {
        println!("  {} {}", style("entities").dim(), pattern);
    }
    for pattern in config.migrations() {
        println!("  {} {}", style("migrations").dim(), pattern);
    }

    Ok(())
}
