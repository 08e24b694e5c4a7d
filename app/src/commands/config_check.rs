//! config:check command - Report every missing environment variable

use console::style;
use datasource::database::missing_variables;
use datasource::{Config, ProcessEnv};
use std::path::Path;

pub fn run(root: &Path) -> anyhow::Result<()> {
    let env = Config::init(root);
    println!("{} Checking database configuration ({})", style("->").cyan(), env);

    let missing = missing_variables(&ProcessEnv);
    if missing.is_empty() {
        println!("{} All required variables are set", style("✓").green());
        return Ok(());
    }

    for key in &missing {
        eprintln!("  {} {}", style("missing").red(), key);
    }
    anyhow::bail!("{} required variable(s) missing", missing.len())
}
