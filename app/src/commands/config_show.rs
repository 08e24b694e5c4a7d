//! config:show command - Print the resolved connection record

use anyhow::Context;
use console::style;
use datasource::{Config, ConnectionConfig};
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root)?;
    println!("{}", render(&config, json)?);
    Ok(())
}

/// Render the record for display. The password is never included.
pub fn render(config: &ConnectionConfig, json: bool) -> anyhow::Result<String> {
    if json {
        return serde_json::to_string_pretty(config).context("failed to serialize configuration");
    }

    let mut out = vec![
        format!("{}", style("Connection").bold()),
        format!("  engine      {}", config.engine()),
        format!("  host        {}", config.host()),
        format!("  port        {}", config.port()),
        format!("  username    {}", config.username()),
        "  password    ****".to_string(),
        format!("  database    {}", config.database()),
        format!("  ssl         {}", config.ssl()),
        format!("  url         {}", config.redacted_url()),
        format!("{}", style("Discovery").bold()),
    ];
    out.extend(config.entities().iter().map(|p| format!("  entities    {}", p)));
    out.extend(config.migrations().iter().map(|p| format!("  migrations  {}", p)));

    Ok(out.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ConnectionConfig {
        ConnectionConfig::builder()
            .username("kodus")
            .password("secret")
            .database("kodus_db")
            .build()
            .unwrap()
    }

    #[test]
    fn test_render_text_hides_password() {
        let text = render(&config(), false).unwrap();

        assert!(!text.contains("secret"));
        assert!(text.contains("db_kodus_postgres"));
        assert!(text.contains("./dist/config/database/typeorm/migrations/*.js"));
    }

    #[test]
    fn test_render_json() {
        let text = render(&config(), true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["engine"], "postgres");
        assert_eq!(value["port"], 5432);
        assert_eq!(value["ssl"], false);
        assert!(value.get("password").is_none());
        assert_eq!(
            value["entities"][0],
            "./dist/modules/**/infra/typeorm/entities/*.js"
        );
    }
}
