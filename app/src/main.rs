mod bootstrap;
mod commands;

use clap::{Parser, Subcommand};
use console::style;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kodus-db")]
#[command(about = "Inspect and initialize the Kodus database connection", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Directory containing the .env files
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// Load the configuration and open the connection (default command)
    Init,
    /// Print the resolved connection configuration (password redacted)
    #[command(name = "config:show")]
    ConfigShow {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check that every required environment variable is set
    #[command(name = "config:check")]
    ConfigCheck,
    /// Connect to the database and run a ping
    #[command(name = "db:ping")]
    DbPing,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = datasource::logging::init_logging(cli.verbose, cli.quiet) {
        eprintln!("{} {}", style("Warning:").yellow().bold(), e);
    }

    let result = match cli.command.unwrap_or(Commands::Init) {
        Commands::Init => commands::init::run(&cli.root).await,
        Commands::ConfigShow { json } => commands::config_show::run(&cli.root, json),
        Commands::ConfigCheck => commands::config_check::run(&cli.root),
        Commands::DbPing => commands::db_ping::run(&cli.root).await.map(|_| ()),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_no_subcommand_defaults_to_init() {
        let cli = Cli::try_parse_from(["kodus-db"]).unwrap();

        assert_eq!(cli.command, None);
        assert_eq!(cli.root, PathBuf::from("."));
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_parses_colon_commands() {
        let cli = Cli::try_parse_from(["kodus-db", "config:show", "--json"]).unwrap();
        assert_eq!(cli.command, Some(Commands::ConfigShow { json: true }));

        let cli = Cli::try_parse_from(["kodus-db", "config:check"]).unwrap();
        assert_eq!(cli.command, Some(Commands::ConfigCheck));

        let cli = Cli::try_parse_from(["kodus-db", "db:ping", "--root", "/srv/api", "-vv"]).unwrap();
        assert_eq!(cli.command, Some(Commands::DbPing));
        assert_eq!(cli.root, PathBuf::from("/srv/api"));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_rejects_unknown_command() {
        assert!(Cli::try_parse_from(["kodus-db", "migrate"]).is_err());
    }
}
