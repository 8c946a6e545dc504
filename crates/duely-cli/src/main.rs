mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use duely_core::Config;

#[derive(Parser)]
#[command(name = "duely")]
#[command(about = "Task tracking backend with due-date reminders", long_about = None)]
struct Cli {
    /// SQLite database file (overrides DATABASE_URL)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// HTTP listen address (overrides BIND_ADDR)
    #[arg(long, global = true)]
    bind: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the HTTP API and run the reminder scheduler (default)
    Serve,
    /// Insert the default categories and priorities if missing, then exit
    Seed,
    /// Run one reminder scan now, then exit
    Scan,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let mut config = Config::from_env()?;
    if let Some(database) = cli.database {
        config.database_path = database;
    }
    if let Some(bind) = cli.bind {
        config.bind_addr = bind;
    }

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => commands::serve::serve_command(&config).await,
        Commands::Seed => commands::seed::seed_command(&config),
        Commands::Scan => commands::scan::scan_command(&config).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_serve_is_default_command() {
        let cli = Cli::try_parse_from(["duely"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["duely", "scan", "--database", "/tmp/t.db"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Scan)));
        assert_eq!(cli.database, Some(PathBuf::from("/tmp/t.db")));
    }
}
