// ABOUTME: Entry point for meet — a two-role LLM meeting assistant for the terminal.
// ABOUTME: Parses CLI args, loads config, installs logging, and launches the chosen front end.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use meeting_assistant::app::{self, App, RunOptions};
use meeting_assistant::config::Config;
use meeting_assistant::logging::{self, LogTarget};

#[derive(Parser)]
#[command(name = "meet", version)]
#[command(about = "Ask an accountant and a lawyer the same question, one after the other", long_about = None)]
struct Cli {
    /// Config file to use instead of ~/.meeting-assistant/config.toml
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Use the plain line-oriented loop instead of the full-screen UI
    #[arg(long)]
    plain: bool,

    /// Seat only the first role
    #[arg(long)]
    single: bool,

    /// Load a saved meeting before the first question
    #[arg(long, value_name = "NAME")]
    meeting: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List saved meetings
    Sessions,
    /// Report which provider credentials are loaded
    Check {
        /// Also send a short prompt to every available provider
        #[arg(long)]
        ping: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let tui = cli.command.is_none() && !cli.plain;
    let logs_dir = Config::logs_dir();
    let target = if tui {
        LogTarget::File(&logs_dir)
    } else {
        LogTarget::Stderr
    };
    let _log_guard = logging::init(&config.logging.level, target)?;

    match cli.command {
        Some(Commands::Sessions) => app::list_sessions(&config),
        Some(Commands::Check { ping }) => app::check_providers(&config, ping).await,
        None => {
            App::new(
                config,
                RunOptions {
                    plain: cli.plain,
                    single: cli.single,
                    meeting: cli.meeting,
                },
            )
            .run()
            .await
        }
    }
}
