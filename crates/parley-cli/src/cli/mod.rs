//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use parley_core::config::{Config, paths};

mod commands;

#[derive(Parser)]
#[command(name = "parley")]
#[command(version)]
#[command(about = "Terminal client for a remote chat assistant")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override the backend base URL from config
    #[arg(long, value_name = "URL", env = "PARLEY_BACKEND_URL")]
    backend: Option<String>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Send a single prompt and print the reply
    Exec {
        /// The prompt to send
        #[arg(short, long)]
        prompt: String,

        /// Continue an existing session by ID
        #[arg(long, value_name = "ID")]
        session: Option<String>,

        /// Attach a file to the message (repeatable)
        #[arg(long, value_name = "PATH")]
        attach: Vec<String>,
    },

    /// Manage sessions on the backend
    Sessions {
        #[command(subcommand)]
        command: SessionCommands,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum SessionCommands {
    /// Lists sessions known to the backend
    List,
    /// Rename a session
    Rename {
        /// The ID of the session to rename
        #[arg(value_name = "SESSION_ID")]
        id: String,
        /// New title for the session
        #[arg(value_name = "TITLE")]
        title: String,
    },
    /// Delete a session
    Delete {
        /// The ID of the session to delete
        #[arg(value_name = "SESSION_ID")]
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

/// File-based tracing so diagnostics never interleave with chat output.
/// Filter via PARLEY_LOG (defaults to warn).
fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let log_dir = paths::log_dir();
    if std::fs::create_dir_all(&log_dir).is_err() {
        return;
    }

    let writer = tracing_appender::rolling::never(&log_dir, "parley.log");
    let filter = EnvFilter::try_from_env("PARLEY_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
}

async fn dispatch(cli: Cli) -> Result<()> {
    let mut config = Config::load().context("load config")?;

    if let Some(backend) = cli.backend {
        config.backend.base_url = backend;
    }

    // default to chat mode
    let Some(command) = cli.command else {
        return crate::modes::chat::run(&config).await;
    };

    match command {
        Commands::Exec {
            prompt,
            session,
            attach,
        } => crate::modes::exec::run(&config, &prompt, session.as_deref(), &attach).await,

        Commands::Sessions { command } => match command {
            SessionCommands::List => commands::sessions::list(&config).await,
            SessionCommands::Rename { id, title } => {
                commands::sessions::rename(&config, &id, &title).await
            }
            SessionCommands::Delete { id, yes } => {
                commands::sessions::delete(&config, &id, yes).await
            }
        },

        Commands::Config { command } => match command {
            ConfigCommands::Path => commands::config::path(),
            ConfigCommands::Init => commands::config::init(),
        },
    }
}
