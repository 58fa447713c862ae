//! # Sentinel CLI (`sentinel`)
//!
//! The `sentinel` binary is the terminal interface to a Sentinel backend.
//! It provides commands for chatting against uploaded documents, managing
//! those documents, storing the API key, and probing backend health.
//!
//! ## Usage
//!
//! ```bash
//! sentinel --config ./config/sentinel.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `sentinel init` | Write a commented default config file |
//! | `sentinel chat` | Interactive chat session |
//! | `sentinel ask "<message>"` | Send one message and print the reply |
//! | `sentinel sources list` | List uploaded documents |
//! | `sentinel sources add <paths...>` | Upload files or directories |
//! | `sentinel sources rm <path>` | Delete an uploaded document |
//! | `sentinel key set\|clear\|status` | Manage the stored API key |
//! | `sentinel status` | Check backend health |
//! | `sentinel completions <shell>` | Generate shell completions |
//!
//! ## Examples
//!
//! ```bash
//! # First run
//! sentinel init
//! sentinel key set sk-or-v1-...
//!
//! # Upload a lore document and everything under notes/
//! sentinel sources add data/lore.pdf notes/ --include '**/*.md'
//!
//! # One-shot question
//! sentinel ask "Who guards the northern gate?"
//!
//! # Interactive session
//! sentinel chat
//! ```

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use sentinel_chat::{chat, config, key, sources, status};

/// Sentinel — a terminal client for the Sentinel chat-with-documents
/// backend.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. A missing file falls back to built-in defaults; `sentinel init`
/// writes a commented starting point.
#[derive(Parser)]
#[command(
    name = "sentinel",
    about = "Sentinel — chat with your documents from the terminal",
    version,
    long_about = "Sentinel talks to a chat-with-documents backend: upload PDFs and text \
    files, then ask questions about them interactively or one-shot. The API key, backend \
    address, and upload filters are read from a TOML configuration file."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/sentinel.toml`. If the file does not exist,
    /// built-in defaults are used.
    #[arg(long, global = true, default_value = "./config/sentinel.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Write a commented default configuration file.
    ///
    /// Creates the file at the `--config` path. Refuses to overwrite an
    /// existing file.
    Init,

    /// Start an interactive chat session.
    ///
    /// Messages are read line by line from stdin. `/clear` resets the
    /// session, `/quit` exits. The session lives only in memory — nothing
    /// is persisted between runs.
    Chat,

    /// Send a single message and print the assistant's reply.
    ///
    /// Exits nonzero if the backend reported a failure or was unreachable.
    Ask {
        /// The message to send.
        message: String,
    },

    /// Manage uploaded document sources.
    ///
    /// The backend owns the source list; every mutation here is followed
    /// by a re-fetch of the authoritative list.
    Sources {
        #[command(subcommand)]
        action: SourcesAction,
    },

    /// Manage the stored API key.
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },

    /// Check that the backend is reachable.
    Status,

    /// Generate shell completions.
    Completions {
        /// Target shell.
        shell: Shell,
    },
}

/// Source management subcommands.
#[derive(Subcommand)]
enum SourcesAction {
    /// List uploaded documents (name, size, path).
    List,

    /// Upload files or directories.
    ///
    /// Directories are walked and filtered through the configured include
    /// globs. Files are uploaded one at a time, in order; a failed upload
    /// is reported and skipped, and the command exits nonzero if any file
    /// failed.
    Add {
        /// Files or directories to upload.
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Glob applied to directory contents, overriding the configured
        /// include globs (e.g. `'**/*.pdf'`).
        #[arg(long)]
        include: Option<String>,
    },

    /// Delete an uploaded document by its path.
    Rm {
        /// Source path as shown by `sources list`.
        path: String,
    },
}

/// API key subcommands.
#[derive(Subcommand)]
enum KeyAction {
    /// Store the API key.
    Set {
        /// The key value.
        key: String,
    },
    /// Remove the stored API key.
    Clear,
    /// Show whether a key is stored (masked).
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Commands that don't read config state
    match &cli.command {
        Commands::Init => {
            config::write_default_config(&cli.config)?;
            println!("Wrote {}", cli.config.display());
            return Ok(());
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(*shell, &mut cmd, "sentinel", &mut std::io::stdout());
            return Ok(());
        }
        _ => {}
    }

    let cfg = config::load_or_default(&cli.config)?;

    match cli.command {
        Commands::Chat => {
            chat::run_chat(&cfg).await?;
        }
        Commands::Ask { message } => {
            chat::run_ask(&cfg, &message).await?;
        }
        Commands::Sources { action } => match action {
            SourcesAction::List => {
                sources::run_sources_list(&cfg).await?;
            }
            SourcesAction::Add { paths, include } => {
                sources::run_sources_add(&cfg, &paths, include.as_deref()).await?;
            }
            SourcesAction::Rm { path } => {
                sources::run_sources_rm(&cfg, &path).await?;
            }
        },
        Commands::Key { action } => match action {
            KeyAction::Set { key } => {
                key::run_key_set(&cfg, &key)?;
            }
            KeyAction::Clear => {
                key::run_key_clear(&cfg)?;
            }
            KeyAction::Status => {
                key::run_key_status(&cfg)?;
            }
        },
        Commands::Status => {
            status::run_status(&cfg).await?;
        }
        Commands::Init | Commands::Completions { .. } => {
            // Handled above (before config loading)
            unreachable!()
        }
    }

    Ok(())
}
