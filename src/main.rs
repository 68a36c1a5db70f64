//! # Choreust
//!
//! Household task tracker for a single whitelisted account. Tasks have a due
//! date and may repeat daily, weekly, monthly or on a custom interval.
//!
//! ## Usage
//!
//! ```bash
//! # Allow one account and sign in with it
//! export CHOREUST_ALLOWED_EMAIL=casa@example.com
//! choreust login casa@example.com --name Casa
//!
//! # Add tasks
//! choreust add "Regar as plantas" --due 2025-06-01 --repeat daily --every 2
//! choreust add "Lixo reciclável" --due 2025-06-02 --repeat weekly --day monday --day friday
//! choreust add "Pagar condomínio" --due 2025-06-10 --repeat monthly --day-of-month 10
//! choreust add "Trocar filtro" --due 2025-06-15 --repeat custom --every 3 --unit months
//!
//! # Manage them
//! choreust list
//! choreust toggle <ID>
//! choreust remove <ID>
//!
//! # Interactive mode
//! choreust
//! ```
//!
//! ## Data Storage
//!
//! Tasks, users and the session are saved in your local data directory
//! (`~/.local/share/choreust` on Linux). Override it with `CHOREUST_DATA_DIR`.
//! Logging is controlled with `CHOREUST_LOG` (e.g. `CHOREUST_LOG=debug`).

use std::fs::OpenOptions;
use std::io;
use std::process::ExitCode;

use anyhow::anyhow;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use choreust::auth;
use choreust::commands::*;
use choreust::config::{Config, LOG_ENV};
use choreust::storage::Store;
use choreust::tui::run_tui;
use choreust::Error;

#[derive(Parser)]
#[command(name = "choreust")]
#[command(about = "Household task tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with the allowed email
    Login {
        email: String,
        /// Display name
        #[arg(short, long)]
        name: Option<String>,
    },
    /// End the current session
    Logout,
    /// Show the signed-in account
    Whoami,
    /// Add a new task
    Add {
        /// Task title (quoted if it has spaces)
        title: String,
        /// Due date in YYYY-MM-DD
        #[arg(short, long)]
        due: String,
        /// Recurrence (none, daily, weekly, monthly, custom)
        #[arg(short, long)]
        repeat: Option<String>,
        /// Interval for daily and custom recurrences
        #[arg(short, long)]
        every: Option<String>,
        /// Day for weekly recurrences (sunday..saturday), repeatable
        #[arg(long = "day")]
        days: Vec<String>,
        /// Day of the month for monthly recurrences
        #[arg(short = 'm', long)]
        day_of_month: Option<String>,
        /// Unit for custom recurrences (days, weeks, months, years)
        #[arg(short, long)]
        unit: Option<String>,
    },
    /// List tasks by due date
    List,
    /// Toggle a task between pending and completed
    Toggle {
        id: u64,
    },
    /// Remove a task
    Remove {
        id: u64,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Generate shell completions
    Completions {
        shell: Shell,
    },
    /// Open interactive TUI
    Ui,
}

fn init_logging(config: &Config, to_file: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    if to_file {
        // The TUI owns the terminal, so logs go to a file.
        config.ensure_data_dir()?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(config.log_path())?;
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(file)
            .with_ansi(false)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }
    Ok(())
}

/// Turns a missing session into a pointer to `login`.
fn redirect_to_login(result: choreust::Result<()>) -> anyhow::Result<()> {
    match result {
        Err(Error::NotSignedIn) => Err(anyhow!(
            "{}: choreust login <email>",
            Error::NotSignedIn
        )),
        other => Ok(other?),
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let command = cli.command.unwrap_or(Commands::Ui);
    if let Commands::Completions { shell } = command {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "choreust", &mut io::stdout());
        return Ok(());
    }

    let config = Config::load()?;
    init_logging(&config, matches!(command, Commands::Ui))?;
    let store = Store::open(&config)?;
    let session = auth::current_session(&config);
    let session = session.as_ref();

    match command {
        Commands::Login { email, name } => cmd_login(&config, &email, name.as_deref())?,
        Commands::Logout => cmd_logout(&config)?,
        Commands::Whoami => cmd_whoami(session),
        Commands::Add { title, due, repeat, every, days, day_of_month, unit } => {
            let repeat = RepeatArgs { repeat, every, days, day_of_month, unit };
            let form = build_form(&title, &due, &repeat);
            redirect_to_login(cmd_add(&store, session, &form))?
        }
        Commands::List => cmd_list(&store, session)?,
        Commands::Toggle { id } => redirect_to_login(cmd_toggle(&store, session, id))?,
        Commands::Remove { id, force } => redirect_to_login(cmd_remove(&store, session, id, force))?,
        Commands::Ui => {
            let Some(session) = session.cloned() else {
                return redirect_to_login(Err(Error::NotSignedIn));
            };
            run_tui(store, session)?
        }
        Commands::Completions { .. } => {}
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Erro: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
