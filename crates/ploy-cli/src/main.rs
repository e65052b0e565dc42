//! Ploy CLI
//!
//! Command-line interface for Ploy - a local-first project journal.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ploy_core::export::CsvCollection;
use ploy_core::store::storage_error;
use ploy_core::{CadenceType, Config, MergeStrategy, ProjectStatus, StorageError, Store, WinKind};

mod commands;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "ploy")]
#[command(about = "Ploy - a local-first journal for personal projects")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use a specific config file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show device, storage and journal status
    Status,
    /// Manage projects
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },
    /// Capture and manage ideas
    Idea {
        #[command(subcommand)]
        command: IdeaCommands,
    },
    /// Learning log entries
    Log {
        #[command(subcommand)]
        command: LogCommands,
    },
    /// Celebrate wins
    Win {
        #[command(subcommand)]
        command: WinCommands,
    },
    /// Export the journal
    Export {
        #[command(subcommand)]
        command: ExportCommands,
    },
    /// Import a JSON backup
    Import {
        /// Backup file to import
        file: PathBuf,
        /// How to resolve items present on both sides (newest, overwrite, keep)
        #[arg(short, long, default_value = "newest")]
        strategy: MergeStrategy,
        /// Only show what the backup contains
        #[arg(long)]
        preview: bool,
    },
    /// Erase all journal data on this device
    Reset {
        /// Confirm the wipe
        #[arg(long)]
        yes: bool,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum ProjectCommands {
    /// Create a new project
    #[command(alias = "create")]
    Add {
        /// Project title
        title: String,
        /// Why this project matters
        #[arg(short, long, default_value = "")]
        purpose: String,
        /// Values the project expresses (repeatable)
        #[arg(long = "value")]
        values: Vec<String>,
        /// Who benefits (repeatable)
        #[arg(long = "beneficiary")]
        beneficiaries: Vec<String>,
        /// Review cadence (weekly, biweekly)
        #[arg(long)]
        cadence: Option<CadenceType>,
        /// Review day, 0 = Sunday ... 6 = Saturday
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=6))]
        day: Option<u8>,
        /// Review time, HH:MM in UTC
        #[arg(long)]
        time: Option<String>,
        /// The very next step
        #[arg(short, long, default_value = "")]
        next_step: String,
    },
    /// List projects
    #[command(alias = "ls")]
    List {
        /// Filter by status (active, paused, done)
        #[arg(short, long)]
        status: Option<ProjectStatus>,
        /// Only projects due for review
        #[arg(long)]
        due: bool,
    },
    /// Show project details and activity
    Show {
        /// Project ID (full UUID or prefix)
        id: String,
    },
    /// Mark a project as reviewed now
    Review {
        /// Project ID (full UUID or prefix)
        id: String,
    },
    /// Change a project's status
    Status {
        /// Project ID (full UUID or prefix)
        id: String,
        /// New status (active, paused, done)
        status: ProjectStatus,
        /// Reflection note to keep with the change
        #[arg(short, long)]
        note: Option<String>,
    },
    /// Delete a project with its logs and wins
    #[command(alias = "rm")]
    Delete {
        /// Project ID (full UUID or prefix)
        id: String,
    },
}

#[derive(Subcommand)]
enum IdeaCommands {
    /// Capture an idea
    Add {
        /// The idea
        text: String,
        /// Attach to a project (ID or prefix)
        #[arg(short, long)]
        project: Option<String>,
    },
    /// List ideas
    #[command(alias = "ls")]
    List {
        /// Show archived ideas instead
        #[arg(long)]
        archived: bool,
        /// Only ideas attached to a project (ID or prefix)
        #[arg(short, long)]
        project: Option<String>,
    },
    /// Archive an idea
    Archive {
        /// Idea ID (full UUID or prefix)
        id: String,
    },
    /// Turn an idea into a project
    Promote {
        /// Idea ID (full UUID or prefix)
        id: String,
        /// Project title (defaults to the idea text)
        #[arg(short = 'T', long)]
        title: Option<String>,
    },
}

#[derive(Subcommand)]
enum LogCommands {
    /// Record what you learned
    Add {
        /// Project ID (full UUID or prefix)
        project: String,
        /// What you learned
        learned: String,
        /// What you are excited to do next
        #[arg(short, long, default_value = "")]
        next: String,
        /// Who this helped and how
        #[arg(short, long, default_value = "")]
        impact: String,
    },
    /// List learning log entries, newest first
    #[command(alias = "ls")]
    List {
        /// Only entries of one project (ID or prefix)
        #[arg(short, long)]
        project: Option<String>,
        /// Maximum number of entries
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
}

#[derive(Subcommand)]
enum WinCommands {
    /// Record a win
    Add {
        /// Project ID (full UUID or prefix)
        project: String,
        /// What happened
        note: String,
        /// Kind of win (small, milestone, gratitude)
        #[arg(short, long, default_value = "small")]
        kind: WinKind,
    },
    /// List wins, newest first
    #[command(alias = "ls")]
    List {
        /// Only wins of one project (ID or prefix)
        #[arg(short, long)]
        project: Option<String>,
        /// Maximum number of wins
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
}

#[derive(Subcommand)]
enum ExportCommands {
    /// Full JSON backup (records the backup time)
    Json {
        /// Output file or directory (prints to stdout when omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// One collection as CSV (projects, logs, wins, ideas)
    Csv {
        /// Collection to export
        collection: CsvCollection,
        /// Output file or directory (prints to stdout when omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Review schedule as an iCalendar file
    Ics {
        /// Only this project (ID or prefix)
        #[arg(short, long)]
        project: Option<String>,
        /// Output file or directory (prints to stdout when omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, autosave_delay_ms, storage_capacity_bytes, log_file, log_level)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    let config = Config::load_with_cli_override(cli.config.as_ref())?;
    init_logging(&config);

    let result = run(cli, config, &output).await;

    if let Err(ref err) = result {
        if let Some(hint) = storage_error(err).and_then(StorageError::recovery_suggestion)
        {
            eprintln!("Hint: {}", hint);
        }
    }

    result
}

async fn run(cli: Cli, config: Config, output: &Output) -> Result<()> {
    // Config commands don't need the store
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), cli.config.as_ref(), output);
    }

    let mut store = Store::open_with_config(config)?;
    report_load_status(&store);

    let remind = !matches!(
        &cli.command,
        Commands::Export {
            command: ExportCommands::Json { .. }
        } | Commands::Reset { .. }
    );

    match cli.command {
        Commands::Status => commands::status::show(&store, output)?,
        Commands::Project { command } => handle_project_command(command, &mut store, output).await?,
        Commands::Idea { command } => handle_idea_command(command, &mut store, output).await?,
        Commands::Log { command } => match command {
            LogCommands::Add {
                project,
                learned,
                next,
                impact,
            } => commands::log::add(&mut store, project, learned, next, impact, output).await?,
            LogCommands::List { project, limit } => {
                commands::log::list(&store, project, limit, output)?
            }
        },
        Commands::Win { command } => match command {
            WinCommands::Add {
                project,
                note,
                kind,
            } => commands::win::add(&mut store, project, note, kind, output).await?,
            WinCommands::List { project, limit } => {
                commands::win::list(&store, project, limit, output)?
            }
        },
        Commands::Export { command } => handle_export_command(command, &mut store, output).await?,
        Commands::Import {
            file,
            strategy,
            preview,
        } => commands::import::import(&mut store, file, strategy, preview, output).await?,
        Commands::Reset { yes } => commands::reset::reset(&mut store, yes, output).await?,
        Commands::Config { .. } => unreachable!(), // Handled above
    }

    if remind && output.format == OutputFormat::Human {
        remind_backup(&store);
    }

    Ok(())
}

async fn handle_project_command(
    command: ProjectCommands,
    store: &mut Store,
    output: &Output,
) -> Result<()> {
    match command {
        ProjectCommands::Add {
            title,
            purpose,
            values,
            beneficiaries,
            cadence,
            day,
            time,
            next_step,
        } => commands::project::add(
            store,
            commands::project::ProjectInput {
                title,
                purpose,
                values,
                beneficiaries,
                cadence,
                day,
                time,
                next_step,
            },
            output,
        )
        .await,
        ProjectCommands::List { status, due } => commands::project::list(store, status, due, output),
        ProjectCommands::Show { id } => commands::project::show(store, id, output),
        ProjectCommands::Review { id } => commands::project::review(store, id, output).await,
        ProjectCommands::Status { id, status, note } => {
            commands::project::set_status(store, id, status, note, output).await
        }
        ProjectCommands::Delete { id } => commands::project::delete(store, id, output).await,
    }
}

async fn handle_idea_command(
    command: IdeaCommands,
    store: &mut Store,
    output: &Output,
) -> Result<()> {
    match command {
        IdeaCommands::Add { text, project } => {
            commands::idea::add(store, text, project, output).await
        }
        IdeaCommands::List { archived, project } => {
            commands::idea::list(store, archived, project, output)
        }
        IdeaCommands::Archive { id } => commands::idea::archive(store, id, output).await,
        IdeaCommands::Promote { id, title } => {
            commands::idea::promote(store, id, title, output).await
        }
    }
}

async fn handle_export_command(
    command: ExportCommands,
    store: &mut Store,
    output: &Output,
) -> Result<()> {
    match command {
        ExportCommands::Json { out } => commands::export::json(store, out, output).await,
        ExportCommands::Csv { collection, out } => {
            commands::export::csv(store, collection, out, output).await
        }
        ExportCommands::Ics { project, out } => {
            commands::export::ics(store, project, out, output).await
        }
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Install the tracing subscriber
///
/// `PLOY_LOG` wins over `RUST_LOG`, which wins over the configured level.
/// Logs go to the configured log file, or stderr when none is set.
fn init_logging(config: &Config) {
    let level = config.log_level.as_deref().unwrap_or("warn");
    let env_filter = std::env::var("PLOY_LOG")
        .ok()
        .map(EnvFilter::new)
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(format!("ploy_core={},ploy_cli={}", level, level)));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false);

    // Ignore the error if a subscriber is already installed
    let _ = match config.log_file {
        Some(ref path) => match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => subscriber
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init(),
            Err(e) => {
                eprintln!("Warning: Could not open log file {:?}: {}", path, e);
                subscriber.with_writer(std::io::stderr).try_init()
            }
        },
        None => subscriber.with_writer(std::io::stderr).try_init(),
    };
}

/// Tell the user when the journal was not loaded cleanly
fn report_load_status(store: &Store) {
    let status = store.load_status();
    if status.needs_attention() {
        eprintln!("Warning: {}", status.describe());
        if status.is_lossy() {
            eprintln!("If you have a recent backup, restore it with `ploy import <file>`.");
        }
    }
}

fn remind_backup(store: &Store) {
    let doc = store.document();
    if doc.entity_count() == 0 || !doc.should_show_backup_reminder(Utc::now()) {
        return;
    }
    match doc.settings.last_backup_at {
        Some(last) => eprintln!(
            "Reminder: your last backup was {} day(s) ago. Run `ploy export json --out <dir>`.",
            (Utc::now() - last).num_days()
        ),
        None => eprintln!(
            "Reminder: you have never exported a backup. Run `ploy export json --out <dir>`."
        ),
    }
}
