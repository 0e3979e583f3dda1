//! Command-line transport over `orgchart_core`.
//!
//! # Responsibility
//! - Resolve configuration from flags and environment.
//! - Invoke one core operation and print its JSON payload.
//! - Map core error kinds to exit codes (see `exit_codes`).

mod exit_codes;

use clap::{Parser, Subcommand};
use log::info;
use orgchart_core::db::open_db;
use orgchart_core::{
    default_log_level, init_logging, PositionError, PositionService, PositionUpdate,
    SqlitePositionRepository,
};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::process::ExitCode;
use uuid::Uuid;

/// Maintain a single-rooted hierarchy of named positions.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// SQLite database file
    #[arg(long, env = "ORGCHART_DB", default_value = "orgchart.sqlite3")]
    db: PathBuf,

    /// Log level: trace|debug|info|warn|error
    #[arg(long, env = "ORGCHART_LOG_LEVEL")]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; logging stays off when unset
    #[arg(long, env = "ORGCHART_LOG_DIR")]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a position; omit --parent only for the first (root) position
    Create {
        name: String,
        description: String,
        #[arg(long)]
        parent: Option<Uuid>,
    },
    /// Change name, description and/or parent of a position
    Update {
        id: Uuid,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        parent: Option<Uuid>,
    },
    /// Delete a childless position
    Delete { id: Uuid },
    /// Show one position
    Get { id: Uuid },
    /// List direct children of a position
    Children { id: Uuid },
    /// List every position as flat records
    List,
    /// Show the assembled hierarchy
    Tree,
    /// Report stored data that breaks hierarchy invariants
    Audit,
}

enum CliError {
    Startup(String),
    Output(String),
    Position(PositionError),
}

impl From<PositionError> for CliError {
    fn from(value: PositionError) -> Self {
        Self::Position(value)
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(payload) => {
            println!("{payload:#}");
            ExitCode::SUCCESS
        }
        Err(CliError::Startup(message)) => {
            eprintln!("{}", json!({ "error": "startup", "message": message }));
            ExitCode::from(exit_codes::STARTUP_FAILURE)
        }
        Err(CliError::Output(message)) => {
            eprintln!("{}", json!({ "error": "output", "message": message }));
            ExitCode::from(exit_codes::OUTPUT_FAILURE)
        }
        Err(CliError::Position(err)) => {
            let kind = err.kind();
            eprintln!(
                "{}",
                json!({ "error": kind.code(), "message": err.to_string() })
            );
            ExitCode::from(exit_codes::for_kind(kind))
        }
    }
}

fn run(args: Args) -> Result<Value, CliError> {
    if let Some(log_dir) = args.log_dir.as_deref() {
        let level = args.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir).map_err(CliError::Startup)?;
    }

    let conn = open_db(&args.db).map_err(|err| {
        CliError::Startup(format!(
            "failed to open database `{}`: {err}",
            args.db.display()
        ))
    })?;
    let repo = SqlitePositionRepository::try_new(&conn)
        .map_err(|err| CliError::Startup(err.to_string()))?;
    let service = PositionService::new(repo);
    info!("event=cli_command module=cli status=start command={:?}", args.command);

    let payload = match args.command {
        Command::Create {
            name,
            description,
            parent,
        } => json!({ "id": service.create_position(&name, &description, parent)? }),
        Command::Update {
            id,
            name,
            description,
            parent,
        } => {
            let update = PositionUpdate {
                name,
                description,
                parent_id: parent,
            };
            json!({ "id": service.update_position(id, &update)? })
        }
        Command::Delete { id } => {
            service.delete_position(id)?;
            json!({ "message": "position deleted" })
        }
        Command::Get { id } => to_json(&service.get_position(id)?)?,
        Command::Children { id } => to_json(&service.get_children(id)?)?,
        Command::List => to_json(&service.list_positions()?)?,
        Command::Tree => to_json(&service.get_tree()?)?,
        Command::Audit => json!({ "issues": to_json(&service.audit()?)? }),
    };
    Ok(payload)
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Value, CliError> {
    serde_json::to_value(value)
        .map_err(|err| CliError::Output(format!("failed to encode output: {err}")))
}
