//! Subcommand execution.
//!
//! Opens the configured store once, resolves the acting user, then hands
//! off to the matching service call.

use chrono::{DateTime, NaiveTime, Utc};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use crate::cli::{Cli, Commands};
use crate::config::{AppConfig, Backend, ConfigError};
use crate::output;
use hotel_core::{Role, User};
use hotel_db::{
    ArchiveFile, DbConfig, DbError, FlatFileConfig, FlatFileStore, MemoryArchive,
    OrderProcessor, PersistenceStore, SalesReporter, SqliteStore, StaffDirectory,
};

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Db(#[from] DbError),

    #[error("Invalid role: {0}")]
    Role(#[from] hotel_core::ValidationError),

    #[error("Failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// What a command produced, ready for printing.
#[derive(Debug)]
pub struct Rendered {
    pub text: String,
    pub json: serde_json::Value,
}

impl Rendered {
    fn new<T: Serialize>(text: String, value: &T) -> Result<Self, CliError> {
        Ok(Rendered {
            text,
            json: serde_json::to_value(value)?,
        })
    }
}

pub async fn open_store(config: &AppConfig) -> Result<Arc<dyn PersistenceStore>, CliError> {
    tokio::fs::create_dir_all(&config.data_dir).await?;

    let store: Arc<dyn PersistenceStore> = match config.backend {
        Backend::Sqlite => Arc::new(SqliteStore::open(DbConfig::new(config.database_path())).await?),
        Backend::FlatFile => {
            Arc::new(FlatFileStore::open(FlatFileConfig::in_dir(&config.data_dir)).await?)
        }
    };

    info!(
        backend = store.backend(),
        data_dir = %config.data_dir.display(),
        "Store opened"
    );
    Ok(store)
}

/// Runs `cli.command` against `store` as of `now`.
pub async fn execute(
    cli: &Cli,
    config: &AppConfig,
    store: Arc<dyn PersistenceStore>,
    now: DateTime<Utc>,
) -> Result<Rendered, CliError> {
    let staff = StaffDirectory::new(store.clone());
    let actor = staff
        .find_user(&cli.user)
        .await?
        .ok_or_else(|| DbError::not_found("User", cli.user.clone()))?;
    debug!(user = %actor.username, role = %actor.role, "Acting user resolved");

    match &cli.command {
        Commands::Order { item, quantity } => {
            let orders = OrderProcessor::new(store);
            let receipt = orders.place_order(item, *quantity, &actor, now).await?;
            Rendered::new(output::receipt(&receipt), &receipt)
        }

        Commands::Restock { item, quantity } => {
            let orders = OrderProcessor::new(store);
            let entry = orders.restock(item, *quantity).await?;
            Rendered::new(output::restocked(&entry), &entry)
        }

        Commands::Report { day } => {
            let reporter = SalesReporter::new(store);
            let at = match day {
                Some(day) => day.and_time(NaiveTime::MIN).and_utc(),
                None => now,
            };
            let totals = reporter.daily_totals(at).await?;
            Rendered::new(output::daily_totals(&totals), &totals)
        }

        Commands::Inventory => {
            let reporter = SalesReporter::new(store);
            let lines = reporter.inventory_snapshot().await?;
            Rendered::new(output::inventory(&lines), &lines)
        }

        Commands::Rollover { confirm } => {
            let reporter = SalesReporter::new(store);
            rollover(&reporter, config, &actor, *confirm, now).await
        }

        Commands::AddUser { username, role } => {
            let role: Role = role.parse()?;
            let user = staff.add_user(&actor, username, role).await?;
            Rendered::new(output::user_added(&user), &user)
        }
    }
}

async fn rollover(
    reporter: &SalesReporter,
    config: &AppConfig,
    actor: &User,
    confirm: bool,
    now: DateTime<Utc>,
) -> Result<Rendered, CliError> {
    if !confirm {
        let mut sink = MemoryArchive::default();
        let archived = reporter.archive_and_reset(now, false, actor, &mut sink).await?;
        return Rendered::new(
            output::rollover(archived, None),
            &json!({ "archived": archived }),
        );
    }

    actor.require_admin("Archive and reset").map_err(DbError::from)?;

    let mut sink = ArchiveFile::create_in(&config.archive_dir(), now.date_naive())?;
    let path = sink.path().to_path_buf();
    let outcome = reporter.archive_and_reset(now, true, actor, &mut sink).await;
    sink.discard();
    let archived = outcome?;

    Rendered::new(
        output::rollover(archived, Some(&path)),
        &json!({ "archived": archived, "path": path }),
    )
}
