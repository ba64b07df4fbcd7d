//! SQLite migration registry and executor.
//!
//! # Responsibility
//! - Register schema migrations in strictly increasing order.
//! - Apply pending migrations atomically, including the one-shot variation
//!   backfill that cannot be expressed in pure SQL.
//!
//! # Invariants
//! - `version` values must remain monotonic.
//! - Applied migration version is mirrored to `PRAGMA user_version`.
//! - All pending migrations commit in one transaction; a failure in any
//!   step (SQL or hook) leaves the store at its pre-migration version.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::{Connection, Transaction};

pub mod derive;

/// Post-SQL step run inside the migration transaction.
type MigrationHook = fn(&Transaction<'_>) -> DbResult<()>;

#[derive(Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
    hook: Option<MigrationHook>,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        sql: include_str!("0001_init.sql"),
        hook: None,
    },
    Migration {
        version: 2,
        sql: include_str!("0002_variations.sql"),
        hook: Some(derive::backfill_variations),
    },
    Migration {
        version: 3,
        sql: include_str!("0003_set_summary.sql"),
        hook: None,
    },
];

/// Returns the latest migration version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Applies all pending migrations on the provided connection.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let current_version = current_user_version(conn)?;
    let latest = latest_version();

    if current_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: latest,
        });
    }

    if current_version == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS {
        if migration.version <= current_version {
            continue;
        }

        tx.execute_batch(migration.sql)?;
        if let Some(hook) = migration.hook {
            hook(&tx)?;
        }
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
        info!(
            "event=migration_applied module=db status=ok version={}",
            migration.version
        );
    }
    tx.commit()?;

    Ok(())
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
