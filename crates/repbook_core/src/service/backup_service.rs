//! Full-state backup export and restore.
//!
//! # Responsibility
//! - Serialize the entire entity graph into one self-contained JSON
//!   document and restore such documents via idempotent bulk insertion.
//!
//! # Invariants
//! - Restore is additive-only: existing rows are never overwritten or
//!   deleted; rows whose id already exists are skipped.
//! - A malformed document fails the whole restore before any write.
//! - Restore inserts in dependency order: locations and muscles first,
//!   then exercises, then variations, then sets.
//!
//! Restore is not wrapped in a transaction here; a caller that needs
//! whole-restore atomicity runs it inside its own transaction.

use crate::model::backup::Backup;
use crate::repo::catalog_repo::CatalogRepository;
use crate::repo::set_repo::SetRepository;
use crate::repo::variation_repo::VariationRepository;
use crate::repo::RepoError;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Error kinds for backup export and restore.
#[derive(Debug)]
pub enum BackupError {
    /// The document failed to parse or had an incompatible shape.
    Malformed(serde_json::Error),
    Repo(RepoError),
}

impl Display for BackupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(err) => write!(f, "malformed backup document: {err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BackupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Malformed(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for BackupError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Collects the full entity graph through the repository list operations.
pub fn collect_backup<C, V, S>(
    catalog: &C,
    variations: &V,
    sets: &S,
) -> Result<Backup, BackupError>
where
    C: CatalogRepository,
    V: VariationRepository,
    S: SetRepository,
{
    Ok(Backup {
        locations: catalog.list_locations()?,
        muscles: catalog.list_muscles()?,
        exercises: catalog.list_exercises()?,
        sets: sets.list_sets()?,
        variations: variations.list_variations()?,
    })
}

/// Serializes the full entity graph into the backup document.
pub fn export_backup<C, V, S>(catalog: &C, variations: &V, sets: &S) -> Result<String, BackupError>
where
    C: CatalogRepository,
    V: VariationRepository,
    S: SetRepository,
{
    let backup = collect_backup(catalog, variations, sets)?;
    let document = serde_json::to_string(&backup).map_err(BackupError::Malformed)?;
    info!(
        "event=backup_export module=service status=ok locations={} muscles={} exercises={} variations={} sets={}",
        backup.locations.len(),
        backup.muscles.len(),
        backup.exercises.len(),
        backup.variations.len(),
        backup.sets.len()
    );
    Ok(document)
}

/// Parses a backup document and inserts its records.
pub fn restore_backup<C, V, S>(
    catalog: &C,
    variations: &V,
    sets: &S,
    document: &str,
) -> Result<(), BackupError>
where
    C: CatalogRepository,
    V: VariationRepository,
    S: SetRepository,
{
    let backup: Backup = serde_json::from_str(document).map_err(BackupError::Malformed)?;
    apply_backup(catalog, variations, sets, &backup)
}

/// Inserts an already-parsed backup in dependency order.
pub fn apply_backup<C, V, S>(
    catalog: &C,
    variations: &V,
    sets: &S,
    backup: &Backup,
) -> Result<(), BackupError>
where
    C: CatalogRepository,
    V: VariationRepository,
    S: SetRepository,
{
    catalog.restore_locations(&backup.locations)?;
    catalog.restore_muscles(&backup.muscles)?;
    catalog.restore_exercises(&backup.exercises)?;
    variations.restore_variations(&backup.variations)?;
    sets.restore_sets(&backup.sets)?;
    info!(
        "event=backup_restore module=service status=ok locations={} muscles={} exercises={} variations={} sets={}",
        backup.locations.len(),
        backup.muscles.len(),
        backup.exercises.len(),
        backup.variations.len(),
        backup.sets.len()
    );
    Ok(())
}
