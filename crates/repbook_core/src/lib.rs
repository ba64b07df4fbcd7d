//! Persistence and data-integrity core for the repbook workout tracker.
//! This crate is the single source of truth for the data model, the
//! one-shot variation migration, weekly volume aggregation and backups.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{open_db, open_db_in_memory};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::backup::Backup;
pub use model::entity::{
    Equipment, Exercise, ExerciseVariation, Location, Muscle, VariationContent,
};
pub use model::ids::{EquipmentId, ExerciseId, LocationId, MuscleId, SetId, VariationId};
pub use model::intensity::Intensity;
pub use model::set::{SetContent, SetSummary, SetValidationError, WorkoutSet};
pub use model::week::{week_windows, WeekRange};
pub use repo::catalog_repo::{CatalogRepository, SqliteCatalogRepository};
pub use repo::set_repo::{MuscleSetCount, SetRepository, SqliteSetRepository};
pub use repo::variation_repo::{SqliteVariationRepository, VariationRepository};
pub use repo::{RepoError, RepoResult};
pub use service::backup_service::{
    apply_backup, collect_backup, export_backup, restore_backup, BackupError,
};
pub use service::volume_service::{weekly_muscle_volume, MuscleSetHistory, WeeklyVolume};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
