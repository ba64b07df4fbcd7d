//! Exercise variation repository.
//!
//! # Responsibility
//! - CRUD over exercise variations and the joined variation read model.
//!
//! # Invariants
//! - A variation's exercise reference is immutable once created; updates
//!   touch only name and location.
//! - `restore_variations` skips rows whose id already exists.

use crate::model::entity::{ExerciseVariation, VariationContent};
use crate::model::ids::{ExerciseId, LocationId, VariationId};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const NEW_VARIATION_NAME: &str = "New Variation";

const VARIATION_SELECT_SQL: &str = "SELECT id, name, exercise, location FROM exercise_variation";

/// Repository contract for exercise variations.
pub trait VariationRepository {
    fn create_variation(&self, exercise: &ExerciseId) -> RepoResult<ExerciseVariation>;
    fn update_variation(
        &self,
        id: &VariationId,
        name: &str,
        location: Option<&LocationId>,
    ) -> RepoResult<()>;
    /// Succeeds even when the id is already absent.
    fn delete_variation(&self, id: &VariationId) -> RepoResult<()>;
    fn list_variations(&self) -> RepoResult<Vec<ExerciseVariation>>;
    fn variations_for_exercise(&self, exercise: &ExerciseId)
        -> RepoResult<Vec<ExerciseVariation>>;
    /// Variation plus its location name, for the edit view.
    fn get_variation_content(&self, id: &VariationId) -> RepoResult<VariationContent>;
    /// Conflict-ignore bulk insert for backup restore.
    fn restore_variations(&self, variations: &[ExerciseVariation]) -> RepoResult<()>;
}

/// SQLite-backed variation repository.
pub struct SqliteVariationRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteVariationRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl VariationRepository for SqliteVariationRepository<'_> {
    fn create_variation(&self, exercise: &ExerciseId) -> RepoResult<ExerciseVariation> {
        let variation = ExerciseVariation {
            id: VariationId::new(),
            name: NEW_VARIATION_NAME.to_string(),
            exercise: exercise.clone(),
            location: None,
        };
        self.conn.execute(
            "INSERT INTO exercise_variation (id, name, exercise, location)
             VALUES (?1, ?2, ?3, NULL);",
            params![
                variation.id.as_str(),
                variation.name,
                variation.exercise.as_str()
            ],
        )?;
        Ok(variation)
    }

    fn update_variation(
        &self,
        id: &VariationId,
        name: &str,
        location: Option<&LocationId>,
    ) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE exercise_variation SET name = ?1, location = ?2 WHERE id = ?3;",
            params![name, location.map(LocationId::as_str), id.as_str()],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found("exercise variation", id));
        }
        Ok(())
    }

    fn delete_variation(&self, id: &VariationId) -> RepoResult<()> {
        self.conn.execute(
            "DELETE FROM exercise_variation WHERE id = ?1;",
            [id.as_str()],
        )?;
        Ok(())
    }

    fn list_variations(&self) -> RepoResult<Vec<ExerciseVariation>> {
        let mut stmt = self.conn.prepare(&format!("{VARIATION_SELECT_SQL};"))?;
        let mut rows = stmt.query([])?;
        let mut variations = Vec::new();
        while let Some(row) = rows.next()? {
            variations.push(parse_variation_row(row)?);
        }
        Ok(variations)
    }

    fn variations_for_exercise(
        &self,
        exercise: &ExerciseId,
    ) -> RepoResult<Vec<ExerciseVariation>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{VARIATION_SELECT_SQL} WHERE exercise = ?1;"))?;
        let mut rows = stmt.query([exercise.as_str()])?;
        let mut variations = Vec::new();
        while let Some(row) = rows.next()? {
            variations.push(parse_variation_row(row)?);
        }
        Ok(variations)
    }

    fn get_variation_content(&self, id: &VariationId) -> RepoResult<VariationContent> {
        let mut stmt = self.conn.prepare(
            "SELECT exercise_variation.id AS id,
                    exercise_variation.name AS name,
                    exercise_variation.location AS location,
                    location.name AS location_name
             FROM exercise_variation
             LEFT JOIN location ON location.id = exercise_variation.location
             WHERE exercise_variation.id = ?1;",
        )?;
        let mut rows = stmt.query([id.as_str()])?;
        if let Some(row) = rows.next()? {
            return Ok(VariationContent {
                id: VariationId::from_string(row.get::<_, String>("id")?),
                name: row.get("name")?,
                location: row
                    .get::<_, Option<String>>("location")?
                    .map(LocationId::from_string),
                location_name: row.get("location_name")?,
            });
        }
        Err(RepoError::not_found("exercise variation", id))
    }

    fn restore_variations(&self, variations: &[ExerciseVariation]) -> RepoResult<()> {
        let mut stmt = self.conn.prepare(
            "INSERT OR IGNORE INTO exercise_variation (id, name, exercise, location)
             VALUES (?1, ?2, ?3, ?4);",
        )?;
        for variation in variations {
            stmt.execute(params![
                variation.id.as_str(),
                variation.name,
                variation.exercise.as_str(),
                variation.location.as_ref().map(LocationId::as_str),
            ])?;
        }
        Ok(())
    }
}

fn parse_variation_row(row: &Row<'_>) -> RepoResult<ExerciseVariation> {
    Ok(ExerciseVariation {
        id: VariationId::from_string(row.get::<_, String>("id")?),
        name: row.get("name")?,
        exercise: ExerciseId::from_string(row.get::<_, String>("exercise")?),
        location: row
            .get::<_, Option<String>>("location")?
            .map(LocationId::from_string),
    })
}
