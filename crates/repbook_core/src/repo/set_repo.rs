//! Workout set repository: CRUD, history queries and the volume aggregate.
//!
//! # Responsibility
//! - Persist logged sets and serve the set read models.
//! - Answer the history and per-muscle aggregate queries behind the set
//!   edit and volume views.
//!
//! # Invariants
//! - `update_set` never touches the vestigial `equipment` column.
//! - Time is stored as epoch seconds; sub-second precision is dropped at
//!   this boundary.
//! - Write paths call `WorkoutSet::validate()` before SQL mutations.

use crate::model::ids::{EquipmentId, ExerciseId, LocationId, MuscleId, SetId, VariationId};
use crate::model::intensity::Intensity;
use crate::model::set::{SetContent, SetSummary, WorkoutSet};
use crate::repo::{RepoError, RepoResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

const SET_SELECT_SQL: &str = "SELECT
    id,
    exercise,
    location,
    variation,
    equipment,
    reps,
    weight,
    time,
    intensity,
    comment
FROM workout_set";

/// Per-muscle count of qualifying sets inside one week window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MuscleSetCount {
    pub muscle: MuscleId,
    pub muscle_name: String,
    pub set_count: u32,
}

/// Repository contract for logged sets.
pub trait SetRepository {
    /// Inserts a set with the new-set defaults and returns it.
    fn create_set(&self, exercise: &ExerciseId, time: DateTime<Utc>) -> RepoResult<WorkoutSet>;
    /// Full-record update; `NotFound` when the id does not exist.
    fn update_set(&self, set: &WorkoutSet) -> RepoResult<()>;
    /// Succeeds even when the id is already absent.
    fn delete_set(&self, id: &SetId) -> RepoResult<()>;
    fn get_set(&self, id: &SetId) -> RepoResult<WorkoutSet>;
    /// Set joined with exercise and optional variation names.
    fn get_set_content(&self, id: &SetId) -> RepoResult<SetContent>;
    fn list_sets(&self) -> RepoResult<Vec<WorkoutSet>>;
    /// Reads the precomputed `set_summary` view.
    fn set_summaries(&self) -> RepoResult<Vec<SetSummary>>;
    /// Up to `limit` sets for the exercise strictly before `cutoff`, most
    /// recent first. `variation = None` matches only sets without a
    /// variation, not any variation.
    fn sets_before(
        &self,
        cutoff: DateTime<Utc>,
        exercise: &ExerciseId,
        variation: Option<&VariationId>,
        limit: u32,
    ) -> RepoResult<Vec<WorkoutSet>>;
    /// Most recent set by time across all exercises, excluding the given
    /// id. Feeds the new-set prefill.
    fn latest_set_excluding(&self, id: &SetId) -> RepoResult<Option<WorkoutSet>>;
    /// Qualifying-set counts per muscle over the half-open window
    /// `[start, end)` in epoch seconds. Every muscle appears, zero counts
    /// included. Qualifying means `Intensity::counts_toward_volume`.
    fn sets_per_muscle_between(&self, start: i64, end: i64) -> RepoResult<Vec<MuscleSetCount>>;
    /// Conflict-ignore bulk insert for backup restore. Restored sets never
    /// reference equipment.
    fn restore_sets(&self, sets: &[WorkoutSet]) -> RepoResult<()>;
}

/// SQLite-backed set repository.
pub struct SqliteSetRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSetRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl SetRepository for SqliteSetRepository<'_> {
    fn create_set(&self, exercise: &ExerciseId, time: DateTime<Utc>) -> RepoResult<WorkoutSet> {
        let set = WorkoutSet::new(exercise.clone(), truncate_to_seconds(time));
        self.conn.execute(
            "INSERT INTO workout_set
                (id, exercise, location, variation, equipment, reps, weight, time, intensity, comment)
             VALUES (?1, ?2, NULL, NULL, NULL, ?3, ?4, ?5, ?6, ?7);",
            params![
                set.id.as_str(),
                set.exercise.as_str(),
                set.reps,
                set.weight,
                set.time.timestamp(),
                set.intensity.code(),
                set.comment,
            ],
        )?;
        Ok(set)
    }

    fn update_set(&self, set: &WorkoutSet) -> RepoResult<()> {
        set.validate()?;

        let changed = self.conn.execute(
            "UPDATE workout_set
             SET
                exercise = ?1,
                location = ?2,
                variation = ?3,
                reps = ?4,
                weight = ?5,
                time = ?6,
                intensity = ?7,
                comment = ?8
             WHERE id = ?9;",
            params![
                set.exercise.as_str(),
                set.location.as_ref().map(LocationId::as_str),
                set.variation.as_ref().map(VariationId::as_str),
                set.reps,
                set.weight,
                set.time.timestamp(),
                set.intensity.code(),
                set.comment,
                set.id.as_str(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::not_found("workout set", &set.id));
        }
        Ok(())
    }

    fn delete_set(&self, id: &SetId) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM workout_set WHERE id = ?1;", [id.as_str()])?;
        Ok(())
    }

    fn get_set(&self, id: &SetId) -> RepoResult<WorkoutSet> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SET_SELECT_SQL} WHERE id = ?1 LIMIT 1;"))?;
        let mut rows = stmt.query([id.as_str()])?;
        if let Some(row) = rows.next()? {
            return parse_set_row(row);
        }
        Err(RepoError::not_found("workout set", id))
    }

    fn get_set_content(&self, id: &SetId) -> RepoResult<SetContent> {
        let mut stmt = self.conn.prepare(
            "SELECT workout_set.id AS id,
                    workout_set.exercise AS exercise,
                    exercise.name AS exercise_name,
                    workout_set.variation AS variation,
                    exercise_variation.name AS variation_name,
                    workout_set.reps AS reps,
                    workout_set.weight AS weight,
                    workout_set.time AS time,
                    workout_set.intensity AS intensity,
                    workout_set.comment AS comment
             FROM workout_set
             JOIN exercise ON exercise.id = workout_set.exercise
             LEFT JOIN exercise_variation ON exercise_variation.id = workout_set.variation
             WHERE workout_set.id = ?1
             LIMIT 1;",
        )?;
        let mut rows = stmt.query([id.as_str()])?;
        if let Some(row) = rows.next()? {
            return Ok(SetContent {
                id: SetId::from_string(row.get::<_, String>("id")?),
                exercise: ExerciseId::from_string(row.get::<_, String>("exercise")?),
                exercise_name: row.get("exercise_name")?,
                variation: row
                    .get::<_, Option<String>>("variation")?
                    .map(VariationId::from_string),
                variation_name: row.get("variation_name")?,
                reps: row.get("reps")?,
                weight: row.get("weight")?,
                time: parse_epoch_seconds(row.get("time")?)?,
                intensity: parse_intensity(row.get("intensity")?)?,
                comment: row.get("comment")?,
            });
        }
        Err(RepoError::not_found("workout set", id))
    }

    fn list_sets(&self) -> RepoResult<Vec<WorkoutSet>> {
        let mut stmt = self.conn.prepare(&format!("{SET_SELECT_SQL};"))?;
        let mut rows = stmt.query([])?;
        let mut sets = Vec::new();
        while let Some(row) = rows.next()? {
            sets.push(parse_set_row(row)?);
        }
        Ok(sets)
    }

    fn set_summaries(&self) -> RepoResult<Vec<SetSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, exercise, exercise_name, variation, variation_name,
                    reps, weight, time, intensity
             FROM set_summary;",
        )?;
        let mut rows = stmt.query([])?;
        let mut summaries = Vec::new();
        while let Some(row) = rows.next()? {
            summaries.push(SetSummary {
                id: SetId::from_string(row.get::<_, String>("id")?),
                exercise: ExerciseId::from_string(row.get::<_, String>("exercise")?),
                exercise_name: row.get("exercise_name")?,
                variation: row
                    .get::<_, Option<String>>("variation")?
                    .map(VariationId::from_string),
                variation_name: row.get("variation_name")?,
                reps: row.get("reps")?,
                weight: row.get("weight")?,
                time: parse_epoch_seconds(row.get("time")?)?,
                intensity: parse_intensity(row.get("intensity")?)?,
            });
        }
        Ok(summaries)
    }

    fn sets_before(
        &self,
        cutoff: DateTime<Utc>,
        exercise: &ExerciseId,
        variation: Option<&VariationId>,
        limit: u32,
    ) -> RepoResult<Vec<WorkoutSet>> {
        // IS instead of = so an absent variation matches variation-less
        // rows rather than nothing.
        let mut stmt = self.conn.prepare(&format!(
            "{SET_SELECT_SQL}
             WHERE time < ?1
               AND exercise = ?2
               AND variation IS ?3
             ORDER BY time DESC
             LIMIT ?4;"
        ))?;
        let mut rows = stmt.query(params![
            cutoff.timestamp(),
            exercise.as_str(),
            variation.map(VariationId::as_str),
            limit,
        ])?;
        let mut sets = Vec::new();
        while let Some(row) = rows.next()? {
            sets.push(parse_set_row(row)?);
        }
        Ok(sets)
    }

    fn latest_set_excluding(&self, id: &SetId) -> RepoResult<Option<WorkoutSet>> {
        let mut stmt = self.conn.prepare(&format!(
            "{SET_SELECT_SQL}
             WHERE id != ?1
             ORDER BY time DESC
             LIMIT 1;"
        ))?;
        let mut rows = stmt.query([id.as_str()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_set_row(row)?));
        }
        Ok(None)
    }

    fn sets_per_muscle_between(&self, start: i64, end: i64) -> RepoResult<Vec<MuscleSetCount>> {
        // Intensity literals mirror Intensity::counts_toward_volume: only
        // codes strictly between NoActivation (1) and Pain (5) count.
        let mut stmt = self.conn.prepare(
            "SELECT m.id AS muscle_id,
                    m.name AS muscle_name,
                    SUM(IFNULL(counted.one, 0)) AS set_count
             FROM muscle m
             LEFT JOIN (
                 SELECT exercise.muscle AS muscle_id, 1 AS one
                 FROM workout_set ws
                 JOIN exercise ON exercise.id = ws.exercise
                 WHERE ?1 <= ws.time
                   AND ws.time < ?2
                   AND 1 < ws.intensity
                   AND ws.intensity < 5
             ) counted ON counted.muscle_id = m.id
             GROUP BY m.id, m.name
             ORDER BY m.name;",
        )?;
        let mut rows = stmt.query(params![start, end])?;
        let mut counts = Vec::new();
        while let Some(row) = rows.next()? {
            counts.push(MuscleSetCount {
                muscle: MuscleId::from_string(row.get::<_, String>("muscle_id")?),
                muscle_name: row.get("muscle_name")?,
                set_count: row.get("set_count")?,
            });
        }
        Ok(counts)
    }

    fn restore_sets(&self, sets: &[WorkoutSet]) -> RepoResult<()> {
        let mut stmt = self.conn.prepare(
            "INSERT OR IGNORE INTO workout_set
                (id, exercise, location, variation, equipment, reps, weight, time, intensity, comment)
             VALUES (?1, ?2, ?3, ?4, NULL, ?5, ?6, ?7, ?8, ?9);",
        )?;
        for set in sets {
            set.validate()?;
            stmt.execute(params![
                set.id.as_str(),
                set.exercise.as_str(),
                set.location.as_ref().map(LocationId::as_str),
                set.variation.as_ref().map(VariationId::as_str),
                set.reps,
                set.weight,
                set.time.timestamp(),
                set.intensity.code(),
                set.comment,
            ])?;
        }
        Ok(())
    }
}

fn truncate_to_seconds(time: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp(time.timestamp(), 0).unwrap_or(time)
}

fn parse_epoch_seconds(seconds: i64) -> RepoResult<DateTime<Utc>> {
    DateTime::from_timestamp(seconds, 0).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid epoch seconds `{seconds}` in workout_set.time"))
    })
}

fn parse_intensity(code: i64) -> RepoResult<Intensity> {
    Intensity::from_code(code).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid intensity code `{code}` in workout_set.intensity"
        ))
    })
}

fn parse_set_row(row: &Row<'_>) -> RepoResult<WorkoutSet> {
    Ok(WorkoutSet {
        id: SetId::from_string(row.get::<_, String>("id")?),
        exercise: ExerciseId::from_string(row.get::<_, String>("exercise")?),
        location: row
            .get::<_, Option<String>>("location")?
            .map(LocationId::from_string),
        equipment: row
            .get::<_, Option<String>>("equipment")?
            .map(EquipmentId::from_string),
        variation: row
            .get::<_, Option<String>>("variation")?
            .map(VariationId::from_string),
        reps: row.get("reps")?,
        weight: row.get("weight")?,
        time: parse_epoch_seconds(row.get("time")?)?,
        intensity: parse_intensity(row.get("intensity")?)?,
        comment: row.get("comment")?,
    })
}
