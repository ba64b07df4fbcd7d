//! Catalog repository: locations, muscles, equipment and exercises.
//!
//! # Responsibility
//! - CRUD over the reference data workout sets point at.
//! - Bulk conflict-ignore inserts for the backup restore path.
//!
//! # Invariants
//! - New entities start with a placeholder name and a fresh random id.
//! - List orderings are caller-visible contracts: locations, muscles and
//!   exercises sort by name; equipment sorts by (location, name).
//! - Dependent rows disappear through storage-level cascades, not through
//!   repository code.

use crate::model::entity::{Equipment, Exercise, Location, Muscle};
use crate::model::ids::{EquipmentId, ExerciseId, LocationId, MuscleId};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const NEW_LOCATION_NAME: &str = "New Location";
const NEW_MUSCLE_NAME: &str = "New Muscle";
const NEW_EQUIPMENT_NAME: &str = "New Equipment";
const NEW_EXERCISE_NAME: &str = "New Exercise";

/// Repository contract for catalog entities.
pub trait CatalogRepository {
    fn create_location(&self) -> RepoResult<Location>;
    fn update_location(&self, id: &LocationId, name: &str) -> RepoResult<()>;
    /// Succeeds even when the id is already absent.
    fn delete_location(&self, id: &LocationId) -> RepoResult<()>;
    /// Locations ordered by name.
    fn list_locations(&self) -> RepoResult<Vec<Location>>;

    fn create_muscle(&self) -> RepoResult<Muscle>;
    fn update_muscle(&self, id: &MuscleId, name: &str) -> RepoResult<()>;
    fn delete_muscle(&self, id: &MuscleId) -> RepoResult<()>;
    /// Muscles ordered by name.
    fn list_muscles(&self) -> RepoResult<Vec<Muscle>>;

    fn create_equipment(&self, location: &LocationId) -> RepoResult<Equipment>;
    fn update_equipment(
        &self,
        id: &EquipmentId,
        name: &str,
        location: &LocationId,
    ) -> RepoResult<()>;
    fn delete_equipment(&self, id: &EquipmentId) -> RepoResult<()>;
    /// Equipment ordered by (location, name).
    fn list_equipment(&self) -> RepoResult<Vec<Equipment>>;

    fn create_exercise(&self, muscle: &MuscleId) -> RepoResult<Exercise>;
    fn update_exercise(&self, id: &ExerciseId, name: &str, muscle: &MuscleId) -> RepoResult<()>;
    fn delete_exercise(&self, id: &ExerciseId) -> RepoResult<()>;
    fn get_exercise(&self, id: &ExerciseId) -> RepoResult<Exercise>;
    /// Exercises ordered by name.
    fn list_exercises(&self) -> RepoResult<Vec<Exercise>>;

    /// Conflict-ignore bulk insert: rows whose id already exists are
    /// skipped, never overwritten. Used by backup restore.
    fn restore_locations(&self, locations: &[Location]) -> RepoResult<()>;
    fn restore_muscles(&self, muscles: &[Muscle]) -> RepoResult<()>;
    fn restore_exercises(&self, exercises: &[Exercise]) -> RepoResult<()>;
}

/// SQLite-backed catalog repository.
pub struct SqliteCatalogRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCatalogRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl CatalogRepository for SqliteCatalogRepository<'_> {
    fn create_location(&self) -> RepoResult<Location> {
        let location = Location {
            id: LocationId::new(),
            name: NEW_LOCATION_NAME.to_string(),
        };
        self.conn.execute(
            "INSERT INTO location (id, name) VALUES (?1, ?2);",
            params![location.id.as_str(), location.name],
        )?;
        Ok(location)
    }

    fn update_location(&self, id: &LocationId, name: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE location SET name = ?1 WHERE id = ?2;",
            params![name, id.as_str()],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found("location", id));
        }
        Ok(())
    }

    fn delete_location(&self, id: &LocationId) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM location WHERE id = ?1;", [id.as_str()])?;
        Ok(())
    }

    fn list_locations(&self) -> RepoResult<Vec<Location>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM location ORDER BY name;")?;
        let mut rows = stmt.query([])?;
        let mut locations = Vec::new();
        while let Some(row) = rows.next()? {
            locations.push(parse_location_row(row)?);
        }
        Ok(locations)
    }

    fn create_muscle(&self) -> RepoResult<Muscle> {
        let muscle = Muscle {
            id: MuscleId::new(),
            name: NEW_MUSCLE_NAME.to_string(),
        };
        self.conn.execute(
            "INSERT INTO muscle (id, name) VALUES (?1, ?2);",
            params![muscle.id.as_str(), muscle.name],
        )?;
        Ok(muscle)
    }

    fn update_muscle(&self, id: &MuscleId, name: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE muscle SET name = ?1 WHERE id = ?2;",
            params![name, id.as_str()],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found("muscle", id));
        }
        Ok(())
    }

    fn delete_muscle(&self, id: &MuscleId) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM muscle WHERE id = ?1;", [id.as_str()])?;
        Ok(())
    }

    fn list_muscles(&self) -> RepoResult<Vec<Muscle>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM muscle ORDER BY name;")?;
        let mut rows = stmt.query([])?;
        let mut muscles = Vec::new();
        while let Some(row) = rows.next()? {
            muscles.push(Muscle {
                id: MuscleId::from_string(row.get::<_, String>("id")?),
                name: row.get("name")?,
            });
        }
        Ok(muscles)
    }

    fn create_equipment(&self, location: &LocationId) -> RepoResult<Equipment> {
        let equipment = Equipment {
            id: EquipmentId::new(),
            name: NEW_EQUIPMENT_NAME.to_string(),
            location: location.clone(),
        };
        self.conn.execute(
            "INSERT INTO equipment (id, name, location) VALUES (?1, ?2, ?3);",
            params![
                equipment.id.as_str(),
                equipment.name,
                equipment.location.as_str()
            ],
        )?;
        Ok(equipment)
    }

    fn update_equipment(
        &self,
        id: &EquipmentId,
        name: &str,
        location: &LocationId,
    ) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE equipment SET name = ?1, location = ?2 WHERE id = ?3;",
            params![name, location.as_str(), id.as_str()],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found("equipment", id));
        }
        Ok(())
    }

    fn delete_equipment(&self, id: &EquipmentId) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM equipment WHERE id = ?1;", [id.as_str()])?;
        Ok(())
    }

    fn list_equipment(&self) -> RepoResult<Vec<Equipment>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, location FROM equipment ORDER BY location, name;")?;
        let mut rows = stmt.query([])?;
        let mut equipment = Vec::new();
        while let Some(row) = rows.next()? {
            equipment.push(Equipment {
                id: EquipmentId::from_string(row.get::<_, String>("id")?),
                name: row.get("name")?,
                location: LocationId::from_string(row.get::<_, String>("location")?),
            });
        }
        Ok(equipment)
    }

    fn create_exercise(&self, muscle: &MuscleId) -> RepoResult<Exercise> {
        let exercise = Exercise {
            id: ExerciseId::new(),
            name: NEW_EXERCISE_NAME.to_string(),
            muscle: muscle.clone(),
        };
        self.conn.execute(
            "INSERT INTO exercise (id, name, muscle) VALUES (?1, ?2, ?3);",
            params![
                exercise.id.as_str(),
                exercise.name,
                exercise.muscle.as_str()
            ],
        )?;
        Ok(exercise)
    }

    fn update_exercise(&self, id: &ExerciseId, name: &str, muscle: &MuscleId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE exercise SET name = ?1, muscle = ?2 WHERE id = ?3;",
            params![name, muscle.as_str(), id.as_str()],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found("exercise", id));
        }
        Ok(())
    }

    fn delete_exercise(&self, id: &ExerciseId) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM exercise WHERE id = ?1;", [id.as_str()])?;
        Ok(())
    }

    fn get_exercise(&self, id: &ExerciseId) -> RepoResult<Exercise> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, muscle FROM exercise WHERE id = ?1;")?;
        let mut rows = stmt.query([id.as_str()])?;
        if let Some(row) = rows.next()? {
            return parse_exercise_row(row);
        }
        Err(RepoError::not_found("exercise", id))
    }

    fn list_exercises(&self) -> RepoResult<Vec<Exercise>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, muscle FROM exercise ORDER BY name;")?;
        let mut rows = stmt.query([])?;
        let mut exercises = Vec::new();
        while let Some(row) = rows.next()? {
            exercises.push(parse_exercise_row(row)?);
        }
        Ok(exercises)
    }

    fn restore_locations(&self, locations: &[Location]) -> RepoResult<()> {
        let mut stmt = self
            .conn
            .prepare("INSERT OR IGNORE INTO location (id, name) VALUES (?1, ?2);")?;
        for location in locations {
            stmt.execute(params![location.id.as_str(), location.name])?;
        }
        Ok(())
    }

    fn restore_muscles(&self, muscles: &[Muscle]) -> RepoResult<()> {
        let mut stmt = self
            .conn
            .prepare("INSERT OR IGNORE INTO muscle (id, name) VALUES (?1, ?2);")?;
        for muscle in muscles {
            stmt.execute(params![muscle.id.as_str(), muscle.name])?;
        }
        Ok(())
    }

    fn restore_exercises(&self, exercises: &[Exercise]) -> RepoResult<()> {
        let mut stmt = self
            .conn
            .prepare("INSERT OR IGNORE INTO exercise (id, name, muscle) VALUES (?1, ?2, ?3);")?;
        for exercise in exercises {
            stmt.execute(params![
                exercise.id.as_str(),
                exercise.name,
                exercise.muscle.as_str()
            ])?;
        }
        Ok(())
    }
}

fn parse_location_row(row: &Row<'_>) -> RepoResult<Location> {
    Ok(Location {
        id: LocationId::from_string(row.get::<_, String>("id")?),
        name: row.get("name")?,
    })
}

fn parse_exercise_row(row: &Row<'_>) -> RepoResult<Exercise> {
    Ok(Exercise {
        id: ExerciseId::from_string(row.get::<_, String>("id")?),
        name: row.get("name")?,
        muscle: MuscleId::from_string(row.get::<_, String>("muscle")?),
    })
}
