//! Catalog entities: locations, muscles, equipment, exercises, variations.
//!
//! # Responsibility
//! - Define the reference data a workout set points at.
//!
//! # Invariants
//! - `Equipment.location` and `Exercise.muscle` always reference existing
//!   rows; storage enforces this with cascading foreign keys.
//! - `ExerciseVariation.exercise` is immutable once created.
//!
//! Field names double as the backup document attribute names, so renaming
//! any of them breaks restore of previously exported documents.

use crate::model::ids::{EquipmentId, ExerciseId, LocationId, MuscleId, VariationId};
use serde::{Deserialize, Serialize};

/// A place where training happens, e.g. a specific gym.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Muscle {
    pub id: MuscleId,
    pub name: String,
}

/// A concrete piece of equipment at one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    pub id: EquipmentId,
    pub name: String,
    pub location: LocationId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: ExerciseId,
    pub name: String,
    pub muscle: MuscleId,
}

/// A specific way of performing an exercise, distinguished by equipment and
/// location. Historical variations were derived from legacy
/// (exercise, location, equipment) triples during the schema migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseVariation {
    pub id: VariationId,
    pub name: String,
    pub exercise: ExerciseId,
    pub location: Option<LocationId>,
}

/// Read model for the variation edit view: the variation plus the name of
/// the location it references, when it has one. Computed by join, no
/// independent lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariationContent {
    pub id: VariationId,
    pub name: String,
    pub location: Option<LocationId>,
    pub location_name: Option<String>,
}
