//! Workout set domain record and its derived read models.
//!
//! # Responsibility
//! - Define the logged-set shape shared by edit, list and aggregate views.
//!
//! # Invariants
//! - `exercise` is mandatory; `variation`, `location` and `equipment` are
//!   optional and independent of each other.
//! - `location` and `equipment` are legacy columns superseded by
//!   `variation`; new sets never populate them.
//! - `time` has second precision end to end.

use crate::model::ids::{EquipmentId, ExerciseId, LocationId, SetId, VariationId};
use crate::model::intensity::Intensity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Default rep count for a freshly created set.
pub const NEW_SET_REPS: u32 = 10;

/// One logged set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSet {
    pub id: SetId,
    pub exercise: ExerciseId,
    /// Legacy; kept for pre-migration data only.
    pub location: Option<LocationId>,
    /// Legacy; superseded by `variation` and excluded from backups.
    #[serde(skip)]
    pub equipment: Option<EquipmentId>,
    pub variation: Option<VariationId>,
    pub reps: u32,
    pub weight: f32,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub time: DateTime<Utc>,
    pub intensity: Intensity,
    pub comment: String,
}

impl WorkoutSet {
    /// Creates a set with the standard new-set defaults.
    pub fn new(exercise: ExerciseId, time: DateTime<Utc>) -> Self {
        Self {
            id: SetId::new(),
            exercise,
            location: None,
            equipment: None,
            variation: None,
            reps: NEW_SET_REPS,
            weight: 0.0,
            time,
            intensity: Intensity::Normal,
            comment: String::new(),
        }
    }

    /// Checks domain invariants before the record is persisted.
    pub fn validate(&self) -> Result<(), SetValidationError> {
        if !self.weight.is_finite() {
            return Err(SetValidationError::WeightNotFinite);
        }
        if self.weight < 0.0 {
            return Err(SetValidationError::WeightNegative(self.weight));
        }
        Ok(())
    }
}

/// Rejects set records that violate domain invariants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SetValidationError {
    WeightNegative(f32),
    WeightNotFinite,
}

impl Display for SetValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WeightNegative(weight) => write!(f, "weight must not be negative: {weight}"),
            Self::WeightNotFinite => write!(f, "weight must be a finite number"),
        }
    }
}

impl Error for SetValidationError {}

/// Read model for set list views: the set plus denormalized exercise and
/// variation names, served by the `set_summary` view.
#[derive(Debug, Clone, PartialEq)]
pub struct SetSummary {
    pub id: SetId,
    pub exercise: ExerciseId,
    pub exercise_name: String,
    pub variation: Option<VariationId>,
    pub variation_name: Option<String>,
    pub reps: u32,
    pub weight: f32,
    pub time: DateTime<Utc>,
    pub intensity: Intensity,
}

/// Read model for the set edit view, computed by join at read time.
#[derive(Debug, Clone, PartialEq)]
pub struct SetContent {
    pub id: SetId,
    pub exercise: ExerciseId,
    pub exercise_name: String,
    pub variation: Option<VariationId>,
    pub variation_name: Option<String>,
    pub reps: u32,
    pub weight: f32,
    pub time: DateTime<Utc>,
    pub intensity: Intensity,
    pub comment: String,
}
