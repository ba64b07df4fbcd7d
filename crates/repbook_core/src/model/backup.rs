//! Full-state backup document.
//!
//! The document is versionless and self-contained: five flat sequences
//! covering the whole entity graph. Its field names and the attribute names
//! of the entity records are a compatibility contract with previously
//! exported documents.

use crate::model::entity::{Exercise, ExerciseVariation, Location, Muscle};
use crate::model::set::WorkoutSet;
use serde::{Deserialize, Serialize};

/// Everything the store knows, in no particular cross-entity order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Backup {
    pub locations: Vec<Location>,
    pub muscles: Vec<Muscle>,
    pub exercises: Vec<Exercise>,
    pub sets: Vec<WorkoutSet>,
    pub variations: Vec<ExerciseVariation>,
}
