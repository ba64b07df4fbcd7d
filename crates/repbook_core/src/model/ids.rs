//! Opaque per-entity identifiers.
//!
//! # Responsibility
//! - Give every entity kind its own id type so ids cannot be mixed up
//!   across kinds at compile time.
//!
//! # Invariants
//! - Ids are immutable for the lifetime of the entity they name.
//! - Fresh ids are random tokens; rows migrated from the legacy schema
//!   keep their original keys verbatim.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Mints a fresh random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Wraps an existing identifier, e.g. one read back from storage.
            pub fn from_string(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

entity_id!(
    /// Identifies a training location (a gym).
    LocationId
);
entity_id!(
    /// Identifies a muscle.
    MuscleId
);
entity_id!(
    /// Identifies a piece of equipment at a location.
    EquipmentId
);
entity_id!(
    /// Identifies an exercise.
    ExerciseId
);
entity_id!(
    /// Identifies an exercise variation.
    VariationId
);
entity_id!(
    /// Identifies a logged workout set.
    SetId
);
