//! Variation derivation engine for the one-shot schema evolution.
//!
//! # Responsibility
//! - Reconstruct canonical exercise variations from the historical
//!   (exercise, location, equipment) triples of legacy sets.
//! - Assign every legacy set to the variation derived from its triple.
//!
//! # Invariants
//! - Identical triples always collapse to exactly one variation; distinct
//!   triples never share one.
//! - Every seed tuple yields exactly one set assignment.
//! - [`derive_variations`] performs no I/O; all reads and writes happen in
//!   [`backfill_variations`], inside the migration transaction.

use crate::db::DbResult;
use crate::model::entity::ExerciseVariation;
use crate::model::ids::{EquipmentId, ExerciseId, LocationId, SetId, VariationId};
use log::info;
use rusqlite::{params, Transaction};
use std::collections::HashMap;

/// One legacy set that referenced equipment, as read from the migrated
/// sets table joined with equipment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariationSeed {
    pub set: SetId,
    pub exercise: ExerciseId,
    pub location: LocationId,
    pub equipment: EquipmentId,
    pub equipment_name: String,
}

/// The full outcome of a derivation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariationAssignments {
    /// Minted variations, keyed by their id.
    pub variations: HashMap<VariationId, ExerciseVariation>,
    /// Which variation each legacy set belongs to.
    pub set_assignments: HashMap<SetId, VariationId>,
}

/// Derives canonical variations from legacy seeds in one forward pass.
///
/// The variation record for a triple is rewritten on every seed, so when
/// equipment sharing a triple was renamed mid-history the stored name and
/// location come from whichever seed is processed last. That last-write-wins
/// quirk is part of the documented behavior.
pub fn derive_variations(seeds: &[VariationSeed]) -> VariationAssignments {
    let mut ids_by_triple: HashMap<(ExerciseId, LocationId, EquipmentId), VariationId> =
        HashMap::new();
    let mut assignments = VariationAssignments::default();

    for seed in seeds {
        let triple = (
            seed.exercise.clone(),
            seed.location.clone(),
            seed.equipment.clone(),
        );
        let variation_id = ids_by_triple
            .entry(triple)
            .or_insert_with(VariationId::new)
            .clone();

        assignments.variations.insert(
            variation_id.clone(),
            ExerciseVariation {
                id: variation_id.clone(),
                name: seed.equipment_name.clone(),
                exercise: seed.exercise.clone(),
                location: Some(seed.location.clone()),
            },
        );
        assignments
            .set_assignments
            .insert(seed.set.clone(), variation_id);
    }

    assignments
}

/// Migration hook: reads the seeds, runs the derivation, and writes the
/// minted variations and set assignments. Runs inside the same transaction
/// as the schema rewrite, so a failure here aborts the whole migration.
pub(crate) fn backfill_variations(tx: &Transaction<'_>) -> DbResult<()> {
    let mut stmt = tx.prepare(
        "SELECT ws.id,
                ws.exercise,
                ws.location,
                equipment.id,
                equipment.name
         FROM workout_set ws
         JOIN equipment ON ws.equipment = equipment.id;",
    )?;

    let mut rows = stmt.query([])?;
    let mut seeds = Vec::new();
    while let Some(row) = rows.next()? {
        seeds.push(VariationSeed {
            set: SetId::from_string(row.get::<_, String>(0)?),
            exercise: ExerciseId::from_string(row.get::<_, String>(1)?),
            location: LocationId::from_string(row.get::<_, String>(2)?),
            equipment: EquipmentId::from_string(row.get::<_, String>(3)?),
            equipment_name: row.get(4)?,
        });
    }

    let assignments = derive_variations(&seeds);

    for variation in assignments.variations.values() {
        tx.execute(
            "INSERT INTO exercise_variation (id, name, exercise, location)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                variation.id.as_str(),
                variation.name,
                variation.exercise.as_str(),
                variation.location.as_ref().map(LocationId::as_str),
            ],
        )?;
    }

    for (set_id, variation_id) in &assignments.set_assignments {
        tx.execute(
            "UPDATE workout_set SET variation = ?1 WHERE id = ?2;",
            params![variation_id.as_str(), set_id.as_str()],
        )?;
    }

    info!(
        "event=variation_backfill module=db status=ok seeds={} variations={}",
        seeds.len(),
        assignments.variations.len()
    );
    Ok(())
}
