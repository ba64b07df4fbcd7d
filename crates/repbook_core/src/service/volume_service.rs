//! Weekly training-volume aggregation.
//!
//! # Responsibility
//! - Combine the per-muscle set counts of the current and previous week
//!   into one history view.
//!
//! # Invariants
//! - Every muscle appears in the output, with zero counts when it had no
//!   qualifying sets in either window.
//! - Week windows come from [`week_windows`]: half-open, contiguous, and
//!   relative to the caller's time zone.

use crate::model::ids::MuscleId;
use crate::model::week::{week_windows, WeekRange};
use crate::repo::set_repo::SetRepository;
use crate::repo::RepoResult;
use chrono::{DateTime, TimeZone};
use std::collections::HashMap;

/// Per-muscle set counts for the current and previous week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MuscleSetHistory {
    pub name: String,
    pub this_week: u32,
    pub last_week: u32,
}

/// The full weekly volume view.
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyVolume {
    pub this_week: WeekRange,
    pub last_week: WeekRange,
    pub per_muscle: HashMap<MuscleId, MuscleSetHistory>,
}

/// Computes per-muscle volume for the week containing `now` and the week
/// before it, in the time zone carried by `now`.
pub fn weekly_muscle_volume<R, Tz>(repo: &R, now: &DateTime<Tz>) -> RepoResult<WeeklyVolume>
where
    R: SetRepository,
    Tz: TimeZone,
{
    let (this_week, last_week) = week_windows(now);

    let last_by_muscle: HashMap<MuscleId, u32> = repo
        .sets_per_muscle_between(last_week.start, last_week.end)?
        .into_iter()
        .map(|row| (row.muscle, row.set_count))
        .collect();

    let mut per_muscle = HashMap::new();
    for row in repo.sets_per_muscle_between(this_week.start, this_week.end)? {
        let last_week_count = last_by_muscle.get(&row.muscle).copied().unwrap_or(0);
        per_muscle.insert(
            row.muscle,
            MuscleSetHistory {
                name: row.muscle_name,
                this_week: row.set_count,
                last_week: last_week_count,
            },
        );
    }

    Ok(WeeklyVolume {
        this_week,
        last_week,
        per_muscle,
    })
}
