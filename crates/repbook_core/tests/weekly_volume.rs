use chrono::{DateTime, FixedOffset, Utc};
use repbook_core::db::open_db_in_memory;
use repbook_core::{
    week_windows, weekly_muscle_volume, CatalogRepository, ExerciseId, Intensity, SetRepository,
    SqliteCatalogRepository, SqliteSetRepository,
};

// Monday 2024-05-13 00:00:00 UTC.
const WEEK_START_UTC: i64 = 1_715_558_400;
// Wednesday 2024-05-15 12:00:00 UTC, inside that week.
const MIDWEEK_UTC: i64 = 1_715_774_400;

fn at(epoch_seconds: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(epoch_seconds, 0).unwrap()
}

fn log_set(sets: &SqliteSetRepository<'_>, exercise: &ExerciseId, time: i64, intensity: Intensity) {
    let mut set = sets.create_set(exercise, at(time)).unwrap();
    set.intensity = intensity;
    sets.update_set(&set).unwrap();
}

#[test]
fn windows_are_contiguous_and_seven_days_long() {
    let (this_week, last_week) = week_windows(&at(MIDWEEK_UTC));

    assert_eq!(this_week.start, WEEK_START_UTC);
    assert_eq!(this_week.end, WEEK_START_UTC + 7 * 86_400);
    assert_eq!(last_week.end, this_week.start);
    assert_eq!(last_week.start, WEEK_START_UTC - 7 * 86_400);
}

#[test]
fn week_start_follows_the_callers_time_zone() {
    let offset = FixedOffset::east_opt(5 * 3600).unwrap();
    let now = at(MIDWEEK_UTC).with_timezone(&offset);

    let (this_week, _) = week_windows(&now);

    // Local Monday midnight at UTC+5 is Sunday 19:00 UTC.
    assert_eq!(this_week.start, WEEK_START_UTC - 5 * 3600);
}

#[test]
fn boundary_instant_falls_into_exactly_one_window() {
    let (this_week, last_week) = week_windows(&at(MIDWEEK_UTC));

    assert!(this_week.contains(this_week.start));
    assert!(!last_week.contains(this_week.start));
    assert!(last_week.contains(this_week.start - 1));
    assert!(!this_week.contains(this_week.start - 1));
}

#[test]
fn boundary_set_is_counted_once() {
    let conn = open_db_in_memory().unwrap();
    let catalog = SqliteCatalogRepository::new(&conn);
    let sets = SqliteSetRepository::new(&conn);

    let muscle = catalog.create_muscle().unwrap();
    catalog.update_muscle(&muscle.id, "Chest").unwrap();
    let exercise = catalog.create_exercise(&muscle.id).unwrap();

    log_set(&sets, &exercise.id, WEEK_START_UTC, Intensity::Normal);

    let volume = weekly_muscle_volume(&sets, &at(MIDWEEK_UTC)).unwrap();
    let history = &volume.per_muscle[&muscle.id];
    assert_eq!(history.this_week, 1);
    assert_eq!(history.last_week, 0);
}

#[test]
fn muscles_without_sets_appear_with_zero_counts() {
    let conn = open_db_in_memory().unwrap();
    let catalog = SqliteCatalogRepository::new(&conn);
    let sets = SqliteSetRepository::new(&conn);

    let trained = catalog.create_muscle().unwrap();
    catalog.update_muscle(&trained.id, "Chest").unwrap();
    let idle = catalog.create_muscle().unwrap();
    catalog.update_muscle(&idle.id, "Back").unwrap();
    let exercise = catalog.create_exercise(&trained.id).unwrap();

    log_set(&sets, &exercise.id, MIDWEEK_UTC - 3600, Intensity::Normal);

    let volume = weekly_muscle_volume(&sets, &at(MIDWEEK_UTC)).unwrap();

    assert_eq!(volume.per_muscle.len(), 2);
    let idle_history = &volume.per_muscle[&idle.id];
    assert_eq!(idle_history.name, "Back");
    assert_eq!(idle_history.this_week, 0);
    assert_eq!(idle_history.last_week, 0);
}

#[test]
fn only_interior_intensities_count_toward_volume() {
    let conn = open_db_in_memory().unwrap();
    let catalog = SqliteCatalogRepository::new(&conn);
    let sets = SqliteSetRepository::new(&conn);

    let muscle = catalog.create_muscle().unwrap();
    let exercise = catalog.create_exercise(&muscle.id).unwrap();

    let intensities = [
        Intensity::NoActivation,
        Intensity::Easy,
        Intensity::Normal,
        Intensity::EarlyFailure,
        Intensity::Pain,
    ];
    for (i, intensity) in intensities.into_iter().enumerate() {
        log_set(&sets, &exercise.id, MIDWEEK_UTC - 600 * i as i64, intensity);
    }

    let volume = weekly_muscle_volume(&sets, &at(MIDWEEK_UTC)).unwrap();
    let history = &volume.per_muscle[&muscle.id];
    assert_eq!(history.this_week, 3);
}

#[test]
fn counts_are_split_between_this_week_and_last_week() {
    let conn = open_db_in_memory().unwrap();
    let catalog = SqliteCatalogRepository::new(&conn);
    let sets = SqliteSetRepository::new(&conn);

    let muscle = catalog.create_muscle().unwrap();
    let exercise = catalog.create_exercise(&muscle.id).unwrap();
    let other_muscle = catalog.create_muscle().unwrap();
    let other_exercise = catalog.create_exercise(&other_muscle.id).unwrap();

    log_set(&sets, &exercise.id, WEEK_START_UTC + 3600, Intensity::Normal);
    log_set(&sets, &exercise.id, WEEK_START_UTC + 7200, Intensity::Easy);
    log_set(&sets, &exercise.id, WEEK_START_UTC - 3600, Intensity::Normal);
    log_set(
        &sets,
        &other_exercise.id,
        WEEK_START_UTC - 86_400,
        Intensity::EarlyFailure,
    );
    // Two weeks back: outside both windows.
    log_set(
        &sets,
        &exercise.id,
        WEEK_START_UTC - 8 * 86_400,
        Intensity::Normal,
    );

    let volume = weekly_muscle_volume(&sets, &at(MIDWEEK_UTC)).unwrap();

    let history = &volume.per_muscle[&muscle.id];
    assert_eq!(history.this_week, 2);
    assert_eq!(history.last_week, 1);

    let other_history = &volume.per_muscle[&other_muscle.id];
    assert_eq!(other_history.this_week, 0);
    assert_eq!(other_history.last_week, 1);
}
