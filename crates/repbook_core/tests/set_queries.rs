use chrono::{DateTime, Utc};
use repbook_core::db::open_db_in_memory;
use repbook_core::{
    CatalogRepository, Intensity, RepoError, SetId, SetRepository, SqliteCatalogRepository,
    SqliteSetRepository, SqliteVariationRepository, VariationRepository,
};

fn at(epoch_seconds: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(epoch_seconds, 0).unwrap()
}

#[test]
fn new_set_gets_the_standard_defaults() {
    let conn = open_db_in_memory().unwrap();
    let catalog = SqliteCatalogRepository::new(&conn);
    let sets = SqliteSetRepository::new(&conn);

    let muscle = catalog.create_muscle().unwrap();
    let exercise = catalog.create_exercise(&muscle.id).unwrap();
    let set = sets.create_set(&exercise.id, at(1000)).unwrap();

    assert_eq!(set.exercise, exercise.id);
    assert_eq!(set.reps, 10);
    assert_eq!(set.weight, 0.0);
    assert_eq!(set.intensity, Intensity::Normal);
    assert_eq!(set.comment, "");
    assert_eq!(set.variation, None);
    assert_eq!(set.location, None);
    assert_eq!(set.equipment, None);

    let stored = sets.get_set(&set.id).unwrap();
    assert_eq!(stored, set);
}

#[test]
fn update_set_roundtrips_every_field() {
    let conn = open_db_in_memory().unwrap();
    let catalog = SqliteCatalogRepository::new(&conn);
    let variations = SqliteVariationRepository::new(&conn);
    let sets = SqliteSetRepository::new(&conn);

    let muscle = catalog.create_muscle().unwrap();
    let exercise = catalog.create_exercise(&muscle.id).unwrap();
    let variation = variations.create_variation(&exercise.id).unwrap();

    let mut set = sets.create_set(&exercise.id, at(1000)).unwrap();
    set.variation = Some(variation.id.clone());
    set.reps = 5;
    set.weight = 82.5;
    set.time = at(2000);
    set.intensity = Intensity::EarlyFailure;
    set.comment = "felt heavy".to_string();
    sets.update_set(&set).unwrap();

    let stored = sets.get_set(&set.id).unwrap();
    assert_eq!(stored, set);
}

#[test]
fn update_of_missing_set_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let catalog = SqliteCatalogRepository::new(&conn);
    let sets = SqliteSetRepository::new(&conn);

    let muscle = catalog.create_muscle().unwrap();
    let exercise = catalog.create_exercise(&muscle.id).unwrap();
    let mut set = sets.create_set(&exercise.id, at(1000)).unwrap();
    sets.delete_set(&set.id).unwrap();

    set.reps = 3;
    let err = sets.update_set(&set).unwrap_err();
    assert!(matches!(err, RepoError::NotFound { entity, .. } if entity == "workout set"));
}

#[test]
fn update_rejects_invalid_weight() {
    let conn = open_db_in_memory().unwrap();
    let catalog = SqliteCatalogRepository::new(&conn);
    let sets = SqliteSetRepository::new(&conn);

    let muscle = catalog.create_muscle().unwrap();
    let exercise = catalog.create_exercise(&muscle.id).unwrap();
    let mut set = sets.create_set(&exercise.id, at(1000)).unwrap();

    set.weight = -1.0;
    let err = sets.update_set(&set).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}

#[test]
fn delete_set_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let catalog = SqliteCatalogRepository::new(&conn);
    let sets = SqliteSetRepository::new(&conn);

    let muscle = catalog.create_muscle().unwrap();
    let exercise = catalog.create_exercise(&muscle.id).unwrap();
    let set = sets.create_set(&exercise.id, at(1000)).unwrap();

    sets.delete_set(&set.id).unwrap();
    sets.delete_set(&set.id).unwrap();
    sets.delete_set(&SetId::from_string("never-existed")).unwrap();
}

#[test]
fn set_content_joins_exercise_and_variation_names() {
    let conn = open_db_in_memory().unwrap();
    let catalog = SqliteCatalogRepository::new(&conn);
    let variations = SqliteVariationRepository::new(&conn);
    let sets = SqliteSetRepository::new(&conn);

    let muscle = catalog.create_muscle().unwrap();
    let exercise = catalog.create_exercise(&muscle.id).unwrap();
    catalog
        .update_exercise(&exercise.id, "Deadlift", &muscle.id)
        .unwrap();
    let variation = variations.create_variation(&exercise.id).unwrap();
    variations
        .update_variation(&variation.id, "Trap bar", None)
        .unwrap();

    let mut set = sets.create_set(&exercise.id, at(1000)).unwrap();
    set.variation = Some(variation.id.clone());
    sets.update_set(&set).unwrap();

    let content = sets.get_set_content(&set.id).unwrap();
    assert_eq!(content.exercise_name, "Deadlift");
    assert_eq!(content.variation_name.as_deref(), Some("Trap bar"));

    let plain = sets.create_set(&exercise.id, at(2000)).unwrap();
    let plain_content = sets.get_set_content(&plain.id).unwrap();
    assert_eq!(plain_content.variation, None);
    assert_eq!(plain_content.variation_name, None);

    let err = sets
        .get_set_content(&SetId::from_string("missing"))
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound { .. }));
}

#[test]
fn summaries_keep_sets_without_a_variation() {
    let conn = open_db_in_memory().unwrap();
    let catalog = SqliteCatalogRepository::new(&conn);
    let variations = SqliteVariationRepository::new(&conn);
    let sets = SqliteSetRepository::new(&conn);

    let muscle = catalog.create_muscle().unwrap();
    let exercise = catalog.create_exercise(&muscle.id).unwrap();
    let variation = variations.create_variation(&exercise.id).unwrap();

    let mut with_variation = sets.create_set(&exercise.id, at(1000)).unwrap();
    with_variation.variation = Some(variation.id.clone());
    sets.update_set(&with_variation).unwrap();
    let without_variation = sets.create_set(&exercise.id, at(2000)).unwrap();

    let summaries = sets.set_summaries().unwrap();
    assert_eq!(summaries.len(), 2);
    let plain = summaries
        .iter()
        .find(|summary| summary.id == without_variation.id)
        .unwrap();
    assert_eq!(plain.variation, None);
    assert_eq!(plain.variation_name, None);
}

// Ten prior sets for one exercise, three of them with a variation: asking
// for history without a variation must return the most recent six of the
// seven variation-less sets, newest first.
#[test]
fn sets_before_without_variation_matches_only_variationless_sets() {
    let conn = open_db_in_memory().unwrap();
    let catalog = SqliteCatalogRepository::new(&conn);
    let variations = SqliteVariationRepository::new(&conn);
    let sets = SqliteSetRepository::new(&conn);

    let muscle = catalog.create_muscle().unwrap();
    let exercise = catalog.create_exercise(&muscle.id).unwrap();
    let variation = variations.create_variation(&exercise.id).unwrap();

    let mut variationless_times = Vec::new();
    for i in 0..10 {
        let time = 1000 + i * 10;
        let mut set = sets.create_set(&exercise.id, at(time)).unwrap();
        if i % 3 == 0 {
            // i = 0, 3, 6, 9 would be four; keep it to three.
            if i < 9 {
                set.variation = Some(variation.id.clone());
                sets.update_set(&set).unwrap();
                continue;
            }
        }
        variationless_times.push(time);
    }
    assert_eq!(variationless_times.len(), 7);

    let history = sets.sets_before(at(10_000), &exercise.id, None, 6).unwrap();

    assert_eq!(history.len(), 6);
    assert!(history.iter().all(|set| set.variation.is_none()));
    let times: Vec<i64> = history.iter().map(|set| set.time.timestamp()).collect();
    let expected: Vec<i64> = variationless_times.iter().rev().take(6).copied().collect();
    assert_eq!(times, expected);
}

#[test]
fn sets_before_with_variation_filters_to_that_variation() {
    let conn = open_db_in_memory().unwrap();
    let catalog = SqliteCatalogRepository::new(&conn);
    let variations = SqliteVariationRepository::new(&conn);
    let sets = SqliteSetRepository::new(&conn);

    let muscle = catalog.create_muscle().unwrap();
    let exercise = catalog.create_exercise(&muscle.id).unwrap();
    let variation = variations.create_variation(&exercise.id).unwrap();
    let other = variations.create_variation(&exercise.id).unwrap();

    let mut matching = sets.create_set(&exercise.id, at(1000)).unwrap();
    matching.variation = Some(variation.id.clone());
    sets.update_set(&matching).unwrap();
    let mut different = sets.create_set(&exercise.id, at(2000)).unwrap();
    different.variation = Some(other.id.clone());
    sets.update_set(&different).unwrap();
    sets.create_set(&exercise.id, at(3000)).unwrap();

    let history = sets
        .sets_before(at(10_000), &exercise.id, Some(&variation.id), 10)
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, matching.id);

    // The cutoff is strict: a set exactly at the cutoff is excluded.
    let at_cutoff = sets
        .sets_before(at(1000), &exercise.id, Some(&variation.id), 10)
        .unwrap();
    assert!(at_cutoff.is_empty());
}

#[test]
fn latest_set_excluding_spans_all_exercises() {
    let conn = open_db_in_memory().unwrap();
    let catalog = SqliteCatalogRepository::new(&conn);
    let sets = SqliteSetRepository::new(&conn);

    let muscle = catalog.create_muscle().unwrap();
    let bench = catalog.create_exercise(&muscle.id).unwrap();
    let squat = catalog.create_exercise(&muscle.id).unwrap();

    let older = sets.create_set(&bench.id, at(1000)).unwrap();
    let newest = sets.create_set(&squat.id, at(2000)).unwrap();
    let fresh = sets.create_set(&bench.id, at(3000)).unwrap();

    // The freshly created set is excluded, so the previous set wins even
    // though it belongs to a different exercise.
    let previous = sets.latest_set_excluding(&fresh.id).unwrap().unwrap();
    assert_eq!(previous.id, newest.id);

    sets.delete_set(&newest.id).unwrap();
    let previous = sets.latest_set_excluding(&fresh.id).unwrap().unwrap();
    assert_eq!(previous.id, older.id);

    sets.delete_set(&older.id).unwrap();
    assert!(sets.latest_set_excluding(&fresh.id).unwrap().is_none());
}

#[test]
fn deleting_a_location_cascades_through_variations_to_sets() {
    let conn = open_db_in_memory().unwrap();
    let catalog = SqliteCatalogRepository::new(&conn);
    let variations = SqliteVariationRepository::new(&conn);
    let sets = SqliteSetRepository::new(&conn);

    let location = catalog.create_location().unwrap();
    let muscle = catalog.create_muscle().unwrap();
    let exercise = catalog.create_exercise(&muscle.id).unwrap();
    let variation = variations.create_variation(&exercise.id).unwrap();
    variations
        .update_variation(&variation.id, "At the gym", Some(&location.id))
        .unwrap();

    let mut doomed = sets.create_set(&exercise.id, at(1000)).unwrap();
    doomed.variation = Some(variation.id.clone());
    sets.update_set(&doomed).unwrap();
    let survivor = sets.create_set(&exercise.id, at(2000)).unwrap();

    catalog.delete_location(&location.id).unwrap();

    assert!(variations.list_variations().unwrap().is_empty());
    let remaining = sets.list_sets().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, survivor.id);
}

#[test]
fn deleting_an_exercise_cascades_to_its_sets_and_variations() {
    let conn = open_db_in_memory().unwrap();
    let catalog = SqliteCatalogRepository::new(&conn);
    let variations = SqliteVariationRepository::new(&conn);
    let sets = SqliteSetRepository::new(&conn);

    let muscle = catalog.create_muscle().unwrap();
    let exercise = catalog.create_exercise(&muscle.id).unwrap();
    variations.create_variation(&exercise.id).unwrap();
    sets.create_set(&exercise.id, at(1000)).unwrap();

    catalog.delete_exercise(&exercise.id).unwrap();

    assert!(variations.list_variations().unwrap().is_empty());
    assert!(sets.list_sets().unwrap().is_empty());
}
