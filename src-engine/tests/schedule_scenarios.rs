//! Schedule scenario tests
//!
//! End-to-end checks of the calculator and feasibility checker against
//! hand-worked calendars, plus invariants of the builtin catalog.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use planting_engine::{
    calculate_crop_schedule, can_still_plant, succession_plantings_possible, Crop, CropCatalog,
    CropCategory, FrostDates, PlantingAction, SelectedCrop, Variety,
};

// ============================================================================
// Helpers
// ============================================================================

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn plain_variety() -> Variety {
    Variety {
        id: "standard".into(),
        name: "Standard".into(),
        days_to_maturity: None,
        variety_type: None,
        special: Vec::new(),
    }
}

fn scenario_tomato() -> Crop {
    Crop {
        id: "tomato".into(),
        name: "Tomato".into(),
        category: CropCategory::Vegetable,
        icon: "🍅".into(),
        start_indoors: Some(42),
        transplant: Some(14),
        direct_sow: None,
        days_to_maturity: 75,
        succession_enabled: true,
        succession_interval: 3,
        succession_max: 4,
        varieties: vec![plain_variety()],
        lunar_affinity: None,
    }
}

fn scenario_lettuce() -> Crop {
    Crop {
        id: "lettuce".into(),
        name: "Lettuce".into(),
        category: CropCategory::Vegetable,
        icon: "🥬".into(),
        start_indoors: None,
        transplant: None,
        direct_sow: Some(-14),
        days_to_maturity: 50,
        succession_enabled: true,
        succession_interval: 2,
        succession_max: 6,
        varieties: vec![plain_variety()],
        lunar_affinity: None,
    }
}

fn frost(last: &str, first: &str) -> FrostDates {
    FrostDates::new("02134", date(last), date(first))
}

// ============================================================================
// Scenario A: zero succession interval terminates with primary events only
// ============================================================================

#[test]
fn scenario_a_zero_interval_returns_primary_events() {
    let crop = scenario_tomato();
    let selected = SelectedCrop::new("tomato", "standard").with_succession(Some(0));
    let frost = frost("2024-05-01", "2024-10-15");

    let started = Instant::now();
    let events = calculate_crop_schedule(&crop, &crop.varieties[0], &selected, &frost, false);
    assert!(started.elapsed() < Duration::from_secs(1));

    let summary: Vec<(PlantingAction, NaiveDate)> =
        events.iter().map(|e| (e.action, e.date)).collect();
    assert_eq!(
        summary,
        [
            (PlantingAction::StartIndoors, date("2024-03-20")),
            (PlantingAction::Transplant, date("2024-05-15")),
            (PlantingAction::Harvest, date("2024-07-29")),
        ]
    );
    assert!(events.iter().all(|e| e.succession_number.is_none()));
}

// ============================================================================
// Scenario B: season too short, nothing at all is scheduled
// ============================================================================

#[test]
fn scenario_b_short_season_is_empty() {
    let crop = scenario_tomato();
    let selected = SelectedCrop::new("tomato", "standard").with_succession(None);
    let frost = frost("2024-05-01", "2024-05-15");
    let events = calculate_crop_schedule(&crop, &crop.varieties[0], &selected, &frost, false);
    assert!(events.is_empty(), "unexpected events: {:?}", events);
}

// ============================================================================
// Scenario C: direct-sow successions over a 160-day window
// ============================================================================

#[test]
fn scenario_c_succession_cycles_fit_the_window() {
    let crop = scenario_lettuce();
    let selected = SelectedCrop::new("lettuce", "standard").with_succession(None);
    let frost = frost("2024-04-15", "2024-09-22");
    assert_eq!(frost.frost_free_window(), 160);

    // 124 days available / 14 = 8 intervals -> 9 plantings, capped at 6
    assert_eq!(succession_plantings_possible(&crop, &crop.varieties[0], &selected, &frost), 6);

    let events = calculate_crop_schedule(&crop, &crop.varieties[0], &selected, &frost, false);
    assert_eq!(events.len(), 12);

    let numbers: BTreeSet<Option<u32>> = events.iter().map(|e| e.succession_number).collect();
    assert_eq!(numbers, BTreeSet::from([None, Some(2), Some(3), Some(4), Some(5), Some(6)]));

    for event in &events {
        assert!(event.date < frost.first_fall_frost);
    }

    let last_sow = events
        .iter()
        .filter(|e| e.action == PlantingAction::DirectSow)
        .map(|e| e.date)
        .max()
        .unwrap();
    assert_eq!(last_sow, date("2024-06-10"));
}

#[test]
fn user_interval_overrides_crop_interval() {
    let crop = scenario_lettuce();
    let frost = frost("2024-04-15", "2024-09-22");
    let selected = SelectedCrop::new("lettuce", "standard").with_succession(Some(5));

    // 124 / 35 = 3 intervals -> 4 plantings
    assert_eq!(succession_plantings_possible(&crop, &crop.varieties[0], &selected, &frost), 4);

    let sows: Vec<NaiveDate> =
        calculate_crop_schedule(&crop, &crop.varieties[0], &selected, &frost, false)
            .into_iter()
            .filter(|e| e.action == PlantingAction::DirectSow)
            .map(|e| e.date)
            .collect();
    assert_eq!(
        sows,
        [
            date("2024-04-01"),
            date("2024-05-06"),
            date("2024-06-10"),
            date("2024-07-15"),
        ]
    );
}

#[test]
fn transplant_successions_shift_every_step() {
    let crop = scenario_tomato();
    let selected = SelectedCrop::new("tomato", "standard").with_succession(None);
    let frost = frost("2024-05-01", "2024-10-15");

    let events = calculate_crop_schedule(&crop, &crop.varieties[0], &selected, &frost, false);
    let second: Vec<(PlantingAction, NaiveDate)> = events
        .iter()
        .filter(|e| e.succession_number == Some(2))
        .map(|e| (e.action, e.date))
        .collect();
    assert_eq!(
        second,
        [
            (PlantingAction::StartIndoors, date("2024-04-10")),
            (PlantingAction::Transplant, date("2024-06-05")),
            (PlantingAction::Harvest, date("2024-08-19")),
        ]
    );
}

// ============================================================================
// Feasibility
// ============================================================================

#[test]
fn feasibility_matches_the_schedule_window() {
    let catalog = CropCatalog::builtin().unwrap();
    let selected = SelectedCrop::new("bush-bean", "provider");
    let (crop, variety) = catalog.resolve(&selected).unwrap();
    let frost = frost("2024-05-01", "2024-10-15");

    // 2024-10-15 - 50 days
    let early = can_still_plant(crop, variety, &frost, date("2024-05-01"));
    assert!(early.can_plant);
    assert_eq!(early.last_chance_date, Some(date("2024-08-26")));

    let late = can_still_plant(crop, variety, &frost, date("2024-11-01"));
    assert!(!late.can_plant);
}

// ============================================================================
// Builtin catalog
// ============================================================================

#[test]
fn builtin_catalog_is_consistent() {
    let catalog = CropCatalog::builtin().unwrap();
    assert!(catalog.len() >= 20);

    for crop in catalog.get_all_crops() {
        assert!(crop.transplant.is_some() || crop.direct_sow.is_some(), "{}", crop.id);
        assert!(crop.start_indoors.is_none() || crop.transplant.is_some(), "{}", crop.id);
        assert!(!crop.varieties.is_empty(), "{}", crop.id);
        assert_eq!(catalog.get_crop_varieties(&crop.id).len(), crop.varieties.len());
    }

    let total: usize = [CropCategory::Vegetable, CropCategory::Herb, CropCategory::Fruit]
        .iter()
        .map(|c| catalog.get_crops_by_category(*c).len())
        .sum();
    assert_eq!(total, catalog.len());
}

#[test]
fn builtin_catalog_order_is_stable() {
    let a = CropCatalog::builtin().unwrap();
    let b = CropCatalog::builtin().unwrap();
    let ids = |c: &CropCatalog| c.get_all_crops().iter().map(|c| c.id.clone()).collect::<Vec<_>>();
    assert_eq!(ids(&a), ids(&b));
    assert_eq!(ids(&a)[0], "tomato");
}

#[test]
fn every_builtin_crop_schedules_in_a_long_season() {
    let catalog = CropCatalog::builtin().unwrap();
    let frost = frost("2024-04-15", "2024-10-31");

    for crop in catalog.get_all_crops() {
        for variety in &crop.varieties {
            let selected =
                SelectedCrop::new(crop.id.clone(), variety.id.clone()).with_succession(None);
            let events = calculate_crop_schedule(crop, variety, &selected, &frost, true);
            assert!(!events.is_empty(), "{} / {} produced nothing", crop.id, variety.id);
            assert!(events.iter().any(|e| e.action == PlantingAction::Harvest));
        }
    }
}
