//! Integration tests driving the full run from the bundled catalog and configs.

mod common;

use gridshift::catalog::{DiscoverResponse, selected_item_ids};
use gridshift::config::{SchedulerConfig, load_tasks_json};
use gridshift::io::export::write_schedule_csv;
use gridshift::runner::run_schedule;
use gridshift::sched::profile::ProfileBuilder;

use common::data_path;

fn bundled_response() -> DiscoverResponse {
    DiscoverResponse::from_json_file(&data_path("on_discover.json"))
        .expect("bundled catalog should parse")
}

#[test]
fn bundled_catalog_covers_the_whole_day() {
    let profile = ProfileBuilder::default().build_from_response(&bundled_response());
    assert_eq!(profile.horizon(), 24);
    for (hour, generators) in profile.iter() {
        assert_eq!(generators.len(), 1, "hour {hour} should have one generator");
    }
    assert_eq!(
        profile.generators(7)[0].name,
        "Cambridge Solar Morning (item-ce-cambridge-morning-001)"
    );
    assert_eq!(profile.generators(23)[0].price, Some(0.24));
}

#[test]
fn bundled_tasks_match_baseline_preset() {
    let tasks = load_tasks_json(&data_path("tasks.json")).expect("tasks should load");
    assert_eq!(tasks, SchedulerConfig::baseline().tasks);
}

#[test]
fn bundled_config_is_valid() {
    let config = SchedulerConfig::from_toml_file(&data_path("scheduler.toml"))
        .expect("config should parse");
    assert!(config.validate().is_empty());
    assert_eq!(config.tasks.len(), 2);
}

#[test]
fn cost_focus_run_prefers_cheap_night_hours() {
    let run = run_schedule(&SchedulerConfig::cost_focus(), &bundled_response());

    assert!(run.placement.unplaced.is_empty());
    assert_eq!(run.report.infeasible_count, 0);
    assert_eq!(
        selected_item_ids(&run.placement),
        vec!["item-ce-london-grid-003".to_string()]
    );

    // Batch_A requested at hour 1 sits in the cheapest (night) block already.
    let batch = run.refined.iter().find(|t| t.id == "Batch_A");
    assert_eq!(batch.map(|t| t.start), Some(1));
}

#[test]
fn baseline_run_is_reproducible_for_a_seed() {
    let response = bundled_response();
    let config = SchedulerConfig::baseline();

    let mut out_a = Vec::new();
    write_schedule_csv(&run_schedule(&config, &response).refined, &mut out_a)
        .expect("first export should succeed");
    let mut out_b = Vec::new();
    write_schedule_csv(&run_schedule(&config, &response).refined, &mut out_b)
        .expect("second export should succeed");

    assert_eq!(out_a, out_b);
}

#[test]
fn missing_catalog_file_is_a_read_error() {
    let err = DiscoverResponse::from_json_file(&data_path("does-not-exist.json"));
    assert!(matches!(err, Err(gridshift::Error::Read { .. })));
}
