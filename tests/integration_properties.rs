//! Property tests for scoring, placement and refinement invariants.

mod common;

use gridshift::sched::placer::InitialPlacer;
use gridshift::sched::refiner::{LocalSearchRefiner, RefinerParams};
use gridshift::sched::scorer::HourlyScorer;
use gridshift::sched::types::{GenerationProfile, Generator, TaskRequest};
use proptest::prelude::*;

const HORIZON: usize = 12;

fn profile_strategy() -> impl Strategy<Value = GenerationProfile> {
    prop::collection::vec(
        prop::collection::vec((0.0_f64..10.0, 0.0_f64..500.0), 0..3),
        HORIZON,
    )
    .prop_map(|slots| {
        GenerationProfile::from_slots(
            slots
                .into_iter()
                .enumerate()
                .map(|(h, gens)| {
                    gens.into_iter()
                        .enumerate()
                        .map(|(i, (price, carbon))| {
                            Generator::new(format!("g{h}-{i} (item-{h}-{i})"), price, carbon)
                        })
                        .collect()
                })
                .collect(),
        )
    })
}

fn tasks_strategy() -> impl Strategy<Value = Vec<TaskRequest>> {
    prop::collection::vec((0..HORIZON, 1..5_usize, 0.1_f64..10.0), 1..6).prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (start, duration, load))| TaskRequest::new(format!("t{i}"), start, duration, load))
            .collect()
    })
}

proptest! {
    #[test]
    fn scoring_is_repeatable(
        profile in profile_strategy(),
        hour in 0..HORIZON + 2,
        weight in 0.0_f64..1.0,
    ) {
        let scorer = HourlyScorer::new(&profile, weight);
        prop_assert_eq!(scorer.score(hour), scorer.score(hour));
    }

    #[test]
    fn placed_windows_are_covered(profile in profile_strategy(), tasks in tasks_strategy()) {
        let placement = InitialPlacer::new(0.0).place(&profile, &tasks);
        prop_assert_eq!(placement.placed.len() + placement.unplaced.len(), tasks.len());
        for placed in &placement.placed {
            prop_assert!(placed.start + placed.duration <= profile.horizon());
            for hour in placed.start..placed.start + placed.duration {
                prop_assert!(profile.has_coverage(hour));
            }
        }
    }

    #[test]
    fn refined_tasks_are_local_optima(
        profile in profile_strategy(),
        tasks in tasks_strategy(),
        shift_range in 0..4_usize,
        weight in 0.0_f64..0.05,
        seed in any::<u64>(),
    ) {
        let refiner = LocalSearchRefiner::new(RefinerParams {
            shift_range,
            carbon_weight: weight,
            shift_unit_cost: 0.01,
            seed,
        });
        let scorer = HourlyScorer::new(&profile, weight);
        let refined = refiner.refine(&profile, &tasks);
        prop_assert_eq!(refined.len(), tasks.len());

        for (task, result) in tasks.iter().zip(&refined) {
            prop_assert_eq!(result.original_start, task.start);
            prop_assert!(result.shift_hours() <= shift_range);

            let current = refiner
                .candidate_cost(&scorer, task, task.start, result.start)
                .map(|c| c.total());
            prop_assert_eq!(current, result.outcome.cost());

            if let Some(cost) = current {
                for hour in result.start..result.start + task.duration {
                    prop_assert!(profile.has_coverage(hour));
                }
                let lo = task.start.saturating_sub(shift_range);
                for candidate in lo..=task.start + shift_range {
                    if let Some(other) = refiner.candidate_cost(&scorer, task, task.start, candidate) {
                        prop_assert!(other.total() >= cost);
                    }
                }
            } else {
                prop_assert_eq!(result.start, task.start);
            }
        }
    }

    #[test]
    fn shift_penalty_grows_with_distance(
        load in 0.1_f64..10.0,
        near in 0..6_usize,
        extra in 1..6_usize,
    ) {
        let profile = common::priced_profile(&[Some(1.0); HORIZON]);
        let refiner = common::price_only_refiner(HORIZON, 0);
        let scorer = HourlyScorer::new(&profile, 0.0);
        let task = TaskRequest::new("t", 0, 1, load);

        let close = refiner.candidate_cost(&scorer, &task, 0, near);
        let far = refiner.candidate_cost(&scorer, &task, 0, near + extra);
        prop_assert!(close.is_some() && far.is_some());
        let (close, far) = (close.map(|c| c.shift_penalty), far.map(|c| c.shift_penalty));
        prop_assert!(far >= close);
    }
}
