//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use gridshift::sched::refiner::{DEFAULT_SHIFT_UNIT_COST, LocalSearchRefiner, RefinerParams};
use gridshift::sched::types::{GenerationProfile, Generator};

/// Profile with one generator per priced hour; `None` leaves the hour empty.
pub fn priced_profile(prices: &[Option<f64>]) -> GenerationProfile {
    GenerationProfile::from_slots(
        prices
            .iter()
            .enumerate()
            .map(|(h, price)| match price {
                Some(p) => vec![Generator::new(format!("Gen{h} (item-{h})"), *p, 0.0)],
                None => Vec::new(),
            })
            .collect(),
    )
}

/// Refiner ignoring carbon, with the default shift cost.
pub fn price_only_refiner(shift_range: usize, seed: u64) -> LocalSearchRefiner {
    LocalSearchRefiner::new(RefinerParams {
        shift_range,
        carbon_weight: 0.0,
        shift_unit_cost: DEFAULT_SHIFT_UNIT_COST,
        seed,
    })
}

/// Path of a file under the crate's `data/` directory.
pub fn data_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data").join(name)
}
