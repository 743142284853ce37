//! Hourly generation profile construction from a provider catalog.

use std::collections::HashMap;

use chrono::{DateTime, Timelike};
use tracing::debug;

use super::types::{DEFAULT_HORIZON_HOURS, GenerationProfile, Generator};
use crate::catalog::{Catalog, DiscoverResponse, Item, Price};

/// Hours in a wall-clock day.
const HOURS_PER_DAY: usize = 24;

/// Converts catalog items into an hourly [`GenerationProfile`].
///
/// Every priced item contributes one [`Generator`] to each hour of its time
/// window. Hour indices wrap modulo the horizon, so a window crossing
/// midnight fills the late hours and then the early ones.
#[derive(Debug, Clone, Copy)]
pub struct ProfileBuilder {
    horizon: usize,
}

impl Default for ProfileBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_HORIZON_HOURS)
    }
}

impl ProfileBuilder {
    /// Creates a builder for a profile of `horizon` hourly slots.
    pub fn new(horizon: usize) -> Self {
        Self { horizon }
    }

    /// Builds the profile from the first catalog of a discovery response.
    ///
    /// A response without catalogs yields a profile of empty slots.
    pub fn build_from_response(&self, response: &DiscoverResponse) -> GenerationProfile {
        match response.primary_catalog() {
            Some(catalog) => self.build(catalog),
            None => GenerationProfile::new(self.horizon),
        }
    }

    /// Builds the profile from a single catalog.
    ///
    /// Items are joined to offers by the offer's first referenced item id.
    /// Items without an offer, and items whose time window cannot be parsed,
    /// are skipped.
    pub fn build(&self, catalog: &Catalog) -> GenerationProfile {
        let mut profile = GenerationProfile::new(self.horizon);
        if self.horizon == 0 {
            return profile;
        }

        let mut offers: HashMap<&str, &Price> = HashMap::new();
        for offer in &catalog.offers {
            if let Some(item_id) = offer.items.first() {
                offers.insert(item_id.as_str(), &offer.price);
            }
        }

        for item in &catalog.items {
            let Some(price) = offers.get(item.id.as_str()) else {
                debug!(item = %item.id, "skipping item without an offer");
                continue;
            };
            let Some((start_hour, end_hour)) = window_hours(item) else {
                debug!(item = %item.id, "skipping item with malformed time window");
                continue;
            };

            let generator = Generator {
                name: item.generator_name(),
                price: price.value,
                carbon: item.attributes.grid.carbon_intensity,
                carbon_unit: item.attributes.grid.carbon_intensity_unit.clone(),
                renewable_mix: item.attributes.grid.renewable_mix.unwrap_or(0.0),
            };
            for hour in start_hour..end_hour {
                profile.push(hour % self.horizon, generator.clone());
            }
        }

        profile
    }
}

/// Start (inclusive) and end (exclusive) hours of an item's window.
///
/// An end at midnight means hour 24; any other end before the start wraps
/// into the next day.
fn window_hours(item: &Item) -> Option<(usize, usize)> {
    let window = &item.attributes.time_window;
    let start_hour = parse_wall_clock_hour(window.start.as_deref()?)?;
    let mut end_hour = parse_wall_clock_hour(window.end.as_deref()?)?;

    if end_hour == 0 && start_hour != 0 {
        end_hour = HOURS_PER_DAY;
    } else if end_hour < start_hour {
        end_hour += HOURS_PER_DAY;
    }
    Some((start_hour, end_hour))
}

/// Hour of day from a `HH:MM:SS` time carrying a UTC offset (`Z`, `+01:00`, `+0100`).
///
/// The hour is read as written, in the time's own offset.
pub fn parse_wall_clock_hour(time: &str) -> Option<usize> {
    let stamped = format!("1970-01-01T{}", time.trim());
    let parsed = DateTime::parse_from_rfc3339(&stamped)
        .or_else(|_| DateTime::parse_from_str(&stamped, "%Y-%m-%dT%H:%M:%S%z"))
        .ok()?;
    Some(parsed.hour() as usize)
}
