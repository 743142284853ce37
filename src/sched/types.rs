//! Core scheduling types: generators, the hourly profile, task requests, and results.

use std::fmt;

use serde::Deserialize;

/// Display label used wherever an hour has no usable generator.
pub const UNAVAILABLE: &str = "UNAVAILABLE";

/// Default scheduling horizon (one day of hourly slots).
pub const DEFAULT_HORIZON_HOURS: usize = 24;

/// A priced, carbon-rated energy source available during one hour.
///
/// `price` or `carbon` may be missing when the catalog omits them; such a
/// generator still counts as coverage for the hour but can never be chosen
/// as the best generator.
#[derive(Debug, Clone, PartialEq)]
pub struct Generator {
    /// Display name, `"<descriptor name> (<item id>)"` when built from a catalog.
    pub name: String,
    /// Offer price per unit of energy.
    pub price: Option<f64>,
    /// Carbon intensity of the supplied energy.
    pub carbon: Option<f64>,
    /// Unit of `carbon` (e.g. `gCO2/kWh`).
    pub carbon_unit: Option<String>,
    /// Renewable share of the supply.
    pub renewable_mix: f64,
}

impl Generator {
    /// Creates a fully priced generator.
    pub fn new(name: impl Into<String>, price: f64, carbon: f64) -> Self {
        Self {
            name: name.into(),
            price: Some(price),
            carbon: Some(carbon),
            carbon_unit: None,
            renewable_mix: 0.0,
        }
    }

    /// Combined `price + carbon_weight * carbon`, or `None` when either input is missing.
    pub fn combined_score(&self, carbon_weight: f64) -> Option<f64> {
        Some(self.price? + carbon_weight * self.carbon?)
    }
}

/// Hourly generator availability over the scheduling horizon.
///
/// Always holds exactly `horizon` slots; slot `h` covers hour `h` of the day.
///
/// # Examples
///
/// ```
/// use gridshift::sched::types::{GenerationProfile, Generator};
///
/// let mut profile = GenerationProfile::new(24);
/// profile.push(3, Generator::new("Solar Farm (item-1)", 0.12, 40.0));
/// assert_eq!(profile.horizon(), 24);
/// assert!(profile.has_coverage(3));
/// assert!(!profile.has_coverage(4));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GenerationProfile {
    slots: Vec<Vec<Generator>>,
}

impl GenerationProfile {
    /// Creates a profile with `horizon` empty hourly slots.
    pub fn new(horizon: usize) -> Self {
        Self {
            slots: vec![Vec::new(); horizon],
        }
    }

    /// Builds a profile directly from per-hour generator lists.
    pub fn from_slots(slots: Vec<Vec<Generator>>) -> Self {
        Self { slots }
    }

    /// Number of hourly slots (H).
    pub fn horizon(&self) -> usize {
        self.slots.len()
    }

    /// Appends a generator to slot `hour`. Hours outside the horizon are ignored.
    pub fn push(&mut self, hour: usize, generator: Generator) {
        if let Some(slot) = self.slots.get_mut(hour) {
            slot.push(generator);
        }
    }

    /// Generators available at `hour`; empty outside the horizon.
    pub fn generators(&self, hour: usize) -> &[Generator] {
        self.slots.get(hour).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `true` when `hour` lies in the horizon and has at least one generator.
    pub fn has_coverage(&self, hour: usize) -> bool {
        !self.generators(hour).is_empty()
    }

    /// Iterates `(hour, generators)` in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[Generator])> {
        self.slots.iter().map(Vec::as_slice).enumerate()
    }
}

/// A deferrable workload as requested by the caller.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskRequest {
    /// Caller-assigned task identifier.
    pub id: String,
    /// Requested start hour.
    pub start: usize,
    /// Run length in hours (must be > 0 to be schedulable).
    pub duration: usize,
    /// Power draw while running (kW).
    pub load: f64,
}

impl TaskRequest {
    /// Creates a new task request.
    pub fn new(id: impl Into<String>, start: usize, duration: usize, load: f64) -> Self {
        Self {
            id: id.into(),
            start,
            duration,
            load,
        }
    }

    /// Hours covered when the task starts at `start`, saturating at `usize::MAX`.
    pub fn window(&self, start: usize) -> std::ops::Range<usize> {
        start..start.saturating_add(self.duration)
    }
}

/// One task occupying one hour in the initial placement.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleEntry {
    pub task_id: String,
    pub load: f64,
    /// Best generator for the hour, or [`UNAVAILABLE`].
    pub generator: String,
    pub is_start: bool,
    pub is_end: bool,
    pub duration: usize,
}

/// One hour of a refined task's generator schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorScheduleEntry {
    pub hour: usize,
    /// Best generator for the hour, or [`UNAVAILABLE`].
    pub generator: String,
    /// `load * score` for the hour; `None` when the hour is unavailable.
    pub cost_contribution: Option<f64>,
}

impl GeneratorScheduleEntry {
    /// `true` when a generator covers this hour.
    pub fn is_available(&self) -> bool {
        self.cost_contribution.is_some()
    }
}

/// Final state of a refined task.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutcome {
    /// Every hour of the window is covered; `cost` includes `shift_penalty`.
    Feasible {
        cost: f64,
        shift_penalty: f64,
        schedule: Vec<GeneratorScheduleEntry>,
    },
    /// No covered window was found; `schedule` shows the original window as-is.
    Infeasible { schedule: Vec<GeneratorScheduleEntry> },
}

impl TaskOutcome {
    pub fn is_feasible(&self) -> bool {
        matches!(self, Self::Feasible { .. })
    }

    /// Total cost, `None` when infeasible.
    pub fn cost(&self) -> Option<f64> {
        match self {
            Self::Feasible { cost, .. } => Some(*cost),
            Self::Infeasible { .. } => None,
        }
    }

    /// Shift penalty part of the cost, `None` when infeasible.
    pub fn shift_penalty(&self) -> Option<f64> {
        match self {
            Self::Feasible { shift_penalty, .. } => Some(*shift_penalty),
            Self::Infeasible { .. } => None,
        }
    }

    pub fn schedule(&self) -> &[GeneratorScheduleEntry] {
        match self {
            Self::Feasible { schedule, .. } | Self::Infeasible { schedule } => schedule,
        }
    }
}

/// Result of refining one task request.
#[derive(Debug, Clone, PartialEq)]
pub struct RefinedTask {
    pub id: String,
    /// Start hour as originally requested.
    pub original_start: usize,
    /// Converged start hour.
    pub start: usize,
    pub duration: usize,
    pub load: f64,
    pub outcome: TaskOutcome,
}

impl RefinedTask {
    /// Hours moved away from the requested start.
    pub fn shift_hours(&self) -> usize {
        self.start.abs_diff(self.original_start)
    }
}

impl fmt::Display for RefinedTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: start {} -> {} ({}h, {:.2} kW)",
            self.id, self.original_start, self.start, self.duration, self.load
        )?;
        match self.outcome.cost() {
            Some(cost) => write!(f, ", cost {cost:.4}")?,
            None => write!(f, ", {UNAVAILABLE}")?,
        }
        for entry in self.outcome.schedule() {
            write!(f, "\n    hour {:>2}: {}", entry.hour, entry.generator)?;
            if let Some(c) = entry.cost_contribution {
                write!(f, " ({c:.4})")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_ignores_out_of_range_push() {
        let mut profile = GenerationProfile::new(2);
        profile.push(5, Generator::new("g", 1.0, 0.0));
        assert!(profile.iter().all(|(_, gens)| gens.is_empty()));
        assert!(profile.generators(5).is_empty());
    }

    #[test]
    fn combined_score_requires_price_and_carbon() {
        let mut g = Generator::new("g", 2.0, 3.0);
        assert_eq!(g.combined_score(0.5), Some(3.5));
        g.carbon = None;
        assert_eq!(g.combined_score(0.5), None);
    }

    #[test]
    fn shift_hours_is_symmetric() {
        let task = RefinedTask {
            id: "t".into(),
            original_start: 5,
            start: 2,
            duration: 1,
            load: 1.0,
            outcome: TaskOutcome::Infeasible {
                schedule: Vec::new(),
            },
        };
        assert_eq!(task.shift_hours(), 3);
    }
}
