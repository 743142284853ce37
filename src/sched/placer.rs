//! First-fit, earliest-start initial placement.

use std::fmt;

use tracing::debug;

use super::scorer::HourlyScorer;
use super::types::{GenerationProfile, ScheduleEntry, TaskRequest};

/// A task placed by [`InitialPlacer`].
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedTask {
    pub id: String,
    pub start: usize,
    pub duration: usize,
}

/// Per-hour view of an initial placement.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Placement {
    hours: Vec<Vec<ScheduleEntry>>,
    /// Placed tasks, in input order.
    pub placed: Vec<PlacedTask>,
    /// Ids of tasks with no covered window, in input order.
    pub unplaced: Vec<String>,
}

impl Placement {
    fn new(horizon: usize) -> Self {
        Self {
            hours: vec![Vec::new(); horizon],
            placed: Vec::new(),
            unplaced: Vec::new(),
        }
    }

    /// Entries scheduled at `hour`, in task input order.
    pub fn entries(&self, hour: usize) -> &[ScheduleEntry] {
        self.hours.get(hour).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterates `(hour, entries)` over the whole horizon.
    pub fn hours(&self) -> impl Iterator<Item = (usize, &[ScheduleEntry])> {
        self.hours.iter().map(Vec::as_slice).enumerate()
    }

    /// Start hour chosen for task `id`, if it was placed.
    pub fn start_of(&self, id: &str) -> Option<usize> {
        self.placed.iter().find(|p| p.id == id).map(|p| p.start)
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Initial Placement ---")?;
        for (hour, entries) in self.hours() {
            for e in entries {
                let marker = match (e.is_start, e.is_end) {
                    (true, true) => "start/end",
                    (true, false) => "start",
                    (false, true) => "end",
                    (false, false) => "",
                };
                writeln!(
                    f,
                    "hour {hour:>2}: {} {:.2} kW via {} {marker}",
                    e.task_id, e.load, e.generator
                )?;
            }
        }
        if !self.unplaced.is_empty() {
            writeln!(f, "unplaced: {}", self.unplaced.join(", "))?;
        }
        Ok(())
    }
}

/// Greedy placer: each task goes to the earliest window with generator
/// coverage in every hour.
///
/// Tasks are handled in input order and never reordered. Window selection
/// only checks that a generator exists; the reported generator for each hour
/// is the best-scoring one under `carbon_weight`.
#[derive(Debug, Clone, Copy)]
pub struct InitialPlacer {
    carbon_weight: f64,
}

impl InitialPlacer {
    pub fn new(carbon_weight: f64) -> Self {
        Self { carbon_weight }
    }

    /// Places every task into a fresh [`Placement`].
    pub fn place(&self, profile: &GenerationProfile, tasks: &[TaskRequest]) -> Placement {
        let scorer = HourlyScorer::new(profile, self.carbon_weight);
        let mut placement = Placement::new(profile.horizon());

        for task in tasks {
            let Some(start) = earliest_covered_start(profile, task.duration) else {
                debug!(task = %task.id, duration = task.duration, "no covered window");
                placement.unplaced.push(task.id.clone());
                continue;
            };

            for (offset, hour) in task.window(start).enumerate() {
                placement.hours[hour].push(ScheduleEntry {
                    task_id: task.id.clone(),
                    load: task.load,
                    generator: scorer.score(hour).generator_name().to_string(),
                    is_start: offset == 0,
                    is_end: offset + 1 == task.duration,
                    duration: task.duration,
                });
            }
            placement.placed.push(PlacedTask {
                id: task.id.clone(),
                start,
                duration: task.duration,
            });
        }

        placement
    }
}

/// First start whose whole `duration`-hour window has coverage.
///
/// Zero-length tasks and tasks longer than the horizon have no window.
fn earliest_covered_start(profile: &GenerationProfile, duration: usize) -> Option<usize> {
    if duration == 0 || duration > profile.horizon() {
        return None;
    }
    (0..=profile.horizon() - duration)
        .find(|&start| (start..start + duration).all(|h| profile.has_coverage(h)))
}
