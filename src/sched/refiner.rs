//! Local-search refinement of task start times.

use std::ops::RangeInclusive;

use rand::seq::SliceRandom;
use rand::{SeedableRng, rngs::StdRng};
use tracing::{debug, info};

use super::scorer::{HourScore, HourlyScorer};
use super::types::{
    GenerationProfile, GeneratorScheduleEntry, RefinedTask, TaskOutcome, TaskRequest,
};

/// Default cost per kW per hour a task is moved from its requested start.
pub const DEFAULT_SHIFT_UNIT_COST: f64 = 0.01;

/// Tuning parameters for [`LocalSearchRefiner`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefinerParams {
    /// Maximum distance (hours) from the requested start a task may move.
    pub shift_range: usize,
    /// Weight converting carbon intensity into price units.
    pub carbon_weight: f64,
    /// Cost per kW per hour of shift.
    pub shift_unit_cost: f64,
    /// Seed for the per-pass task visiting order.
    pub seed: u64,
}

impl Default for RefinerParams {
    fn default() -> Self {
        Self {
            shift_range: 3,
            carbon_weight: 50.0,
            shift_unit_cost: DEFAULT_SHIFT_UNIT_COST,
            seed: 42,
        }
    }
}

/// Cost of running a task from one candidate start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateCost {
    /// `Σ load * score(h)` over the window.
    pub generation: f64,
    /// `|start - original_start| * load * shift_unit_cost`.
    pub shift_penalty: f64,
}

impl CandidateCost {
    pub fn total(&self) -> f64 {
        self.generation + self.shift_penalty
    }
}

/// Single-task relocation local search.
///
/// Passes repeat until one commits no move. Each pass visits the tasks in a
/// freshly shuffled order and moves every task to its cheapest candidate
/// within `shift_range` of the requested start, if that candidate is strictly
/// cheaper than where the task currently sits. A task's cost depends only on
/// its own start, so every move strictly lowers the total and the search
/// terminates.
#[derive(Debug, Clone, Copy)]
pub struct LocalSearchRefiner {
    params: RefinerParams,
}

impl LocalSearchRefiner {
    pub fn new(params: RefinerParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &RefinerParams {
        &self.params
    }

    /// Cost of `task` starting at `start`, measured against `original_start`.
    ///
    /// Returns `None` when the window leaves the horizon or any hour in it is
    /// unavailable.
    pub fn candidate_cost(
        &self,
        scorer: &HourlyScorer<'_>,
        task: &TaskRequest,
        original_start: usize,
        start: usize,
    ) -> Option<CandidateCost> {
        let end = start.checked_add(task.duration)?;
        if task.duration == 0 || end > scorer.profile().horizon() {
            return None;
        }

        let mut generation = 0.0;
        for hour in start..end {
            generation += task.load * scorer.score(hour).score()?;
        }
        let shift_penalty =
            start.abs_diff(original_start) as f64 * task.load * self.params.shift_unit_cost;

        Some(CandidateCost {
            generation,
            shift_penalty,
        })
    }

    /// Refines the start of every task and attaches its generator schedule.
    ///
    /// Results are returned in input order. Requested starts are taken as the
    /// original starts; tasks that never find a covered window stay there and
    /// come back as [`TaskOutcome::Infeasible`].
    pub fn refine(&self, profile: &GenerationProfile, tasks: &[TaskRequest]) -> Vec<RefinedTask> {
        let scorer = HourlyScorer::new(profile, self.params.carbon_weight);
        let mut starts: Vec<usize> = tasks.iter().map(|t| t.start).collect();
        let mut order: Vec<usize> = (0..tasks.len()).collect();
        let mut rng = StdRng::seed_from_u64(self.params.seed);

        let mut passes = 0_usize;
        let mut moves = 0_usize;
        loop {
            passes += 1;
            order.shuffle(&mut rng);

            let mut improved = false;
            for &i in &order {
                if let Some(next) = self.best_move(&scorer, &tasks[i], starts[i]) {
                    debug!(task = %tasks[i].id, from = starts[i], to = next, "moving task");
                    starts[i] = next;
                    moves += 1;
                    improved = true;
                }
            }

            if !improved {
                break;
            }
        }
        info!(passes, moves, tasks = tasks.len(), "refinement converged");

        tasks
            .iter()
            .zip(starts)
            .map(|(task, start)| self.finish(&scorer, task, start))
            .collect()
    }

    /// Cheapest candidate strictly better than `current`, if any.
    ///
    /// Candidates are `task.start + k` for `k` in `-shift_range..=shift_range`;
    /// ties keep the earliest candidate.
    fn best_move(
        &self,
        scorer: &HourlyScorer<'_>,
        task: &TaskRequest,
        current: usize,
    ) -> Option<usize> {
        let current_cost = self
            .candidate_cost(scorer, task, task.start, current)
            .map(|c| c.total());

        let mut best: Option<(usize, f64)> = None;
        let candidates = candidate_starts(task, self.params.shift_range, scorer.profile().horizon());
        for candidate in candidates {
            if candidate == current {
                continue;
            }
            let Some(cost) = self
                .candidate_cost(scorer, task, task.start, candidate)
                .map(|c| c.total())
            else {
                continue;
            };
            let beats_current = current_cost.is_none_or(|c| cost < c);
            let beats_best = best.is_none_or(|(_, b)| cost < b);
            if beats_current && beats_best {
                best = Some((candidate, cost));
            }
        }

        best.map(|(start, _)| start)
    }

    fn finish(&self, scorer: &HourlyScorer<'_>, task: &TaskRequest, start: usize) -> RefinedTask {
        let end = task.window(start).end.min(scorer.profile().horizon());
        let schedule: Vec<GeneratorScheduleEntry> = (start..end)
            .map(|hour| {
                let score = scorer.score(hour);
                GeneratorScheduleEntry {
                    hour,
                    generator: score.generator_name().to_string(),
                    cost_contribution: match score {
                        HourScore::Available { score, .. } => Some(task.load * score),
                        HourScore::Unavailable => None,
                    },
                }
            })
            .collect();

        let outcome = match self.candidate_cost(scorer, task, task.start, start) {
            Some(cost) => TaskOutcome::Feasible {
                cost: cost.total(),
                shift_penalty: cost.shift_penalty,
                schedule,
            },
            None => TaskOutcome::Infeasible { schedule },
        };

        RefinedTask {
            id: task.id.clone(),
            original_start: task.start,
            start,
            duration: task.duration,
            load: task.load,
            outcome,
        }
    }
}

/// Starts within `shift_range` of the requested start whose window fits the
/// horizon, in ascending order.
fn candidate_starts(
    task: &TaskRequest,
    shift_range: usize,
    horizon: usize,
) -> RangeInclusive<usize> {
    let Some(last_fit) = horizon.checked_sub(task.duration) else {
        return RangeInclusive::new(1, 0);
    };
    let lo = task.start.saturating_sub(shift_range);
    let hi = task.start.saturating_add(shift_range).min(last_fit);
    lo..=hi
}
