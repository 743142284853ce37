//! End-to-end scheduling run: catalog to profile, placement, refinement and report.

use tracing::{info, warn};

use crate::catalog::{DiscoverResponse, selected_item_ids};
use crate::config::SchedulerConfig;
use crate::sched::placer::{InitialPlacer, Placement};
use crate::sched::profile::ProfileBuilder;
use crate::sched::refiner::LocalSearchRefiner;
use crate::sched::report::ScheduleReport;
use crate::sched::types::{GenerationProfile, RefinedTask};

/// Everything produced by one scheduling run.
#[derive(Debug, Clone)]
pub struct ScheduleRun {
    pub profile: GenerationProfile,
    /// First-fit placement of the requested tasks.
    pub placement: Placement,
    /// Refined tasks, in request order.
    pub refined: Vec<RefinedTask>,
    pub report: ScheduleReport,
    /// Catalog items the placement draws on.
    pub selected_items: Vec<String>,
}

/// Runs placement and refinement for the configured tasks against a catalog.
///
/// Both stages start from the same task requests; the refiner measures shifts
/// from the requested starts, not from the placement.
pub fn run_schedule(config: &SchedulerConfig, response: &DiscoverResponse) -> ScheduleRun {
    let s = &config.scheduler;
    let profile = ProfileBuilder::new(s.horizon_hours).build_from_response(response);
    let covered = profile.iter().filter(|(_, g)| !g.is_empty()).count();
    let context = response.context.as_ref();
    info!(
        transaction = context.and_then(|c| c.transaction_id.as_deref()).unwrap_or("-"),
        bap = context.and_then(|c| c.bap_id.as_deref()).unwrap_or("-"),
        horizon = profile.horizon(),
        covered_hours = covered,
        "generation profile built"
    );

    let placement = InitialPlacer::new(s.carbon_weight).place(&profile, &config.tasks);
    for id in &placement.unplaced {
        warn!(task = %id, "task has no covered window");
    }

    let refined = LocalSearchRefiner::new(s.refiner_params()).refine(&profile, &config.tasks);
    for task in refined.iter().filter(|t| !t.outcome.is_feasible()) {
        warn!(task = %task.id, start = task.start, "task left infeasible after refinement");
    }

    let report = ScheduleReport::from_tasks(&refined);
    let selected_items = selected_item_ids(&placement);

    ScheduleRun {
        profile,
        placement,
        refined,
        report,
        selected_items,
    }
}
