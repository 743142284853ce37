//! Post-hoc summary of a refined schedule.

use std::fmt;

use super::types::RefinedTask;

/// Aggregate figures derived from a complete refinement run.
///
/// Computed from `&[RefinedTask]` after the fact so the report always agrees
/// with the per-task results. Infeasible tasks only count toward
/// `task_count` and `infeasible_count`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleReport {
    /// Number of tasks refined.
    pub task_count: usize,
    /// Tasks with every hour covered.
    pub feasible_count: usize,
    /// Tasks left without a covered window.
    pub infeasible_count: usize,
    /// Feasible tasks that ended away from their requested start.
    pub moved_count: usize,
    /// Sum of hours shifted over feasible tasks.
    pub total_shift_hours: usize,
    /// Sum of per-hour cost contributions over feasible tasks.
    pub generation_cost: f64,
    /// Sum of shift penalties over feasible tasks.
    pub shift_penalty: f64,
    /// Energy scheduled on feasible tasks (kWh).
    pub energy_kwh: f64,
}

impl ScheduleReport {
    /// Computes the report from refined tasks.
    pub fn from_tasks(tasks: &[RefinedTask]) -> Self {
        let mut report = Self {
            task_count: tasks.len(),
            feasible_count: 0,
            infeasible_count: 0,
            moved_count: 0,
            total_shift_hours: 0,
            generation_cost: 0.0,
            shift_penalty: 0.0,
            energy_kwh: 0.0,
        };

        for task in tasks {
            let Some(shift_penalty) = task.outcome.shift_penalty() else {
                report.infeasible_count += 1;
                continue;
            };
            report.feasible_count += 1;
            if task.shift_hours() > 0 {
                report.moved_count += 1;
            }
            report.total_shift_hours += task.shift_hours();
            report.shift_penalty += shift_penalty;
            report.generation_cost += task
                .outcome
                .schedule()
                .iter()
                .filter_map(|e| e.cost_contribution)
                .sum::<f64>();
            report.energy_kwh += task.load * task.duration as f64;
        }

        report
    }

    /// Generation cost plus shift penalty.
    pub fn total_cost(&self) -> f64 {
        self.generation_cost + self.shift_penalty
    }
}

impl fmt::Display for ScheduleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Schedule Report ---")?;
        writeln!(
            f,
            "Tasks:              {} ({} feasible, {} infeasible)",
            self.task_count, self.feasible_count, self.infeasible_count
        )?;
        writeln!(
            f,
            "Moved tasks:        {} ({} h shifted)",
            self.moved_count, self.total_shift_hours
        )?;
        writeln!(f, "Energy scheduled:   {:.2} kWh", self.energy_kwh)?;
        writeln!(f, "Generation cost:    {:.4}", self.generation_cost)?;
        writeln!(f, "Shift penalty:      {:.4}", self.shift_penalty)?;
        write!(f, "Total cost:         {:.4}", self.total_cost())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sched::types::{GeneratorScheduleEntry, TaskOutcome, UNAVAILABLE};

    fn feasible(id: &str, original_start: usize, start: usize, hourly: &[f64]) -> RefinedTask {
        RefinedTask {
            id: id.to_string(),
            original_start,
            start,
            duration: hourly.len(),
            load: 2.0,
            outcome: TaskOutcome::Feasible {
                cost: hourly.iter().sum::<f64>() + 0.5,
                shift_penalty: 0.5,
                schedule: hourly
                    .iter()
                    .enumerate()
                    .map(|(i, c)| GeneratorScheduleEntry {
                        hour: start + i,
                        generator: "g".to_string(),
                        cost_contribution: Some(*c),
                    })
                    .collect(),
            },
        }
    }

    #[test]
    fn empty_report_is_zero() {
        let report = ScheduleReport::from_tasks(&[]);
        assert_eq!(report.task_count, 0);
        assert_eq!(report.total_cost(), 0.0);
    }

    #[test]
    fn sums_feasible_tasks_only() {
        let tasks = vec![
            feasible("a", 0, 2, &[1.0, 2.0]),
            feasible("b", 4, 4, &[3.0]),
            RefinedTask {
                id: "c".to_string(),
                original_start: 1,
                start: 1,
                duration: 1,
                load: 9.0,
                outcome: TaskOutcome::Infeasible {
                    schedule: vec![GeneratorScheduleEntry {
                        hour: 1,
                        generator: UNAVAILABLE.to_string(),
                        cost_contribution: None,
                    }],
                },
            },
        ];
        let report = ScheduleReport::from_tasks(&tasks);
        assert_eq!(report.task_count, 3);
        assert_eq!(report.feasible_count, 2);
        assert_eq!(report.infeasible_count, 1);
        assert_eq!(report.moved_count, 1);
        assert_eq!(report.total_shift_hours, 2);
        assert_eq!(report.generation_cost, 6.0);
        assert_eq!(report.shift_penalty, 1.0);
        assert_eq!(report.total_cost(), 7.0);
        assert_eq!(report.energy_kwh, 6.0);
    }

    #[test]
    fn display_lists_totals() {
        let report = ScheduleReport::from_tasks(&[feasible("a", 0, 0, &[1.0])]);
        let text = report.to_string();
        assert!(text.starts_with("--- Schedule Report ---"));
        assert!(text.contains("Total cost:         1.5000"));
    }
}
