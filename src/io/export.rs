//! CSV export for placements and refined schedules.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::error::Error;
use crate::sched::placer::Placement;
use crate::sched::types::RefinedTask;

/// Column header for the refined schedule export.
const SCHEDULE_HEADER: &str = "task_id,original_start,start,hour,generator,cost_contribution,feasible";

/// Column header for the initial placement export.
const PLACEMENT_HEADER: &str = "hour,task_id,load,generator,is_start,is_end,duration";

/// Exports refined tasks to a CSV file at the given path.
///
/// Writes one row per task-hour. Unavailable hours leave
/// `cost_contribution` empty.
///
/// # Errors
///
/// Returns an error if file creation or writing fails.
pub fn export_schedule_csv(tasks: &[RefinedTask], path: &Path) -> Result<(), Error> {
    let file = File::create(path)?;
    write_schedule_csv(tasks, io::BufWriter::new(file))
}

/// Writes refined tasks as CSV to any writer.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_schedule_csv(tasks: &[RefinedTask], writer: impl Write) -> Result<(), Error> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(SCHEDULE_HEADER.split(','))?;

    for task in tasks {
        let feasible = task.outcome.is_feasible().to_string();
        for entry in task.outcome.schedule() {
            wtr.write_record(&[
                task.id.clone(),
                task.original_start.to_string(),
                task.start.to_string(),
                entry.hour.to_string(),
                entry.generator.clone(),
                entry
                    .cost_contribution
                    .map(|c| format!("{c:.4}"))
                    .unwrap_or_default(),
                feasible.clone(),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

/// Exports an initial placement to a CSV file at the given path.
///
/// # Errors
///
/// Returns an error if file creation or writing fails.
pub fn export_placement_csv(placement: &Placement, path: &Path) -> Result<(), Error> {
    let file = File::create(path)?;
    write_placement_csv(placement, io::BufWriter::new(file))
}

/// Writes an initial placement as CSV to any writer, one row per task-hour.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_placement_csv(placement: &Placement, writer: impl Write) -> Result<(), Error> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(PLACEMENT_HEADER.split(','))?;

    for (hour, entries) in placement.hours() {
        for e in entries {
            wtr.write_record(&[
                hour.to_string(),
                e.task_id.clone(),
                format!("{:.4}", e.load),
                e.generator.clone(),
                e.is_start.to_string(),
                e.is_end.to_string(),
                e.duration.to_string(),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
