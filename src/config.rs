//! TOML-based scheduler configuration and preset definitions.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::Error;
use crate::sched::refiner::{DEFAULT_SHIFT_UNIT_COST, RefinerParams};
use crate::sched::types::{DEFAULT_HORIZON_HOURS, TaskRequest};

/// Longest horizon the scheduler accepts: a single day.
const MAX_HORIZON_HOURS: usize = 24;

/// Top-level configuration parsed from TOML.
///
/// All fields have defaults matching the baseline preset. Load from TOML with
/// [`SchedulerConfig::from_toml_file`] or use [`SchedulerConfig::baseline`].
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchedulerConfig {
    /// Horizon and search parameters.
    #[serde(default)]
    pub scheduler: SchedulerSection,
    /// Task requests to schedule.
    #[serde(default)]
    pub tasks: Vec<TaskRequest>,
}

/// Horizon and search parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchedulerSection {
    /// Number of hourly slots (1..=24).
    pub horizon_hours: usize,
    /// Maximum hours a task may move from its requested start.
    pub shift_range: usize,
    /// Weight converting carbon intensity into price units.
    pub carbon_weight: f64,
    /// Cost per kW per hour a task is shifted.
    pub shift_unit_cost: f64,
    /// Seed for the refiner's visiting order.
    pub seed: u64,
}

impl Default for SchedulerSection {
    fn default() -> Self {
        Self {
            horizon_hours: DEFAULT_HORIZON_HOURS,
            shift_range: 3,
            carbon_weight: 50.0,
            shift_unit_cost: DEFAULT_SHIFT_UNIT_COST,
            seed: 42,
        }
    }
}

impl SchedulerSection {
    /// Refiner parameters described by this section.
    pub fn refiner_params(&self) -> RefinerParams {
        RefinerParams {
            shift_range: self.shift_range,
            carbon_weight: self.carbon_weight,
            shift_unit_cost: self.shift_unit_cost,
            seed: self.seed,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"scheduler.horizon_hours"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Forecasted workloads used by the built-in presets.
fn forecasted_tasks() -> Vec<TaskRequest> {
    vec![
        TaskRequest::new("Batch_A", 1, 2, 2.5),
        TaskRequest::new("Query_B", 1, 4, 1.0),
        TaskRequest::new("Backup_C", 10, 3, 5.0),
    ]
}

impl SchedulerConfig {
    /// Returns the baseline preset: default weights and the forecasted workloads.
    pub fn baseline() -> Self {
        Self {
            scheduler: SchedulerSection::default(),
            tasks: forecasted_tasks(),
        }
    }

    /// Returns the cost-focus preset: carbon barely weighs against price.
    pub fn cost_focus() -> Self {
        Self {
            scheduler: SchedulerSection {
                carbon_weight: 0.0001,
                ..SchedulerSection::default()
            },
            tasks: forecasted_tasks(),
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "cost_focus"];

    /// Loads a configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "cost_focus" => Ok(Self::cost_focus()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("config", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if the configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let s = &self.scheduler;

        if s.horizon_hours == 0 || s.horizon_hours > MAX_HORIZON_HOURS {
            errors.push(ConfigError::new(
                "scheduler.horizon_hours",
                format!("must be in 1..={MAX_HORIZON_HOURS}"),
            ));
        }
        if s.shift_range > s.horizon_hours {
            errors.push(ConfigError::new(
                "scheduler.shift_range",
                format!("must be <= horizon_hours ({})", s.horizon_hours),
            ));
        }
        if !s.carbon_weight.is_finite() || s.carbon_weight < 0.0 {
            errors.push(ConfigError::new(
                "scheduler.carbon_weight",
                "must be finite and >= 0",
            ));
        }
        if !s.shift_unit_cost.is_finite() || s.shift_unit_cost < 0.0 {
            errors.push(ConfigError::new(
                "scheduler.shift_unit_cost",
                "must be finite and >= 0",
            ));
        }

        errors.extend(validate_tasks(&self.tasks));
        errors
    }

    /// Validates the configuration, failing with every problem found.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] listing all violations.
    pub fn validated(self) -> Result<Self, Error> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(Error::Config(errors))
        }
    }
}

/// Checks task requests: non-empty unique ids, positive durations, sane loads.
pub fn validate_tasks(tasks: &[TaskRequest]) -> Vec<ConfigError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (i, task) in tasks.iter().enumerate() {
        if task.id.is_empty() {
            errors.push(ConfigError::new(format!("tasks[{i}].id"), "must not be empty"));
        } else if !seen.insert(task.id.as_str()) {
            errors.push(ConfigError::new(
                format!("tasks[{i}].id"),
                format!("duplicate task id \"{}\"", task.id),
            ));
        }
        if task.duration == 0 {
            errors.push(ConfigError::new(format!("tasks[{i}].duration"), "must be > 0"));
        }
        if !task.load.is_finite() || task.load < 0.0 {
            errors.push(ConfigError::new(
                format!("tasks[{i}].load"),
                "must be finite and >= 0",
            ));
        }
    }

    errors
}

/// Reads task requests from a JSON array file.
///
/// # Errors
///
/// Returns [`Error::Read`] or [`Error::Json`] when the file cannot be loaded.
pub fn load_tasks_json(path: &Path) -> Result<Vec<TaskRequest>, Error> {
    let content = fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&content)?)
}
