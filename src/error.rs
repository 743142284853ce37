//! Error types for loading inputs and writing results.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

/// Errors raised at the crate's I/O boundary.
///
/// Scheduling itself never fails: uncovered tasks are reported through
/// their outcome, not through this type.
#[derive(Debug, Error)]
pub enum Error {
    /// An input file could not be read.
    #[error("cannot read \"{}\": {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A JSON document did not match the expected shape.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing a CSV export failed.
    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    /// Writing an output failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Configuration failed to load or validate.
    #[error("{}", join_config_errors(.0))]
    Config(Vec<ConfigError>),
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::Config(vec![err])
    }
}

fn join_config_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_render_one_per_line() {
        let err = Error::Config(vec![
            ConfigError::new("scheduler.horizon_hours", "must be > 0"),
            ConfigError::new("tasks[0].duration", "must be > 0"),
        ]);
        let text = err.to_string();
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("scheduler.horizon_hours"));
    }

    #[test]
    fn json_errors_convert() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: Error = parse.err().map(Error::from).expect("parse should fail");
        assert!(matches!(err, Error::Json(_)));
    }
}
