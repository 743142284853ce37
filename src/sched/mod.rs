/// Initial first-fit placement.
pub mod placer;
/// Hourly generation profile construction.
pub mod profile;
pub mod refiner;
pub mod report;
/// Generator-hour scoring.
pub mod scorer;
pub mod types;
