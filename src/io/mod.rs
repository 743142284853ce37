/// CSV export of placements and refined schedules.
pub mod export;
