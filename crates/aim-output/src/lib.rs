//! `aim-output` — CSV run output.
//!
//! Two files per run, written incrementally by a
//! [`RunObserver`][aim_sim::RunObserver] implementation:
//!
//! * `trips.csv` — one row per completed trip (vehicle, route, spawn and
//!   departure ticks, travel time in seconds)
//! * `steps.csv` — one row per step (tick, vehicles in the network)
//!
//! Observer hooks never fail the run; the first write error is parked in
//! the [`TripStats`] handle and surfaced after the run ends.

pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{OutputError, OutputResult};
pub use observer::{TripObserver, TripStats};
pub use row::{StepRow, TripRow};
pub use writer::CsvSink;
