//! Serialized record shapes.

use serde::Serialize;

/// One completed trip: spawn to departure.
#[derive(Clone, Debug, Serialize)]
pub struct TripRow {
    pub vehicle:     u32,
    /// Two-letter route code, e.g. "du".
    pub route:       String,
    pub spawn_tick:  u64,
    pub depart_tick: u64,
    pub travel_secs: f64,
}

/// Network load at the end of one step.
#[derive(Clone, Debug, Serialize)]
pub struct StepRow {
    pub tick:   u64,
    /// Vehicles in the network after this step's arbitration.
    pub active: usize,
}
