//! Stochastic vehicle arrivals.

use aim_core::{RunConfig, SimRng, VehicleId};
use aim_topology::Route;

/// Bernoulli arrival process: each step, at most one vehicle spawns with the
/// configured probability, on a route drawn uniformly from the twelve
/// canonical ones.  Identifiers increase monotonically from zero, so the
/// same seed reproduces the same traffic exactly.
pub struct ArrivalSource {
    rng: SimRng,
    probability: f64,
    next_id: u32,
}

impl ArrivalSource {
    pub fn new(config: &RunConfig) -> Self {
        Self {
            rng: SimRng::new(config.seed),
            probability: config.spawn_probability,
            next_id: 0,
        }
    }

    /// Vehicles issued so far.
    pub fn spawned(&self) -> u32 {
        self.next_id
    }

    /// Draw this step's arrival, if any.
    pub fn sample(&mut self) -> Option<(VehicleId, Route)> {
        if !self.rng.gen_bool(self.probability) {
            return None;
        }
        let route = *self.rng.choose(&Route::ALL)?;
        let id = VehicleId(self.next_id);
        self.next_id += 1;
        Some((id, route))
    }
}
