//! Vehicle lifecycle bookkeeping shared by all strategies.

use aim_core::VehicleId;
use aim_engine::SimulationEngine;

/// The set of vehicles a strategy currently governs, in arrival order.
///
/// Registration also disables the engine's own collision-avoidance braking
/// for the vehicle: from this point on the strategy is the sole authority
/// over junction access, whichever strategy it is.
pub struct VehicleTracker {
    vehicles: Vec<VehicleId>,
}

impl Default for VehicleTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl VehicleTracker {
    pub fn new() -> Self {
        Self {
            vehicles: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    pub fn contains(&self, vehicle: VehicleId) -> bool {
        self.vehicles.contains(&vehicle)
    }

    /// Tracked vehicles in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = VehicleId> + '_ {
        self.vehicles.iter().copied()
    }

    /// Snapshot of the tracked set, for iteration while mutating the engine.
    pub fn ids(&self) -> Vec<VehicleId> {
        self.vehicles.clone()
    }

    /// Register newly arrived vehicles and take braking authority over them.
    pub fn on_arrivals(&mut self, arrivals: &[VehicleId], engine: &mut dyn SimulationEngine) {
        for &id in arrivals {
            if self.contains(id) {
                log::warn!("vehicle {id} reported as arrived twice; ignoring");
                continue;
            }
            self.vehicles.push(id);
            if let Err(e) = engine.set_auto_braking(id, false) {
                log::warn!("could not set braking mode for vehicle {id}: {e}");
            }
        }
    }

    /// Drop departed vehicles, returning the subset that was actually
    /// tracked.  Unknown departures are logged and skipped.
    pub fn on_departures(&mut self, departures: &[VehicleId]) -> Vec<VehicleId> {
        let mut released = Vec::new();
        for &id in departures {
            match self.vehicles.iter().position(|&v| v == id) {
                Some(i) => {
                    self.vehicles.remove(i);
                    released.push(id);
                }
                None => log::warn!("departure reported for untracked vehicle {id}"),
            }
        }
        released
    }
}
