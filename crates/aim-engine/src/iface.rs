//! The `SimulationEngine` trait — the seam to the physical simulation.

use aim_core::VehicleId;
use aim_topology::{Arm, Route};

use crate::{ActuationResult, Location, VehicleSnapshot};

/// Synchronous interface to the external simulation engine.
///
/// One full arbitration pass happens inside the step boundary the engine
/// imposes; every call here completes before the step returns.  Queries are
/// cheap and side-effect free; commands take effect from the next physics
/// integration onward.
///
/// Implementations own all vehicle state.  The arbitration core keeps only
/// derived bookkeeping keyed by [`VehicleId`] and must tolerate a query
/// returning `None` for a vehicle that just left.
pub trait SimulationEngine {
    /// Advance physical state by exactly one simulation step.
    fn step(&mut self);

    /// Vehicles that entered the network during the last `step()` (or were
    /// spawned since).  Cleared at the start of each step.
    fn arrived(&self) -> &[VehicleId];

    /// Vehicles that left the network during the last `step()`.
    /// Cleared at the start of each step.
    fn departed(&self) -> &[VehicleId];

    /// Current state of `vehicle`, or `None` if the engine no longer (or
    /// never did) track it.
    fn snapshot(&self, vehicle: VehicleId) -> Option<VehicleSnapshot>;

    /// Speed limit of the lane at `location`, in m/s.
    fn speed_limit(&self, location: Location) -> f64;

    /// Insert a new vehicle at the outer end of its route's entry arm.
    fn spawn(&mut self, vehicle: VehicleId, route: Route, depart_speed: f64)
        -> ActuationResult<()>;

    /// Command a constant target speed (m/s).
    fn set_speed(&mut self, vehicle: VehicleId, speed: f64) -> ActuationResult<()>;

    /// Command a stop at `offset_m` metres from the outer end of `arm`,
    /// holding for `duration_ticks` steps (`None` = until resumed).
    ///
    /// Fails with [`CannotStop`][crate::ActuationError::CannotStop] if the
    /// vehicle is already past the stop point or physically cannot brake in
    /// the remaining distance.
    fn stop_at(
        &mut self,
        vehicle:        VehicleId,
        arm:            Arm,
        offset_m:       f64,
        duration_ticks: Option<u64>,
    ) -> ActuationResult<()>;

    /// Clear any commanded stop and speed; the vehicle reverts to driving at
    /// the lane speed limit.
    fn resume(&mut self, vehicle: VehicleId) -> ActuationResult<()>;

    /// Enable or disable the engine's own collision-avoidance braking for
    /// `vehicle`.  Strategies that take full authority over motion near the
    /// junction disable it on arrival.
    fn set_auto_braking(&mut self, vehicle: VehicleId, enabled: bool) -> ActuationResult<()>;
}
