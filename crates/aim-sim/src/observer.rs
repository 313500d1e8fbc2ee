//! Run observation hooks.

use aim_core::{Tick, VehicleId};
use aim_topology::Route;

/// Passive listener on the run loop.  All hooks default to no-ops; output
/// writers implement the ones they need.
///
/// Hooks must not fail: an observer that hits an I/O error is expected to
/// record it internally and surface it after the run.
pub trait RunObserver {
    /// A vehicle entered the network.
    fn on_spawn(&mut self, _tick: Tick, _vehicle: VehicleId, _route: Route) {}

    /// A vehicle left the network.
    fn on_departure(&mut self, _tick: Tick, _vehicle: VehicleId) {}

    /// All arbitration for `_tick` is done; `_active` vehicles remain.
    fn on_step_end(&mut self, _tick: Tick, _active: usize) {}

    /// The run finished.
    fn on_run_end(&mut self, _final_tick: Tick) {}
}

/// Observer that ignores everything.
pub struct NoopObserver;

impl RunObserver for NoopObserver {}
