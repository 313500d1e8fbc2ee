//! `aim-engine` — the boundary between the arbitration core and the physical
//! simulation.
//!
//! The core never owns vehicle motion.  It talks to an external **simulation
//! engine** through the [`SimulationEngine`] trait: synchronous state queries
//! (position, speed, location, route) and actuation commands (set speed,
//! stop at position, resume).  Everything a strategy knows about a vehicle
//! comes through this seam.
//!
//! [`KinematicEngine`] is the in-repo reference implementation — a
//! deterministic point-mass model of four approach arms meeting at the
//! origin.  It exists so the demos and the strategy test suites can run
//! end-to-end without an external traffic simulator.
//!
//! | Module        | Contents                                     |
//! |---------------|----------------------------------------------|
//! | [`iface`]     | `SimulationEngine` trait                     |
//! | [`state`]     | `Location`, `VehicleSnapshot`                |
//! | [`kinematic`] | `KinematicEngine`, `EngineParams`            |
//! | [`error`]     | `ActuationError`, `ActuationResult`          |

pub mod error;
pub mod iface;
pub mod kinematic;
pub mod state;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{ActuationError, ActuationResult};
pub use iface::SimulationEngine;
pub use kinematic::{EngineParams, KinematicEngine};
pub use state::{Location, VehicleSnapshot};
