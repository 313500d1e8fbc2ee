//! Actuation error type.
//!
//! Commands the engine rejects are *recoverable* from the arbitration core's
//! point of view: the call site logs them with full context and moves on to
//! the next vehicle.  Nothing here is fatal.

use aim_core::{Point2, VehicleId};
use aim_topology::Arm;
use thiserror::Error;

/// An actuation command the simulation engine could not honor.
#[derive(Debug, Error)]
pub enum ActuationError {
    #[error("vehicle {0} unknown to the engine")]
    UnknownVehicle(VehicleId),

    #[error("vehicle {vehicle} on arm {arm} at {position} cannot stop in time")]
    CannotStop {
        vehicle:  VehicleId,
        arm:      Arm,
        position: Point2,
    },

    #[error("vehicle {0} already present in the engine")]
    AlreadyPresent(VehicleId),
}

pub type ActuationResult<T> = Result<T, ActuationError>;
