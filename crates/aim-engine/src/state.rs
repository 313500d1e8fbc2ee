//! Vehicle state as seen through the engine interface.

use aim_core::Point2;
use aim_topology::{Arm, Route};

/// Where a vehicle currently is relative to the shared junction.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Location {
    /// On an incoming approach, heading toward the junction.
    Inbound(Arm),
    /// Inside the junction's critical region.
    Junction,
    /// On an outgoing edge, leaving.
    Outbound(Arm),
}

impl Location {
    /// The approach arm, if the vehicle is still inbound.
    #[inline]
    pub fn inbound_arm(self) -> Option<Arm> {
        match self {
            Location::Inbound(arm) => Some(arm),
            _ => None,
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::Inbound(arm)  => write!(f, "inbound({arm})"),
            Location::Junction      => write!(f, "junction"),
            Location::Outbound(arm) => write!(f, "outbound({arm})"),
        }
    }
}

/// A read-only snapshot of one vehicle, valid for the current step.
///
/// Strategies query this once per vehicle per step; all arbitration
/// arithmetic (ETA, braking distance) derives from these fields.
#[derive(Copy, Clone, Debug)]
pub struct VehicleSnapshot {
    /// Planar position; the junction center is the origin.
    pub position: Point2,
    /// Current speed in m/s.
    pub speed: f64,
    /// Maximum comfortable deceleration in m/s².
    pub decel: f64,
    /// Where the vehicle is relative to the junction.
    pub location: Location,
    /// The (entry, exit) movement the vehicle will make.
    pub route: Route,
}

impl VehicleSnapshot {
    /// Distance from the vehicle to the junction center.
    #[inline]
    pub fn distance_to_junction(&self) -> f64 {
        self.position.distance_to_junction()
    }

    /// Distance needed to brake to a standstill at `decel`.
    #[inline]
    pub fn braking_distance(&self) -> f64 {
        self.speed * self.speed / (2.0 * self.decel)
    }
}
