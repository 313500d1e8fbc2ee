//! `aim-core` — foundational types for the `rust_aim` intersection
//! arbitration engine.
//!
//! This crate is a dependency of every other `aim-*` crate.  It intentionally
//! has no `aim-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                    |
//! |-------------|---------------------------------------------|
//! | [`ids`]     | `VehicleId`                                 |
//! | [`geom`]    | `Point2`, planar distance                   |
//! | [`time`]    | `Tick`, `StepClock`, `RunConfig`, `quantize`|
//! | [`rng`]     | `SimRng` (deterministic run-level RNG)      |
//! | [`error`]   | `CoreError`, `CoreResult`                   |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|-----------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types. |

pub mod error;
pub mod geom;
pub mod ids;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geom::Point2;
pub use ids::VehicleId;
pub use rng::SimRng;
pub use time::{quantize, RunConfig, StepClock, Tick};
