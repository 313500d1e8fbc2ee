//! `aim-topology` — the static description of the intersection.
//!
//! Pure data, no behavior: four approach arms meeting at the junction
//! origin, the twelve canonical routes across it, and the conflict bitmaps
//! describing which cells of the junction each route occupies while
//! crossing.  All of it is immutable and injected into strategies at
//! construction; nothing here is a mutable global.
//!
//! # What lives here
//!
//! | Module       | Contents                                        |
//! |--------------|-------------------------------------------------|
//! | [`arm`]      | `Arm`, `MovementGroup`, `Route`, `Turn`         |
//! | [`conflict`] | `ConflictMask` — per-route 2×2 occupancy bitmap |

pub mod arm;
pub mod conflict;
pub mod error;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use arm::{Arm, MovementGroup, Route, Turn};
pub use conflict::ConflictMask;
pub use error::{TopologyError, TopologyResult};
