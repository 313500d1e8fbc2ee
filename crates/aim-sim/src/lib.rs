//! `aim-sim` — run orchestration for the arbitration engine.
//!
//! Couples a [`SimulationEngine`][aim_engine::SimulationEngine], one
//! [`ControlStrategy`][aim_control::ControlStrategy], and a seeded arrival
//! process into a deterministic step loop.
//!
//! # What lives here
//!
//! | Module       | Contents                                     |
//! |--------------|----------------------------------------------|
//! | [`runner`]   | `Runner`, `RunnerBuilder`, `RunSummary`      |
//! | [`source`]   | `ArrivalSource` — seeded Bernoulli arrivals  |
//! | [`observer`] | `RunObserver` hook trait                     |

pub mod error;
pub mod observer;
pub mod runner;
pub mod source;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, RunObserver};
pub use runner::{Runner, RunnerBuilder, RunSummary};
pub use source::ArrivalSource;
