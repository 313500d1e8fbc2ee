//! `aim-control` — the four interchangeable junction arbitration strategies.
//!
//! Everything here sits behind the [`ControlStrategy`] trait and talks to
//! the physical world only through
//! [`SimulationEngine`][aim_engine::SimulationEngine].  A strategy keeps
//! derived bookkeeping keyed by `VehicleId`; the engine owns all vehicle
//! state.
//!
//! # What lives here
//!
//! | Module         | Contents                                           |
//! |----------------|----------------------------------------------------|
//! | [`config`]     | `ControlConfig` — shared strategy tuning           |
//! | [`lifecycle`]  | `VehicleTracker` — arrival/departure bookkeeping   |
//! | [`strategy`]   | `ControlStrategy` trait, `StrategyKind` selector   |
//! | [`fifo`]       | `SlotStrategy` — whole-junction time slots         |
//! | [`grid`]       | `GridStrategy` — space-time cell reservation       |
//! | [`precedence`] | `PrecedenceStrategy` — right-of-way rules          |
//! | [`phase`]      | `PhaseStrategy` — fixed-period alternation         |
//!
//! # Picking a strategy
//!
//! ```
//! use aim_control::{ControlConfig, StrategyKind};
//!
//! let strategy = StrategyKind::Grid.build(&ControlConfig::default()).unwrap();
//! assert_eq!(strategy.name(), "grid");
//! ```

pub mod config;
pub mod error;
pub mod fifo;
pub mod grid;
pub mod lifecycle;
pub mod phase;
pub mod precedence;
pub mod strategy;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::ControlConfig;
pub use error::{ControlError, ControlResult};
pub use fifo::SlotStrategy;
pub use grid::{GridStrategy, OccupancyGrid};
pub use lifecycle::VehicleTracker;
pub use phase::PhaseStrategy;
pub use precedence::PrecedenceStrategy;
pub use strategy::{ControlStrategy, StrategyKind};
