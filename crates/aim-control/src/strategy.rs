//! The `ControlStrategy` trait and strategy selection.

use std::fmt;
use std::str::FromStr;

use aim_core::{Tick, VehicleId};
use aim_engine::SimulationEngine;

use crate::{
    ControlConfig, ControlError, ControlResult, GridStrategy, PhaseStrategy,
    PrecedenceStrategy, SlotStrategy,
};

/// Speed floor used when estimating time-to-arrival, m/s.
///
/// A standing vehicle would otherwise produce an infinite estimate; with the
/// floor it lands far enough in the future that everything sorts after it.
pub(crate) const SPEED_EPS: f64 = 1e-4;

/// Floor for commanded approach speeds, m/s.
///
/// A reservation far enough out can make the derived approach speed
/// negative; the vehicle is told to creep instead, so it keeps making
/// progress and its booking gets re-evaluated as the estimate drifts.
pub(crate) const CRAWL_SPEED_MPS: f64 = 0.5;

/// Estimated seconds to cover `dist_m` at `speed` m/s.
#[inline]
pub(crate) fn eta_secs(dist_m: f64, speed: f64) -> f64 {
    dist_m.max(0.0) / speed.max(SPEED_EPS)
}

// ── ControlStrategy ───────────────────────────────────────────────────────────

/// One arbitration policy for the shared junction.
///
/// The driving loop calls the hooks in a fixed order each step: engine step,
/// then `on_departures`, then `on_arrivals` for vehicles spawned this step,
/// then `on_step`.  Strategies keep only derived bookkeeping; the engine
/// owns all vehicle state.
pub trait ControlStrategy {
    /// Stable human-readable name, used in logs and output file naming.
    fn name(&self) -> &'static str;

    /// Apply (and validate) a configuration.  Called once before the run;
    /// resets all per-run bookkeeping.
    fn configure(&mut self, config: &ControlConfig) -> ControlResult<()>;

    /// Vehicles that entered the network during the last engine step.
    fn on_arrivals(&mut self, arrivals: &[VehicleId], engine: &mut dyn SimulationEngine);

    /// Vehicles that left the network during the last engine step.  All
    /// resources held on their behalf must be released here.
    fn on_departures(&mut self, departures: &[VehicleId]);

    /// One arbitration pass over the current state.
    fn on_step(&mut self, now: Tick, engine: &mut dyn SimulationEngine) -> ControlResult<()>;
}

// ── StrategyKind ──────────────────────────────────────────────────────────────

/// Selector for the four interchangeable strategies.
///
/// The numeric aliases accepted by `FromStr` match the historical command
/// line interface: 0 = fifo, 1 = right-of-way, 2 = phase, 3 = grid.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum StrategyKind {
    Fifo,
    RightOfWay,
    Phase,
    Grid,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 4] = [
        StrategyKind::Fifo,
        StrategyKind::RightOfWay,
        StrategyKind::Phase,
        StrategyKind::Grid,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::Fifo       => "fifo",
            StrategyKind::RightOfWay => "right-of-way",
            StrategyKind::Phase      => "phase",
            StrategyKind::Grid       => "grid",
        }
    }

    /// Construct the strategy, configured and ready to run.
    pub fn build(self, config: &ControlConfig) -> ControlResult<Box<dyn ControlStrategy>> {
        let mut strategy: Box<dyn ControlStrategy> = match self {
            StrategyKind::Fifo       => Box::new(SlotStrategy::new()),
            StrategyKind::RightOfWay => Box::new(PrecedenceStrategy::new()),
            StrategyKind::Phase      => Box::new(PhaseStrategy::new()),
            StrategyKind::Grid       => Box::new(GridStrategy::new()),
        };
        strategy.configure(config)?;
        Ok(strategy)
    }
}

impl FromStr for StrategyKind {
    type Err = ControlError;

    fn from_str(s: &str) -> ControlResult<StrategyKind> {
        match s.to_ascii_lowercase().as_str() {
            "fifo" | "slot" | "0"                 => Ok(StrategyKind::Fifo),
            "right-of-way" | "row" | "rhp" | "1"  => Ok(StrategyKind::RightOfWay),
            "phase" | "tl" | "2"                  => Ok(StrategyKind::Phase),
            "grid" | "3"                          => Ok(StrategyKind::Grid),
            _ => Err(ControlError::UnknownStrategy(s.to_string())),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
