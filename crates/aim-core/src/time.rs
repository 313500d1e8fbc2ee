//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing `Tick` counter; one tick is one
//! simulation step.  The mapping to simulated seconds is held in
//! `StepClock`:
//!
//!   sim_seconds = tick * step_secs
//!
//! Using an integer tick as the canonical time unit means all reservation
//! arithmetic is exact (no floating-point drift) and slot comparisons are
//! O(1).  The default step length is 0.1 s, so the default crossing time of
//! 20 ticks is 2 simulated seconds.

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation step counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// Ticks elapsed from `earlier` to `self`, saturating at zero.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

/// Round `tick` to the nearest multiple of `granularity` (half rounds up).
///
/// Slot-based reservation quantizes estimated entry/exit times with this so
/// that nearby estimates land on the same discrete slot.
#[inline]
pub fn quantize(tick: Tick, granularity: u64) -> Tick {
    debug_assert!(granularity > 0);
    Tick((tick.0 + granularity / 2) / granularity * granularity)
}

// ── StepClock ─────────────────────────────────────────────────────────────────

/// Converts between step counts and simulated seconds.
///
/// `StepClock` is cheap to copy and intentionally holds no heap data.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepClock {
    /// How many simulated seconds one step represents.  Default: 0.1.
    pub step_secs: f64,
    /// The current step — advanced by `StepClock::advance()` each iteration.
    pub current: Tick,
}

impl StepClock {
    pub fn new(step_secs: f64) -> Self {
        Self {
            step_secs,
            current: Tick::ZERO,
        }
    }

    /// Advance the clock by one step.
    #[inline]
    pub fn advance(&mut self) {
        self.current = Tick(self.current.0 + 1);
    }

    /// Elapsed simulated seconds since tick 0.
    #[inline]
    pub fn elapsed_secs(&self) -> f64 {
        self.current.0 as f64 * self.step_secs
    }

    /// How many whole ticks span `secs` simulated seconds? (rounds to nearest)
    #[inline]
    pub fn ticks_for_secs(&self, secs: f64) -> u64 {
        (secs / self.step_secs).round().max(0.0) as u64
    }

    /// Simulated seconds spanned by `ticks` steps.
    #[inline]
    pub fn secs_for_ticks(&self, ticks: u64) -> f64 {
        ticks as f64 * self.step_secs
    }
}

impl fmt::Display for StepClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.1}s)", self.current, self.elapsed_secs())
    }
}

// ── RunConfig ─────────────────────────────────────────────────────────────────

/// Top-level run configuration.
///
/// Owned by the driving loop; strategy-specific parameters live in the
/// control crate's own config.  Validation failures are fatal and must be
/// reported before the run starts.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunConfig {
    /// Total steps to simulate.
    pub total_steps: u64,

    /// Simulated seconds per step.  Default: 0.1.
    pub step_secs: f64,

    /// Master RNG seed.  The same seed always produces identical runs.
    pub seed: u64,

    /// Per-step probability that the arrival source spawns a vehicle.
    pub spawn_probability: f64,

    /// Speed (m/s) newly spawned vehicles enter the network with.
    pub depart_speed_mps: f64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            total_steps:       3_000,
            step_secs:         0.1,
            seed:              42,
            spawn_probability: 0.026,
            depart_speed_mps:  13.8,
        }
    }
}

impl RunConfig {
    /// The tick at which the run ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_steps)
    }

    /// Construct a `StepClock` pre-configured for this run.
    pub fn make_clock(&self) -> StepClock {
        StepClock::new(self.step_secs)
    }

    /// Reject configurations that cannot produce a meaningful run.
    pub fn validate(&self) -> crate::CoreResult<()> {
        if self.total_steps == 0 {
            return Err(crate::CoreError::Config("total_steps must be > 0".into()));
        }
        if !(self.step_secs > 0.0) {
            return Err(crate::CoreError::Config(format!(
                "step_secs must be positive, got {}",
                self.step_secs
            )));
        }
        if !(0.0..=1.0).contains(&self.spawn_probability) {
            return Err(crate::CoreError::Config(format!(
                "spawn_probability must be in [0, 1], got {}",
                self.spawn_probability
            )));
        }
        if !(self.depart_speed_mps >= 0.0) {
            return Err(crate::CoreError::Config(format!(
                "depart_speed_mps must be non-negative, got {}",
                self.depart_speed_mps
            )));
        }
        Ok(())
    }
}
