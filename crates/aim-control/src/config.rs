//! Strategy tuning parameters.

use crate::{ControlError, ControlResult};

/// Tuning knobs shared by the four arbitration strategies.
///
/// One struct rather than four: most fields describe the network geometry
/// (approach length, junction extent) and the tick/second mapping, which
/// every strategy needs, and a run only ever instantiates one strategy.
/// Defaults reproduce the network the strategies were tuned on: 100 m
/// approaches, a 15 m junction, 0.1 s steps.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ControlConfig {
    /// Simulated seconds per tick.  Must match the engine's step length.
    pub step_secs: f64,

    // ── Geometry ─────────────────────────────────────────────────────────
    /// Length of each approach arm, metres.
    pub approach_length_m: f64,
    /// Half-extent of the junction's critical region, metres.
    pub junction_half_m: f64,

    // ── Slot reservation (fifo) ──────────────────────────────────────────
    /// Reservation granularity: estimated entry times are rounded to the
    /// nearest multiple of this many ticks.
    pub slot_ticks: u64,
    /// Ticks a vehicle is assumed to occupy the junction while crossing.
    pub crossing_ticks: u64,
    /// Margin (m/s) subtracted from the commanded approach speed so a
    /// rebooked vehicle arrives no earlier than its slot.
    pub decel_headroom_mps: f64,

    // ── Grid reservation ─────────────────────────────────────────────────
    /// Length of the space-time occupancy grid, ticks.
    pub horizon_ticks: u64,
    /// Vehicles whose estimated entry lies beyond this many ticks are not
    /// scheduled yet.
    pub schedule_range_ticks: u64,

    // ── Right-of-way ─────────────────────────────────────────────────────
    /// Vehicles closer than this to the junction center enter the watch
    /// queue of their arm, metres.
    pub watch_distance_m: f64,
    /// Two vehicles are predicted to collide when their times-to-arrival
    /// differ by less than this, seconds.
    pub ttc_window_secs: f64,
    /// Extra distance beyond the junction boundary a yielding vehicle must
    /// be able to stop within, metres.
    pub stop_margin_m: f64,

    // ── Phase control ────────────────────────────────────────────────────
    /// Length of one phase, seconds.
    pub period_secs: f64,
    /// Distance from the approach's outer end at which held vehicles stop,
    /// expressed as a setback from the junction: stop offset is
    /// `approach_length_m - hold_offset_m`.
    pub hold_offset_m: f64,
    /// Vehicles closer to the junction than this are not asked to stop at
    /// a phase switch, metres.
    pub min_hold_distance_m: f64,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            step_secs:            0.1,
            approach_length_m:    100.0,
            junction_half_m:      7.5,
            slot_ticks:           10,
            crossing_ticks:       20,
            decel_headroom_mps:   1.0,
            horizon_ticks:        1_200,
            schedule_range_ticks: 1_000,
            watch_distance_m:     50.0,
            ttc_window_secs:      2.0,
            stop_margin_m:        17.5,
            period_secs:          60.0,
            hold_offset_m:        10.0,
            min_hold_distance_m:  30.0,
        }
    }
}

impl ControlConfig {
    /// Ticks per phase, rounded to the nearest whole tick.
    #[inline]
    pub fn period_ticks(&self) -> u64 {
        (self.period_secs / self.step_secs).round().max(1.0) as u64
    }

    /// Stop offset (from the approach's outer end) at the junction boundary.
    #[inline]
    pub fn boundary_offset_m(&self) -> f64 {
        self.approach_length_m - self.junction_half_m
    }

    /// Stop offset (from the approach's outer end) for phase holds.
    #[inline]
    pub fn hold_position_m(&self) -> f64 {
        self.approach_length_m - self.hold_offset_m
    }

    pub fn validate(&self) -> ControlResult<()> {
        let bad = |msg: String| Err(ControlError::Config(msg));
        if !(self.step_secs > 0.0) {
            return bad(format!("step_secs must be positive, got {}", self.step_secs));
        }
        if self.slot_ticks == 0 {
            return bad("slot_ticks must be > 0".into());
        }
        if self.crossing_ticks == 0 {
            return bad("crossing_ticks must be > 0".into());
        }
        if self.schedule_range_ticks + self.crossing_ticks > self.horizon_ticks {
            return bad(format!(
                "horizon_ticks ({}) must cover schedule_range_ticks + crossing_ticks ({})",
                self.horizon_ticks,
                self.schedule_range_ticks + self.crossing_ticks
            ));
        }
        if !(self.approach_length_m > 0.0) || !(self.junction_half_m > 0.0) {
            return bad("approach_length_m and junction_half_m must be positive".into());
        }
        if self.junction_half_m >= self.approach_length_m {
            return bad(format!(
                "junction_half_m ({}) must be smaller than approach_length_m ({})",
                self.junction_half_m, self.approach_length_m
            ));
        }
        if !(self.watch_distance_m > 0.0) {
            return bad("watch_distance_m must be positive".into());
        }
        if !(self.ttc_window_secs >= 0.0) {
            return bad("ttc_window_secs must be non-negative".into());
        }
        if !(self.stop_margin_m >= 0.0) || !(self.decel_headroom_mps >= 0.0) {
            return bad("stop_margin_m and decel_headroom_mps must be non-negative".into());
        }
        if !(self.period_secs > 0.0) {
            return bad(format!("period_secs must be positive, got {}", self.period_secs));
        }
        if !(0.0..self.approach_length_m).contains(&self.hold_offset_m) {
            return bad(format!(
                "hold_offset_m ({}) must lie within the approach ({})",
                self.hold_offset_m, self.approach_length_m
            ));
        }
        if !(self.min_hold_distance_m >= 0.0) {
            return bad("min_hold_distance_m must be non-negative".into());
        }
        Ok(())
    }
}
