//! Fixed-period phase control.
//!
//! The two movement groups alternate privileged access on a fixed period,
//! like a pre-timed signal with no detection.  At each switch the closest
//! vehicle on each newly de-privileged approach is stopped short of the
//! junction for one full period; vehicles arriving on a de-privileged
//! approach later in the phase are held until the next switch.  Privileged
//! vehicles are never touched.

use aim_core::{Tick, VehicleId};
use aim_engine::{Location, SimulationEngine};
use aim_topology::{Arm, MovementGroup};

use crate::{ControlConfig, ControlResult, ControlStrategy, VehicleTracker};

pub struct PhaseStrategy {
    cfg: ControlConfig,
    tracker: VehicleTracker,
    privileged: MovementGroup,
    /// Steps remaining until the next switch.
    ticks_until_switch: u64,
    /// De-privileged arms whose lead vehicle is already held.  Cleared on
    /// every switch.
    blocked: Vec<Arm>,
}

impl PhaseStrategy {
    pub fn new() -> Self {
        let cfg = ControlConfig::default();
        Self {
            // The first switch (at tick 0) flips this to Horizontal.
            privileged: MovementGroup::Vertical,
            ticks_until_switch: cfg.period_ticks(),
            tracker: VehicleTracker::new(),
            blocked: Vec::new(),
            cfg,
        }
    }

    fn hold(
        &mut self,
        id: VehicleId,
        arm: Arm,
        duration_ticks: u64,
        engine: &mut dyn SimulationEngine,
    ) {
        let position = self.cfg.hold_position_m();
        match engine.stop_at(id, arm, position, Some(duration_ticks)) {
            Ok(()) => {
                if !self.blocked.contains(&arm) {
                    self.blocked.push(arm);
                }
                log::debug!("held vehicle {id} on arm {arm} for {duration_ticks} ticks");
            }
            Err(e) => {
                log::warn!("could not hold vehicle {id} at arm {arm} position {position}: {e}")
            }
        }
    }

    /// Swap the privileged group and stop the lead vehicle on each arm that
    /// just lost privilege.
    fn switch(&mut self, engine: &mut dyn SimulationEngine) {
        self.privileged = self.privileged.other();
        self.blocked.clear();
        self.ticks_until_switch = self.cfg.period_ticks();
        log::debug!("phase switch: {} group released", self.privileged);

        // Release everything on the newly privileged approaches, and find
        // the closest inbound vehicle per de-privileged arm, skipping any
        // close enough that stopping them would be unsafe or pointless.
        let mut closest: [Option<(VehicleId, f64)>; 4] = [None; 4];
        for id in self.tracker.ids() {
            let Some(snap) = engine.snapshot(id) else {
                continue;
            };
            let Location::Inbound(arm) = snap.location else {
                continue;
            };
            if arm.group() == self.privileged {
                if let Err(e) = engine.resume(id) {
                    log::warn!("could not release vehicle {id} on arm {arm}: {e}");
                }
                continue;
            }
            let dist = snap.distance_to_junction();
            if dist <= self.cfg.min_hold_distance_m {
                continue;
            }
            let slot = &mut closest[arm.index()];
            if slot.is_none_or(|(_, best)| dist < best) {
                *slot = Some((id, dist));
            }
        }

        let period = self.cfg.period_ticks();
        for arm in self.privileged.other().arms() {
            if let Some((id, _)) = closest[arm.index()] {
                self.hold(id, arm, period, engine);
            }
        }
    }
}

impl Default for PhaseStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlStrategy for PhaseStrategy {
    fn name(&self) -> &'static str {
        "phase"
    }

    fn configure(&mut self, config: &ControlConfig) -> ControlResult<()> {
        config.validate()?;
        self.cfg = config.clone();
        self.tracker = VehicleTracker::new();
        self.privileged = MovementGroup::Vertical;
        self.ticks_until_switch = self.cfg.period_ticks();
        self.blocked.clear();
        Ok(())
    }

    fn on_arrivals(&mut self, arrivals: &[VehicleId], engine: &mut dyn SimulationEngine) {
        self.tracker.on_arrivals(arrivals, engine);
        // New arrivals on a de-privileged approach wait out the remainder
        // of the phase, unless their arm's lead vehicle is already held in
        // front of them.
        for &id in arrivals {
            let Some(snap) = engine.snapshot(id) else {
                continue;
            };
            let Location::Inbound(arm) = snap.location else {
                continue;
            };
            if arm.group() == self.privileged || self.blocked.contains(&arm) {
                continue;
            }
            // The countdown still counts the current step, so the hold
            // expires at the start of the step after the switch, exactly
            // when a vehicle resumed by the switch first moves.
            let remaining = self.ticks_until_switch;
            self.hold(id, arm, remaining, engine);
        }
    }

    fn on_departures(&mut self, departures: &[VehicleId]) {
        self.tracker.on_departures(departures);
    }

    fn on_step(&mut self, now: Tick, engine: &mut dyn SimulationEngine) -> ControlResult<()> {
        if now.0 % self.cfg.period_ticks() == 0 {
            self.switch(engine);
        } else {
            self.ticks_until_switch = self.ticks_until_switch.saturating_sub(1);
        }
        Ok(())
    }
}
