//! Decentralized right-of-way arbitration.
//!
//! No reservations: each step, vehicles near the junction are paired
//! against the leading vehicles of the other approaches.  A pair predicted
//! to reach the junction at nearly the same time is arbitrated by static
//! precedence rules (right-hand priority, then movement class); the loser
//! is stopped at the junction boundary.  A stopped vehicle accumulates a
//! wait counter, which breaks mutual-stop deadlocks in favor of whoever
//! has waited longest.

use std::collections::VecDeque;

use aim_core::{Tick, VehicleId};
use aim_engine::{Location, SimulationEngine, VehicleSnapshot};
use aim_topology::{Arm, Turn};
use rustc_hash::FxHashMap;

use crate::strategy::eta_secs;
use crate::{ControlConfig, ControlResult, ControlStrategy, VehicleTracker};

/// Leading vehicles per approach considered as competitors.
const COMPETITORS_PER_ARM: usize = 2;

#[derive(Clone, Copy)]
struct WatchState {
    /// False once this strategy has stopped the vehicle.
    moving: bool,
    /// Steps spent stopped; resets on release.
    wait: u64,
}

pub struct PrecedenceStrategy {
    cfg: ControlConfig,
    tracker: VehicleTracker,
    /// Vehicles within watch distance, per arm, nearest first.
    watch: [VecDeque<VehicleId>; 4],
    state: FxHashMap<VehicleId, WatchState>,
}

impl PrecedenceStrategy {
    pub fn new() -> Self {
        Self {
            cfg: ControlConfig::default(),
            tracker: VehicleTracker::new(),
            watch: Default::default(),
            state: FxHashMap::default(),
        }
    }

    fn unwatch(&mut self, id: VehicleId) {
        for queue in &mut self.watch {
            queue.retain(|&v| v != id);
        }
        self.state.remove(&id);
    }

    /// Sync the watch queues with current vehicle positions.
    ///
    /// A vehicle stays in its queue while it crosses the junction, so the
    /// approaches behind it keep yielding to it; it drops out once it is
    /// outbound.
    fn refresh(&mut self, engine: &dyn SimulationEngine) {
        for id in self.tracker.ids() {
            match engine.snapshot(id).map(|s| (s.location, s.distance_to_junction())) {
                Some((Location::Inbound(arm), dist)) if dist <= self.cfg.watch_distance_m => {
                    if !self.watch[arm.index()].contains(&id) {
                        self.watch[arm.index()].push_back(id);
                        self.state.insert(id, WatchState { moving: true, wait: 0 });
                    }
                }
                Some((Location::Junction, _)) if self.state.contains_key(&id) => {}
                _ => self.unwatch(id),
            }
        }
        for queue in &self.watch {
            for id in queue {
                if let Some(s) = self.state.get_mut(id) {
                    if !s.moving {
                        s.wait += 1;
                    }
                }
            }
        }
    }

    /// Seconds until `snap` reaches the junction boundary.
    fn time_to_arrival(&self, snap: &VehicleSnapshot) -> f64 {
        eta_secs(snap.distance_to_junction() - self.cfg.junction_half_m, snap.speed)
    }

    /// Should `subject` give way to `competitor`?
    fn must_yield_to(
        &self,
        subject: (VehicleId, Arm, &VehicleSnapshot),
        competitor: (VehicleId, Arm, &VehicleSnapshot),
    ) -> bool {
        let (s_id, s_arm, s_snap) = subject;
        let (c_id, c_arm, c_snap) = competitor;

        let s_stopped = self.state.get(&s_id).is_some_and(|s| !s.moving);
        let c_stopped = self.state.get(&c_id).is_some_and(|s| !s.moving);
        if s_stopped && c_stopped {
            // Mutual stop: the one that has waited less keeps waiting.
            let s_wait = self.state.get(&s_id).map_or(0, |s| s.wait);
            let c_wait = self.state.get(&c_id).map_or(0, |s| s.wait);
            return s_wait < c_wait || (s_wait == c_wait && s_arm.index() > c_arm.index());
        }

        // A competitor already inside the junction always has the right,
        // however far apart the arrival estimates are.
        if !matches!(c_snap.location, Location::Inbound(_)) {
            return true;
        }

        let dt = self.time_to_arrival(s_snap) - self.time_to_arrival(c_snap);
        if dt.abs() >= self.cfg.ttc_window_secs {
            return false;
        }

        // Right-hand priority overrides everything else.
        if !self.watch[s_arm.right_neighbor().index()].is_empty() {
            return true;
        }

        let s_class = s_snap.route.turn().class();
        let c_class = c_snap.route.turn().class();
        if s_class != c_class {
            return s_class > c_class;
        }
        // Two crossing movements conflict regardless of timing detail; the
        // farther vehicle gives way.
        s_snap.route.turn() == Turn::Crossing
            && s_snap.distance_to_junction() > c_snap.distance_to_junction()
    }

    fn stop_subject(&mut self, id: VehicleId, arm: Arm, engine: &mut dyn SimulationEngine) {
        let Some(snap) = engine.snapshot(id) else {
            return;
        };
        let room =
            snap.distance_to_junction() - self.cfg.junction_half_m - self.cfg.stop_margin_m;
        if snap.braking_distance() > room {
            log::warn!(
                "vehicle {id} on arm {arm} cannot brake safely ({:.1} m needed, {room:.1} m left); continuing",
                snap.braking_distance()
            );
            return;
        }
        match engine.stop_at(id, arm, self.cfg.boundary_offset_m(), None) {
            Ok(()) => {
                if let Some(s) = self.state.get_mut(&id) {
                    s.moving = false;
                }
            }
            Err(e) => log::warn!("could not stop vehicle {id} on arm {arm}: {e}"),
        }
    }

    fn release_subject(&mut self, id: VehicleId, engine: &mut dyn SimulationEngine) {
        match engine.resume(id) {
            Ok(()) => {
                if let Some(s) = self.state.get_mut(&id) {
                    s.moving = true;
                    s.wait = 0;
                }
            }
            Err(e) => log::warn!("could not release vehicle {id}: {e}"),
        }
    }
}

impl Default for PrecedenceStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlStrategy for PrecedenceStrategy {
    fn name(&self) -> &'static str {
        "right-of-way"
    }

    fn configure(&mut self, config: &ControlConfig) -> ControlResult<()> {
        config.validate()?;
        self.cfg = config.clone();
        self.tracker = VehicleTracker::new();
        self.watch = Default::default();
        self.state.clear();
        Ok(())
    }

    fn on_arrivals(&mut self, arrivals: &[VehicleId], engine: &mut dyn SimulationEngine) {
        self.tracker.on_arrivals(arrivals, engine);
    }

    fn on_departures(&mut self, departures: &[VehicleId]) {
        for id in self.tracker.on_departures(departures) {
            self.unwatch(id);
        }
    }

    fn on_step(&mut self, _now: Tick, engine: &mut dyn SimulationEngine) -> ControlResult<()> {
        self.refresh(engine);

        let mut snaps: FxHashMap<VehicleId, VehicleSnapshot> = FxHashMap::default();
        for queue in &self.watch {
            for &id in queue {
                if let Some(snap) = engine.snapshot(id) {
                    snaps.insert(id, snap);
                }
            }
        }

        // Decide every subject against the leaders of the other arms, then
        // actuate, so late decisions do not see earlier actuations.
        let mut verdicts: Vec<(VehicleId, Arm, bool)> = Vec::new();
        for s_arm in Arm::ALL {
            for &s_id in &self.watch[s_arm.index()] {
                let Some(s_snap) = snaps.get(&s_id) else {
                    continue;
                };
                // Vehicles already crossing are past arbitration; they only
                // count as competitors.
                if !matches!(s_snap.location, Location::Inbound(_)) {
                    continue;
                }
                let mut must_yield = false;
                for c_arm in Arm::ALL {
                    if c_arm == s_arm {
                        continue;
                    }
                    for &c_id in self.watch[c_arm.index()].iter().take(COMPETITORS_PER_ARM) {
                        let Some(c_snap) = snaps.get(&c_id) else {
                            continue;
                        };
                        if self.must_yield_to((s_id, s_arm, s_snap), (c_id, c_arm, c_snap)) {
                            must_yield = true;
                        }
                    }
                }
                verdicts.push((s_id, s_arm, must_yield));
            }
        }

        for (id, arm, must_yield) in verdicts {
            let moving = self.state.get(&id).is_none_or(|s| s.moving);
            if must_yield && moving {
                self.stop_subject(id, arm, engine);
            } else if !must_yield && !moving {
                self.release_subject(id, engine);
            }
        }
        Ok(())
    }
}
