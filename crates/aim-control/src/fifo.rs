//! First-come-first-served slot reservation.
//!
//! The junction is treated as a single shared resource carved into discrete
//! time slots.  Each inbound vehicle estimates its entry time from current
//! distance and speed, quantized to the slot granularity.  If every slot of
//! its crossing window is free it books them and keeps its speed; otherwise
//! it is rebooked after the last reservation on the books and commanded the
//! average speed that gets it there, less a small headroom.  Slots are held
//! until the vehicle leaves the network, or until its estimate has drifted
//! past its whole window, in which case it books afresh.
//!
//! No overtaking within a booking: the rebooking target is always past the
//! latest existing reservation, so grants are served strictly in the order
//! vehicles first asked.

use std::collections::BTreeSet;

use aim_core::{quantize, Tick, VehicleId};
use aim_engine::{Location, SimulationEngine};
use rustc_hash::FxHashMap;

use crate::strategy::{eta_secs, CRAWL_SPEED_MPS};
use crate::{ControlConfig, ControlResult, ControlStrategy, VehicleTracker};

pub struct SlotStrategy {
    cfg: ControlConfig,
    tracker: VehicleTracker,
    /// Every quantized tick currently booked, across all vehicles.
    reserved: BTreeSet<u64>,
    /// Slots held per vehicle, released exactly on departure.
    held: FxHashMap<VehicleId, Vec<u64>>,
}

impl SlotStrategy {
    pub fn new() -> Self {
        Self {
            cfg: ControlConfig::default(),
            tracker: VehicleTracker::new(),
            reserved: BTreeSet::new(),
            held: FxHashMap::default(),
        }
    }

    /// The quantized ticks a crossing starting at `entry` occupies,
    /// inclusive of the exit slot.
    fn crossing_slots(&self, entry: Tick) -> Vec<u64> {
        let first = quantize(entry, self.cfg.slot_ticks).0;
        let last = quantize(entry + self.cfg.crossing_ticks, self.cfg.slot_ticks).0;
        (first..=last).step_by(self.cfg.slot_ticks as usize).collect()
    }

    fn book(&mut self, vehicle: VehicleId, slots: Vec<u64>) {
        for &s in &slots {
            self.reserved.insert(s);
        }
        self.held.insert(vehicle, slots);
    }
}

impl Default for SlotStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlStrategy for SlotStrategy {
    fn name(&self) -> &'static str {
        "fifo"
    }

    fn configure(&mut self, config: &ControlConfig) -> ControlResult<()> {
        config.validate()?;
        self.cfg = config.clone();
        self.tracker = VehicleTracker::new();
        self.reserved.clear();
        self.held.clear();
        Ok(())
    }

    fn on_arrivals(&mut self, arrivals: &[VehicleId], engine: &mut dyn SimulationEngine) {
        self.tracker.on_arrivals(arrivals, engine);
    }

    fn on_departures(&mut self, departures: &[VehicleId]) {
        for id in self.tracker.on_departures(departures) {
            if let Some(slots) = self.held.remove(&id) {
                for s in slots {
                    self.reserved.remove(&s);
                }
            }
        }
    }

    fn on_step(&mut self, now: Tick, engine: &mut dyn SimulationEngine) -> ControlResult<()> {
        for id in self.tracker.ids() {
            let Some(snap) = engine.snapshot(id) else {
                continue;
            };
            if !matches!(snap.location, Location::Inbound(_)) {
                continue;
            }

            let dist = snap.distance_to_junction();
            let eta_ticks =
                (eta_secs(dist, snap.speed) / self.cfg.step_secs).round() as u64;
            let entry = now + eta_ticks;

            if let Some(held) = self.held.get(&id) {
                // A held vehicle is left alone while its estimate still
                // lands inside its window.  Once it has drifted past the
                // last held slot the booking is stale: release it and book
                // again below.
                let first = quantize(entry, self.cfg.slot_ticks).0;
                if held.last().is_none_or(|&last| first <= last) {
                    continue;
                }
                log::debug!("{now} vehicle {id} drifted past its slots; rebooking");
                if let Some(held) = self.held.remove(&id) {
                    for s in held {
                        self.reserved.remove(&s);
                    }
                }
            }

            let slots = self.crossing_slots(entry);
            if slots.iter().all(|s| !self.reserved.contains(s)) {
                // The window is free: lock in the current speed so the
                // estimate stays valid.
                if let Err(e) = engine.set_speed(id, snap.speed.max(CRAWL_SPEED_MPS)) {
                    log::warn!("could not hold speed of vehicle {id}: {e}");
                }
                log::debug!("{now} vehicle {id} booked slots {slots:?}");
                self.book(id, slots);
            } else {
                // Taken: queue behind the last booking on record.
                let Some(&last) = self.reserved.iter().next_back() else {
                    continue;
                };
                let floor = (now.0 / self.cfg.slot_ticks + 1) * self.cfg.slot_ticks;
                let target = (last + self.cfg.slot_ticks).max(floor);

                let secs = (target - now.0) as f64 * self.cfg.step_secs;
                let speed = (dist / secs - self.cfg.decel_headroom_mps).max(CRAWL_SPEED_MPS);
                if let Err(e) = engine.set_speed(id, speed) {
                    log::warn!("could not slow vehicle {id} for rebooking: {e}");
                }

                let slots = self.crossing_slots(Tick(target));
                log::debug!("{now} vehicle {id} rebooked to {target} slots {slots:?}");
                self.book(id, slots);
            }
        }
        Ok(())
    }
}
