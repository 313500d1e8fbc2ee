//! Space-time grid reservation.
//!
//! Finer-grained than slot booking: the junction interior is the 2×2 cell
//! grid from [`aim_topology::ConflictMask`], and reservations claim only
//! the cells a route actually touches, for only the ticks of its crossing.
//! Movements with disjoint masks (the two opposite through-movements, or a
//! pair of non-conflicting right turns) cross concurrently.
//!
//! Bookings on the same approach are additionally serialized by a per-arm
//! release time, so a vehicle can never be scheduled to enter before the
//! one ahead of it on the same lane has cleared.

use aim_core::{Tick, VehicleId};
use aim_engine::{Location, SimulationEngine};
use aim_topology::{ConflictMask, Route};
use rustc_hash::FxHashMap;

use crate::strategy::{eta_secs, CRAWL_SPEED_MPS};
use crate::{ControlConfig, ControlResult, ControlStrategy, VehicleTracker};

// ── OccupancyGrid ─────────────────────────────────────────────────────────────

/// A rolling window of per-cell occupancy counts, one slice per future tick.
///
/// Offset 0 is the current tick; `advance` retires it and opens a fresh
/// empty slice at the far end of the horizon.  Counts (rather than booleans)
/// let tests assert the never-above-one invariant directly.
pub struct OccupancyGrid {
    slices: Vec<[u8; ConflictMask::CELLS]>,
    head: usize,
}

impl OccupancyGrid {
    pub fn new(horizon_ticks: u64) -> Self {
        Self {
            slices: vec![[0; ConflictMask::CELLS]; horizon_ticks.max(1) as usize],
            head: 0,
        }
    }

    pub fn horizon(&self) -> usize {
        self.slices.len()
    }

    /// Retire the current tick's slice and extend the horizon by one tick.
    pub fn advance(&mut self) {
        self.slices[self.head] = [0; ConflictMask::CELLS];
        self.head = (self.head + 1) % self.slices.len();
    }

    #[inline]
    fn slice(&self, offset: usize) -> &[u8; ConflictMask::CELLS] {
        &self.slices[(self.head + offset) % self.slices.len()]
    }

    /// Are all of `mask`'s cells free over `[from, to)` ticks from now?
    ///
    /// Windows reaching past the horizon never fit.
    pub fn fits(&self, mask: ConflictMask, from: usize, to: usize) -> bool {
        if to > self.horizon() {
            return false;
        }
        (from..to).all(|t| mask.cells().all(|c| self.slice(t)[c] == 0))
    }

    /// Claim `mask`'s cells over `[from, to)` ticks from now.
    pub fn book(&mut self, mask: ConflictMask, from: usize, to: usize) {
        let len = self.slices.len();
        for t in from..to.min(len) {
            let slice = &mut self.slices[(self.head + t) % len];
            for c in mask.cells() {
                slice[c] = slice[c].saturating_add(1);
            }
        }
    }

    /// Occupancy count of one cell at `offset` ticks from now.
    pub fn occupancy(&self, offset: usize, cell: usize) -> u8 {
        self.slice(offset)[cell]
    }

    /// The largest count anywhere in the window.  1 when bookings are sound.
    pub fn max_occupancy(&self) -> u8 {
        self.slices
            .iter()
            .flat_map(|s| s.iter().copied())
            .max()
            .unwrap_or(0)
    }
}

// ── GridStrategy ──────────────────────────────────────────────────────────────

struct Booking {
    entry: Tick,
    exit:  Tick,
}

pub struct GridStrategy {
    cfg: ControlConfig,
    tracker: VehicleTracker,
    grid: OccupancyGrid,
    bookings: FxHashMap<VehicleId, Booking>,
    /// Per arm, the exit tick of the latest booking from that approach.
    /// Enforces in-lane ordering: no later arrival may be scheduled to
    /// enter before this.
    lane_release: [Tick; 4],
}

impl GridStrategy {
    pub fn new() -> Self {
        let cfg = ControlConfig::default();
        Self {
            grid: OccupancyGrid::new(cfg.horizon_ticks),
            tracker: VehicleTracker::new(),
            bookings: FxHashMap::default(),
            lane_release: [Tick::ZERO; 4],
            cfg,
        }
    }

    /// Read access to the occupancy window, for diagnostics.
    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    /// Average speed that covers `dist` metres in `offset` ticks, less the
    /// headroom, floored to a crawl.
    fn pace_speed(&self, dist: f64, offset: u64) -> f64 {
        let secs = offset as f64 * self.cfg.step_secs;
        (dist / secs - self.cfg.decel_headroom_mps).max(CRAWL_SPEED_MPS)
    }

    /// Earliest offset `>= from` at which `route`'s crossing fits, if any.
    fn find_window(&self, route: Route, from: usize) -> Option<usize> {
        let crossing = self.cfg.crossing_ticks as usize;
        let last_start = self.grid.horizon().checked_sub(crossing)?;
        (from..=last_start).find(|&off| self.grid.fits(route.mask(), off, off + crossing))
    }

    fn schedule(&mut self, id: VehicleId, now: Tick, engine: &mut dyn SimulationEngine) {
        let Some(snap) = engine.snapshot(id) else {
            return;
        };
        let arm = match snap.location {
            Location::Inbound(arm) => arm,
            // Past the boundary: nothing left to schedule, keep it moving
            // at the lane limit so it clears its booked window.
            Location::Junction | Location::Outbound(_) => {
                let limit = engine.speed_limit(snap.location);
                if let Err(e) = engine.set_speed(id, limit) {
                    log::warn!("could not release vehicle {id} through the junction: {e}");
                }
                return;
            }
        };

        // Distance to the junction boundary, where the crossing begins.
        let dist = (snap.distance_to_junction() - self.cfg.junction_half_m).max(0.0);
        let eta_ticks = (eta_secs(dist, snap.speed) / self.cfg.step_secs).round() as u64;
        if eta_ticks >= self.cfg.schedule_range_ticks {
            // Too far out for a stable estimate; look again next step.
            return;
        }

        let natural = eta_ticks as usize;
        let lane_floor = self.lane_release[arm.index()].since(now) as usize;
        let crossing = self.cfg.crossing_ticks as usize;

        let chosen = if natural >= lane_floor
            && self.grid.fits(snap.route.mask(), natural, natural + crossing)
        {
            Some(natural)
        } else {
            self.find_window(snap.route, natural.max(lane_floor))
        };
        let Some(offset) = chosen else {
            log::warn!(
                "{now} no window for vehicle {id} (route {}) within the horizon; retrying",
                snap.route
            );
            return;
        };

        self.grid.book(snap.route.mask(), offset, offset + crossing);
        let entry = now + offset as u64;
        let exit = entry + crossing as u64;
        self.bookings.insert(id, Booking { entry, exit });
        self.lane_release[arm.index()] = exit;

        // Pace the approach so the vehicle reaches the boundary at its
        // booked entry tick.
        let speed = if offset == 0 {
            engine.speed_limit(snap.location)
        } else {
            self.pace_speed(dist, offset as u64)
        };
        if let Err(e) = engine.set_speed(id, speed) {
            log::warn!("could not pace vehicle {id} to its window: {e}");
        }
        log::debug!("{now} vehicle {id} booked junction window [{entry}, {exit})");
    }
}

impl Default for GridStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlStrategy for GridStrategy {
    fn name(&self) -> &'static str {
        "grid"
    }

    fn configure(&mut self, config: &ControlConfig) -> ControlResult<()> {
        config.validate()?;
        self.cfg = config.clone();
        self.tracker = VehicleTracker::new();
        self.grid = OccupancyGrid::new(self.cfg.horizon_ticks);
        self.bookings.clear();
        self.lane_release = [Tick::ZERO; 4];
        Ok(())
    }

    fn on_arrivals(&mut self, arrivals: &[VehicleId], engine: &mut dyn SimulationEngine) {
        self.tracker.on_arrivals(arrivals, engine);
    }

    fn on_departures(&mut self, departures: &[VehicleId]) {
        for id in self.tracker.on_departures(departures) {
            if let Some(booking) = self.bookings.remove(&id) {
                log::trace!("vehicle {id} departed; its window closed at {}", booking.exit);
            }
        }
    }

    fn on_step(&mut self, now: Tick, engine: &mut dyn SimulationEngine) -> ControlResult<()> {
        self.grid.advance();
        for id in self.tracker.ids() {
            if let Some(booking) = self.bookings.get(&id) {
                if let Some(snap) = engine.snapshot(id) {
                    let speed = if matches!(snap.location, Location::Inbound(_)) {
                        // Re-pace toward the booked entry every step so a
                        // drifting estimate self-corrects.  Past the entry
                        // tick, run at the limit to clear the approach.
                        match booking.entry.since(now) {
                            0 => {
                                if now > booking.entry {
                                    log::debug!(
                                        "{now} vehicle {id} is late for its window at {}",
                                        booking.entry
                                    );
                                }
                                engine.speed_limit(snap.location)
                            }
                            offset => {
                                let dist = (snap.distance_to_junction()
                                    - self.cfg.junction_half_m)
                                    .max(0.0);
                                self.pace_speed(dist, offset)
                            }
                        }
                    } else {
                        engine.speed_limit(snap.location)
                    };
                    if let Err(e) = engine.set_speed(id, speed) {
                        log::warn!("could not pace vehicle {id} through its window: {e}");
                    }
                }
                continue;
            }
            self.schedule(id, now, engine);
        }
        Ok(())
    }
}
