//! Deterministic point-mass reference engine.
//!
//! Four straight approach arms of `approach_length_m` metres meet at the
//! origin.  Each vehicle is a point mass on a 1-D track: it spawns at the
//! outer end of its route's entry arm (track coordinate `s = 0`), reaches
//! the junction center at `s = approach_length_m`, and departs once it has
//! travelled one approach length beyond the junction.  Per step, a vehicle
//! accelerates toward its target speed within accel/decel limits, keeps a
//! minimum gap to the vehicle ahead on the same approach, and honors
//! commanded stops.
//!
//! This is a collaborator for demos and tests, not a physics model: no
//! vehicle length, no lane changing, no reaction time.

use std::collections::BTreeMap;

use aim_core::{Point2, Tick, VehicleId};
use aim_topology::{Arm, Route};

use crate::{ActuationError, ActuationResult, Location, SimulationEngine, VehicleSnapshot};

// ── Parameters ────────────────────────────────────────────────────────────────

/// Physical constants of the reference network.
///
/// Defaults mirror the network the arbitration core was tuned on: 100 m
/// approaches, a 15 m junction, 13.8 m/s free-flow speed, and the standard
/// passenger-car acceleration envelope.
#[derive(Clone, Debug)]
pub struct EngineParams {
    pub approach_length_m: f64,
    pub junction_half_m:   f64,
    pub speed_limit_mps:   f64,
    pub accel_mps2:        f64,
    pub decel_mps2:        f64,
    pub min_gap_m:         f64,
    pub step_secs:         f64,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            approach_length_m: 100.0,
            junction_half_m:   7.5,
            speed_limit_mps:   13.8,
            accel_mps2:        2.6,
            decel_mps2:        4.5,
            min_gap_m:         3.0,
            step_secs:         0.1,
        }
    }
}

// ── Per-vehicle state ─────────────────────────────────────────────────────────

/// A commanded halt at track coordinate `at_s`.
#[derive(Clone, Debug)]
struct StopOrder {
    at_s: f64,
    /// Step at which the hold expires; `None` = held until `resume`.
    until: Option<Tick>,
}

#[derive(Clone, Debug)]
struct CarState {
    route: Route,
    /// Track coordinate: distance travelled since spawn, metres.
    s: f64,
    speed: f64,
    /// Commanded target speed; `None` = drive at the speed limit.
    commanded: Option<f64>,
    stop: Option<StopOrder>,
    /// Engine-side collision-avoidance braking for the junction.
    auto_brake: bool,
}

// ── Engine ────────────────────────────────────────────────────────────────────

/// The reference [`SimulationEngine`] implementation.
pub struct KinematicEngine {
    pub params: EngineParams,
    now: Tick,
    cars: BTreeMap<VehicleId, CarState>,
    arrived_this_step: Vec<VehicleId>,
    departed_this_step: Vec<VehicleId>,
}

impl KinematicEngine {
    pub fn new(params: EngineParams) -> Self {
        Self {
            params,
            now: Tick::ZERO,
            cars: BTreeMap::new(),
            arrived_this_step: Vec::new(),
            departed_this_step: Vec::new(),
        }
    }

    /// Number of vehicles currently in the network.
    pub fn vehicle_count(&self) -> usize {
        self.cars.len()
    }

    /// Place a vehicle mid-approach — test scenario setup.
    ///
    /// `dist_to_center_m` is measured to the junction center, like every
    /// distance the strategies compute.  The vehicle appears in this step's
    /// arrival list exactly as a spawned one would.
    pub fn insert(
        &mut self,
        vehicle: VehicleId,
        route: Route,
        dist_to_center_m: f64,
        speed: f64,
    ) -> ActuationResult<()> {
        if self.cars.contains_key(&vehicle) {
            return Err(ActuationError::AlreadyPresent(vehicle));
        }
        self.cars.insert(
            vehicle,
            CarState {
                route,
                s: self.params.approach_length_m - dist_to_center_m,
                speed,
                commanded: None,
                stop: None,
                auto_brake: true,
            },
        );
        self.arrived_this_step.push(vehicle);
        Ok(())
    }

    fn location_of(&self, car: &CarState) -> Location {
        let boundary = self.params.approach_length_m;
        let half = self.params.junction_half_m;
        // The entry boundary itself is still inbound: vehicles commanded to
        // stop exactly there must not count as inside the junction.
        if car.s <= boundary - half {
            Location::Inbound(car.route.entry())
        } else if car.s <= boundary + half {
            Location::Junction
        } else {
            Location::Outbound(car.route.exit())
        }
    }

    fn position_of(&self, car: &CarState) -> Point2 {
        let center = self.params.approach_length_m;
        if car.s <= center {
            let (dx, dy) = dir_from_center(car.route.entry());
            let r = center - car.s;
            Point2::new(dx * r, dy * r)
        } else {
            let (dx, dy) = dir_from_center(car.route.exit());
            let r = car.s - center;
            Point2::new(dx * r, dy * r)
        }
    }

    fn car(&self, vehicle: VehicleId) -> ActuationResult<&CarState> {
        self.cars
            .get(&vehicle)
            .ok_or(ActuationError::UnknownVehicle(vehicle))
    }

    fn car_mut(&mut self, vehicle: VehicleId) -> ActuationResult<&mut CarState> {
        self.cars
            .get_mut(&vehicle)
            .ok_or(ActuationError::UnknownVehicle(vehicle))
    }
}

/// Unit vector pointing from the junction center toward an arm's outer end.
fn dir_from_center(arm: Arm) -> (f64, f64) {
    match arm {
        Arm::Down  => (0.0, -1.0),
        Arm::Right => (1.0, 0.0),
        Arm::Up    => (0.0, 1.0),
        Arm::Left  => (-1.0, 0.0),
    }
}

/// Max speed that still allows stopping within `remaining` metres at `decel`.
#[inline]
fn stoppable_speed(remaining: f64, decel: f64) -> f64 {
    if remaining <= 0.0 {
        0.0
    } else {
        (2.0 * decel * remaining).sqrt()
    }
}

impl SimulationEngine for KinematicEngine {
    fn step(&mut self) {
        let p = self.params.clone();
        let dt = p.step_secs;
        self.now = self.now + 1;
        self.arrived_this_step.clear();
        self.departed_this_step.clear();

        // Expire timed holds.
        for car in self.cars.values_mut() {
            if let Some(stop) = &car.stop {
                if stop.until.is_some_and(|t| t <= self.now) {
                    car.stop = None;
                }
            }
        }

        let junction_occupied = self
            .cars
            .values()
            .any(|c| self.location_of(c) == Location::Junction);

        // Per approach, outermost leader first so followers see their
        // leader's already-updated position.
        let mut by_arm: [Vec<VehicleId>; 4] = Default::default();
        for (&id, car) in &self.cars {
            by_arm[car.route.entry().index()].push(id);
        }
        for ids in &mut by_arm {
            ids.sort_by(|a, b| {
                let sa = self.cars[a].s;
                let sb = self.cars[b].s;
                sb.partial_cmp(&sa).unwrap_or(std::cmp::Ordering::Equal)
            });
        }

        let mut departed = Vec::new();
        for ids in &by_arm {
            // (new s, new speed) of the vehicle ahead on this approach.
            let mut leader: Option<(f64, f64)> = None;
            for &id in ids {
                let Some(location) = self.cars.get(&id).map(|c| self.location_of(c)) else {
                    continue;
                };
                let Some(car) = self.cars.get_mut(&id) else {
                    continue;
                };

                let mut target = car.commanded.unwrap_or(p.speed_limit_mps);
                if let Some(stop) = &car.stop {
                    target = target.min(stoppable_speed(stop.at_s - car.s, p.decel_mps2));
                }
                if car.auto_brake
                    && junction_occupied
                    && matches!(location, Location::Inbound(_))
                {
                    let rem = (p.approach_length_m - p.junction_half_m) - car.s;
                    if rem > 0.0 {
                        target = target.min(stoppable_speed(rem, p.decel_mps2));
                    }
                }

                // Move speed toward target within the acceleration envelope.
                car.speed = if target > car.speed {
                    (car.speed + p.accel_mps2 * dt).min(target)
                } else {
                    (car.speed - p.decel_mps2 * dt).max(target.max(0.0))
                };
                let mut new_s = car.s + car.speed * dt;

                if let Some(stop) = &car.stop {
                    if new_s >= stop.at_s {
                        new_s = stop.at_s;
                        car.speed = 0.0;
                    }
                }
                // Gap keeping: never pass (leader - min_gap); only binds
                // while the leader is still on the shared approach track.
                if let Some((leader_s, leader_speed)) = leader {
                    if leader_s <= p.approach_length_m + p.junction_half_m {
                        let cap = leader_s - p.min_gap_m;
                        if new_s > cap {
                            new_s = cap.max(car.s);
                            car.speed = car.speed.min(leader_speed);
                        }
                    }
                }

                car.s = new_s;
                leader = Some((car.s, car.speed));

                if car.s >= 2.0 * p.approach_length_m {
                    departed.push(id);
                }
            }
        }

        for id in departed {
            self.cars.remove(&id);
            self.departed_this_step.push(id);
        }
    }

    fn arrived(&self) -> &[VehicleId] {
        &self.arrived_this_step
    }

    fn departed(&self) -> &[VehicleId] {
        &self.departed_this_step
    }

    fn snapshot(&self, vehicle: VehicleId) -> Option<VehicleSnapshot> {
        let car = self.cars.get(&vehicle)?;
        Some(VehicleSnapshot {
            position: self.position_of(car),
            speed:    car.speed,
            decel:    self.params.decel_mps2,
            location: self.location_of(car),
            route:    car.route,
        })
    }

    fn speed_limit(&self, _location: Location) -> f64 {
        self.params.speed_limit_mps
    }

    fn spawn(&mut self, vehicle: VehicleId, route: Route, depart_speed: f64)
        -> ActuationResult<()>
    {
        if self.cars.contains_key(&vehicle) {
            return Err(ActuationError::AlreadyPresent(vehicle));
        }
        self.cars.insert(
            vehicle,
            CarState {
                route,
                s: 0.0,
                speed: depart_speed,
                commanded: None,
                stop: None,
                auto_brake: true,
            },
        );
        self.arrived_this_step.push(vehicle);
        Ok(())
    }

    fn set_speed(&mut self, vehicle: VehicleId, speed: f64) -> ActuationResult<()> {
        self.car_mut(vehicle)?.commanded = Some(speed.max(0.0));
        Ok(())
    }

    fn stop_at(
        &mut self,
        vehicle:        VehicleId,
        arm:            Arm,
        offset_m:       f64,
        duration_ticks: Option<u64>,
    ) -> ActuationResult<()> {
        let now = self.now;
        let decel = self.params.decel_mps2;
        let position = self.car(vehicle).map(|c| self.position_of(c))?;
        let car = self.car(vehicle)?;

        let cannot_stop = ActuationError::CannotStop { vehicle, arm, position };
        if car.route.entry() != arm || !matches!(self.location_of(car), Location::Inbound(_)) {
            return Err(cannot_stop);
        }
        let remaining = offset_m - car.s;
        if remaining < 0.0 || car.speed * car.speed / (2.0 * decel) > remaining {
            return Err(cannot_stop);
        }

        self.car_mut(vehicle)?.stop = Some(StopOrder {
            at_s:  offset_m,
            until: duration_ticks.map(|d| now + d),
        });
        Ok(())
    }

    fn resume(&mut self, vehicle: VehicleId) -> ActuationResult<()> {
        let car = self.car_mut(vehicle)?;
        car.commanded = None;
        car.stop = None;
        Ok(())
    }

    fn set_auto_braking(&mut self, vehicle: VehicleId, enabled: bool) -> ActuationResult<()> {
        self.car_mut(vehicle)?.auto_brake = enabled;
        Ok(())
    }
}
