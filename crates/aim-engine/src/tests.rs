//! Tests for the kinematic reference engine.

use aim_core::VehicleId;
use aim_topology::{Arm, Route};

use crate::{ActuationError, EngineParams, KinematicEngine, Location, SimulationEngine};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn engine() -> KinematicEngine {
    KinematicEngine::new(EngineParams::default())
}

fn route(code: &str) -> Route {
    code.parse().unwrap()
}

fn step_n(engine: &mut KinematicEngine, n: usize) {
    for _ in 0..n {
        engine.step();
    }
}

#[cfg(test)]
mod lifecycle {
    use super::*;

    #[test]
    fn spawn_appears_in_arrivals_and_inbound() {
        let mut eng = engine();
        eng.spawn(VehicleId(0), route("du"), 13.8).unwrap();
        assert_eq!(eng.arrived(), &[VehicleId(0)]);

        let snap = eng.snapshot(VehicleId(0)).unwrap();
        assert_eq!(snap.location, Location::Inbound(Arm::Down));
        assert!((snap.distance_to_junction() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn duplicate_spawn_is_rejected() {
        let mut eng = engine();
        eng.spawn(VehicleId(0), route("du"), 13.8).unwrap();
        assert!(matches!(
            eng.spawn(VehicleId(0), route("lr"), 13.8),
            Err(ActuationError::AlreadyPresent(_))
        ));
    }

    #[test]
    fn vehicle_crosses_and_departs() {
        let mut eng = engine();
        eng.spawn(VehicleId(0), route("du"), 13.8).unwrap();

        let mut saw_junction = false;
        let mut saw_outbound = false;
        let mut departed_at = None;
        for step in 0..400 {
            eng.step();
            match eng.snapshot(VehicleId(0)).map(|s| s.location) {
                Some(Location::Junction) => saw_junction = true,
                Some(Location::Outbound(arm)) => {
                    assert_eq!(arm, Arm::Up);
                    saw_outbound = true;
                }
                _ => {}
            }
            if eng.departed().contains(&VehicleId(0)) {
                departed_at = Some(step);
                break;
            }
        }
        assert!(saw_junction && saw_outbound);
        assert!(departed_at.is_some(), "vehicle never departed");
        assert_eq!(eng.vehicle_count(), 0);
        assert!(eng.snapshot(VehicleId(0)).is_none());
    }

    #[test]
    fn insert_places_at_requested_distance() {
        let mut eng = engine();
        eng.insert(VehicleId(3), route("rl"), 40.0, 5.0).unwrap();
        let snap = eng.snapshot(VehicleId(3)).unwrap();
        assert!((snap.distance_to_junction() - 40.0).abs() < 1e-9);
        assert_eq!(snap.speed, 5.0);
        assert_eq!(eng.arrived(), &[VehicleId(3)]);
    }

    #[test]
    fn commands_on_unknown_vehicle_fail() {
        let mut eng = engine();
        assert!(matches!(
            eng.set_speed(VehicleId(9), 5.0),
            Err(ActuationError::UnknownVehicle(_))
        ));
        assert!(matches!(
            eng.resume(VehicleId(9)),
            Err(ActuationError::UnknownVehicle(_))
        ));
    }
}

#[cfg(test)]
mod actuation {
    use super::*;

    #[test]
    fn set_speed_converges_to_target() {
        let mut eng = engine();
        eng.insert(VehicleId(0), route("du"), 90.0, 13.8).unwrap();
        eng.set_speed(VehicleId(0), 5.0).unwrap();
        step_n(&mut eng, 30); // 3 s is ample to shed 8.8 m/s at 4.5 m/s²
        let snap = eng.snapshot(VehicleId(0)).unwrap();
        assert!((snap.speed - 5.0).abs() < 1e-6, "speed {}", snap.speed);
    }

    #[test]
    fn stop_at_halts_before_the_point() {
        let mut eng = engine();
        eng.insert(VehicleId(0), route("du"), 50.0, 10.0).unwrap();
        eng.stop_at(VehicleId(0), Arm::Down, 92.5, None).unwrap();
        step_n(&mut eng, 200);
        let snap = eng.snapshot(VehicleId(0)).unwrap();
        assert_eq!(snap.speed, 0.0);
        // Stopped at the junction boundary: 7.5 m from the center.
        assert!(snap.distance_to_junction() >= 7.5 - 1e-6);
        assert_eq!(snap.location, Location::Inbound(Arm::Down));
    }

    #[test]
    fn timed_stop_expires_and_vehicle_moves_on() {
        let mut eng = engine();
        eng.insert(VehicleId(0), route("du"), 50.0, 10.0).unwrap();
        eng.stop_at(VehicleId(0), Arm::Down, 92.5, Some(100)).unwrap();
        step_n(&mut eng, 99); // hold expires at step 100
        assert_eq!(eng.snapshot(VehicleId(0)).unwrap().speed, 0.0);
        // Hold expired: the vehicle accelerates back to the limit and leaves.
        let mut departed = false;
        for _ in 0..400 {
            eng.step();
            if eng.departed().contains(&VehicleId(0)) {
                departed = true;
                break;
            }
        }
        assert!(departed);
    }

    #[test]
    fn resume_clears_an_indefinite_stop() {
        let mut eng = engine();
        eng.insert(VehicleId(0), route("du"), 50.0, 10.0).unwrap();
        eng.stop_at(VehicleId(0), Arm::Down, 92.5, None).unwrap();
        step_n(&mut eng, 200);
        assert_eq!(eng.snapshot(VehicleId(0)).unwrap().speed, 0.0);

        eng.resume(VehicleId(0)).unwrap();
        step_n(&mut eng, 20);
        assert!(eng.snapshot(VehicleId(0)).unwrap().speed > 0.0);
    }

    #[test]
    fn stop_past_the_point_is_rejected() {
        let mut eng = engine();
        // 10 m from the center at full speed: the boundary is 2.5 m away but
        // braking from 13.8 m/s needs ~21 m.
        eng.insert(VehicleId(0), route("du"), 10.0, 13.8).unwrap();
        assert!(matches!(
            eng.stop_at(VehicleId(0), Arm::Down, 92.5, None),
            Err(ActuationError::CannotStop { .. })
        ));
    }

    #[test]
    fn stop_on_wrong_arm_is_rejected() {
        let mut eng = engine();
        eng.insert(VehicleId(0), route("du"), 50.0, 10.0).unwrap();
        assert!(eng.stop_at(VehicleId(0), Arm::Left, 92.5, None).is_err());
    }
}

#[cfg(test)]
mod interaction {
    use super::*;

    #[test]
    fn follower_keeps_min_gap_behind_stopped_leader() {
        let mut eng = engine();
        eng.insert(VehicleId(0), route("du"), 20.0, 0.0).unwrap();
        eng.set_speed(VehicleId(0), 0.0).unwrap();
        eng.insert(VehicleId(1), route("du"), 60.0, 13.8).unwrap();
        step_n(&mut eng, 100);

        let leader = eng.snapshot(VehicleId(0)).unwrap();
        let follower = eng.snapshot(VehicleId(1)).unwrap();
        assert!((leader.distance_to_junction() - 20.0).abs() < 1e-6);
        assert!(
            follower.distance_to_junction() >= leader.distance_to_junction() + 3.0 - 1e-6,
            "gap violated: follower at {}",
            follower.distance_to_junction()
        );
    }

    #[test]
    fn auto_braking_holds_out_of_an_occupied_junction() {
        let mut eng = engine();
        // Parked in the middle of the junction.
        eng.insert(VehicleId(0), route("lr"), 0.0, 0.0).unwrap();
        eng.set_speed(VehicleId(0), 0.0).unwrap();
        eng.insert(VehicleId(1), route("du"), 60.0, 13.8).unwrap();
        step_n(&mut eng, 150);

        let snap = eng.snapshot(VehicleId(1)).unwrap();
        assert_eq!(snap.location, Location::Inbound(Arm::Down));
        assert!(snap.distance_to_junction() >= 7.5 - 1e-6);
    }

    #[test]
    fn disabled_auto_braking_drives_through() {
        let mut eng = engine();
        eng.insert(VehicleId(0), route("lr"), 0.0, 0.0).unwrap();
        eng.set_speed(VehicleId(0), 0.0).unwrap();
        eng.insert(VehicleId(1), route("du"), 60.0, 13.8).unwrap();
        eng.set_auto_braking(VehicleId(1), false).unwrap();
        step_n(&mut eng, 100);

        // The vehicle ignored the occupied junction and is past it.
        let snap = eng.snapshot(VehicleId(1)).unwrap();
        assert!(matches!(snap.location, Location::Outbound(_)));
    }
}
