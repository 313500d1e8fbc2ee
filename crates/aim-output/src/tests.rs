//! Tests for the CSV sink and trip observer.

use std::fs;

use aim_core::{Tick, VehicleId};
use aim_sim::RunObserver;
use aim_topology::Route;

use crate::{CsvSink, StepRow, TripObserver, TripRow};

fn route(code: &str) -> Route {
    code.parse().unwrap()
}

#[cfg(test)]
mod sink {
    use super::*;

    #[test]
    fn writes_headers_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = CsvSink::create(dir.path()).unwrap();
        sink.write_trip(&TripRow {
            vehicle: 3,
            route: "du".into(),
            spawn_tick: 10,
            depart_tick: 155,
            travel_secs: 14.5,
        })
        .unwrap();
        sink.write_step(&StepRow { tick: 0, active: 1 }).unwrap();
        sink.flush().unwrap();

        let trips = fs::read_to_string(dir.path().join("trips.csv")).unwrap();
        let mut lines = trips.lines();
        assert_eq!(
            lines.next(),
            Some("vehicle,route,spawn_tick,depart_tick,travel_secs")
        );
        assert_eq!(lines.next(), Some("3,du,10,155,14.5"));

        let steps = fs::read_to_string(dir.path().join("steps.csv")).unwrap();
        assert_eq!(steps.lines().next(), Some("tick,active"));
    }

    #[test]
    fn creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("runs").join("a");
        let sink = CsvSink::create(&nested).unwrap();
        assert_eq!(sink.dir(), nested);
        assert!(nested.join("trips.csv").exists());
    }
}

#[cfg(test)]
mod observer {
    use super::*;

    #[test]
    fn records_trips_and_means() {
        let dir = tempfile::tempdir().unwrap();
        let (mut obs, stats) = TripObserver::create(dir.path(), 0.1).unwrap();

        obs.on_spawn(Tick(0), VehicleId(0), route("du"));
        obs.on_spawn(Tick(50), VehicleId(1), route("rl"));
        obs.on_departure(Tick(100), VehicleId(0)); // 10.0 s
        obs.on_departure(Tick(250), VehicleId(1)); // 20.0 s
        obs.on_run_end(Tick(300));

        assert_eq!(stats.completed(), 2);
        assert!((stats.mean_travel_secs().unwrap() - 15.0).abs() < 1e-9);
        assert!(stats.take_error().is_none());

        let trips = fs::read_to_string(dir.path().join("trips.csv")).unwrap();
        assert_eq!(trips.lines().count(), 3); // header + 2 trips
    }

    #[test]
    fn unmatched_departure_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let (mut obs, stats) = TripObserver::create(dir.path(), 0.1).unwrap();
        obs.on_departure(Tick(10), VehicleId(9));
        obs.on_run_end(Tick(10));
        assert_eq!(stats.completed(), 0);
        assert_eq!(stats.mean_travel_secs(), None);
    }

    #[test]
    fn full_run_produces_consistent_files() {
        use aim_control::StrategyKind;
        use aim_core::RunConfig;
        use aim_engine::{EngineParams, KinematicEngine};
        use aim_sim::Runner;

        let dir = tempfile::tempdir().unwrap();
        let run_config = RunConfig {
            total_steps: 1_500,
            spawn_probability: 0.02,
            ..RunConfig::default()
        };
        let (obs, stats) = TripObserver::create(dir.path(), run_config.step_secs).unwrap();
        let mut runner = Runner::builder(KinematicEngine::new(EngineParams::default()))
            .run_config(run_config)
            .strategy(StrategyKind::Grid)
            .observer(Box::new(obs))
            .build()
            .unwrap();
        let summary = runner.run().unwrap();

        assert!(stats.take_error().is_none());
        assert_eq!(stats.completed(), summary.departed);

        let trips = fs::read_to_string(dir.path().join("trips.csv")).unwrap();
        assert_eq!(trips.lines().count() as u64, summary.departed + 1);
        let steps = fs::read_to_string(dir.path().join("steps.csv")).unwrap();
        assert_eq!(steps.lines().count() as u64, summary.steps + 1);
    }
}
