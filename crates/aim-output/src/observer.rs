//! Bridges the run loop to the CSV sink.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use aim_core::{Tick, VehicleId};
use aim_sim::RunObserver;
use aim_topology::Route;
use rustc_hash::FxHashMap;

use crate::{CsvSink, OutputError, OutputResult, StepRow, TripRow};

#[derive(Default)]
struct Totals {
    completed:         u64,
    total_travel_secs: f64,
    /// First write failure, surfaced after the run.
    error: Option<OutputError>,
}

/// Shared read handle onto a [`TripObserver`]'s totals.
///
/// Observer hooks cannot fail, so write errors park here; callers check
/// [`take_error`][TripStats::take_error] once the run is over.
#[derive(Clone, Default)]
pub struct TripStats {
    inner: Rc<RefCell<Totals>>,
}

impl TripStats {
    /// Trips written so far.
    pub fn completed(&self) -> u64 {
        self.inner.borrow().completed
    }

    /// Mean spawn-to-departure time, or `None` before the first trip.
    pub fn mean_travel_secs(&self) -> Option<f64> {
        let totals = self.inner.borrow();
        (totals.completed > 0).then(|| totals.total_travel_secs / totals.completed as f64)
    }

    /// The first output failure of the run, if any.
    pub fn take_error(&self) -> Option<OutputError> {
        self.inner.borrow_mut().error.take()
    }
}

/// Run observer that records every completed trip and per-step load.
pub struct TripObserver {
    sink:      CsvSink,
    step_secs: f64,
    /// Spawn tick and route of vehicles still in the network.
    pending: FxHashMap<VehicleId, (Tick, Route)>,
    stats:   TripStats,
}

impl TripObserver {
    /// Open the sink under `dir` and return the observer plus a stats
    /// handle that stays valid after the observer moves into the runner.
    pub fn create(dir: &Path, step_secs: f64) -> OutputResult<(TripObserver, TripStats)> {
        let stats = TripStats::default();
        let observer = TripObserver {
            sink: CsvSink::create(dir)?,
            step_secs,
            pending: FxHashMap::default(),
            stats: stats.clone(),
        };
        Ok((observer, stats))
    }

    fn record(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            let mut totals = self.stats.inner.borrow_mut();
            if totals.error.is_none() {
                log::error!("output write failed, dropping further errors: {e}");
                totals.error = Some(e);
            }
        }
    }
}

impl RunObserver for TripObserver {
    fn on_spawn(&mut self, tick: Tick, vehicle: VehicleId, route: Route) {
        self.pending.insert(vehicle, (tick, route));
    }

    fn on_departure(&mut self, tick: Tick, vehicle: VehicleId) {
        let Some((spawn_tick, route)) = self.pending.remove(&vehicle) else {
            log::warn!("departure of vehicle {vehicle} without a recorded spawn");
            return;
        };
        let travel_secs = tick.since(spawn_tick) as f64 * self.step_secs;
        let row = TripRow {
            vehicle: vehicle.0,
            route: route.code(),
            spawn_tick: spawn_tick.0,
            depart_tick: tick.0,
            travel_secs,
        };
        let result = self.sink.write_trip(&row);
        self.record(result);

        let mut totals = self.stats.inner.borrow_mut();
        totals.completed += 1;
        totals.total_travel_secs += travel_secs;
    }

    fn on_step_end(&mut self, tick: Tick, active: usize) {
        let result = self.sink.write_step(&StepRow { tick: tick.0, active });
        self.record(result);
    }

    fn on_run_end(&mut self, _final_tick: Tick) {
        let result = self.sink.flush();
        self.record(result);
    }
}
