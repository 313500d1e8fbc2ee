//! The driving loop.
//!
//! Per step, in fixed order: advance the engine, hand departures to the
//! strategy, spawn this step's arrival (if any), register arrivals, run one
//! arbitration pass, then notify observers.  The strategy is sequential and
//! single-threaded by design; determinism falls out of the fixed order plus
//! the seeded arrival source.

use aim_control::{ControlConfig, ControlStrategy, StrategyKind};
use aim_core::{RunConfig, StepClock, VehicleId};
use aim_engine::SimulationEngine;

use crate::{ArrivalSource, RunObserver, SimResult};

/// Closing accounting of one run.
#[derive(Clone, Debug)]
pub struct RunSummary {
    pub steps:    u64,
    pub spawned:  u32,
    pub departed: u64,
    /// Vehicles still in the network when the run ended.
    pub remaining: usize,
}

pub struct Runner<E: SimulationEngine> {
    engine:    E,
    strategy:  Box<dyn ControlStrategy>,
    source:    ArrivalSource,
    config:    RunConfig,
    observers: Vec<Box<dyn RunObserver>>,
}

impl<E: SimulationEngine> Runner<E> {
    pub fn builder(engine: E) -> RunnerBuilder<E> {
        RunnerBuilder {
            engine,
            run_config: RunConfig::default(),
            control_config: ControlConfig::default(),
            kind: StrategyKind::Fifo,
            observers: Vec::new(),
        }
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Drive the run to its configured end.
    pub fn run(&mut self) -> SimResult<RunSummary> {
        let mut clock: StepClock = self.config.make_clock();
        let mut active: usize = 0;
        let mut departed_total: u64 = 0;

        log::info!(
            "starting {}-step run under '{}' arbitration",
            self.config.total_steps,
            self.strategy.name()
        );

        while clock.current < self.config.end_tick() {
            let now = clock.current;
            self.engine.step();

            let departures: Vec<VehicleId> = self.engine.departed().to_vec();
            self.strategy.on_departures(&departures);
            departed_total += departures.len() as u64;
            active = active.saturating_sub(departures.len());
            for &id in &departures {
                for obs in &mut self.observers {
                    obs.on_departure(now, id);
                }
            }

            if let Some((id, route)) = self.source.sample() {
                match self.engine.spawn(id, route, self.config.depart_speed_mps) {
                    Ok(()) => {
                        for obs in &mut self.observers {
                            obs.on_spawn(now, id, route);
                        }
                    }
                    Err(e) => log::warn!("{now} could not spawn vehicle {id}: {e}"),
                }
            }

            let arrivals: Vec<VehicleId> = self.engine.arrived().to_vec();
            active += arrivals.len();
            self.strategy.on_arrivals(&arrivals, &mut self.engine);

            self.strategy.on_step(now, &mut self.engine)?;

            for obs in &mut self.observers {
                obs.on_step_end(now, active);
            }
            clock.advance();
        }

        for obs in &mut self.observers {
            obs.on_run_end(clock.current);
        }
        let summary = RunSummary {
            steps:     self.config.total_steps,
            spawned:   self.source.spawned(),
            departed:  departed_total,
            remaining: active,
        };
        log::info!(
            "run finished: {} spawned, {} departed, {} remaining",
            summary.spawned,
            summary.departed,
            summary.remaining
        );
        Ok(summary)
    }
}

// ── RunnerBuilder ─────────────────────────────────────────────────────────────

/// Assembles a [`Runner`], validating both configurations up front.
pub struct RunnerBuilder<E: SimulationEngine> {
    engine:         E,
    run_config:     RunConfig,
    control_config: ControlConfig,
    kind:           StrategyKind,
    observers:      Vec<Box<dyn RunObserver>>,
}

impl<E: SimulationEngine> RunnerBuilder<E> {
    pub fn run_config(mut self, config: RunConfig) -> Self {
        self.run_config = config;
        self
    }

    pub fn control_config(mut self, config: ControlConfig) -> Self {
        self.control_config = config;
        self
    }

    pub fn strategy(mut self, kind: StrategyKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn observer(mut self, observer: Box<dyn RunObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn build(self) -> SimResult<Runner<E>> {
        self.run_config.validate()?;
        let strategy = self.kind.build(&self.control_config)?;
        Ok(Runner {
            engine: self.engine,
            strategy,
            source: ArrivalSource::new(&self.run_config),
            config: self.run_config,
            observers: self.observers,
        })
    }
}
