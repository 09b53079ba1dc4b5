//! Simulation driver: bootstraps a run, drives the event loop, harvests metrics.

use crate::config::{as_units, time_units, SimulationConfig, Timing, DEFAULT_SEED};
use crate::context::SimulationContext;
use crate::event_queue::EventQueue;
use crate::generator::PacketGenerator;
use crate::metrics::FloodMetrics;
use crate::router::{FloodRouter, RouteOutcome};
use crate::task::Task;
use crate::SimulationError;
use floodsim_types::{NodeId, Packet, Role, Topology};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, trace, warn};

/// Bookkeeping about how a run unfolded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SimulationStats {
    /// Tasks placed on the queue.
    pub tasks_scheduled: u64,
    /// Tasks run before the horizon.
    pub events_processed: u64,
    /// Packet copies that arrived at a node.
    pub arrivals: u64,
    /// Copies dropped because the node had already handled the packet.
    pub duplicates_dropped: u64,
    /// Copies handed to a neighbor.
    pub transmissions: u64,
    /// Tasks still pending when the horizon was reached.
    pub abandoned_tasks: u64,
    /// Number of generator tasks started.
    pub generators: u64,
    /// Simulated time of the last task run.
    #[serde(serialize_with = "crate::metrics::serialize_units")]
    pub final_time: Duration,
}

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationOutcome {
    pub metrics: FloodMetrics,
    pub stats: SimulationStats,
}

/// Single-threaded discrete-event runner for one flooding run.
///
/// Tasks are popped in `(time, scheduling order)` order and run to
/// completion before time advances again, so every mutation of the
/// [`SimulationContext`] happens inside one uninterrupted step.
pub struct SimulationRunner<'t, R> {
    topology: &'t Topology,
    timing: Timing,
    queue: EventQueue,
    context: SimulationContext,
    generator: Option<PacketGenerator>,
    router: FloodRouter,
    rng: R,
    now: Duration,
    stats: SimulationStats,
}

impl<'t, R: Rng> SimulationRunner<'t, R> {
    /// Create a runner with a fresh context. Fails on invalid configuration.
    pub fn new(
        topology: &'t Topology,
        config: &SimulationConfig,
        rng: R,
    ) -> Result<Self, SimulationError> {
        let timing = config.validate()?;
        let generator = PacketGenerator::new(topology.sinks(), timing.interval);
        let router = FloodRouter::new(timing.hop_delay, timing.forwarding);

        Ok(Self {
            topology,
            timing,
            queue: EventQueue::new(),
            context: SimulationContext::new(),
            generator,
            router,
            rng,
            now: Duration::ZERO,
            stats: SimulationStats::default(),
        })
    }

    /// Start one packet generator per sensor node.
    ///
    /// Starts nothing when the topology has no sink. Returns the number of
    /// generators started.
    pub fn spawn_generators(&mut self) -> usize {
        let Some(generator) = &self.generator else {
            warn!(
                nodes = self.topology.node_count(),
                "No sink in topology, skipping packet generation"
            );
            return 0;
        };

        let mut spawned = 0;
        for node in self.topology.sensors() {
            let wake = self.now.saturating_add(generator.next_interval(&mut self.rng));
            self.queue.schedule(wake, Task::Generate { node });
            spawned += 1;
        }
        self.stats.generators += spawned as u64;
        spawned
    }

    /// Schedule a single packet from `origin` to the sink `destination`,
    /// created at simulated time `at`.
    pub fn inject_packet(
        &mut self,
        origin: NodeId,
        destination: NodeId,
        at: f64,
    ) -> Result<(), SimulationError> {
        if !self.topology.contains(origin) {
            return Err(SimulationError::UnknownNode(origin));
        }
        match self.topology.role(destination) {
            None => return Err(SimulationError::UnknownNode(destination)),
            Some(Role::Sensor) => return Err(SimulationError::NotASink(destination)),
            Some(Role::Sink) => {}
        }
        let at = time_units(at).ok_or(SimulationError::InvalidTime(at))?;

        self.queue.schedule(
            at,
            Task::Inject {
                origin,
                destination,
            },
        );
        Ok(())
    }

    /// Run every task scheduled before the horizon.
    pub fn run_until_horizon(&mut self) {
        while let Some((key, task)) = self.queue.pop_before(self.timing.horizon) {
            self.now = key.time;
            self.stats.events_processed += 1;
            trace!(time = as_units(self.now), node = %task.node(), "Running task");
            self.step(task);
        }
    }

    /// Run to the horizon and harvest the results. Pending tasks are discarded.
    pub fn finish(mut self) -> SimulationOutcome {
        self.run_until_horizon();

        self.stats.abandoned_tasks = self.queue.len() as u64;
        self.stats.tasks_scheduled = self.queue.scheduled_total();
        self.stats.final_time = self.now;

        let metrics = self.context.into_metrics();
        info!(
            generated = metrics.generated,
            delivered = metrics.delivered,
            events = self.stats.events_processed,
            abandoned = self.stats.abandoned_tasks,
            "Simulation finished"
        );

        SimulationOutcome {
            metrics,
            stats: self.stats,
        }
    }

    /// Run statistics so far.
    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    /// Context of the run in progress.
    pub fn context(&self) -> &SimulationContext {
        &self.context
    }

    /// Number of pending tasks.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    fn step(&mut self, task: Task) {
        match task {
            Task::Generate { node } => self.on_generate(node),
            Task::Inject {
                origin,
                destination,
            } => self.on_inject(origin, destination),
            Task::Arrive { node, packet } => {
                self.stats.arrivals += 1;
                let outcome = self.router.on_arrival(
                    &mut self.context,
                    &mut self.queue,
                    self.topology,
                    node,
                    packet,
                    self.now,
                );
                match outcome {
                    RouteOutcome::Duplicate => self.stats.duplicates_dropped += 1,
                    RouteOutcome::Delivered => {}
                    RouteOutcome::Forwarded { transmissions } => {
                        self.stats.transmissions += transmissions as u64;
                    }
                }
            }
            Task::Transmit { node, packet, next } => {
                if self.router.on_transmit(
                    &mut self.queue,
                    self.topology,
                    node,
                    packet,
                    next,
                    self.now,
                ) {
                    self.stats.transmissions += 1;
                }
            }
        }
    }

    fn on_generate(&mut self, node: NodeId) {
        let Some(generator) = &self.generator else {
            return;
        };

        let packet = generator.generate_one(&mut self.context, node, self.now, &mut self.rng);
        self.queue.schedule(self.now, Task::Arrive { node, packet });

        // An interval too large to represent means this sensor never fires again.
        if let Some(wake) = self.now.checked_add(generator.next_interval(&mut self.rng)) {
            self.queue.schedule(wake, Task::Generate { node });
        }
    }

    fn on_inject(&mut self, origin: NodeId, destination: NodeId) {
        let id = self.context.allocate_packet_id(origin);
        self.context.metrics_mut().record_generated();
        debug!(packet = %id, %destination, "Packet injected");

        let packet = Packet::new(id, destination, self.now);
        self.queue.schedule(
            self.now,
            Task::Arrive {
                node: origin,
                packet,
            },
        );
    }
}

/// Run a full simulation: one generator per sensor, flooded to the horizon.
///
/// Pure in its inputs: the same topology, configuration and random source
/// yield the same outcome. A topology without sinks yields empty metrics
/// without scheduling anything.
pub fn run_with_config<R: Rng>(
    topology: &Topology,
    config: &SimulationConfig,
    rng: R,
) -> Result<SimulationOutcome, SimulationError> {
    let mut runner = SimulationRunner::new(topology, config, rng)?;

    info!(
        nodes = topology.node_count(),
        links = topology.edge_count(),
        sinks = topology.sinks().len(),
        horizon = config.horizon,
        forwarding = ?config.forwarding,
        "Starting simulation"
    );

    runner.spawn_generators();
    Ok(runner.finish())
}

/// Run with default parameters, the given horizon and an explicit random source.
pub fn run<R: Rng>(
    topology: &Topology,
    horizon: f64,
    rng: R,
) -> Result<FloodMetrics, SimulationError> {
    let config = SimulationConfig::new(horizon);
    Ok(run_with_config(topology, &config, rng)?.metrics)
}

/// Standalone entry point: default parameters, seeded with [`DEFAULT_SEED`].
pub fn run_simulation(topology: &Topology, horizon: f64) -> Result<FloodMetrics, SimulationError> {
    run(topology, horizon, ChaCha8Rng::seed_from_u64(DEFAULT_SEED))
}
