//! Deterministic flooding simulation engine.
//!
//! This crate simulates packet dissemination over a sensor-network topology
//! using uncontrolled flooding with first-arrival-wins loop suppression.
//! Given the same topology, configuration and seed, it produces identical
//! metrics every run.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                  SimulationRunner                       │
//! │                                                         │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │     EventQueue (BTreeMap<EventKey, Task>)          │ │
//! │  │     Ordered by: time, scheduling sequence          │ │
//! │  └────────────────────────┬───────────────────────────┘ │
//! │                           │                             │
//! │                           ▼                             │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │  Generate → PacketGenerator   (one per sensor)     │ │
//! │  │  Arrive   → FloodRouter       (one per copy)       │ │
//! │  │  Transmit → FloodRouter       (sequential resume)  │ │
//! │  └────────────────────────┬───────────────────────────┘ │
//! │                           │                             │
//! │                           ▼                             │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │  SimulationContext (fresh per run)                 │ │
//! │  │    ForwardingRecord + MetricsCollector             │ │
//! │  └────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use floodsim_simulation::run_simulation;
//! use floodsim_types::Topology;
//!
//! let topology = Topology::path(5);
//! let metrics = run_simulation(&topology, 100.0).unwrap();
//! assert!(metrics.delivered <= metrics.generated);
//! ```

mod config;
mod context;
mod error;
mod event_queue;
mod forwarding;
mod generator;
mod metrics;
mod router;
mod runner;
mod task;

pub use config::{as_units, time_units, ForwardingSchedule, SimulationConfig, Timing, DEFAULT_SEED};
pub use context::SimulationContext;
pub use error::SimulationError;
pub use event_queue::{EventKey, EventQueue};
pub use forwarding::ForwardingRecord;
pub use generator::PacketGenerator;
pub use metrics::{Delivery, FloodMetrics, MetricsCollector};
pub use router::{FloodRouter, RouteOutcome};
pub use runner::{
    run, run_simulation, run_with_config, SimulationOutcome, SimulationRunner, SimulationStats,
};
pub use task::Task;
