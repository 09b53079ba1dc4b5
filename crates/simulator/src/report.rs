//! Run reports: delivery summary, latency percentiles and bottlenecks.

use floodsim_simulation::{FloodMetrics, SimulationOutcome, SimulationStats};
use floodsim_types::NodeId;
use hdrhistogram::Histogram;
use serde::Serialize;
use std::cmp::Reverse;

/// A node ranked by how many packets it relayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bottleneck {
    pub node: NodeId,
    pub forwarded: u64,
}

/// Summary of a single run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    /// Seed the run used, when known.
    pub seed: Option<u64>,
    pub generated: u64,
    pub delivered: u64,
    /// `delivered / generated`, or 0 when nothing was generated.
    pub delivery_ratio: f64,
    /// Mean latency in time units; `None` when nothing was delivered.
    pub mean_latency: Option<f64>,
    /// Mean hop count; `None` when nothing was delivered.
    pub mean_hops: Option<f64>,
    /// Latency percentiles in thousandths of a time unit.
    pub latency_p50_millis: u64,
    pub latency_p90_millis: u64,
    pub latency_p99_millis: u64,
    pub latency_max_millis: u64,
    /// Forward operations across all nodes.
    pub total_forwards: u64,
    /// Busiest forwarders, descending by count, ties by node id.
    pub bottlenecks: Vec<Bottleneck>,
    /// Engine bookkeeping, when the report was built from a full outcome.
    pub stats: Option<SimulationStats>,
}

impl SimulationReport {
    /// Build a report from the metrics of one run.
    pub fn from_metrics(metrics: &FloodMetrics, top: usize) -> Self {
        let histogram = latency_histogram(metrics);
        let quantile = |q: f64| histogram.as_ref().map_or(0, |h| h.value_at_quantile(q));

        Self {
            seed: None,
            generated: metrics.generated,
            delivered: metrics.delivered,
            delivery_ratio: metrics.delivery_ratio(),
            mean_latency: metrics.mean_latency(),
            mean_hops: metrics.mean_hops(),
            latency_p50_millis: quantile(0.50),
            latency_p90_millis: quantile(0.90),
            latency_p99_millis: quantile(0.99),
            latency_max_millis: histogram.as_ref().map_or(0, |h| h.max()),
            total_forwards: metrics.total_forwards(),
            bottlenecks: top_bottlenecks(metrics, top),
            stats: None,
        }
    }

    /// Build a report from a complete run outcome.
    pub fn from_outcome(seed: u64, outcome: &SimulationOutcome, top: usize) -> Self {
        Self {
            seed: Some(seed),
            stats: Some(outcome.stats.clone()),
            ..Self::from_metrics(&outcome.metrics, top)
        }
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n═══════════════════════════════════════════");
        println!("        FLOODING SIMULATION REPORT         ");
        println!("═══════════════════════════════════════════");
        if let Some(seed) = self.seed {
            println!("Seed: {seed}");
        }
        println!();
        println!("Packets:");
        println!("  Generated:       {}", self.generated);
        println!("  Delivered:       {}", self.delivered);
        println!("  Delivery ratio:  {:.2}%", self.delivery_ratio * 100.0);
        println!();
        match (self.mean_latency, self.mean_hops) {
            (Some(latency), Some(hops)) => {
                println!("Latency (delivered packets):");
                println!("  Avg:  {latency:.3}");
                println!("  P50:  {:.3}", self.latency_p50_millis as f64 / 1000.0);
                println!("  P90:  {:.3}", self.latency_p90_millis as f64 / 1000.0);
                println!("  P99:  {:.3}", self.latency_p99_millis as f64 / 1000.0);
                println!("  Max:  {:.3}", self.latency_max_millis as f64 / 1000.0);
                println!("  Avg hops: {hops:.2}");
            }
            _ => println!("Latency: no packets delivered"),
        }
        println!();
        println!("Forwarding ({} forwards):", self.total_forwards);
        if self.bottlenecks.is_empty() {
            println!("  (none)");
        }
        for (rank, bottleneck) in self.bottlenecks.iter().enumerate() {
            println!(
                "  {}. {}: {}",
                rank + 1,
                bottleneck.node,
                bottleneck.forwarded
            );
        }
        if let Some(stats) = &self.stats {
            println!();
            println!("Engine:");
            println!("  Events processed:   {}", stats.events_processed);
            println!("  Duplicates dropped: {}", stats.duplicates_dropped);
            println!("  Abandoned at cutoff: {}", stats.abandoned_tasks);
        }
        println!("═══════════════════════════════════════════\n");
    }
}

/// Summary of a batch of independent runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    /// Per-run reports, in run order.
    pub runs: Vec<SimulationReport>,
    /// Mean of the per-run delivery ratios.
    pub mean_delivery_ratio: f64,
    /// Mean of the per-run mean latencies, over runs that delivered anything.
    pub mean_latency: Option<f64>,
}

impl BatchReport {
    /// Aggregate per-run reports.
    pub fn new(runs: Vec<SimulationReport>) -> Self {
        let mean_delivery_ratio = if runs.is_empty() {
            0.0
        } else {
            runs.iter().map(|r| r.delivery_ratio).sum::<f64>() / runs.len() as f64
        };

        let latencies: Vec<f64> = runs.iter().filter_map(|r| r.mean_latency).collect();
        let mean_latency = if latencies.is_empty() {
            None
        } else {
            Some(latencies.iter().sum::<f64>() / latencies.len() as f64)
        };

        Self {
            runs,
            mean_delivery_ratio,
            mean_latency,
        }
    }

    /// Print every run followed by the aggregate.
    pub fn print_summary(&self) {
        for report in &self.runs {
            report.print_summary();
        }
        println!("═══════════════════════════════════════════");
        println!("  Runs:                {}", self.runs.len());
        println!("  Mean delivery ratio: {:.2}%", self.mean_delivery_ratio * 100.0);
        match self.mean_latency {
            Some(latency) => println!("  Mean latency:        {latency:.3}"),
            None => println!("  Mean latency:        n/a"),
        }
        println!("═══════════════════════════════════════════\n");
    }
}

/// Busiest `top` forwarders, descending by count with ties broken by node id.
pub fn top_bottlenecks(metrics: &FloodMetrics, top: usize) -> Vec<Bottleneck> {
    let mut ranked: Vec<Bottleneck> = metrics
        .forwarding_count
        .iter()
        .map(|(&node, &forwarded)| Bottleneck { node, forwarded })
        .collect();
    ranked.sort_by_key(|b| (Reverse(b.forwarded), b.node));
    ranked.truncate(top);
    ranked
}

/// Latencies in thousandths of a time unit. `None` if nothing was delivered.
fn latency_histogram(metrics: &FloodMetrics) -> Option<Histogram<u64>> {
    if metrics.latencies.is_empty() {
        return None;
    }
    let mut histogram = Histogram::<u64>::new(3).ok()?;
    for latency in &metrics.latencies {
        let millis = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
        histogram.saturating_record(millis);
    }
    Some(histogram)
}
