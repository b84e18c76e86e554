//! Simulated performance metrics.
//!
//! The dashboard shows CPU, memory, network and response-time gauges. None of
//! them are measured; each tick draws fresh values from fixed ranges.

use crate::history::BoundedHistory;
use rand::Rng;
use serde::Serialize;
use std::ops::Range;
use std::time::Duration;

pub const CPU_RANGE: Range<u32> = 20..60;
pub const MEMORY_RANGE: Range<u32> = 40..70;
pub const NETWORK_RANGE: Range<u32> = 50..100;
pub const RESPONSE_TIME_RANGE: Range<u32> = 50..150;

/// Number of samples kept for the CPU and memory charts.
pub const SAMPLE_HISTORY_CAPACITY: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricStatus {
    Good,
    Warning,
}

impl MetricStatus {
    fn from_ok(ok: bool) -> Self {
        if ok { MetricStatus::Good } else { MetricStatus::Warning }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricReading {
    pub name: &'static str,
    pub value: String,
    pub status: MetricStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MetricsSnapshot {
    pub cpu_usage: u32,
    pub memory_usage: u32,
    pub network_mbps: u32,
    pub response_time_ms: u32,
    pub uptime_secs: u64,
}

impl MetricsSnapshot {
    pub fn cpu_status(&self) -> MetricStatus {
        MetricStatus::from_ok(self.cpu_usage < 70)
    }

    pub fn memory_status(&self) -> MetricStatus {
        MetricStatus::from_ok(self.memory_usage < 80)
    }

    pub fn network_status(&self) -> MetricStatus {
        MetricStatus::from_ok(self.network_mbps > 30)
    }

    pub fn response_time_status(&self) -> MetricStatus {
        MetricStatus::from_ok(self.response_time_ms < 200)
    }

    /// The four gauges as display-ready readings.
    pub fn readings(&self) -> Vec<MetricReading> {
        vec![
            MetricReading {
                name: "CPU Usage",
                value: format!("{}%", self.cpu_usage),
                status: self.cpu_status(),
            },
            MetricReading {
                name: "Memory",
                value: format!("{}%", self.memory_usage),
                status: self.memory_status(),
            },
            MetricReading {
                name: "Network",
                value: format!("{} Mbps", self.network_mbps),
                status: self.network_status(),
            },
            MetricReading {
                name: "Response Time",
                value: format!("{}ms", self.response_time_ms),
                status: self.response_time_status(),
            },
        ]
    }
}

/// Formats seconds as `"{h}h {m}m {s}s"`.
pub fn format_uptime(secs: u64) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    format!("{hours}h {minutes}m {seconds}s")
}

/// Everything the performance panel renders.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub snapshot: MetricsSnapshot,
    pub readings: Vec<MetricReading>,
    pub uptime: String,
    pub cpu_history: BoundedHistory<u32>,
    pub memory_history: BoundedHistory<u32>,
}

#[derive(Debug, Clone)]
pub struct MetricsMonitor {
    latest: MetricsSnapshot,
    uptime: Duration,
    cpu_history: BoundedHistory<u32>,
    memory_history: BoundedHistory<u32>,
}

impl Default for MetricsMonitor {
    fn default() -> Self {
        Self {
            latest: MetricsSnapshot::default(),
            uptime: Duration::ZERO,
            cpu_history: BoundedHistory::new(SAMPLE_HISTORY_CAPACITY),
            memory_history: BoundedHistory::new(SAMPLE_HISTORY_CAPACITY),
        }
    }
}

impl MetricsMonitor {
    pub fn latest(&self) -> MetricsSnapshot {
        self.latest
    }

    /// Draws a new sample and advances uptime by `elapsed`.
    pub fn tick<R: Rng>(&mut self, rng: &mut R, elapsed: Duration) -> MetricsSnapshot {
        self.uptime += elapsed;
        self.latest = MetricsSnapshot {
            cpu_usage: rng.random_range(CPU_RANGE),
            memory_usage: rng.random_range(MEMORY_RANGE),
            network_mbps: rng.random_range(NETWORK_RANGE),
            response_time_ms: rng.random_range(RESPONSE_TIME_RANGE),
            uptime_secs: self.uptime.as_secs(),
        };
        self.cpu_history.push(self.latest.cpu_usage);
        self.memory_history.push(self.latest.memory_usage);
        self.latest
    }

    pub fn report(&self) -> MetricsReport {
        MetricsReport {
            snapshot: self.latest,
            readings: self.latest.readings(),
            uptime: format_uptime(self.latest.uptime_secs),
            cpu_history: self.cpu_history.clone(),
            memory_history: self.memory_history.clone(),
        }
    }
}
