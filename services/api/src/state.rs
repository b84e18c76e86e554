//! Shared Application State
//!
//! This module defines the `AppState` struct, which holds every panel's
//! in-memory state. Nothing here outlives the process.

use crate::config::Config;
use assistant_core::{
    history::{API_CALL_CAPACITY, BoundedHistory, COMMAND_HISTORY_CAPACITY},
    interpreter::{Clock, CommandInterpreter, SystemClock},
    metrics::MetricsMonitor,
    probe::{ApiCallRecord, HttpProbe},
    registry::ModuleRegistry,
    screen::ScreenControl,
};
use rand::{SeedableRng, rngs::StdRng};
use std::sync::Arc;
use tokio::{
    sync::{Mutex, RwLock},
    task::JoinHandle,
};
use tracing::debug;

/// The shared application state, created once at startup and passed to all handlers.
/// All fields are public to be accessible from other modules.
pub struct AppState {
    pub config: Arc<Config>,
    pub clock: Arc<dyn Clock>,
    pub interpreter: CommandInterpreter,
    /// Voice commands received over REST and WebSocket sessions.
    pub voice_history: Mutex<BoundedHistory<String>>,
    pub registry: Mutex<ModuleRegistry>,
    pub screen: Mutex<ScreenControl>,
    pub probe: HttpProbe,
    pub api_calls: Mutex<BoundedHistory<ApiCallRecord>>,
    pub metrics: RwLock<MetricsMonitor>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: Config, clock: Arc<dyn Clock>) -> Self {
        Self {
            config: Arc::new(config),
            interpreter: CommandInterpreter::new(clock.clone()),
            voice_history: Mutex::new(BoundedHistory::new(COMMAND_HISTORY_CAPACITY)),
            registry: Mutex::new(ModuleRegistry::default()),
            screen: Mutex::new(ScreenControl::new(clock.clone())),
            probe: HttpProbe::default(),
            api_calls: Mutex::new(BoundedHistory::new(API_CALL_CAPACITY)),
            metrics: RwLock::new(MetricsMonitor::default()),
            clock,
        }
    }
}

/// Refreshes the simulated metrics every `metrics_interval` until aborted.
pub fn spawn_metrics_ticker(state: Arc<AppState>) -> JoinHandle<()> {
    let period = state.config.metrics_interval;
    tokio::spawn(async move {
        let mut rng = StdRng::from_os_rng();
        let mut interval = tokio::time::interval(period);
        // The first tick completes immediately; skip it so uptime starts at zero.
        interval.tick().await;
        loop {
            interval.tick().await;
            let snapshot = state.metrics.write().await.tick(&mut rng, period);
            debug!(?snapshot, "Metrics refreshed");
        }
    })
}
