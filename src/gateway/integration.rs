//! OpenClaw integration manager
//!
//! Owns one `GatewayClient` and one background poll task. Each tick
//! fetches sessions, maps every agent to a `VisualizationAgent`, publishes
//! an `AgentsSnapshot` on a watch channel and notifies registered
//! observers. A failing or panicking observer is logged and skipped; it
//! never ends the loop.
//!
//! `IntegrationRegistry` hands out a single shared manager. It is an
//! ordinary value owned by the application state, not a global.

use crate::config::IntegrationConfig;
use crate::error::{Error, Result};
use crate::gateway::client::GatewayClient;
use crate::gateway::mapping;
use crate::gateway::types::{AgentsSnapshot, VisualizationAgent};
use chrono::Utc;
use futures::FutureExt;
use serde::Serialize;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Receives the mapped agent list after every poll tick
pub trait AgentsObserver: Send + Sync {
    fn on_agents_update(&self, agents: &[VisualizationAgent]) -> Result<()>;
}

impl<F> AgentsObserver for F
where
    F: Fn(&[VisualizationAgent]) -> Result<()> + Send + Sync,
{
    fn on_agents_update(&self, agents: &[VisualizationAgent]) -> Result<()> {
        self(agents)
    }
}

/// Integration lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationState {
    Stopped,
    Starting,
    Running,
    Stopping,
}

impl IntegrationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntegrationState::Stopped => "stopped",
            IntegrationState::Starting => "starting",
            IntegrationState::Running => "running",
            IntegrationState::Stopping => "stopping",
        }
    }
}

type Observers = Arc<RwLock<Vec<Arc<dyn AgentsObserver>>>>;

struct PollTask {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Manages the gateway connection and the poll loop
pub struct IntegrationManager {
    config: IntegrationConfig,
    client: Arc<GatewayClient>,
    state: RwLock<IntegrationState>,
    poll_task: Mutex<Option<PollTask>>,
    observers: Observers,
    snapshot_tx: Arc<watch::Sender<AgentsSnapshot>>,
}

impl IntegrationManager {
    /// Create a stopped manager
    pub fn new(config: IntegrationConfig) -> Self {
        let client = Arc::new(GatewayClient::new((&config).into()));
        let (snapshot_tx, _) = watch::channel(AgentsSnapshot::default());
        Self {
            config,
            client,
            state: RwLock::new(IntegrationState::Stopped),
            poll_task: Mutex::new(None),
            observers: Arc::new(RwLock::new(Vec::new())),
            snapshot_tx: Arc::new(snapshot_tx),
        }
    }

    pub fn config(&self) -> &IntegrationConfig {
        &self.config
    }

    pub fn client(&self) -> &Arc<GatewayClient> {
        &self.client
    }

    pub async fn state(&self) -> IntegrationState {
        *self.state.read().await
    }

    /// Whether a poll task exists and has not finished
    pub async fn is_polling(&self) -> bool {
        self.poll_task
            .lock()
            .await
            .as_ref()
            .is_some_and(|task| !task.handle.is_finished())
    }

    /// Register an observer for subsequent ticks
    pub async fn add_observer(&self, observer: Arc<dyn AgentsObserver>) {
        self.observers.write().await.push(observer);
    }

    /// Latest delivered snapshot; `tick == 0` until the first poll completes
    pub fn subscribe(&self) -> watch::Receiver<AgentsSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Connect and launch the poll loop.
    ///
    /// Returns false, staying `Stopped`, when the gateway cannot be reached.
    /// When not `Stopped`, nothing is spawned and the result reports
    /// whether the manager is already running.
    pub async fn start(&self) -> bool {
        {
            let mut state = self.state.write().await;
            let current = *state;
            if current != IntegrationState::Stopped {
                tracing::debug!(state = ?current, "Integration start ignored");
                return current == IntegrationState::Running;
            }
            *state = IntegrationState::Starting;
        }

        tracing::info!(gateway_url = %self.client.base_url(), "Starting OpenClaw integration");

        if !self.client.connect().await {
            *self.state.write().await = IntegrationState::Stopped;
            tracing::warn!(
                gateway_url = %self.client.base_url(),
                "OpenClaw integration not started: gateway unreachable"
            );
            return false;
        }

        let cancel = CancellationToken::new();
        let poller = Poller {
            client: self.client.clone(),
            observers: self.observers.clone(),
            snapshot_tx: self.snapshot_tx.clone(),
            interval: self.config.poll_interval(),
        };
        let handle = tokio::spawn(poller.run(cancel.clone()));
        *self.poll_task.lock().await = Some(PollTask { cancel, handle });

        *self.state.write().await = IntegrationState::Running;
        tracing::info!(
            poll_interval_secs = self.config.poll_interval,
            "OpenClaw integration running"
        );
        true
    }

    /// Stop the poll loop and disconnect. No-op unless running.
    pub async fn stop(&self) {
        {
            let mut state = self.state.write().await;
            if *state != IntegrationState::Running {
                return;
            }
            *state = IntegrationState::Stopping;
        }

        tracing::info!("Stopping OpenClaw integration");

        let task = self.poll_task.lock().await.take();
        if let Some(task) = task {
            task.cancel.cancel();
            match task.handle.await {
                Ok(()) => {}
                Err(e) if e.is_cancelled() => tracing::debug!("Poll task cancelled"),
                Err(e) => tracing::warn!("Poll task ended abnormally: {}", e),
            }
        }

        self.client.disconnect().await;
        *self.state.write().await = IntegrationState::Stopped;

        tracing::info!("OpenClaw integration stopped");
    }

    /// On-demand fetch and map, independent of the poll loop
    pub async fn get_agents_for_visualization(&self) -> Result<Vec<VisualizationAgent>> {
        let agents = self.client.get_active_agents().await?;
        Ok(agents.iter().map(mapping::map_to_visualization).collect())
    }
}

// =============================================================================
// Poll loop
// =============================================================================

struct Poller {
    client: Arc<GatewayClient>,
    observers: Observers,
    snapshot_tx: Arc<watch::Sender<AgentsSnapshot>>,
    interval: Duration,
}

impl Poller {
    async fn run(self, cancel: CancellationToken) {
        let mut tick: u64 = 0;

        loop {
            tick += 1;

            let outcome = tokio::select! {
                _ = cancel.cancelled() => break,
                outcome = AssertUnwindSafe(self.poll_once(tick)).catch_unwind() => outcome,
            };

            match outcome {
                Ok(Ok(count)) => tracing::debug!(tick, agents = count, "Poll tick delivered"),
                Ok(Err(e)) => tracing::warn!(tick, "Error polling agents: {}", e),
                Err(_) => tracing::error!(tick, "Poll tick panicked"),
            }

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        tracing::debug!("Poll loop exited");
    }

    async fn poll_once(&self, tick: u64) -> Result<usize> {
        let fetch = self.client.fetch_sessions().await?;
        let gateway_reachable = !fetch.is_unreachable();

        let agents: Vec<VisualizationAgent> = fetch
            .into_sessions()
            .iter()
            .flat_map(|session| session.agents.iter())
            .map(mapping::map_to_visualization)
            .collect();
        let count = agents.len();

        self.snapshot_tx.send_replace(AgentsSnapshot {
            agents: agents.clone(),
            fetched_at: Utc::now(),
            gateway_reachable,
            tick,
        });
        self.notify(&agents).await;

        Ok(count)
    }

    async fn notify(&self, agents: &[VisualizationAgent]) {
        let observers = self.observers.read().await.clone();
        for observer in observers {
            let result =
                std::panic::catch_unwind(AssertUnwindSafe(|| observer.on_agents_update(agents)));
            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::warn!("Agents observer failed: {}", e),
                Err(_) => tracing::error!("Agents observer panicked"),
            }
        }
    }
}

// =============================================================================
// Registry
// =============================================================================

/// Lazily started, shared `IntegrationManager`.
///
/// The first successful `get_or_start` fixes the configuration; later
/// calls get the same manager even if they pass a different config.
#[derive(Default)]
pub struct IntegrationRegistry {
    current: Mutex<Option<Arc<IntegrationManager>>>,
}

impl IntegrationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the running manager, creating and starting it on first use.
    ///
    /// A failed start caches nothing, so the next call tries again.
    pub async fn get_or_start(&self, config: IntegrationConfig) -> Result<Arc<IntegrationManager>> {
        let mut current = self.current.lock().await;

        if let Some(manager) = current.as_ref() {
            if manager.config() != &config {
                tracing::debug!(
                    active_gateway = %manager.client().base_url(),
                    requested_gateway = %config.gateway_url,
                    "Integration already initialized; ignoring new configuration"
                );
            }
            return Ok(manager.clone());
        }

        config.validate()?;
        let manager = Arc::new(IntegrationManager::new(config));
        if !manager.start().await {
            return Err(Error::Gateway(format!(
                "Failed to connect to OpenClaw Gateway at {}",
                manager.client().base_url()
            )));
        }

        *current = Some(manager.clone());
        Ok(manager)
    }

    pub async fn current(&self) -> Option<Arc<IntegrationManager>> {
        self.current.lock().await.clone()
    }

    /// Stop and drop the shared manager. The registry can be reused.
    pub async fn shutdown(&self) {
        let manager = self.current.lock().await.take();
        if let Some(manager) = manager {
            manager.stop().await;
        }
    }
}
