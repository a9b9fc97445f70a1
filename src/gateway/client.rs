//! OpenClaw Gateway HTTP client
//!
//! Wraps the gateway's `/health` probe and `/api/v1/sessions` resource.
//! The underlying `reqwest::Client` is shared by clone, so the poll loop
//! and on-demand callers may issue overlapping requests; nothing
//! serializes them.

use crate::config::IntegrationConfig;
use crate::error::{Error, Result};
use crate::gateway::mapping;
use crate::gateway::types::{
    GatewayAgent, GatewaySession, SessionsFetch, SessionsResponse, VisualizationAgent,
};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

/// Connection settings for a `GatewayClient`
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayClientConfig {
    pub gateway_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for GatewayClientConfig {
    fn default() -> Self {
        IntegrationConfig::default().into()
    }
}

impl From<&IntegrationConfig> for GatewayClientConfig {
    fn from(config: &IntegrationConfig) -> Self {
        Self {
            gateway_url: config.gateway_url.clone(),
            api_key: config.api_key.clone(),
            timeout: config.timeout(),
        }
    }
}

impl From<IntegrationConfig> for GatewayClientConfig {
    fn from(config: IntegrationConfig) -> Self {
        Self::from(&config)
    }
}

/// Client for the OpenClaw Gateway HTTP API
pub struct GatewayClient {
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
    http: RwLock<Option<reqwest::Client>>,
    connected: AtomicBool,
}

impl GatewayClient {
    /// Create a disconnected client
    pub fn new(config: GatewayClientConfig) -> Self {
        Self {
            base_url: config.gateway_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            timeout: config.timeout,
            http: RwLock::new(None),
            connected: AtomicBool::new(false),
        }
    }

    /// Gateway base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Open the HTTP handle and probe `/health`.
    ///
    /// Returns false on any failure; the client is then left disconnected
    /// and `connect` may be called again.
    pub async fn connect(&self) -> bool {
        let client = match self.build_http_client() {
            Ok(client) => client,
            Err(e) => {
                tracing::warn!(gateway_url = %self.base_url, "Failed to build gateway client: {}", e);
                self.reset().await;
                return false;
            }
        };

        match Self::probe(&client, &self.url("/health")).await {
            Ok(_) => {
                *self.http.write().await = Some(client);
                self.connected.store(true, Ordering::SeqCst);
                tracing::info!(gateway_url = %self.base_url, "Connected to OpenClaw Gateway");
                true
            }
            Err(e) => {
                tracing::warn!(
                    gateway_url = %self.base_url,
                    "Failed to connect to OpenClaw Gateway: {}",
                    e
                );
                self.reset().await;
                false
            }
        }
    }

    /// Release the HTTP handle. No-op when not connected.
    pub async fn disconnect(&self) {
        let had_handle = self.http.write().await.take().is_some();
        self.connected.store(false, Ordering::SeqCst);
        if had_handle {
            tracing::info!(gateway_url = %self.base_url, "Disconnected from OpenClaw Gateway");
        }
    }

    pub async fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst) && self.http.read().await.is_some()
    }

    /// Gateway health payload
    pub async fn get_health(&self) -> Result<serde_json::Value> {
        let client = self.handle().await?;
        Self::probe(&client, &self.url("/health")).await
    }

    /// Fetch sessions, reporting an unreachable gateway explicitly.
    ///
    /// Only `Error::NotConnected` is returned as an error; HTTP, status and
    /// decoding failures become `SessionsFetch::Unreachable`.
    pub async fn fetch_sessions(&self) -> Result<SessionsFetch> {
        let client = self.handle().await?;
        match self.request_sessions(&client).await {
            Ok(sessions) => {
                tracing::debug!(count = sessions.len(), "Fetched gateway sessions");
                Ok(SessionsFetch::Available(sessions))
            }
            Err(e) => {
                tracing::warn!(gateway_url = %self.base_url, "Failed to get sessions: {}", e);
                Ok(SessionsFetch::Unreachable {
                    reason: e.to_string(),
                })
            }
        }
    }

    /// All sessions; an unreachable gateway yields an empty list.
    pub async fn get_sessions(&self) -> Result<Vec<GatewaySession>> {
        Ok(self.fetch_sessions().await?.into_sessions())
    }

    /// Agents of every session, in session order then agent order
    pub async fn get_active_agents(&self) -> Result<Vec<GatewayAgent>> {
        let sessions = self.get_sessions().await?;
        Ok(sessions
            .into_iter()
            .flat_map(|session| session.agents)
            .collect())
    }

    /// Agents of the first session whose key matches exactly
    pub async fn get_session_agents(&self, session_key: &str) -> Result<Vec<GatewayAgent>> {
        let sessions = self.get_sessions().await?;
        Ok(sessions
            .into_iter()
            .find(|session| session.key == session_key)
            .map(|session| session.agents)
            .unwrap_or_default())
    }

    /// Map a gateway agent to the visualization shape
    pub fn map_to_visualization(&self, agent: &GatewayAgent) -> VisualizationAgent {
        mapping::map_to_visualization(agent)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn default_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(key) = &self.api_key {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", key))
                .map_err(|e| Error::Config(format!("Invalid gateway API key: {}", e)))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }

    fn build_http_client(&self) -> Result<reqwest::Client> {
        Ok(reqwest::Client::builder()
            .timeout(self.timeout)
            .default_headers(self.default_headers()?)
            .build()?)
    }

    async fn handle(&self) -> Result<reqwest::Client> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(Error::NotConnected);
        }
        self.http.read().await.clone().ok_or(Error::NotConnected)
    }

    async fn reset(&self) {
        *self.http.write().await = None;
        self.connected.store(false, Ordering::SeqCst);
    }

    async fn probe(client: &reqwest::Client, url: &str) -> Result<serde_json::Value> {
        let response = client.get(url).send().await?.error_for_status()?;
        Ok(response.json().await?)
    }

    async fn request_sessions(&self, client: &reqwest::Client) -> Result<Vec<GatewaySession>> {
        let response = client
            .get(self.url("/api/v1/sessions"))
            .send()
            .await?
            .error_for_status()?;
        let body: SessionsResponse = response.json().await?;
        Ok(body.sessions)
    }
}
