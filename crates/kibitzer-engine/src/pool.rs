use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tracing::{debug, info, warn};

use kibitzer_core::{AnalysisEngine, EngineAnalysis, Error, EvaluationRequest, Result};

use crate::client::{ChannelState, EngineClient};
use crate::config::EngineConfig;

/// Independent engine clients; requests go to an idle one when possible,
/// otherwise round-robin.
pub struct EnginePool {
    clients: Vec<EngineClient>,
    next_client: AtomicUsize,
}

impl EnginePool {
    pub async fn new(config: &EngineConfig) -> Result<Self> {
        info!(
            "creating engine pool with {} engines from {}",
            config.pool_size, config.binary_path
        );

        let mut clients = Vec::with_capacity(config.pool_size);
        for i in 0..config.pool_size.max(1) {
            match EngineClient::spawn(config).await {
                Ok(client) => {
                    debug!("engine {} initialized", i);
                    clients.push(client);
                }
                Err(e) => {
                    warn!("failed to create engine {}: {}", i, e);
                    for client in &clients {
                        client.shutdown();
                    }
                    return Err(e);
                }
            }
        }

        Ok(Self::from_clients(clients))
    }

    pub fn from_clients(clients: Vec<EngineClient>) -> Self {
        Self {
            clients,
            next_client: AtomicUsize::new(0),
        }
    }

    fn select(&self) -> Result<&EngineClient> {
        if self.clients.is_empty() {
            return Err(Error::ChannelUnavailable("engine pool is empty".into()));
        }
        let start = self.next_client.fetch_add(1, Ordering::SeqCst);
        let len = self.clients.len();
        let open = (0..len)
            .map(|offset| &self.clients[(start + offset) % len])
            .filter(|c| c.state() != ChannelState::Closed);

        let mut fallback = None;
        for client in open {
            if client.state() == ChannelState::Ready {
                return Ok(client);
            }
            fallback.get_or_insert(client);
        }
        fallback.ok_or_else(|| Error::ChannelUnavailable("all engines closed".into()))
    }

    pub fn size(&self) -> usize {
        self.clients.len()
    }

    pub fn available(&self) -> usize {
        self.clients
            .iter()
            .filter(|c| c.state() == ChannelState::Ready)
            .count()
    }
}

#[async_trait]
impl AnalysisEngine for EnginePool {
    async fn evaluate(&self, request: EvaluationRequest) -> Result<EngineAnalysis> {
        self.select()?.evaluate(request).await
    }

    async fn evaluate_or_neutral(&self, request: EvaluationRequest) -> EngineAnalysis {
        let fallback = EngineAnalysis::neutral(&request);
        match self.evaluate(request).await {
            Ok(analysis) => analysis,
            Err(e) => {
                warn!(error = %e, "analysis failed, using neutral evaluation");
                fallback
            }
        }
    }

    async fn shutdown(&self) -> Result<()> {
        info!("shutting down engine pool");
        for client in &self.clients {
            client.shutdown();
        }
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.available() > 0
    }
}
