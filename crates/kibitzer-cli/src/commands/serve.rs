use std::sync::Arc;

use tokio::io::BufReader;
use tracing::{info, warn};

use kibitzer_api::{serve_lines, Session};
use kibitzer_core::AnalysisEngine;
use kibitzer_engine::{EngineConfig, EnginePool};

use crate::config::Config;

/// JSON-lines protocol on stdin/stdout until EOF or Ctrl-C.
pub async fn execute(config: &Config) -> anyhow::Result<()> {
    let pool = Arc::new(open_pool(&config.engine_config()).await);
    info!(
        "serving on stdio with {} engine(s), default depth {}",
        pool.size(),
        config.engine.depth
    );

    let session = Arc::new(Session::new(pool.clone(), config.engine.depth));
    let stdin = BufReader::new(tokio::io::stdin());

    tokio::select! {
        result = serve_lines(session, stdin, tokio::io::stdout()) => result?,
        _ = tokio::signal::ctrl_c() => warn!("interrupted, shutting down"),
    }

    pool.shutdown().await?;
    Ok(())
}

/// Without an engine the session still answers, with neutral evaluations.
async fn open_pool(config: &EngineConfig) -> EnginePool {
    match EnginePool::new(config).await {
        Ok(pool) => pool,
        Err(e) => {
            warn!(error = %e, "no engine available, analyses will be neutral");
            EnginePool::from_clients(Vec::new())
        }
    }
}
