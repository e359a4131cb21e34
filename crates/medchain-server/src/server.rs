use std::sync::Arc;

use medchain_ledger::{AllowRoles, Ledger, MedicalLedger, PermitAll, SystemClock};
use medchain_types::Transaction;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::handler::AppState;
use crate::router::build_router;

/// medchain HTTP server.
pub struct MedchainServer {
    config: ServerConfig,
    ledger: Arc<MedicalLedger>,
}

impl MedchainServer {
    /// Build a fresh ledger according to `config` and serve it.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let genesis = Transaction::genesis();
        let ledger = match &config.allowed_roles {
            Some(roles) => {
                Ledger::with_policy(genesis, AllowRoles::new(roles.clone()), SystemClock)
            }
            None => Ledger::with_policy(genesis, PermitAll, SystemClock),
        }
        .map_err(|e| ServerError::Internal(format!("cannot create genesis block: {e}")))?;
        Ok(Self::with_ledger(config, Arc::new(ledger)))
    }

    /// Serve an existing ledger handle.
    pub fn with_ledger(config: ServerConfig, ledger: Arc<MedicalLedger>) -> Self {
        Self { config, ledger }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn ledger(&self) -> &Arc<MedicalLedger> {
        &self.ledger
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(
            AppState::new(Arc::clone(&self.ledger)).with_pretty_json(self.config.pretty_json),
            self.config.max_body_bytes,
        )
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!("medchain server listening on {}", self.config.bind_addr);
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}
