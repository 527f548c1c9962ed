use std::sync::Arc;

use carlot_auth::{IdentityVerifier, SignedTokenVerifier};
use carlot_service::ListingService;
use carlot_store::{InMemoryListingStore, JsonFileListingStore, ListingStore};
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_app;
use crate::state::AppState;

/// The Carlot HTTP server.
pub struct CarlotServer {
    config: ServerConfig,
    state: AppState,
}

impl CarlotServer {
    /// Wire up the server from explicit collaborators.
    pub fn new(
        config: ServerConfig,
        store: Arc<dyn ListingStore>,
        verifier: Arc<dyn IdentityVerifier>,
    ) -> Self {
        let listings = ListingService::new(store, verifier).with_read_policy(config.read_policy());
        Self {
            config,
            state: AppState::new(listings),
        }
    }

    /// Build the store and verifier described by `config`.
    pub async fn from_config(config: ServerConfig) -> ServerResult<Self> {
        let mut verifier = SignedTokenVerifier::new(config.token_key()?);
        if let Some(max_age) = config.token_max_age() {
            verifier = verifier.with_max_age(max_age);
        }

        let store: Arc<dyn ListingStore> = match &config.data_file {
            Some(path) => Arc::new(JsonFileListingStore::open(path).await?),
            None => {
                tracing::warn!("no data_file configured; listings are kept in memory");
                Arc::new(InMemoryListingStore::new())
            }
        };

        Ok(Self::new(config, store, Arc::new(verifier)))
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_app(
            self.state.clone(),
            self.config.media_root.as_deref(),
            self.config.cors_permissive,
        )
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!(
            addr = %self.config.bind_addr,
            media = ?self.config.media_root,
            "carlot server listening"
        );
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}
