//! Application startup and lifecycle management.
//!
//! Builds the provider, verifies the credential, binds the HTTP listener and
//! serves the `/chat` router until a shutdown signal arrives.

use crate::config::{CorsSettings, RelayConfig};
use crate::handlers::{
    chat::chat,
    health::{health_check, readiness_check},
};
use crate::services::providers::gemini::GeminiChatProvider;
use crate::services::providers::{ChatProvider, ProviderError};
use crate::services::ChatRelay;
use axum::{
    body::Body,
    http::{HeaderValue, Method},
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{make_request_span, request_id_middleware};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RelayConfig>,
    pub provider: Arc<dyn ChatProvider>,
    pub relay: Arc<ChatRelay>,
}

impl AppState {
    pub fn new(config: RelayConfig, provider: Arc<dyn ChatProvider>) -> Self {
        let relay = Arc::new(ChatRelay::new(provider.clone()));
        Self {
            config: Arc::new(config),
            provider,
            relay,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors);

    Router::new()
        .route("/chat", post(chat))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span::<Body>))
        // Outermost, so the trace span sees the generated id
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

fn cors_layer(settings: &CorsSettings) -> CorsLayer {
    if settings.allowed_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = settings
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the Gemini provider.
    pub async fn build(config: RelayConfig) -> Result<Self, AppError> {
        let provider = GeminiChatProvider::new(config.gemini_config())
            .map_err(|e| AppError::ConfigError(anyhow::Error::new(e)))?;

        tracing::info!(model = %provider.model(), "Initialized Gemini chat provider");

        Self::build_with_provider(config, Arc::new(provider)).await
    }

    /// Build the application around an already constructed provider.
    pub async fn build_with_provider(
        config: RelayConfig,
        provider: Arc<dyn ChatProvider>,
    ) -> Result<Self, AppError> {
        if config.gemini.verify_on_startup {
            verify_provider(provider.as_ref()).await?;
        }

        // Port 0 = random port for testing
        let address = config.common.bind_address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", address, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        let router = build_router(AppState::new(config, provider));

        tracing::info!("Chat relay: HTTP on port {}", port);

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    /// Get the HTTP port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until a shutdown signal is received.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

/// Fail startup when the provider rejects the credential or is unreachable.
async fn verify_provider(provider: &dyn ChatProvider) -> Result<(), AppError> {
    match provider.health_check().await {
        Ok(()) => {
            tracing::info!("Model provider accepted credentials");
            Ok(())
        }
        Err(ProviderError::NetworkError(msg)) => {
            tracing::error!("Model provider unreachable: {}", msg);
            Err(AppError::BadGateway(msg))
        }
        Err(e) => {
            tracing::error!("Model provider rejected startup check: {}", e);
            Err(AppError::ConfigError(anyhow::Error::new(e)))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
