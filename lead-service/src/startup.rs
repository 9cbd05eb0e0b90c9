//! Application wiring: shared state, router and server lifecycle.

use crate::config::LeadConfig;
use crate::handlers;
use crate::services::{
    EmailProvider, LeadDb, LeadIntake, LeadStore, SmtpProvider, UnavailableLeadStore,
};
use axum::{
    body::Body,
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{metrics_middleware, request_id_middleware, request_span};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<LeadConfig>,
    pub store: Option<Arc<dyn LeadStore>>,
    pub intake: Arc<LeadIntake>,
}

impl AppState {
    pub fn new(
        config: LeadConfig,
        store: Option<Arc<dyn LeadStore>>,
        email_provider: Arc<dyn EmailProvider>,
    ) -> Self {
        let intake = LeadIntake::new(store.clone(), email_provider, &config.notifications);
        Self {
            config: Arc::new(config),
            store,
            intake: Arc::new(intake),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/api/hello", get(handlers::hello))
        .route("/api/leads", post(handlers::create_lead))
        .route("/test", get(handlers::diagnostics))
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        // route_layer so the matched route template is known when recording
        .route_layer(from_fn(metrics_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http().make_span_with(request_span::<Body>))
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Connects the store when both its URL and name are configured.
///
/// A URL the driver rejects leaves the service running with an
/// [`UnavailableLeadStore`] so diagnostics report the failure.
pub async fn connect_store(config: &LeadConfig) -> Option<Arc<dyn LeadStore>> {
    let (Some(uri), Some(database)) = (
        config.mongodb.uri.as_deref(),
        config.mongodb.database.as_deref(),
    ) else {
        tracing::warn!("DATABASE_URL or DATABASE_NAME not set, leads cannot be stored");
        return None;
    };

    let store: Arc<dyn LeadStore> = match LeadDb::connect(uri, database).await {
        Ok(db) => {
            if let Err(e) = db.health_check().await {
                tracing::warn!("MongoDB not reachable at startup: {}", e);
            }
            Arc::new(db)
        }
        Err(e) => {
            tracing::warn!("MongoDB client could not be created, leads cannot be stored: {}", e);
            Arc::new(UnavailableLeadStore::new(database, e.to_string()))
        }
    };
    Some(store)
}

fn build_email_provider(config: &LeadConfig) -> Arc<dyn EmailProvider> {
    match SmtpProvider::new(&config.smtp) {
        Ok(provider) if provider.is_configured() => {
            tracing::info!("SMTP email provider initialized");
            Arc::new(provider)
        }
        Ok(provider) => {
            tracing::info!("SMTP relay not configured, lead emails will be skipped");
            Arc::new(provider)
        }
        Err(e) => {
            tracing::warn!("Failed to initialize SMTP provider: {}. Emails disabled.", e);
            Arc::new(SmtpProvider::unconfigured(config.smtp.from_email.clone()))
        }
    }
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    pub async fn build(config: LeadConfig) -> Result<Self, AppError> {
        let store = connect_store(&config).await;
        let email_provider = build_email_provider(&config);

        // Port 0 binds a random port, used by tests.
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        let state = AppState::new(config, store, email_provider);

        Ok(Self {
            port,
            listener,
            router: build_router(state),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serves until SIGINT or SIGTERM, then drains in-flight requests.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        tracing::info!("Listening on port {}", self.port);
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
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
