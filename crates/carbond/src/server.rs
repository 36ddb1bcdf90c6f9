//! HTTP server for carbond

use crate::emissions::EmissionService;
use crate::mailer::{LogMailer, TipMailer};
use crate::registry::{ActivityLog, UserRegistry};
use crate::routes;
use anyhow::{Context, Result};
use axum::http::HeaderValue;
use axum::Router;
use carbon_common::ServerConfig;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Application state shared across handlers
pub struct AppState {
    pub emissions: EmissionService,
    pub users: RwLock<UserRegistry>,
    pub activity_log: RwLock<ActivityLog>,
    pub mailer: Arc<dyn TipMailer>,
    pub history_limit: usize,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(emissions: EmissionService, mailer: Arc<dyn TipMailer>, history_limit: usize) -> Self {
        Self {
            emissions,
            users: RwLock::new(UserRegistry::new()),
            activity_log: RwLock::new(ActivityLog::new()),
            mailer,
            history_limit,
            start_time: Instant::now(),
        }
    }

    /// Embedded factor table and a logging mailer
    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        let emissions = EmissionService::embedded().context("Failed to load emission factors")?;
        let mailer = Arc::new(LogMailer::new(config.from_email.clone()));
        Ok(Self::new(emissions, mailer, config.history_limit))
    }
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("  Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Full application router
pub fn router(state: AppState, allowed_origins: &[String]) -> Router {
    let state = Arc::new(state);

    Router::new()
        .merge(routes::info_routes())
        .merge(routes::emission_routes())
        .merge(routes::user_routes())
        .fallback(routes::not_found)
        .with_state(state)
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server until ctrl-c
pub async fn run(config: ServerConfig) -> Result<()> {
    let state = AppState::from_config(&config)?;
    let app = router(state, &config.allowed_origins);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("  Listening on http://{}", config.bind_addr);
    info!("  CORS origins: {}", config.allowed_origins.join(", "));

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down gracefully");
        })
        .await?;
    Ok(())
}
