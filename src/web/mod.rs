//! Browser UI: login, upload, results tabs and report downloads.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::chat::deepseek::ChatClient;
use crate::chat::Completion;
use crate::Config;

mod error;
mod handlers;
mod pages;
mod session;

pub use session::DEFAULT_IDLE_MINUTES;
use session::SessionStore;

/// Builds the chat backend for a request, given the session's API key override.
pub type ClientFactory =
    Arc<dyn Fn(&Config, Option<&str>) -> anyhow::Result<Box<dyn Completion>> + Send + Sync>;

pub struct AppState {
    pub config: Config,
    pub sessions: SessionStore,
    pub clients: ClientFactory,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let clients: ClientFactory = Arc::new(|config: &Config, api_key: Option<&str>| -> anyhow::Result<Box<dyn Completion>> {
            let client = ChatClient::from_config(config, api_key)?;
            Ok(Box::new(client) as Box<dyn Completion>)
        });
        Self::with_clients(config, clients)
    }

    pub fn with_clients(config: Config, clients: ClientFactory) -> Self {
        let sessions = SessionStore::new(chrono::Duration::minutes(config.session_idle_minutes));
        Self { config, sessions, clients }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let upload_limit = state.config.max_upload_mb * 1024 * 1024;

    Router::new()
        .route("/health", get(handlers::health))
        .route("/login", get(handlers::login_page).post(handlers::login))
        .route("/logout", post(handlers::logout))
        .route("/api-key", post(handlers::set_api_key))
        .route("/api-key/clear", post(handlers::clear_api_key))
        .route("/", get(handlers::index))
        .route("/analyze", post(handlers::analyze))
        .route("/download/:kind", get(handlers::download))
        .layer(DefaultBodyLimit::max(upload_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(config: Config, addr: &str) -> anyhow::Result<()> {
    let state = Arc::new(AppState::new(config));
    let app = router(state);

    info!("Starting script review UI on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
