//! Web server implementation using axum

use anyhow::Result;
use axum::http::{header, HeaderValue, Method};
use axum::{middleware, routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use agentdesk_core::api::DeskCore;

use super::api::{self, ApiState};
use super::auth::{self, AuthState};
use super::events;

/// Web server exposing the agent API
pub struct WebServer {
    core: Arc<DeskCore>,
    token: String,
}

impl WebServer {
    /// Create a new web server
    pub fn new(core: Arc<DeskCore>, token: String) -> Self {
        Self { core, token }
    }

    /// Build the full application router
    pub fn router(&self) -> Router {
        let settings = self.core.settings();

        let auth_state = Arc::new(AuthState {
            token: self.token.clone(),
        });
        let api_state = Arc::new(ApiState {
            core: self.core.clone(),
        });

        // API routes (require authentication)
        let api_routes = api::routes(api_state.clone(), settings.ingest.max_upload_bytes)
            .route_layer(middleware::from_fn_with_state(
                auth_state.clone(),
                auth::auth_middleware,
            ));

        // SSE route (require authentication, token may come from the query)
        let events_routes = Router::new()
            .route("/events", get(events::events))
            .with_state(api_state)
            .route_layer(middleware::from_fn_with_state(
                auth_state,
                auth::auth_middleware,
            ));

        Router::new()
            .nest("/api", api_routes)
            .nest("/api", events_routes)
            .layer(cors_layer(&settings.web.allowed_origins))
    }

    /// Run the web server until it fails
    pub async fn run(self) -> Result<()> {
        let port = self.core.settings().web.port;
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        let app = self.router();

        tracing::info!("Web server starting on http://0.0.0.0:{}", port);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}

/// CORS policy: the configured origins with credentials, or any origin
/// without credentials when the list is empty
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if allowed_origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    cors.allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
}
