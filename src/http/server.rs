//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Build the axum application with a catch-all handler
//! - Decide per request: proxy relay, CGI execution, or static fallback
//! - Run the server with graceful shutdown on interrupt
//!
//! # Design Decisions
//! - One shared reqwest Client for all relays, built once at startup with
//!   the configured timeout (no timeout by default)
//! - Only GET requests are considered for proxying; other methods go to
//!   the static handler's own logic
//! - A matching prefix always wins over a same-named file on disk
//! - Relay failures answer 502/504 for that one request; the listener and
//!   other connections are unaffected

use axum::{
    body::Body,
    extract::State,
    http::{Method, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceExt;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::config::ServerConfig;
use crate::http::cgi;
use crate::http::relay::{relay, RelayError};
use crate::lifecycle::shutdown_signal;

/// Application state injected into the request handler.
///
/// Everything here is read-only after startup, so handlers share it
/// without synchronization.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub client: reqwest::Client,
    pub static_files: ServeDir,
}

/// The development HTTP server.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new server from a validated configuration.
    pub fn new(config: Arc<ServerConfig>) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.upstream_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        let static_files = ServeDir::new(&config.static_dir);
        let state = AppState {
            config,
            client,
            static_files,
        };

        Ok(Self {
            router: Self::build_router(state),
        })
    }

    /// Build the axum router. Every path goes through one handler; the
    /// routing decision lives in the ProxyTable, not in axum routes.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/", any(serve_request))
            .route("/{*path}", any(serve_request))
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener until
    /// an interrupt arrives.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Catch-all handler: proxy relay, CGI, or static fallback.
async fn serve_request(State(state): State<AppState>, request: Request<Body>) -> Response {
    if state.config.cgi {
        if cgi::is_cgi_path(request.uri().path()) {
            return cgi::execute(&state.config, request).await;
        }
        return serve_static(&state, request).await;
    }

    if request.method() == Method::GET {
        if let Some(upstream_url) = state.config.proxy.resolve(request.uri().path()) {
            let url = match request.uri().query() {
                Some(query) => format!("{}?{}", upstream_url, query),
                None => upstream_url,
            };
            return match relay(&state.client, &url).await {
                Ok(upstream) => upstream.into_response(),
                Err(e) => relay_failure(&url, e),
            };
        }
    }

    serve_static(&state, request).await
}

fn relay_failure(url: &str, error: RelayError) -> Response {
    tracing::warn!(url = %url, error = %error, "Relay failed");
    (error.client_status(), format!("Proxy error: {}\n", error)).into_response()
}

/// Hand the request to the static file collaborator unchanged.
async fn serve_static(state: &AppState, request: Request<Body>) -> Response {
    match state.static_files.clone().oneshot(request).await {
        Ok(response) => response.into_response(),
        // ServeDir's error is infallible; this arm satisfies the signature.
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}
