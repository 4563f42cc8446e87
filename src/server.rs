//! HTTP front end for the veracity pipeline.
//!
//! ## Endpoints
//!
//! - `GET /search?q=<query>`: annotated search results as a JSON array
//! - `GET /health`: liveness probe

use axum::Router;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::info;
use veracity_core::{AnswerService, PageFetcher, SearchService, VeracityError, VeracityPipeline};

use crate::config::ServerConfig;
use crate::error::{Result, ServiceError};

/// Query string of `GET /search`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    /// The free-text search query.
    pub q: Option<String>,
}

impl SearchParams {
    /// Build from raw query pairs. The first `q` wins when it repeats.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            q: pairs
                .iter()
                .find(|(key, _)| key == "q")
                .map(|(_, value)| value.clone()),
        }
    }
}

/// Veracity HTTP server running in a background task.
pub struct VeracityServer {
    /// The address the server is listening on.
    addr: SocketAddr,
    /// Handle to the background server task.
    handle: JoinHandle<()>,
}

impl VeracityServer {
    /// Start the server.
    ///
    /// Binds to `{config.host}:{config.port}` (use port `0` for auto-assign)
    /// and begins serving in a background tokio task.
    ///
    /// # Errors
    ///
    /// Returns an error if the TCP listener cannot bind.
    pub async fn start<A, S, F>(
        pipeline: Arc<VeracityPipeline<A, S, F>>,
        config: &ServerConfig,
    ) -> Result<Self>
    where
        A: AnswerService + 'static,
        S: SearchService + 'static,
        F: PageFetcher + 'static,
    {
        let app = router(pipeline);

        let listener = TcpListener::bind(config.bind_addr())
            .await
            .map_err(|e| ServiceError::Server(format!("bind failed: {e}")))?;

        let addr = listener
            .local_addr()
            .map_err(|e| ServiceError::Server(format!("failed to get local addr: {e}")))?;

        info!("veracity server listening on http://{addr}");

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("veracity server error: {e}");
            }
        });

        Ok(Self { addr, handle })
    }

    /// Returns the address the server is listening on.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Returns the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Abort the server task.
    pub fn shutdown(&self) {
        self.handle.abort();
    }
}

impl Drop for VeracityServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Build the service router over a shared pipeline.
pub fn router<A, S, F>(pipeline: Arc<VeracityPipeline<A, S, F>>) -> Router
where
    A: AnswerService + 'static,
    S: SearchService + 'static,
    F: PageFetcher + 'static,
{
    Router::new()
        .route("/search", get(handle_search::<A, S, F>))
        .route("/health", get(handle_health))
        .with_state(pipeline)
}

/// Map a pipeline error onto a status code and JSON error body.
pub fn error_response(err: &VeracityError) -> Response {
    let status = match err {
        VeracityError::MissingQuery | VeracityError::UnsupportedTopic { .. } => {
            StatusCode::BAD_REQUEST
        }
        VeracityError::Search(_) | VeracityError::Http(_) | VeracityError::Parse(_) => {
            StatusCode::BAD_GATEWAY
        }
        VeracityError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let body = match err {
        VeracityError::UnsupportedTopic {
            detected,
            supported,
        } => json!({
            "error": err.to_string(),
            "supportedTopics": supported,
            "detectedTopic": detected,
        }),
        _ => json!({ "error": err.to_string() }),
    };

    (status, Json(body)).into_response()
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// JSON 400 for a query string that could not be decoded.
fn rejection_response(rejection: &QueryRejection) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": rejection.body_text() })),
    )
        .into_response()
}

/// `GET /search?q=`: score the results of a query.
async fn handle_search<A, S, F>(
    State(pipeline): State<Arc<VeracityPipeline<A, S, F>>>,
    pairs: std::result::Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Response
where
    A: AnswerService + 'static,
    S: SearchService + 'static,
    F: PageFetcher + 'static,
{
    let params = match pairs {
        Ok(Query(pairs)) => SearchParams::from_pairs(&pairs),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "rejected search query string");
            return rejection_response(&rejection);
        }
    };
    let query = params.q.unwrap_or_default();
    match pipeline.run(&query).await {
        Ok(results) => Json(results).into_response(),
        Err(err) => {
            if err.is_client_error() {
                tracing::debug!(error = %err, "rejected search request");
            } else {
                tracing::error!(error = %err, "search request failed");
            }
            error_response(&err)
        }
    }
}

/// `GET /health`: liveness probe.
async fn handle_health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
