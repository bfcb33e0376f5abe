//! API Server
//!
//! HTTP façade over the price service:
//! - GET  /currency/all                  -> every cached entry
//! - GET  /currency/{symbol}             -> one entry
//! - POST /internal/add/support/{symbol} -> register a new symbol
//! - GET  /status                        -> refresher counters

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::Level;

use crate::core::{CacheEntry, Symbol};
use crate::exchanges::MarketDataSource;
use crate::infrastructure::config::ApiConfig;
use crate::service::PriceService;
use crate::{log_api, Error};

/// Path segment that lists every entry instead of looking one up
pub const ALL_SYMBOLS: &str = "all";

/// Body for non-entry responses
#[derive(Debug, Serialize)]
pub struct MessageDto {
    pub message: String,
}

impl MessageDto {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Service health and refresh counters
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusDto {
    pub cached_symbols: usize,
    pub registered_symbols: usize,
    pub refresh_success: u64,
    pub refresh_failure: u64,
    pub refresh_missing: u64,
    pub registrations: u64,
    /// Last successful refresh, unix millis (0 = never)
    pub last_refresh_ms: u64,
    pub refresh_rate: f64,
    pub staleness_ms: u64,
    pub uptime_seconds: u64,
}

/// Shared application state
pub struct AppState<S> {
    pub service: Arc<PriceService<S>>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::AlreadyRegistered(_) => StatusCode::CONFLICT,
            Error::NotTradable(_) | Error::InvalidSymbol(_) => StatusCode::BAD_REQUEST,
            Error::Unavailable => StatusCode::BAD_GATEWAY,
            Error::Config(_) | Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = match &self {
            Error::NotFound(_) => "Not a valid symbol".to_string(),
            Error::Config(_) | Error::Io(_) => "Internal Server Error".to_string(),
            other => other.to_string(),
        };

        (status, Json(MessageDto::new(message))).into_response()
    }
}

/// Build the router over a shared service
pub fn router<S: MarketDataSource>(service: Arc<PriceService<S>>) -> Router {
    Router::new()
        .route("/currency/:symbol", get(get_currency::<S>))
        .route("/internal/add/support/:symbol", post(add_symbol::<S>))
        .route("/status", get(get_status::<S>))
        .layer(CorsLayer::permissive())
        .with_state(AppState { service })
}

/// Start the API server and run until `shutdown` resolves
pub async fn start_server<S, F>(
    service: Arc<PriceService<S>>,
    config: &ApiConfig,
    shutdown: F,
) -> Result<(), Error>
where
    S: MarketDataSource,
    F: Future<Output = ()> + Send + 'static,
{
    let app = router(service);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    log_api!(Level::INFO, "API Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    log_api!(Level::INFO, "API Server stopped");
    Ok(())
}

/// Handler for GET /currency/{symbol}
/// `all` returns every entry; anything else looks up one symbol,
/// normalized the same way registration normalizes it
async fn get_currency<S: MarketDataSource>(
    State(state): State<AppState<S>>,
    Path(symbol): Path<String>,
) -> Result<Response, Error> {
    if symbol.trim() == ALL_SYMBOLS {
        let entries: Vec<CacheEntry> = state.service.get_all();
        return Ok(Json(entries).into_response());
    }

    let symbol = Symbol::parse(&symbol).map_err(|_| Error::NotFound(symbol.clone()))?;
    let entry = state.service.get_one(symbol.as_str())?;
    Ok(Json(entry).into_response())
}

/// Handler for POST /internal/add/support/{symbol}
async fn add_symbol<S: MarketDataSource>(
    State(state): State<AppState<S>>,
    Path(symbol): Path<String>,
) -> Result<(StatusCode, Json<MessageDto>), Error> {
    let symbol = Symbol::parse(&symbol)?;

    match state.service.register(symbol.clone()).await {
        Ok(_) => {
            log_api!(Level::INFO, "Added support for {}", symbol);
            Ok((StatusCode::CREATED, Json(MessageDto::new("Added successfully"))))
        }
        Err(e) => {
            log_api!(Level::WARN, "Failed to add {}: {}", symbol, e);
            Err(e)
        }
    }
}

/// Handler for GET /status
async fn get_status<S: MarketDataSource>(State(state): State<AppState<S>>) -> Json<StatusDto> {
    let metrics = state.service.metrics();
    let snapshot = metrics.snapshot();

    Json(StatusDto {
        cached_symbols: state.service.cache().len(),
        registered_symbols: state.service.registry().len(),
        refresh_success: snapshot.refresh_success,
        refresh_failure: snapshot.refresh_failure,
        refresh_missing: snapshot.refresh_missing,
        registrations: snapshot.registrations,
        last_refresh_ms: snapshot.last_refresh_ms,
        refresh_rate: snapshot.refresh_rate,
        staleness_ms: metrics.staleness_ms(),
        uptime_seconds: snapshot.uptime_seconds,
    })
}
