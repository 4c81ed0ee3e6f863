//! HTTP API for the report pipeline.
//!
//! A small JSON surface: the curated stock catalog for the picker, and two
//! endpoints that run the full pipeline and return the assembled report
//! document.

mod report_routes;
mod universe_routes;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use report_builder::ReportBuilder;
use report_core::{MarketDataProvider, ReportError};
use yahoo_client::YahooClient;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub builder: Arc<ReportBuilder>,
}

/// Standard API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

/// API errors
#[derive(Debug)]
pub enum AppError {
    /// The data source could not produce the critical inputs for a symbol
    SourceBusy(String),
    BadRequest(String),
    Internal(anyhow::Error),
}

impl From<ReportError> for AppError {
    fn from(e: ReportError) -> Self {
        match e {
            ReportError::DataUnavailable(symbol) => AppError::SourceBusy(symbol),
            other => AppError::Internal(anyhow::anyhow!(other)),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        AppError::Internal(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::SourceBusy(symbol) => (
                StatusCode::BAD_REQUEST,
                format!(
                    "The data source is currently busy or unavailable for {}. \
                     This can happen with free APIs. Please wait 30 seconds and try again.",
                    symbol
                ),
            ),
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:#}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred while generating the report.".to_string(),
                )
            }
        };

        (
            status,
            Json(json!({
                "success": false,
                "error": message,
            })),
        )
            .into_response()
    }
}

/// Bind and serve the API until the process is stopped
pub async fn run_server() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api_server=info,report_builder=info,yahoo_client=info".into()),
        )
        .init();

    let provider: Arc<dyn MarketDataProvider> = Arc::new(YahooClient::new());
    let state = AppState {
        builder: Arc::new(ReportBuilder::new(provider)),
    };

    let app = Router::new()
        .route("/health", get(health))
        .merge(report_routes::report_routes())
        .merge(universe_routes::universe_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8080);
    let addr = format!("0.0.0.0:{}", port);

    tracing::info!("Report API listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
