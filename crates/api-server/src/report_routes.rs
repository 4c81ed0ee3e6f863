//! Report Generation API Routes
//!
//! Endpoints that run the full pipeline for one symbol and return the
//! assembled report document.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use report_core::ReportDocument;

use crate::{ApiResponse, AppError, AppState};

#[derive(Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub symbol: String,
}

pub fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/api/generate", post(generate_report))
        .route("/api/report/:symbol", get(get_report))
}

async fn generate_report(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<ApiResponse<ReportDocument>>, AppError> {
    build_for_symbol(&state, &request.symbol).await
}

async fn get_report(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<ApiResponse<ReportDocument>>, AppError> {
    build_for_symbol(&state, &symbol).await
}

async fn build_for_symbol(
    state: &AppState,
    symbol: &str,
) -> Result<Json<ApiResponse<ReportDocument>>, AppError> {
    let symbol = symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(AppError::BadRequest("No stock selected.".to_string()));
    }

    let document = state.builder.build_report(&symbol).await?;
    Ok(Json(ApiResponse::success(document)))
}
