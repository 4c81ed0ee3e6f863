//! Stock Universe API Routes
//!
//! Endpoint serving the curated sector catalog for the stock picker.

use axum::{routing::get, Json, Router};

use report_builder::universe::{sector_catalog, SectorStocks};

use crate::{ApiResponse, AppState};

pub fn universe_routes() -> Router<AppState> {
    Router::new().route("/api/stocks", get(list_stocks))
}

async fn list_stocks() -> Json<ApiResponse<Vec<SectorStocks>>> {
    Json(ApiResponse::success(sector_catalog()))
}
