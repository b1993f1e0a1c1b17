//! # UGV Mission Dashboard
//!
//! HTTP/JSON surface and CLI for the UGV mission analytics.
//!
//! ## Features
//!
//! - **Dashboard**: every panel for one filter selection in a single response
//! - **Missions**: filtered, scatter-plot ready rows
//! - **Options**: terrain labels, battery bounds and selector values for controls
//!
//! The dataset is loaded once at startup and shared read-only; each request
//! carries its own filter state in the query string.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod selection;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderValue, Method},
    response::IntoResponse,
    routing::get,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use ugv_analytics::{DashboardReport, MissionDataset, queries::ScatterPoint};
use ugv_domain::{BatteryRange, ColorTheme, SuccessFilter, TerrainLabel};

pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use selection::{DashboardParams, FilterSelection};

/// Application state for Axum handlers
#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<MissionDataset>,
    pub color_theme: ColorTheme,
}

impl AppState {
    pub fn new(dataset: MissionDataset, color_theme: ColorTheme) -> Self {
        Self {
            dataset: Arc::new(dataset),
            color_theme,
        }
    }
}

/// Values available to the filter controls
#[derive(Debug, Clone, Serialize)]
pub struct DashboardOptions {
    pub terrains: Vec<TerrainLabel>,
    pub battery: Option<BatteryRange>,
    pub success_filters: Vec<&'static str>,
    pub color_themes: Vec<ColorTheme>,
    pub missions: usize,
}

/// Control values endpoint
pub async fn options(State(state): State<AppState>) -> Json<DashboardOptions> {
    Json(DashboardOptions {
        terrains: state.dataset.terrain_options(),
        battery: state.dataset.battery_bounds(),
        success_filters: SuccessFilter::ALL.iter().map(SuccessFilter::as_str).collect(),
        color_themes: ColorTheme::ALL.to_vec(),
        missions: state.dataset.len(),
    })
}

/// Full dashboard endpoint
pub async fn dashboard(
    State(state): State<AppState>,
    Query(params): Query<DashboardParams>,
) -> ApiResult<Json<DashboardReport>> {
    let (filter, theme) =
        FilterSelection::try_from(params)?.resolve(&state.dataset, state.color_theme)?;
    let report = state.dataset.generate_report(&filter, theme);
    if !report.has_data() {
        tracing::debug!(terrains = filter.terrains.len(), "Dashboard selection matched no missions");
    }
    Ok(Json(report))
}

/// Filtered mission rows endpoint
pub async fn missions(
    State(state): State<AppState>,
    Query(params): Query<DashboardParams>,
) -> ApiResult<Json<Vec<ScatterPoint>>> {
    let (filter, _) =
        FilterSelection::try_from(params)?.resolve(&state.dataset, state.color_theme)?;
    Ok(Json(state.dataset.filter(&filter).scatter_points()))
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    "OK"
}

/// Build the Axum router
pub fn build_router(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/api/options", get(options))
        .route("/api/dashboard", get(dashboard))
        .route("/api/missions", get(missions))
        // Health check
        .route("/health", get(health_check))
        .route("/", get(|| async { "UGV Mission Dashboard API" }))
        // State and middleware
        .with_state(state)
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any);

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        layer.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
