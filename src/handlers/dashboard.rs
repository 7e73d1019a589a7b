// src/handlers/dashboard.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::error::ApiError,
    config::AppState,
    handlers::OkResponse,
    middleware::i18n::Locale,
    models::settings::{DashboardResponse, UpdateDashboardRequest},
};

// GET /api/dashboard
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "Dashboard",
    responses(
        (status = 200, description = "KPIs, links de pagamento, webhooks e planos", body = DashboardResponse)
    )
)]
pub async fn get_dashboard(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let dashboard = app_state
        .settings_service
        .dashboard(&app_state.db_pool)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(dashboard)))
}

// PUT /api/dashboard
#[utoipa::path(
    put,
    path = "/api/dashboard",
    tag = "Dashboard",
    request_body = UpdateDashboardRequest,
    responses(
        (status = 200, description = "Chaves enviadas foram sobrescritas", body = OkResponse)
    )
)]
pub async fn update_dashboard(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<UpdateDashboardRequest>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .settings_service
        .update_dashboard(&app_state.db_pool, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(OkResponse::ok())))
}
