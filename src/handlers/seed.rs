// src/handlers/seed.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::error::ApiError, config::AppState, middleware::i18n::Locale,
    services::seed_service::SeedResponse,
};

// POST /api/seed
#[utoipa::path(
    post,
    path = "/api/seed",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Cliente de exemplo e um imóvel vinculado", body = SeedResponse)
    )
)]
pub async fn seed(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let seeded = app_state
        .seed_service
        .seed(&app_state.db_pool)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(seeded)))
}
