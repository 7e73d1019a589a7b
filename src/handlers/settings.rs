// src/handlers/settings.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::ApiError,
    config::AppState,
    handlers::OkResponse,
    middleware::i18n::Locale,
    models::settings::{SettingEntry, SettingValue},
};

// GET /api/settings/{key}
#[utoipa::path(
    get,
    path = "/api/settings/{key}",
    tag = "Configurações",
    params(("key" = String, Path, description = "Chave da configuração", example = "webhook_producao")),
    responses(
        (status = 200, description = "Valor salvo", body = SettingEntry),
        (status = 404, description = "Chave inexistente")
    )
)]
pub async fn get_setting(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let value = app_state
        .settings_service
        .get(&app_state.db_pool, &key)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(SettingEntry { key, value })))
}

// PUT /api/settings/{key}
// O corpo é o valor inteiro, gravado como veio.
#[utoipa::path(
    put,
    path = "/api/settings/{key}",
    tag = "Configurações",
    params(("key" = String, Path, description = "Chave da configuração", example = "webhook_producao")),
    request_body = SettingValue,
    responses(
        (status = 200, description = "Gravado", body = OkResponse)
    )
)]
pub async fn update_setting(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(key): Path<String>,
    Json(SettingValue(value)): Json<SettingValue>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .settings_service
        .set(&app_state.db_pool, &key, &value)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    tracing::info!(key = %key, "configuração atualizada");
    Ok((StatusCode::OK, Json(OkResponse::ok())))
}
