// src/handlers/sales.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::i18n::Locale,
    models::sale::{CreateVendaPayload, MonthlySales, Venda},
};

// POST /api/vendas
#[utoipa::path(
    post,
    path = "/api/vendas",
    tag = "Vendas",
    request_body = CreateVendaPayload,
    responses(
        (status = 201, description = "Venda registrada", body = Venda),
        (status = 400, description = "Valor inválido")
    )
)]
pub async fn create_venda(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<CreateVendaPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let venda = app_state
        .sale_service
        .register(&app_state.db_pool, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(venda)))
}

// GET /api/vendas/mensal
#[utoipa::path(
    get,
    path = "/api/vendas/mensal",
    tag = "Vendas",
    responses(
        (status = 200, description = "Totais dos últimos 12 meses, do mais antigo ao atual", body = Vec<MonthlySales>)
    )
)]
pub async fn monthly_sales(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let months = app_state
        .sale_service
        .monthly(&app_state.db_pool)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(months)))
}
