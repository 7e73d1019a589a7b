// src/handlers/webhook.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    services::webhook_service::{WebhookKind, WebhookResponse},
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct SendWebhookPayload {
    #[schema(example = "https://n8n.exemplo.com/webhook/producao")]
    pub url: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub payload: Option<Value>,
}

impl SendWebhookPayload {
    /// Os dois campos são obrigatórios; url vazia ou payload null contam como ausentes.
    fn into_parts(self) -> Result<(String, Value), AppError> {
        let url = self.url.filter(|u| !u.trim().is_empty());
        let payload = self.payload.filter(|p| !p.is_null());
        match (url, payload) {
            (Some(url), Some(payload)) => Ok((url, payload)),
            _ => Err(AppError::MissingWebhookRequest),
        }
    }
}

// POST /api/webhook/send
#[utoipa::path(
    post,
    path = "/api/webhook/send",
    tag = "Webhook",
    request_body = SendWebhookPayload,
    responses(
        (status = 200, description = "Repete o status do destino; corpo devolvido como texto", body = WebhookResponse),
        (status = 400, description = "url e payload são obrigatórios"),
        (status = 502, description = "O webhook não respondeu"),
        (status = 504, description = "Tempo limite excedido")
    )
)]
pub async fn send_webhook(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<SendWebhookPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let (url, payload) = payload.into_parts().map_err(|e| e.to_api_error(&locale))?;

    let response = app_state
        .webhook
        .send(WebhookKind::Production, &url, &payload, None)
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale))?;

    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::BAD_GATEWAY);
    Ok((status, Json(response)))
}
