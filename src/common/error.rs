use std::collections::HashMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::{
    middleware::i18n::Locale,
    payload::BuilderError,
    services::webhook_service::{WebhookError, WebhookKind},
};

// Erros de domínio. Os handlers convertem para ApiError com o idioma da requisição.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Payload inválido: {0}")]
    InvalidPayload(#[from] BuilderError),

    #[error("raw_data precisa ser um objeto JSON")]
    InvalidRawData,

    #[error("Nada para atualizar")]
    NothingToUpdate,

    #[error("Valor inválido")]
    InvalidSaleAmount,

    #[error("Nenhum anúncio para importar")]
    EmptyImport,

    #[error("URL do anúncio é obrigatória")]
    MissingListingUrl,

    #[error("url e payload são obrigatórios")]
    MissingWebhookRequest,

    #[error("Cliente não encontrado")]
    ClientNotFound,

    #[error("Anúncio não encontrado")]
    ListingNotFound,

    #[error("Configuração '{0}' não encontrada")]
    SettingNotFound(String),

    #[error(transparent)]
    Webhook(#[from] WebhookError),

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("JSON armazenado inválido em {context}: {source}")]
    CorruptStoredJson {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

/// Resposta de erro no formato que o front já espera: `{ "error": "..." }`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.message, "details": details }),
            None => json!({ "error": self.message }),
        };
        (self.status, Json(body)).into_response()
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::InvalidPayload(_)
            | AppError::InvalidRawData
            | AppError::NothingToUpdate
            | AppError::InvalidSaleAmount
            | AppError::EmptyImport
            | AppError::MissingListingUrl
            | AppError::MissingWebhookRequest => StatusCode::BAD_REQUEST,

            AppError::ClientNotFound | AppError::ListingNotFound | AppError::SettingNotFound(_) => {
                StatusCode::NOT_FOUND
            }

            AppError::Webhook(WebhookError::NotConfigured(_))
            | AppError::Webhook(WebhookError::InvalidUrl(_)) => StatusCode::BAD_REQUEST,
            AppError::Webhook(WebhookError::TimedOut { .. }) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Webhook(WebhookError::NoResponse { .. }) => StatusCode::BAD_GATEWAY,

            AppError::DatabaseError(_)
            | AppError::CorruptStoredJson { .. }
            | AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_api_error(self, locale: &Locale) -> ApiError {
        let status = self.status();
        let en = locale.is_english();

        if status.is_server_error() && !matches!(self, AppError::Webhook(_)) {
            tracing::error!("Erro Interno do Servidor: {:?}", self);
            let message = if en {
                "An unexpected error occurred."
            } else {
                "Ocorreu um erro inesperado."
            };
            return ApiError::new(status, message);
        }

        if let AppError::ValidationError(errors) = &self {
            let mut details: HashMap<String, Vec<String>> = HashMap::new();
            for (field, field_errors) in errors.field_errors() {
                let messages = field_errors
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map_or_else(|| e.code.to_string(), |m| m.to_string())
                    })
                    .collect();
                details.insert(field.to_string(), messages);
            }
            let message = if en {
                "One or more fields are invalid."
            } else {
                "Um ou mais campos são inválidos."
            };
            return ApiError {
                status,
                message: message.to_string(),
                details: Some(json!(details)),
            };
        }

        let message = if en { self.english() } else { self.to_string() };
        if status.is_server_error() {
            tracing::warn!(%status, "{}", self);
        }
        ApiError::new(status, message)
    }

    fn english(&self) -> String {
        match self {
            AppError::InvalidPayload(e) => format!("Invalid payload JSON: {e}"),
            AppError::InvalidRawData => "raw_data must be a JSON object".into(),
            AppError::NothingToUpdate => "Nothing to update".into(),
            AppError::InvalidSaleAmount => "Invalid amount".into(),
            AppError::EmptyImport => {
                "Send an \"items\" array with at least one listing.".into()
            }
            AppError::MissingListingUrl => "The listing URL is required.".into(),
            AppError::MissingWebhookRequest => "url and payload are required".into(),
            AppError::ClientNotFound => "Client not found".into(),
            AppError::ListingNotFound => "Listing not found".into(),
            AppError::SettingNotFound(key) => format!("Setting '{key}' not found"),
            AppError::Webhook(WebhookError::NotConfigured(kind)) => format!(
                "Configure the {} webhook URL in Settings.",
                match kind {
                    WebhookKind::Capture => "capture",
                    WebhookKind::Production => "production",
                }
            ),
            AppError::Webhook(WebhookError::InvalidUrl(url)) => {
                format!("Invalid webhook URL: {url}")
            }
            AppError::Webhook(WebhookError::TimedOut { kind, after }) => match kind {
                WebhookKind::Capture => format!(
                    "The capture webhook took more than {} seconds to respond. In n8n, end the flow with a \"Respond to Webhook\" node returning the listing JSON.",
                    after.as_secs()
                ),
                WebhookKind::Production => {
                    format!("The webhook did not respond within {} seconds.", after.as_secs())
                }
            },
            AppError::Webhook(WebhookError::NoResponse { .. }) => {
                "The webhook did not respond.".into()
            }
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn pt() -> Locale {
        Locale::default()
    }

    fn en() -> Locale {
        Locale("en".into())
    }

    #[test]
    fn not_found_is_distinct_from_internal_errors() {
        let api = AppError::ListingNotFound.to_api_error(&pt());
        assert_eq!(api.status, StatusCode::NOT_FOUND);
        assert_eq!(api.message, "Anúncio não encontrado");
    }

    #[test]
    fn internal_errors_hide_details() {
        let api = AppError::InternalServerError(anyhow::anyhow!("pool exhausted")).to_api_error(&en());
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.message, "An unexpected error occurred.");
    }

    #[test]
    fn webhook_conditions_map_to_distinct_statuses() {
        let not_configured = AppError::Webhook(WebhookError::NotConfigured(WebhookKind::Production));
        assert_eq!(not_configured.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            not_configured.to_api_error(&pt()).message,
            "Configure a URL do webhook de produção em Configurações."
        );

        let timed_out = AppError::Webhook(WebhookError::TimedOut {
            kind: WebhookKind::Capture,
            after: Duration::from_secs(120),
        });
        assert_eq!(timed_out.status(), StatusCode::GATEWAY_TIMEOUT);
        assert!(timed_out.to_api_error(&en()).message.contains("120 seconds"));
    }

    #[test]
    fn validation_errors_carry_field_details() {
        let mut errors = validator::ValidationErrors::new();
        let mut err = validator::ValidationError::new("required");
        err.message = Some("O nome é obrigatório.".into());
        errors.add("name", err);

        let api = AppError::ValidationError(errors).to_api_error(&pt());
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.details.unwrap()["name"][0], "O nome é obrigatório.");
    }

    #[test]
    fn malformed_payload_text_is_a_bad_request() {
        let parse_err = crate::payload::parse_payload_text("{").unwrap_err();
        let api = AppError::from(parse_err).to_api_error(&en());
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert!(api.message.starts_with("Invalid payload JSON"));
    }
}
