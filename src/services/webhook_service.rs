// src/services/webhook_service.rs

use std::{
    fmt,
    time::{Duration, Instant},
};

use reqwest::{Client, Url};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use utoipa::ToSchema;

/// A captação espera o n8n processar o link e responder com o imóvel.
pub const CAPTURE_TIMEOUT: Duration = Duration::from_secs(120);

/// Padrão para o disparo de produção e o envio livre.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookKind {
    Capture,
    Production,
}

impl fmt::Display for WebhookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WebhookKind::Capture => f.write_str("captação"),
            WebhookKind::Production => f.write_str("produção"),
        }
    }
}

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("Configure a URL do webhook de {0} em Configurações.")]
    NotConfigured(WebhookKind),

    #[error("URL de webhook inválida: {0}")]
    InvalidUrl(String),

    #[error("{}", timeout_message(.kind, .after))]
    TimedOut { kind: WebhookKind, after: Duration },

    #[error("O webhook de {kind} não respondeu.")]
    NoResponse {
        kind: WebhookKind,
        #[source]
        source: reqwest::Error,
    },
}

fn timeout_message(kind: &WebhookKind, after: &Duration) -> String {
    match kind {
        WebhookKind::Capture => format!(
            "O webhook de captação demorou mais de {} segundos para responder. No n8n, use o nó \"Respond to Webhook\" ao final do fluxo e retorne o JSON do imóvel.",
            after.as_secs()
        ),
        WebhookKind::Production => format!(
            "O webhook de produção não respondeu em {} segundos.",
            after.as_secs()
        ),
    }
}

/// O que o operador vê depois do disparo. Status fora de 2xx não é erro:
/// vem com `ok = false` e o corpo como veio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct WebhookResponse {
    pub ok: bool,
    #[schema(example = 200)]
    pub status: u16,
    pub body: String,
}

/// POST único com timeout. Sem fila e sem nova tentativa.
#[derive(Clone)]
pub struct WebhookDispatcher {
    client: Client,
    default_timeout: Duration,
}

impl WebhookDispatcher {
    pub fn new(default_timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("divulgaimob/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            default_timeout,
        })
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    pub async fn send(
        &self,
        kind: WebhookKind,
        url: &str,
        payload: &Value,
        timeout: Option<Duration>,
    ) -> Result<WebhookResponse, WebhookError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(WebhookError::NotConfigured(kind));
        }
        let target = Url::parse(url).map_err(|_| WebhookError::InvalidUrl(url.to_string()))?;
        let timeout = timeout.unwrap_or(self.default_timeout);
        let host = target.host_str().unwrap_or_default().to_string();
        let started = Instant::now();

        let response = self
            .client
            .post(target)
            .json(payload)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify(kind, timeout, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| classify(kind, timeout, e))?;

        tracing::info!(
            %kind,
            host = %host,
            status = status.as_u16(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "webhook disparado"
        );

        Ok(WebhookResponse {
            ok: status.is_success(),
            status: status.as_u16(),
            body,
        })
    }

    pub async fn send_capture(
        &self,
        url: &str,
        payload: &Value,
    ) -> Result<WebhookResponse, WebhookError> {
        self.send(WebhookKind::Capture, url, payload, Some(CAPTURE_TIMEOUT))
            .await
    }

    pub async fn send_production(
        &self,
        url: &str,
        payload: &Value,
    ) -> Result<WebhookResponse, WebhookError> {
        self.send(WebhookKind::Production, url, payload, None).await
    }
}

fn classify(kind: WebhookKind, timeout: Duration, error: reqwest::Error) -> WebhookError {
    if error.is_timeout() {
        tracing::warn!(%kind, timeout_secs = timeout.as_secs(), "webhook excedeu o tempo limite");
        WebhookError::TimedOut {
            kind,
            after: timeout,
        }
    } else {
        tracing::warn!(%kind, error = %error, "webhook não respondeu");
        WebhookError::NoResponse {
            kind,
            source: error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn blank_url_means_not_configured() {
        let dispatcher = WebhookDispatcher::new(DEFAULT_TIMEOUT).unwrap();
        let err = dispatcher
            .send_production("   ", &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, WebhookError::NotConfigured(WebhookKind::Production)));
    }

    #[tokio::test]
    async fn garbage_url_is_rejected_before_sending() {
        let dispatcher = WebhookDispatcher::new(DEFAULT_TIMEOUT).unwrap();
        let err = dispatcher
            .send_capture("not a url", &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, WebhookError::InvalidUrl(_)));
    }

    #[test]
    fn capture_timeout_message_mentions_n8n() {
        let err = WebhookError::TimedOut {
            kind: WebhookKind::Capture,
            after: CAPTURE_TIMEOUT,
        };
        let message = err.to_string();
        assert!(message.contains("120 segundos"));
        assert!(message.contains("Respond to Webhook"));
    }
}
