// src/models/settings.rs

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use utoipa::ToSchema;

use super::dashboard::Kpis;

// Chaves conhecidas da tabela settings
pub const PAYMENT_LINKS: &str = "payment_links";
pub const WEBHOOK_CAPTACAO: &str = "webhook_captacao";
pub const WEBHOOK_PRODUCAO: &str = "webhook_producao";
pub const PLANS: &str = "plans";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Plan {
    #[schema(example = "497")]
    pub id: String,
    #[schema(example = "R$ 497")]
    pub label: String,
    #[schema(example = 497)]
    pub price: f64,
    #[schema(example = "Vídeos simples")]
    pub credit_label: String,
    #[schema(example = 10)]
    pub credit_count: i64,
    // O front sempre recebe string, mesmo que o valor salvo não tenha a chave
    #[serde(default)]
    pub payment_url: String,
}

impl Plan {
    fn stock(price: u32, credit_label: &str, credit_count: i64) -> Self {
        Self {
            id: price.to_string(),
            label: format!("R$ {price}"),
            price: f64::from(price),
            credit_label: credit_label.to_string(),
            credit_count,
            payment_url: String::new(),
        }
    }
}

pub fn default_plans() -> Vec<Plan> {
    vec![
        Plan::stock(297, "Vídeos simples", 5),
        Plan::stock(497, "Vídeos simples", 10),
        Plan::stock(997, "Vídeos com narração", 10),
    ]
}

pub fn default_payment_links() -> Value {
    json!({ "plan_65": "", "plan_297": "", "plan_497": "" })
}

/// Valores gravados na inicialização quando a chave ainda não existe.
pub fn default_settings() -> Vec<(&'static str, Value)> {
    vec![
        (PAYMENT_LINKS, default_payment_links()),
        (WEBHOOK_CAPTACAO, Value::from("")),
        (WEBHOOK_PRODUCAO, Value::from("")),
        (PLANS, json!(default_plans())),
    ]
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponse {
    pub kpis: Kpis,
    #[schema(value_type = Object)]
    pub payment_links: Value,
    pub webhook_captacao: String,
    pub webhook_producao: String,
    pub plans: Vec<Plan>,
}

/// Cada chave presente sobrescreve o valor inteiro.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateDashboardRequest {
    #[schema(value_type = Option<Object>)]
    pub payment_links: Option<Value>,
    #[schema(example = "https://n8n.exemplo.com/webhook/captacao")]
    pub webhook_captacao: Option<String>,
    #[schema(example = "https://n8n.exemplo.com/webhook/producao")]
    pub webhook_producao: Option<String>,
    pub plans: Option<Vec<Plan>>,
}

impl UpdateDashboardRequest {
    pub fn into_entries(self) -> Vec<(&'static str, Value)> {
        let mut entries = Vec::new();
        if let Some(links) = self.payment_links {
            entries.push((PAYMENT_LINKS, links));
        }
        if let Some(url) = self.webhook_captacao {
            entries.push((WEBHOOK_CAPTACAO, Value::from(url)));
        }
        if let Some(url) = self.webhook_producao {
            entries.push((WEBHOOK_PRODUCAO, Value::from(url)));
        }
        if let Some(plans) = self.plans {
            entries.push((PLANS, json!(plans)));
        }
        entries
    }
}

/// Lê uma URL de webhook salva. Null ou tipo inesperado contam como vazio.
pub fn setting_as_url(value: Option<Value>) -> String {
    match value {
        Some(Value::String(url)) => url,
        _ => String::new(),
    }
}

/// Planos salvos; se o valor estiver num formato antigo, volta aos padrões.
pub fn setting_as_plans(value: Option<Value>) -> Vec<Plan> {
    value
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_else(default_plans)
}

pub fn setting_as_object(value: Option<Value>, fallback: impl FnOnce() -> Value) -> Value {
    match value {
        Some(v @ Value::Object(_)) => v,
        _ => fallback(),
    }
}

/// Valor bruto de uma chave; qualquer JSON.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct SettingValue(pub Value);

#[derive(Debug, Serialize, ToSchema)]
pub struct SettingEntry {
    #[schema(example = "webhook_producao")]
    pub key: String,
    #[schema(value_type = Object)]
    pub value: Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_plans_match_the_price_table() {
        let plans = default_plans();
        let ids: Vec<&str> = plans.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["297", "497", "997"]);
        assert_eq!(plans[0].label, "R$ 297");
        assert_eq!(plans[0].credit_count, 5);
        assert_eq!(plans[2].credit_label, "Vídeos com narração");
    }

    #[test]
    fn missing_payment_url_defaults_to_empty() {
        let plans = setting_as_plans(Some(json!([{
            "id": "65", "label": "R$ 65", "price": 65,
            "credit_label": "Teste", "credit_count": 1
        }])));
        assert_eq!(plans[0].payment_url, "");
    }

    #[test]
    fn unreadable_plans_fall_back_to_defaults() {
        assert_eq!(setting_as_plans(Some(json!("oops"))), default_plans());
        assert_eq!(setting_as_plans(None), default_plans());
    }

    #[test]
    fn only_present_keys_are_written() {
        let update: UpdateDashboardRequest =
            serde_json::from_value(json!({ "webhook_producao": "https://hook" })).unwrap();
        let entries = update.into_entries();
        assert_eq!(entries, vec![(WEBHOOK_PRODUCAO, json!("https://hook"))]);
    }

    #[test]
    fn webhook_urls_tolerate_null() {
        assert_eq!(setting_as_url(Some(Value::Null)), "");
        assert_eq!(setting_as_url(Some(json!("https://x"))), "https://x");
    }
}
