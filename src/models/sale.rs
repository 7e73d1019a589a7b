// src/models/sale.rs

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::error::AppError;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Venda {
    pub id: Uuid,
    #[schema(value_type = f64, example = 497.0)]
    pub valor: Decimal,
    pub descricao: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateVendaPayload {
    /// Número ou string numérica, nunca negativo.
    #[schema(value_type = f64, example = 497.0)]
    #[serde(default)]
    pub valor: Value,
    #[schema(example = "Plano 497 - Regina Guerreiro")]
    pub descricao: Option<String>,
}

impl CreateVendaPayload {
    pub fn amount(&self) -> Result<Decimal, AppError> {
        let parsed = match &self.valor {
            Value::Number(n) => Decimal::from_str(&n.to_string())
                .or_else(|_| Decimal::from_scientific(&n.to_string()))
                .ok(),
            Value::String(s) => {
                let s = s.trim();
                Decimal::from_str(s)
                    .or_else(|_| Decimal::from_scientific(s))
                    .ok()
            }
            _ => None,
        };
        // A coluna é NUMERIC(12,2): arredonda em centavos e não passa de 10 dígitos inteiros
        match parsed.map(|valor| valor.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)) {
            Some(valor) if valor >= Decimal::ZERO && valor < max_amount() => Ok(valor),
            _ => Err(AppError::InvalidSaleAmount),
        }
    }

    pub fn description(&self) -> Option<String> {
        self.descricao.clone().filter(|d| !d.is_empty())
    }
}

fn max_amount() -> Decimal {
    Decimal::new(10_i64.pow(10), 0)
}

// Total de um mês para o gráfico de vendas
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct MonthlySales {
    #[schema(value_type = String, example = "2026-10-01")]
    pub month: NaiveDate,
    #[schema(value_type = f64, example = 1491.0)]
    pub total: Decimal,
    pub count: i64,
}
