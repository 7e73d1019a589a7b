// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

// Cards do topo do painel, sempre calculados do banco
#[derive(Debug, Clone, Default, PartialEq, Serialize, FromRow, ToSchema)]
pub struct Kpis {
    #[schema(example = 12)]
    pub leads: i64,
    #[schema(example = 4)]
    pub clientes_ativos: i64,
    #[schema(example = 2)]
    pub negociacoes: i64,
    // Soma das vendas do mês corrente
    #[schema(value_type = f64, example = 1491.0)]
    pub vendas_mes: Decimal,
}
