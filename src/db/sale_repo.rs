// src/db/sale_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, Postgres};

use crate::{
    common::error::AppError,
    models::sale::{MonthlySales, Venda},
};

// Vendas são só inseridas; não há edição nem exclusão
#[derive(Clone, Default)]
pub struct SaleRepository;

impl SaleRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        valor: Decimal,
        descricao: Option<&str>,
    ) -> Result<Venda, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let venda = sqlx::query_as::<_, Venda>(
            r#"
            INSERT INTO vendas (valor, descricao)
            VALUES ($1, $2)
            RETURNING id, valor, descricao, created_at
            "#,
        )
        .bind(valor)
        .bind(descricao)
        .fetch_one(executor)
        .await?;
        Ok(venda)
    }

    /// Totais dos últimos 12 meses (o mais antigo primeiro), com zero nos meses sem venda.
    pub async fn monthly_totals<'e, E>(&self, executor: E) -> Result<Vec<MonthlySales>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, MonthlySales>(
            r#"
            WITH months AS (
                SELECT generate_series(
                    date_trunc('month', NOW()) - INTERVAL '11 months',
                    date_trunc('month', NOW()),
                    INTERVAL '1 month'
                ) AS month
            )
            SELECT
                m.month::date AS month,
                COALESCE(SUM(v.valor), 0)::NUMERIC(12,2) AS total,
                COUNT(v.id) AS count
            FROM months m
            LEFT JOIN vendas v
                ON date_trunc('month', v.created_at) = m.month
            GROUP BY m.month
            ORDER BY m.month
            "#,
        )
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }
}
