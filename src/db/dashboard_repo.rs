// src/db/dashboard_repo.rs

use sqlx::{Executor, Postgres};

use crate::{common::error::AppError, models::dashboard::Kpis};

#[derive(Clone, Default)]
pub struct DashboardRepository;

impl DashboardRepository {
    pub fn new() -> Self {
        Self
    }

    // Contagens por status + vendas do mês corrente, numa consulta só
    pub async fn kpis<'e, E>(&self, executor: E) -> Result<Kpis, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let kpis = sqlx::query_as::<_, Kpis>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM clients WHERE status = 'lead') AS leads,
                (SELECT COUNT(*) FROM clients WHERE status = 'active') AS clientes_ativos,
                (SELECT COUNT(*) FROM clients WHERE status = 'negotiation') AS negociacoes,
                (
                    SELECT COALESCE(SUM(valor), 0)::NUMERIC(12,2)
                    FROM vendas
                    WHERE date_trunc('month', created_at) = date_trunc('month', NOW())
                ) AS vendas_mes
            "#,
        )
        .fetch_one(executor)
        .await?;
        Ok(kpis)
    }
}
