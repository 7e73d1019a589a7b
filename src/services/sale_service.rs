// src/services/sale_service.rs

use sqlx::{Executor, Postgres};

use crate::{
    common::error::AppError,
    db::SaleRepository,
    models::sale::{CreateVendaPayload, MonthlySales, Venda},
};

#[derive(Clone)]
pub struct SaleService {
    repo: SaleRepository,
}

impl SaleService {
    pub fn new(repo: SaleRepository) -> Self {
        Self { repo }
    }

    pub async fn register<'e, E>(&self, executor: E, payload: CreateVendaPayload) -> Result<Venda, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let valor = payload.amount()?;
        let descricao = payload.description();
        let venda = self.repo.create(executor, valor, descricao.as_deref()).await?;
        tracing::info!(id = %venda.id, valor = %venda.valor, "venda registrada");
        Ok(venda)
    }

    pub async fn monthly<'e, E>(&self, executor: E) -> Result<Vec<MonthlySales>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.monthly_totals(executor).await
    }
}
