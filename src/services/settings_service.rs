// src/services/settings_service.rs

use serde_json::Value;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{DashboardRepository, SettingsRepository},
    models::settings::{
        default_payment_links, default_settings, setting_as_object, setting_as_plans, setting_as_url,
        DashboardResponse, UpdateDashboardRequest, PAYMENT_LINKS, PLANS, WEBHOOK_CAPTACAO, WEBHOOK_PRODUCAO,
    },
};

#[derive(Clone)]
pub struct SettingsService {
    repo: SettingsRepository,
    dashboard_repo: DashboardRepository,
}

impl SettingsService {
    pub fn new(repo: SettingsRepository, dashboard_repo: DashboardRepository) -> Self {
        Self { repo, dashboard_repo }
    }

    /// Grava os padrões que faltam. Valores existentes nunca são tocados.
    pub async fn ensure_defaults(&self, pool: &PgPool) -> Result<usize, AppError> {
        let mut inserted = 0;
        for (key, value) in default_settings() {
            if self.repo.insert_if_missing(pool, key, &value).await? {
                tracing::info!(key, "configuração padrão criada");
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    pub async fn dashboard(&self, pool: &PgPool) -> Result<DashboardResponse, AppError> {
        let kpis = self.dashboard_repo.kpis(pool).await?;

        Ok(DashboardResponse {
            kpis,
            payment_links: setting_as_object(self.repo.get(pool, PAYMENT_LINKS).await?, default_payment_links),
            webhook_captacao: setting_as_url(self.repo.get(pool, WEBHOOK_CAPTACAO).await?),
            webhook_producao: setting_as_url(self.repo.get(pool, WEBHOOK_PRODUCAO).await?),
            plans: setting_as_plans(self.repo.get(pool, PLANS).await?),
        })
    }

    pub async fn update_dashboard(&self, pool: &PgPool, request: UpdateDashboardRequest) -> Result<(), AppError> {
        let entries = request.into_entries();
        if entries.is_empty() {
            return Ok(());
        }

        let mut tx = pool.begin().await?;
        for (key, value) in &entries {
            self.repo.set(&mut *tx, key, value).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    pub async fn get(&self, pool: &PgPool, key: &str) -> Result<Value, AppError> {
        self.repo
            .get(pool, key)
            .await?
            .ok_or_else(|| AppError::SettingNotFound(key.to_string()))
    }

    pub async fn set(&self, pool: &PgPool, key: &str, value: &Value) -> Result<(), AppError> {
        self.repo.set(pool, key, value).await
    }
}
