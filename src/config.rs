// src/config.rs

use std::{env, str::FromStr, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{ClientRepository, DashboardRepository, ListingRepository, SaleRepository, SettingsRepository},
    payload::BuilderConfig,
    services::{
        client_service::ClientService, listing_service::ListingService, materials_service::MaterialsService,
        sale_service::SaleService, seed_service::SeedService, settings_service::SettingsService,
        webhook_service::WebhookDispatcher,
    },
};

pub const DEFAULT_MATERIAIS_BASE_URL: &str = "https://firemode.s3.us-east-1.amazonaws.com/firemode/imob";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub db_max_connections: u32,
    /// Disparo de produção e envio livre. A captação tem tempo próprio.
    pub webhook_timeout: Duration,
    pub materiais_base_url: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    // Os testes passam um mapa no lugar do ambiente
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL deve ser definida")?;

        Ok(Self {
            database_url,
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "PORT", 3333)?,
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 5)?,
            webhook_timeout: Duration::from_secs(parse_or(&lookup, "WEBHOOK_TIMEOUT_SECS", 30)?),
            materiais_base_url: lookup("MATERIAIS_BASE_URL")
                .filter(|url| !url.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_MATERIAIS_BASE_URL.to_string()),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} inválido: '{raw}'")),
        None => Ok(default),
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Arc<AppConfig>,
    pub webhook: WebhookDispatcher,
    pub client_service: ClientService,
    pub listing_service: ListingService,
    pub settings_service: SettingsService,
    pub sale_service: SaleService,
    pub seed_service: SeedService,
}

impl AppState {
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Self::from_parts(db_pool, config)
    }

    /// Monta o grafo de dependências sobre um pool já criado.
    pub fn from_parts(db_pool: PgPool, config: AppConfig) -> anyhow::Result<Self> {
        let webhook = WebhookDispatcher::new(config.webhook_timeout)?;
        let materials = MaterialsService::new(&config.materiais_base_url)?;

        let listing_service = ListingService::new(
            ListingRepository::new(),
            SettingsRepository::new(),
            webhook.clone(),
            materials,
            BuilderConfig::default(),
        );

        Ok(Self {
            db_pool,
            config: Arc::new(config),
            webhook,
            client_service: ClientService::new(ClientRepository::new()),
            listing_service,
            settings_service: SettingsService::new(SettingsRepository::new(), DashboardRepository::new()),
            sale_service: SaleService::new(SaleRepository::new()),
            seed_service: SeedService::new(ClientRepository::new(), ListingRepository::new()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_the_database_is_set() {
        let config = AppConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://localhost/imob")])).unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:3333");
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.webhook_timeout, Duration::from_secs(30));
        assert_eq!(config.materiais_base_url, DEFAULT_MATERIAIS_BASE_URL);
    }

    #[test]
    fn database_url_is_required() {
        assert!(AppConfig::from_lookup(lookup(&[])).is_err());
    }

    #[test]
    fn malformed_numbers_are_startup_errors() {
        let err = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/imob"),
            ("PORT", "abc"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn overrides_are_read() {
        let config = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/imob"),
            ("PORT", "8080"),
            ("WEBHOOK_TIMEOUT_SECS", "5"),
            ("MATERIAIS_BASE_URL", "https://cdn.example.com/imob"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.webhook_timeout, Duration::from_secs(5));
        assert_eq!(config.materiais_base_url, "https://cdn.example.com/imob");
    }
}
