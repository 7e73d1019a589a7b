// src/db/settings_repo.rs

use serde_json::Value;
use sqlx::{Executor, Postgres};

use crate::common::error::AppError;

// Mapa chave -> JSON. O valor fica em TEXT para preservar a ordem das chaves.
#[derive(Clone, Default)]
pub struct SettingsRepository;

impl SettingsRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn get<'e, E>(&self, executor: E, key: &str) -> Result<Option<Value>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let stored: Option<String> = sqlx::query_scalar("SELECT value FROM settings WHERE key = $1")
            .bind(key)
            .fetch_optional(executor)
            .await?;

        stored
            .map(|text| {
                serde_json::from_str(&text).map_err(|source| AppError::CorruptStoredJson {
                    context: "settings",
                    source,
                })
            })
            .transpose()
    }

    // UPSERT: o valor inteiro é substituído
    pub async fn set<'e, E>(&self, executor: E, key: &str, value: &Value) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO settings (key, value)
            VALUES ($1, $2)
            ON CONFLICT (key)
            DO UPDATE SET value = EXCLUDED.value
            "#,
        )
        .bind(key)
        .bind(value.to_string())
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Grava só se a chave ainda não existir. Retorna `true` quando inseriu.
    pub async fn insert_if_missing<'e, E>(&self, executor: E, key: &str, value: &Value) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            INSERT INTO settings (key, value)
            VALUES ($1, $2)
            ON CONFLICT (key) DO NOTHING
            "#,
        )
        .bind(key)
        .bind(value.to_string())
        .execute(executor)
        .await?;
        Ok(result.rows_affected() == 1)
    }
}
