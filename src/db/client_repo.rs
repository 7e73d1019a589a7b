// src/db/client_repo.rs

use sqlx::{Executor, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::client::{Client, CreateClientPayload, UpdateClientPayload, CLIENT_TEXT_COLUMNS},
};

const CLIENT_COLUMNS: &str = "id, name, logo_url, status, plan, credits_remaining, \
    email, phone, phone_secondary, document, creci, contact_name, \
    address, city, state, zip, website, instagram, facebook, notes, \
    created_at, updated_at";

// Repositório da tabela 'clients'
#[derive(Clone, Default)]
pub struct ClientRepository;

impl ClientRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn list<'e, E>(&self, executor: E) -> Result<Vec<Client>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let clients = sqlx::query_as::<_, Client>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM clients ORDER BY name"
        ))
        .fetch_all(executor)
        .await?;
        Ok(clients)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Client>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let client = sqlx::query_as::<_, Client>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM clients WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(client)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        payload: &CreateClientPayload,
    ) -> Result<Uuid, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut builder = QueryBuilder::<Postgres>::new("INSERT INTO clients (name, status, credits_remaining");
        for column in CLIENT_TEXT_COLUMNS {
            builder.push(", ").push(column);
        }
        builder.push(") VALUES (");

        let mut values = builder.separated(", ");
        values.push_bind(payload.name.clone());
        values.push_bind(payload.status.unwrap_or_default());
        values.push_bind(payload.credits_remaining);
        for column in CLIENT_TEXT_COLUMNS {
            values.push_bind(payload.text_column(column));
        }
        builder.push(") RETURNING id");

        let id: Uuid = builder.build_query_scalar().fetch_one(executor).await?;
        Ok(id)
    }

    /// UPDATE só com as colunas presentes. Retorna quantas linhas mudaram.
    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        update: &UpdateClientPayload,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut builder = QueryBuilder::<Postgres>::new("UPDATE clients SET ");
        let mut set = builder.separated(", ");

        // Nome vazio é barrado no service; aqui só chega Some(Some(_))
        if let Some(Some(name)) = &update.name {
            set.push("name = ").push_bind_unseparated(name.trim().to_string());
        }
        if let Some(status) = update.status {
            set.push("status = ").push_bind_unseparated(status);
        }
        if let Some(credits) = update.credits_remaining {
            set.push("credits_remaining = ").push_bind_unseparated(credits);
        }
        for (column, value) in update.text_updates() {
            set.push(format!("{column} = ")).push_bind_unseparated(value);
        }
        set.push("updated_at = NOW()");

        builder.push(" WHERE id = ").push_bind(id);

        let result = builder.build().execute(executor).await?;
        Ok(result.rows_affected())
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
