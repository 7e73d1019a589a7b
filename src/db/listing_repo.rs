// src/db/listing_repo.rs

use serde_json::{Map, Value};
use sqlx::{Executor, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::listing::{Listing, ListingChanges, ListingRow},
};

const LISTING_COLUMNS: &str =
    "id, client_id, source_url, raw_data, selected_images, webhook_payload, created_at, updated_at";

// Dados para um INSERT em 'listings'
#[derive(Debug, Default)]
pub struct NewListing {
    pub client_id: Option<Uuid>,
    pub source_url: Option<String>,
    pub raw_data: Map<String, Value>,
    pub selected_images: Option<Vec<String>>,
    pub webhook_payload: Option<Value>,
}

#[derive(Clone, Default)]
pub struct ListingRepository;

impl ListingRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn list<'e, E>(&self, executor: E, client_id: Option<Uuid>) -> Result<Vec<Listing>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut builder = QueryBuilder::<Postgres>::new(format!("SELECT {LISTING_COLUMNS} FROM listings"));
        if let Some(client_id) = client_id {
            builder.push(" WHERE client_id = ").push_bind(client_id);
        }
        builder.push(" ORDER BY updated_at DESC");

        let rows = builder
            .build_query_as::<ListingRow>()
            .fetch_all(executor)
            .await?;

        rows.into_iter().map(Listing::try_from).collect()
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Listing>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, ListingRow>(&format!(
            "SELECT {LISTING_COLUMNS} FROM listings WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;

        row.map(Listing::try_from).transpose()
    }

    pub async fn create<'e, E>(&self, executor: E, listing: &NewListing) -> Result<Uuid, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO listings (client_id, source_url, raw_data, selected_images, webhook_payload)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(listing.client_id)
        .bind(listing.source_url.as_deref())
        .bind(to_text(&listing.raw_data))
        .bind(listing.selected_images.as_ref().map(to_text))
        .bind(listing.webhook_payload.as_ref().map(to_text))
        .fetch_one(executor)
        .await?;
        Ok(id)
    }

    /// UPDATE só com as colunas presentes. Retorna quantas linhas mudaram.
    pub async fn update<'e, E>(&self, executor: E, id: Uuid, changes: &ListingChanges) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut builder = QueryBuilder::<Postgres>::new("UPDATE listings SET ");
        let mut set = builder.separated(", ");

        if let Some(raw_data) = &changes.raw_data {
            set.push("raw_data = ").push_bind_unseparated(to_text(raw_data));
        }
        if let Some(selected) = &changes.selected_images {
            set.push("selected_images = ")
                .push_bind_unseparated(selected.as_ref().map(to_text));
        }
        if let Some(payload) = &changes.webhook_payload {
            set.push("webhook_payload = ")
                .push_bind_unseparated(payload.as_ref().map(to_text));
        }
        if let Some(source_url) = &changes.source_url {
            set.push("source_url = ").push_bind_unseparated(source_url.clone());
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
        let result = sqlx::query("DELETE FROM listings WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}

// Map, Vec<String> e Value sempre serializam
fn to_text<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}
