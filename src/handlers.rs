pub mod clients;
pub mod dashboard;
pub mod listings;
pub mod sales;
pub mod seed;
pub mod settings;
pub mod webhook;

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

// Respostas curtas compartilhadas pelos handlers

#[derive(Debug, Serialize, ToSchema)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedResponse {
    pub id: Uuid,
}
