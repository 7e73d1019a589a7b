// src/models/client.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// --- ENUMS ---

// Mapeia o CREATE TYPE client_status do banco
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "client_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ClientStatus {
    #[default]
    Lead,
    Active,
    Negotiation,
}

// --- CLIENTE ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Client {
    pub id: Uuid,

    #[schema(example = "Regina Guerreiro Imoveis")]
    pub name: String,
    pub logo_url: Option<String>,
    pub status: ClientStatus,

    // Referência ao id do plano (ver Settings.plans)
    #[schema(example = "497")]
    pub plan: Option<String>,
    #[schema(example = 10)]
    pub credits_remaining: Option<i32>,

    pub email: Option<String>,
    pub phone: Option<String>,
    pub phone_secondary: Option<String>,
    // CNPJ / CPF
    pub document: Option<String>,
    pub creci: Option<String>,
    pub contact_name: Option<String>,

    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,

    pub website: Option<String>,
    pub instagram: Option<String>,
    pub facebook: Option<String>,
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Colunas de texto opcionais, na ordem da tabela
pub const CLIENT_TEXT_COLUMNS: [&str; 16] = [
    "logo_url",
    "plan",
    "email",
    "phone",
    "phone_secondary",
    "document",
    "creci",
    "contact_name",
    "address",
    "city",
    "state",
    "zip",
    "website",
    "instagram",
    "facebook",
    "notes",
];

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CreateClientPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[schema(example = "Regina Guerreiro Imoveis")]
    pub name: String,

    #[serde(default)]
    pub status: Option<ClientStatus>,

    #[validate(range(min = 0, message = "Os créditos não podem ser negativos."))]
    pub credits_remaining: Option<i32>,

    #[validate(email(message = "E-mail inválido."))]
    pub email: Option<String>,

    pub logo_url: Option<String>,
    pub plan: Option<String>,
    pub phone: Option<String>,
    pub phone_secondary: Option<String>,
    pub document: Option<String>,
    pub creci: Option<String>,
    pub contact_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub website: Option<String>,
    pub instagram: Option<String>,
    pub facebook: Option<String>,
    pub notes: Option<String>,
}

impl CreateClientPayload {
    /// Strings vazias do formulário viram null antes da validação.
    /// O nome perde os espaços das pontas; só espaços conta como vazio.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        for field in [
            &mut self.email,
            &mut self.logo_url,
            &mut self.plan,
            &mut self.phone,
            &mut self.phone_secondary,
            &mut self.document,
            &mut self.creci,
            &mut self.contact_name,
            &mut self.address,
            &mut self.city,
            &mut self.state,
            &mut self.zip,
            &mut self.website,
            &mut self.instagram,
            &mut self.facebook,
            &mut self.notes,
        ] {
            *field = blank_to_none(field.take());
        }
        self
    }

    pub fn text_column(&self, column: &str) -> Option<String> {
        let value = match column {
            "logo_url" => &self.logo_url,
            "plan" => &self.plan,
            "email" => &self.email,
            "phone" => &self.phone,
            "phone_secondary" => &self.phone_secondary,
            "document" => &self.document,
            "creci" => &self.creci,
            "contact_name" => &self.contact_name,
            "address" => &self.address,
            "city" => &self.city,
            "state" => &self.state,
            "zip" => &self.zip,
            "website" => &self.website,
            "instagram" => &self.instagram,
            "facebook" => &self.facebook,
            "notes" => &self.notes,
            _ => return None,
        };
        value.clone()
    }
}

/// Atualização parcial: `None` = chave ausente (não mexe), `Some(None)` =
/// limpar a coluna. Strings vazias chegam como `Some(None)`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateClientPayload {
    #[serde(default, deserialize_with = "present_text")]
    #[schema(value_type = Option<String>)]
    pub name: Option<Option<String>>,

    #[serde(default)]
    pub status: Option<ClientStatus>,

    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<i32>)]
    pub credits_remaining: Option<Option<i32>>,

    #[serde(default, deserialize_with = "present_text")]
    #[schema(value_type = Option<String>)]
    pub logo_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "present_text")]
    #[schema(value_type = Option<String>)]
    pub plan: Option<Option<String>>,
    #[serde(default, deserialize_with = "present_text")]
    #[schema(value_type = Option<String>)]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "present_text")]
    #[schema(value_type = Option<String>)]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "present_text")]
    #[schema(value_type = Option<String>)]
    pub phone_secondary: Option<Option<String>>,
    #[serde(default, deserialize_with = "present_text")]
    #[schema(value_type = Option<String>)]
    pub document: Option<Option<String>>,
    #[serde(default, deserialize_with = "present_text")]
    #[schema(value_type = Option<String>)]
    pub creci: Option<Option<String>>,
    #[serde(default, deserialize_with = "present_text")]
    #[schema(value_type = Option<String>)]
    pub contact_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present_text")]
    #[schema(value_type = Option<String>)]
    pub address: Option<Option<String>>,
    #[serde(default, deserialize_with = "present_text")]
    #[schema(value_type = Option<String>)]
    pub city: Option<Option<String>>,
    #[serde(default, deserialize_with = "present_text")]
    #[schema(value_type = Option<String>)]
    pub state: Option<Option<String>>,
    #[serde(default, deserialize_with = "present_text")]
    #[schema(value_type = Option<String>)]
    pub zip: Option<Option<String>>,
    #[serde(default, deserialize_with = "present_text")]
    #[schema(value_type = Option<String>)]
    pub website: Option<Option<String>>,
    #[serde(default, deserialize_with = "present_text")]
    #[schema(value_type = Option<String>)]
    pub instagram: Option<Option<String>>,
    #[serde(default, deserialize_with = "present_text")]
    #[schema(value_type = Option<String>)]
    pub facebook: Option<Option<String>>,
    #[serde(default, deserialize_with = "present_text")]
    #[schema(value_type = Option<String>)]
    pub notes: Option<Option<String>>,
}

impl UpdateClientPayload {
    /// Colunas de texto presentes no corpo, na ordem da tabela.
    pub fn text_updates(&self) -> Vec<(&'static str, Option<String>)> {
        let columns: [(&'static str, &Option<Option<String>>); 16] = [
            ("logo_url", &self.logo_url),
            ("plan", &self.plan),
            ("email", &self.email),
            ("phone", &self.phone),
            ("phone_secondary", &self.phone_secondary),
            ("document", &self.document),
            ("creci", &self.creci),
            ("contact_name", &self.contact_name),
            ("address", &self.address),
            ("city", &self.city),
            ("state", &self.state),
            ("zip", &self.zip),
            ("website", &self.website),
            ("instagram", &self.instagram),
            ("facebook", &self.facebook),
            ("notes", &self.notes),
        ];
        columns
            .into_iter()
            .filter_map(|(column, value)| value.clone().map(|v| (column, v)))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.status.is_none()
            && self.credits_remaining.is_none()
            && self.text_updates().is_empty()
    }
}

pub fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

// Distingue "chave ausente" (default = None) de "chave presente com null".
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn present_text<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(|v| Some(blank_to_none(v)))
}
