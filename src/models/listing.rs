// src/models/listing.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    payload::{DraftEdit, DraftField, FieldShape},
};

// Linha crua da tabela. Os blobs JSON ficam em TEXT (ver migração).
#[derive(Debug, Clone, FromRow)]
pub struct ListingRow {
    pub id: Uuid,
    pub client_id: Option<Uuid>,
    pub source_url: Option<String>,
    pub raw_data: String,
    pub selected_images: Option<String>,
    pub webhook_payload: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Anúncio com os blobs já interpretados.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub id: Uuid,
    pub client_id: Option<Uuid>,
    pub source_url: Option<String>,
    pub raw_data: Map<String, Value>,
    pub selected_images: Option<Vec<String>>,
    pub webhook_payload: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ListingRow> for Listing {
    type Error = AppError;

    fn try_from(row: ListingRow) -> Result<Self, Self::Error> {
        let corrupt = |context: &'static str| move |source| AppError::CorruptStoredJson { context, source };

        let raw_data = serde_json::from_str(&row.raw_data).map_err(corrupt("raw_data"))?;
        let selected_images = row
            .selected_images
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(corrupt("selected_images"))?;
        let webhook_payload = row
            .webhook_payload
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(corrupt("webhook_payload"))?;

        Ok(Listing {
            id: row.id,
            client_id: row.client_id,
            source_url: row.source_url,
            raw_data,
            selected_images,
            webhook_payload,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl Listing {
    pub fn advertiser_code(&self) -> Option<&str> {
        self.raw_data
            .get("advertiserCode")
            .and_then(Value::as_str)
            .filter(|code| !code.is_empty())
    }

    /// Visão achatada: `{id, client_id, source_url, ...raw_data,
    /// selected_images, webhook_payload, created_at, updated_at}`. As chaves
    /// de controle sobrescrevem chaves homônimas do documento.
    pub fn to_view(&self) -> Value {
        let mut view = Map::new();
        view.insert("id".into(), Value::from(self.id.to_string()));
        view.insert("client_id".into(), json_uuid(self.client_id));
        view.insert("source_url".into(), Value::from(self.source_url.clone()));
        for (key, value) in &self.raw_data {
            view.insert(key.clone(), value.clone());
        }
        view.insert("selected_images".into(), Value::from(self.selected_images.clone()));
        view.insert(
            "webhook_payload".into(),
            self.webhook_payload.clone().unwrap_or(Value::Null),
        );
        view.insert("created_at".into(), Value::from(self.created_at.to_rfc3339()));
        view.insert("updated_at".into(), Value::from(self.updated_at.to_rfc3339()));
        // Reescreve as chaves de controle caso o documento as tenha repetido
        view.insert("id".into(), Value::from(self.id.to_string()));
        view.insert("client_id".into(), json_uuid(self.client_id));
        view.insert("source_url".into(), Value::from(self.source_url.clone()));
        Value::Object(view)
    }

    /// Usado pela tela de materiais: só a identidade e o documento.
    pub fn to_summary(&self) -> Value {
        let mut view = Map::new();
        view.insert("id".into(), Value::from(self.id.to_string()));
        view.insert("client_id".into(), json_uuid(self.client_id));
        for (key, value) in &self.raw_data {
            if key != "id" && key != "client_id" {
                view.insert(key.clone(), value.clone());
            }
        }
        Value::Object(view)
    }
}

/// Anúncio achatado, como a API devolve.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct ListingView(pub Value);

fn json_uuid(id: Option<Uuid>) -> Value {
    id.map_or(Value::Null, |id| Value::from(id.to_string()))
}

/// Aceita o documento como objeto ou como string contendo um objeto JSON.
pub fn parse_raw_data(value: Value) -> Result<Map<String, Value>, AppError> {
    match value {
        Value::Object(map) => Ok(map),
        Value::String(text) => match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(map)) => Ok(map),
            _ => Err(AppError::InvalidRawData),
        },
        _ => Err(AppError::InvalidRawData),
    }
}

// --- PAYLOADS ---

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListingsQuery {
    /// Só os anúncios deste cliente.
    pub client_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateListingPayload {
    pub client_id: Option<Uuid>,
    pub source_url: Option<String>,
    #[schema(value_type = Object)]
    pub raw_data: Option<Value>,
    pub selected_images: Option<Vec<String>>,
    #[schema(value_type = Option<Object>)]
    pub webhook_payload: Option<Value>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ImportListingsPayload {
    #[serde(default)]
    #[schema(value_type = Vec<Object>)]
    pub items: Vec<Value>,
    pub client_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ImportListingsResponse {
    pub imported: usize,
    pub ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ImportFromUrlPayload {
    #[schema(example = "https://www.vivareal.com.br/imovel/casa-2-quartos")]
    pub url: Option<String>,
    pub client_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ImportFromUrlResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub message: String,
    /// Corpo devolvido pelo n8n quando não veio um imóvel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl ImportFromUrlResponse {
    pub fn created(id: Uuid) -> Self {
        Self {
            ok: true,
            id: Some(id),
            message: "Imóvel cadastrado.".into(),
            raw: None,
        }
    }

    pub fn relayed(message: &str, raw: String) -> Self {
        Self {
            ok: true,
            id: None,
            message: message.into(),
            raw: Some(raw),
        }
    }
}

/// Resultado da resposta do webhook de captação.
#[derive(Debug, PartialEq)]
pub enum CaptureReply {
    /// Um objeto (ou o primeiro de uma lista) com `carousel_images` ou `title`.
    Listing(Map<String, Value>),
    /// JSON válido, mas sem cara de imóvel.
    Other,
    NotJson,
}

impl CaptureReply {
    pub fn parse(body: &str) -> Self {
        let Ok(data) = serde_json::from_str::<Value>(body) else {
            return CaptureReply::NotJson;
        };
        let candidate = match data {
            Value::Array(items) => items.into_iter().next(),
            other => Some(other),
        };
        match candidate {
            Some(Value::Object(map)) if map.contains_key("carousel_images") || map.contains_key("title") => {
                CaptureReply::Listing(map)
            }
            _ => CaptureReply::Other,
        }
    }
}

/// Atualização parcial. `None` = chave ausente; `Some(None)` = null (limpa).
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateListingPayload {
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub raw_data: Option<Value>,

    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<Vec<String>>)]
    pub selected_images: Option<Option<Vec<String>>>,

    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<Object>)]
    pub webhook_payload: Option<Option<Value>>,

    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub source_url: Option<Option<String>>,
}

impl UpdateListingPayload {
    pub fn is_empty(&self) -> bool {
        self.raw_data.is_none()
            && self.selected_images.is_none()
            && self.webhook_payload.is_none()
            && self.source_url.is_none()
    }
}

/// Alterações já validadas, prontas para o repositório.
#[derive(Debug, Default)]
pub struct ListingChanges {
    pub raw_data: Option<Map<String, Value>>,
    pub selected_images: Option<Option<Vec<String>>>,
    pub webhook_payload: Option<Option<Value>>,
    pub source_url: Option<Option<String>>,
}

impl ListingChanges {
    pub fn is_empty(&self) -> bool {
        self.raw_data.is_none()
            && self.selected_images.is_none()
            && self.webhook_payload.is_none()
            && self.source_url.is_none()
    }
}

/// Salvamento da Central de Produção.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveProductionPayload {
    #[schema(value_type = Option<Object>)]
    pub raw_data: Option<Value>,
    pub selected_images: Option<Vec<String>>,
    #[schema(value_type = Option<Object>)]
    pub payload: Option<Value>,
    /// JSON editado à mão; tem prioridade sobre `payload`.
    pub payload_text: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct FireModePayload {
    #[schema(value_type = Option<Object>)]
    pub payload: Option<Value>,
    pub payload_text: Option<String>,
    pub webhook_url: Option<String>,
}

// --- RASCUNHO (Central de Produção) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BulkSelection {
    All,
    None,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ComposeDraftPayload {
    /// Novos valores por chave (substituem o valor inteiro do campo).
    #[serde(default)]
    #[schema(value_type = Object)]
    pub values: Map<String, Value>,
    /// Aplicado antes de `excluded`.
    pub select: Option<BulkSelection>,
    /// Campos que não entram no payload.
    #[serde(default)]
    pub excluded: Vec<String>,
    pub selected_images: Option<Vec<String>>,
    /// Ações aplicadas por último, na ordem recebida.
    #[serde(default)]
    pub edits: Vec<DraftEdit>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DraftRow {
    pub name: String,
    pub label: String,
    #[schema(value_type = Object)]
    pub value: Value,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DraftFieldView {
    #[serde(flatten)]
    pub field: DraftField,
    /// Só para campos `NAME_VALUE_LIST`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<DraftRow>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DraftView {
    pub listing_id: Uuid,
    pub fields: Vec<DraftFieldView>,
    pub available_images: Vec<String>,
    pub selected_images: Vec<String>,
    #[schema(value_type = Object)]
    pub payload: Value,
    pub payload_text: String,
}

impl DraftFieldView {
    pub fn new(field: DraftField, label_for: impl Fn(&str) -> String) -> Self {
        let rows = (field.shape == FieldShape::NameValueList).then(|| {
            field
                .value
                .as_array()
                .map(|items| {
                    items
                        .iter()
                        .map(|item| {
                            let name = item
                                .get("name")
                                .and_then(Value::as_str)
                                .unwrap_or_default()
                                .to_string();
                            DraftRow {
                                label: label_for(&name),
                                name,
                                value: item.get("value").cloned().unwrap_or(Value::Null),
                            }
                        })
                        .collect()
                })
                .unwrap_or_default()
        });
        Self { field, rows }
    }
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(raw: &str) -> ListingRow {
        ListingRow {
            id: Uuid::nil(),
            client_id: None,
            source_url: Some("https://example.com/a".into()),
            raw_data: raw.to_string(),
            selected_images: Some(r#"["b.webp"]"#.into()),
            webhook_payload: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn view_spreads_raw_data_and_keeps_its_order() {
        let listing = Listing::try_from(row(r#"{"title":"Casa","zeta":1,"alpha":[1,2]}"#)).unwrap();
        let view = listing.to_view();
        let keys: Vec<&String> = view.as_object().unwrap().keys().collect();
        assert_eq!(
            keys,
            [
                "id",
                "client_id",
                "source_url",
                "title",
                "zeta",
                "alpha",
                "selected_images",
                "webhook_payload",
                "created_at",
                "updated_at"
            ]
        );
        assert_eq!(view["selected_images"], json!(["b.webp"]));
        assert_eq!(view["webhook_payload"], Value::Null);
    }

    #[test]
    fn bookkeeping_keys_win_over_raw_keys() {
        let listing = Listing::try_from(row(r#"{"id":"fake","source_url":"x"}"#)).unwrap();
        let view = listing.to_view();
        assert_eq!(view["id"], json!(Uuid::nil().to_string()));
        assert_eq!(view["source_url"], json!("https://example.com/a"));
    }

    #[test]
    fn corrupt_blob_is_reported() {
        let err = Listing::try_from(row("{not json")).unwrap_err();
        assert!(matches!(err, AppError::CorruptStoredJson { context: "raw_data", .. }));
    }

    #[test]
    fn raw_data_accepts_object_or_json_string() {
        assert!(parse_raw_data(json!({ "title": "A" })).is_ok());
        assert!(parse_raw_data(json!(r#"{"title":"A"}"#)).is_ok());
        assert!(matches!(parse_raw_data(json!("[1]")), Err(AppError::InvalidRawData)));
        assert!(matches!(parse_raw_data(json!(3)), Err(AppError::InvalidRawData)));
    }

    #[test]
    fn update_distinguishes_null_from_absent() {
        let update: UpdateListingPayload =
            serde_json::from_value(json!({ "selected_images": null })).unwrap();
        assert_eq!(update.selected_images, Some(None));
        assert!(update.webhook_payload.is_none());
        assert!(!update.is_empty());

        let empty: UpdateListingPayload = serde_json::from_value(json!({})).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn capture_reply_recognises_listings() {
        let single = CaptureReply::parse(r#"{"title":"Casa","x":1}"#);
        assert!(matches!(single, CaptureReply::Listing(ref m) if m["x"] == json!(1)));

        let first_of_many = CaptureReply::parse(r#"[{"carousel_images":[]},{"title":"B"}]"#);
        assert!(matches!(first_of_many, CaptureReply::Listing(ref m) if m.contains_key("carousel_images")));

        assert_eq!(CaptureReply::parse(r#"{"status":"queued"}"#), CaptureReply::Other);
        assert_eq!(CaptureReply::parse("[]"), CaptureReply::Other);
        assert_eq!(CaptureReply::parse("Workflow was started"), CaptureReply::NotJson);
    }

    #[test]
    fn name_value_fields_get_labelled_rows() {
        let field = DraftField {
            key: "amenities-list".into(),
            shape: FieldShape::NameValueList,
            included: true,
            value: json!([{ "name": "POOL", "value": "Sim" }]),
        };
        let view = DraftFieldView::new(field, |name| format!("<{name}>"));
        let rows = view.rows.unwrap();
        assert_eq!(rows[0].label, "<POOL>");
        assert_eq!(rows[0].value, json!("Sim"));
    }
}
