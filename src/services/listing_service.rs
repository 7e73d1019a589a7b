// src/services/listing_service.rs

use serde_json::{json, Map, Value};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ListingRepository, NewListing, SettingsRepository},
    models::{
        client::blank_to_none,
        listing::{
            parse_raw_data, BulkSelection, CaptureReply, ComposeDraftPayload, CreateListingPayload, DraftFieldView,
            DraftView, FireModePayload, ImportFromUrlPayload, ImportFromUrlResponse, ImportListingsPayload,
            ImportListingsResponse, Listing, ListingChanges, ListingView, SaveProductionPayload, UpdateListingPayload,
        },
        materials::MaterialsResponse,
        settings::{setting_as_url, WEBHOOK_CAPTACAO, WEBHOOK_PRODUCAO},
    },
    payload::{labels::amenity_label, parse_payload_text, BuilderConfig, BuilderError, DraftPayload, ImageSelection},
    services::{
        materials_service::MaterialsService,
        webhook_service::{WebhookDispatcher, WebhookResponse},
    },
};

#[derive(Clone)]
pub struct ListingService {
    repo: ListingRepository,
    settings: SettingsRepository,
    webhook: WebhookDispatcher,
    materials: MaterialsService,
    builder: BuilderConfig,
}

impl ListingService {
    pub fn new(
        repo: ListingRepository,
        settings: SettingsRepository,
        webhook: WebhookDispatcher,
        materials: MaterialsService,
        builder: BuilderConfig,
    ) -> Self {
        Self {
            repo,
            settings,
            webhook,
            materials,
            builder,
        }
    }

    // =========================================================================
    //  CRUD
    // =========================================================================

    pub async fn list(&self, pool: &PgPool, client_id: Option<Uuid>) -> Result<Vec<ListingView>, AppError> {
        let listings = self.repo.list(pool, client_id).await?;
        Ok(listings.iter().map(|l| ListingView(l.to_view())).collect())
    }

    pub async fn find(&self, pool: &PgPool, id: Uuid) -> Result<Listing, AppError> {
        self.repo
            .find_by_id(pool, id)
            .await?
            .ok_or(AppError::ListingNotFound)
    }

    pub async fn create(&self, pool: &PgPool, payload: CreateListingPayload) -> Result<Uuid, AppError> {
        let raw_data = parse_raw_data(payload.raw_data.unwrap_or_else(|| json!({})))?;
        let webhook_payload = payload.webhook_payload.map(stored_payload).transpose()?.flatten();
        let listing = NewListing {
            client_id: payload.client_id,
            source_url: payload.source_url,
            raw_data,
            selected_images: payload.selected_images,
            webhook_payload,
        };
        self.repo.create(pool, &listing).await
    }

    /// Importação em lote: ou entram todos, ou nenhum.
    pub async fn import(&self, pool: &PgPool, payload: ImportListingsPayload) -> Result<ImportListingsResponse, AppError> {
        if payload.items.is_empty() {
            return Err(AppError::EmptyImport);
        }

        let documents = payload
            .items
            .into_iter()
            .map(|item| match item {
                Value::Null => Ok(Map::new()),
                other => parse_raw_data(other),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut tx = pool.begin().await?;
        let mut ids = Vec::with_capacity(documents.len());
        for raw_data in documents {
            let listing = NewListing {
                client_id: payload.client_id,
                raw_data,
                ..NewListing::default()
            };
            ids.push(self.repo.create(&mut *tx, &listing).await?);
        }
        tx.commit().await?;

        tracing::info!(imported = ids.len(), "anúncios importados");
        Ok(ImportListingsResponse {
            imported: ids.len(),
            ids,
        })
    }

    pub async fn update(&self, pool: &PgPool, id: Uuid, payload: UpdateListingPayload) -> Result<(), AppError> {
        if payload.is_empty() {
            return Err(AppError::NothingToUpdate);
        }
        let webhook_payload = match payload.webhook_payload {
            Some(Some(value)) => Some(stored_payload(value)?),
            other => other,
        };
        let changes = ListingChanges {
            raw_data: payload.raw_data.map(parse_raw_data).transpose()?,
            selected_images: payload.selected_images,
            webhook_payload,
            source_url: payload.source_url.map(blank_to_none),
        };
        self.apply_changes(pool, id, &changes).await
    }

    pub async fn delete(&self, pool: &PgPool, id: Uuid) -> Result<(), AppError> {
        match self.repo.delete(pool, id).await? {
            0 => Err(AppError::ListingNotFound),
            _ => Ok(()),
        }
    }

    async fn apply_changes(&self, pool: &PgPool, id: Uuid, changes: &ListingChanges) -> Result<(), AppError> {
        match self.repo.update(pool, id, changes).await? {
            0 => Err(AppError::ListingNotFound),
            _ => Ok(()),
        }
    }

    // =========================================================================
    //  CAPTAÇÃO (n8n)
    // =========================================================================

    pub async fn import_from_url(&self, pool: &PgPool, payload: ImportFromUrlPayload) -> Result<ImportFromUrlResponse, AppError> {
        let url = payload
            .url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .ok_or(AppError::MissingListingUrl)?;

        let webhook_url = setting_as_url(self.settings.get(pool, WEBHOOK_CAPTACAO).await?);
        let request = json!({ "url": url, "client_id": payload.client_id });
        let response = self.webhook.send_capture(&webhook_url, &request).await?;

        match CaptureReply::parse(&response.body) {
            CaptureReply::Listing(raw_data) => {
                let listing = NewListing {
                    client_id: payload.client_id,
                    source_url: Some(url),
                    raw_data,
                    ..NewListing::default()
                };
                let id = self.repo.create(pool, &listing).await?;
                tracing::info!(%id, "imóvel cadastrado pela captação");
                Ok(ImportFromUrlResponse::created(id))
            }
            CaptureReply::NotJson => Ok(ImportFromUrlResponse::relayed(
                "Webhook disparado. O n8n pode cadastrar o imóvel no seu banco.",
                response.body,
            )),
            CaptureReply::Other => Ok(ImportFromUrlResponse::relayed("Webhook disparado.", response.body)),
        }
    }

    // =========================================================================
    //  CENTRAL DE PRODUÇÃO
    // =========================================================================

    /// Rascunho inicial do anúncio, como o editor o recebe.
    pub fn draft_of(&self, listing: &Listing) -> DraftPayload {
        seeded_draft(listing, &self.builder)
    }

    pub async fn draft(&self, pool: &PgPool, id: Uuid) -> Result<DraftView, AppError> {
        let listing = self.find(pool, id).await?;
        draft_view(id, &self.draft_of(&listing))
    }

    /// Aplica as edições do operador sobre um rascunho novo. Nada é gravado.
    pub async fn compose_draft(&self, pool: &PgPool, id: Uuid, request: ComposeDraftPayload) -> Result<DraftView, AppError> {
        let listing = self.find(pool, id).await?;
        let draft = compose(self.draft_of(&listing), &request)?;
        draft_view(id, &draft)
    }

    /// Salvamento da Central: documento editado, seleção de fotos e payload.
    /// Se `payload_text` não for JSON válido nada é gravado.
    pub async fn save_production(&self, pool: &PgPool, id: Uuid, payload: SaveProductionPayload) -> Result<(), AppError> {
        let webhook_payload = outgoing_from_request(payload.payload_text.as_deref(), payload.payload)?;
        let changes = ListingChanges {
            raw_data: payload.raw_data.map(parse_raw_data).transpose()?,
            selected_images: payload.selected_images.map(Some),
            webhook_payload: webhook_payload.map(Some),
            source_url: None,
        };
        if changes.is_empty() {
            return Err(AppError::NothingToUpdate);
        }
        self.apply_changes(pool, id, &changes).await
    }

    /// FireMode: payload da requisição, senão o salvo, senão o padrão do editor.
    pub async fn fire(&self, pool: &PgPool, id: Uuid, request: FireModePayload) -> Result<WebhookResponse, AppError> {
        let listing = self.find(pool, id).await?;

        let payload = match outgoing_from_request(request.payload_text.as_deref(), request.payload)? {
            Some(payload) => payload,
            None => self.draft_of(&listing).outgoing_payload()?,
        };

        let webhook_url = match request.webhook_url.filter(|u| !u.trim().is_empty()) {
            Some(url) => url,
            None => setting_as_url(self.settings.get(pool, WEBHOOK_PRODUCAO).await?),
        };

        tracing::info!(listing_id = %id, "disparando FireMode");
        Ok(self.webhook.send_production(&webhook_url, &payload).await?)
    }

    pub async fn materials(&self, pool: &PgPool, id: Uuid) -> Result<MaterialsResponse, AppError> {
        let listing = self.find(pool, id).await?;
        Ok(self.materials.materials_for(&listing).await)
    }
}

// Texto editado à mão tem prioridade sobre o objeto. Texto em branco conta como ausente.
fn outgoing_from_request(text: Option<&str>, payload: Option<Value>) -> Result<Option<Value>, AppError> {
    if let Some(text) = text.filter(|t| !t.trim().is_empty()) {
        return Ok(Some(parse_payload_text(text)?));
    }
    match payload {
        None | Some(Value::Null) => Ok(None),
        Some(value @ Value::Object(_)) => Ok(Some(value)),
        Some(_) => Err(BuilderError::NotAnObject.into()),
    }
}

/// Payload gravado junto do anúncio: objeto ou null (limpa). Qualquer outro tipo é recusado.
fn stored_payload(value: Value) -> Result<Option<Value>, AppError> {
    outgoing_from_request(None, Some(value))
}

// O editor abre com o payload salvo quando existe; senão, com o montado a partir dos campos.
fn seeded_draft(listing: &Listing, builder: &BuilderConfig) -> DraftPayload {
    let draft = DraftPayload::from_document(&listing.raw_data, listing.selected_images.as_deref(), builder);
    match &listing.webhook_payload {
        Some(stored @ Value::Object(_)) => draft.edit_payload_text(format!("{stored:#}")),
        _ => draft,
    }
}

fn compose(draft: DraftPayload, request: &ComposeDraftPayload) -> Result<DraftPayload, AppError> {
    let mut draft = draft;
    if let Some(selected) = &request.selected_images {
        draft = draft.with_selection(ImageSelection::new(selected.clone()));
    }
    for (key, value) in &request.values {
        draft = draft.set_value(key, value.clone())?;
    }
    draft = match request.select {
        Some(BulkSelection::All) => draft.select_all(),
        Some(BulkSelection::None) => draft.select_none(),
        None => draft,
    };
    for key in &request.excluded {
        draft = draft.set_included(key, false)?;
    }
    Ok(draft.apply_all(&request.edits)?)
}

fn draft_view(listing_id: Uuid, draft: &DraftPayload) -> Result<DraftView, AppError> {
    let fields = draft
        .fields()
        .iter()
        .cloned()
        .map(|field| DraftFieldView::new(field, |name| amenity_label(name).to_string()))
        .collect();

    Ok(DraftView {
        listing_id,
        fields,
        available_images: draft.available_images().to_vec(),
        selected_images: draft.selection().as_slice().to_vec(),
        payload: draft.outgoing_payload()?,
        payload_text: draft.payload_text().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> DraftPayload {
        let doc = json!({
            "title": "Casa",
            "description": "Perto da praia",
            "carousel_images": ["a", "b", "c"],
            "amenities-list": [{ "name": "floorSize", "value": "82 m²" }]
        });
        DraftPayload::from_document(doc.as_object().unwrap(), None, &BuilderConfig::default())
    }

    fn listing(stored: Option<Value>) -> Listing {
        let doc = json!({ "title": "Casa", "carousel_images": ["a", "b"] });
        Listing {
            id: Uuid::nil(),
            client_id: None,
            source_url: None,
            raw_data: doc.as_object().unwrap().clone(),
            selected_images: None,
            webhook_payload: stored,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn stored_payload_must_be_an_object() {
        for value in [json!("x"), json!([1]), json!(3), json!(true)] {
            let err = stored_payload(value).unwrap_err();
            assert!(matches!(err, AppError::InvalidPayload(BuilderError::NotAnObject)));
        }
        assert_eq!(stored_payload(json!({ "a": 1 })).unwrap(), Some(json!({ "a": 1 })));
        assert_eq!(stored_payload(Value::Null).unwrap(), None);
    }

    #[test]
    fn saved_payload_seeds_the_draft() {
        let saved = json!({ "titulo": "Editado à mão", "images": ["b"] });
        let view = draft_view(Uuid::nil(), &seeded_draft(&listing(Some(saved.clone())), &BuilderConfig::default()))
            .unwrap();
        assert_eq!(view.payload, saved);
        assert_eq!(view.payload_text, format!("{saved:#}"));
    }

    #[test]
    fn without_a_saved_payload_the_draft_comes_from_the_fields() {
        let view = draft_view(Uuid::nil(), &seeded_draft(&listing(None), &BuilderConfig::default())).unwrap();
        assert_eq!(view.payload, json!({ "title": "Casa", "images": ["a", "b"] }));
    }

    #[test]
    fn editing_a_field_rebuilds_over_the_saved_payload() {
        let draft = seeded_draft(&listing(Some(json!({ "old": true }))), &BuilderConfig::default());
        let edited = draft.set_value("title", json!("Casa nova")).unwrap();
        assert_eq!(edited.outgoing_payload().unwrap()["title"], json!("Casa nova"));
        assert!(edited.outgoing_payload().unwrap().get("old").is_none());
    }

    #[test]
    fn hand_edited_text_wins_over_the_object() {
        let value = outgoing_from_request(Some(r#"{"a":1}"#), Some(json!({ "b": 2 }))).unwrap();
        assert_eq!(value, Some(json!({ "a": 1 })));
    }

    #[test]
    fn malformed_text_is_rejected() {
        let err = outgoing_from_request(Some("{oops"), None).unwrap_err();
        assert!(matches!(err, AppError::InvalidPayload(BuilderError::InvalidJson(_))));
    }

    #[test]
    fn blank_text_and_null_mean_nothing_sent() {
        assert_eq!(outgoing_from_request(Some("  "), None).unwrap(), None);
        assert_eq!(outgoing_from_request(None, Some(Value::Null)).unwrap(), None);
        assert!(outgoing_from_request(None, Some(json!([1]))).is_err());
    }

    #[test]
    fn compose_applies_values_then_exclusions() {
        let request: ComposeDraftPayload = serde_json::from_value(json!({
            "values": { "title": "Casa nova" },
            "excluded": ["description"],
            "selected_images": ["c", "a"]
        }))
        .unwrap();
        let draft = compose(draft(), &request).unwrap();
        let payload = draft.payload();
        assert_eq!(payload["title"], json!("Casa nova"));
        assert!(!payload.contains_key("description"));
        assert_eq!(payload["images"], json!(["c", "a"]));
    }

    #[test]
    fn select_none_then_reinclude_a_single_field() {
        let request: ComposeDraftPayload = serde_json::from_value(json!({
            "select": "none",
            "edits": [{ "op": "set_included", "key": "title", "included": true }]
        }))
        .unwrap();
        let payload = compose(draft(), &request).unwrap().payload();
        assert_eq!(Value::Object(payload), json!({ "title": "Casa" }));
    }

    #[test]
    fn compose_rejects_unknown_fields() {
        let request: ComposeDraftPayload =
            serde_json::from_value(json!({ "excluded": ["nope"] })).unwrap();
        let err = compose(draft(), &request).unwrap_err();
        assert!(matches!(err, AppError::InvalidPayload(BuilderError::UnknownField(_))));
    }

    #[test]
    fn draft_view_labels_amenity_rows() {
        let view = draft_view(Uuid::nil(), &draft()).unwrap();
        let amenities = view
            .fields
            .iter()
            .find(|f| f.field.key == "amenities-list")
            .unwrap();
        assert_eq!(amenities.rows.as_ref().unwrap()[0].label, "Área construída");
        assert_eq!(view.selected_images, ["a", "b", "c"]);
        assert_eq!(view.payload["images"], json!(["a", "b", "c"]));
    }

    #[test]
    fn hand_edited_draft_text_must_parse() {
        let request: ComposeDraftPayload = serde_json::from_value(json!({
            "edits": [{ "op": "edit_payload_text", "text": "{broken" }]
        }))
        .unwrap();
        let draft = compose(draft(), &request).unwrap();
        assert!(draft_view(Uuid::nil(), &draft).is_err());
    }
}
