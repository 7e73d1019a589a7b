// src/handlers/listings.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    handlers::{CreatedResponse, OkResponse},
    middleware::i18n::Locale,
    models::{
        listing::{
            ComposeDraftPayload, CreateListingPayload, DraftView, FireModePayload, ImportFromUrlPayload,
            ImportFromUrlResponse, ImportListingsPayload, ImportListingsResponse, ListingView, ListingsQuery,
            SaveProductionPayload, UpdateListingPayload,
        },
        materials::MaterialsResponse,
    },
    services::webhook_service::WebhookResponse,
};

// GET /api/listings
#[utoipa::path(
    get,
    path = "/api/listings",
    tag = "Anúncios",
    params(ListingsQuery),
    responses(
        (status = 200, description = "Anúncios achatados (documento + controle), mais recentes primeiro", body = Vec<ListingView>)
    )
)]
pub async fn list_listings(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<ListingsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let listings = app_state
        .listing_service
        .list(&app_state.db_pool, query.client_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(listings)))
}

// GET /api/listings/{id}
#[utoipa::path(
    get,
    path = "/api/listings/{id}",
    tag = "Anúncios",
    params(("id" = Uuid, Path, description = "ID do anúncio")),
    responses(
        (status = 200, description = "Anúncio achatado", body = ListingView),
        (status = 404, description = "Anúncio não encontrado")
    )
)]
pub async fn get_listing(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let listing = app_state
        .listing_service
        .find(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(ListingView(listing.to_view()))))
}

// POST /api/listings
#[utoipa::path(
    post,
    path = "/api/listings",
    tag = "Anúncios",
    request_body = CreateListingPayload,
    responses(
        (status = 201, description = "Anúncio criado", body = CreatedResponse),
        (status = 400, description = "raw_data não é um objeto JSON")
    )
)]
pub async fn create_listing(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<CreateListingPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let id = app_state
        .listing_service
        .create(&app_state.db_pool, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

// POST /api/listings/import
#[utoipa::path(
    post,
    path = "/api/listings/import",
    tag = "Anúncios",
    request_body = ImportListingsPayload,
    responses(
        (status = 201, description = "Todos os itens importados", body = ImportListingsResponse),
        (status = 400, description = "Lista vazia ou item inválido")
    )
)]
pub async fn import_listings(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<ImportListingsPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let imported = app_state
        .listing_service
        .import(&app_state.db_pool, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(imported)))
}

// POST /api/listings/import-from-url
#[utoipa::path(
    post,
    path = "/api/listings/import-from-url",
    tag = "Anúncios",
    request_body = ImportFromUrlPayload,
    responses(
        (status = 201, description = "O n8n devolveu o imóvel e ele foi cadastrado", body = ImportFromUrlResponse),
        (status = 200, description = "Webhook disparado; resposta sem imóvel", body = ImportFromUrlResponse),
        (status = 400, description = "URL ausente ou webhook de captação não configurado"),
        (status = 502, description = "O webhook não respondeu"),
        (status = 504, description = "O webhook demorou mais de 120 segundos")
    )
)]
pub async fn import_from_url(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<ImportFromUrlPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = app_state
        .listing_service
        .import_from_url(&app_state.db_pool, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let status = if outcome.id.is_some() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(outcome)))
}

// PUT /api/listings/{id}
#[utoipa::path(
    put,
    path = "/api/listings/{id}",
    tag = "Anúncios",
    params(("id" = Uuid, Path, description = "ID do anúncio")),
    request_body = UpdateListingPayload,
    responses(
        (status = 200, description = "Atualizado", body = OkResponse),
        (status = 400, description = "Nada para atualizar"),
        (status = 404, description = "Anúncio não encontrado")
    )
)]
pub async fn update_listing(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateListingPayload>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .listing_service
        .update(&app_state.db_pool, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(OkResponse::ok())))
}

// PUT /api/listings/{id}/production
#[utoipa::path(
    put,
    path = "/api/listings/{id}/production",
    tag = "Central de Produção",
    params(("id" = Uuid, Path, description = "ID do anúncio")),
    request_body = SaveProductionPayload,
    responses(
        (status = 200, description = "Documento, fotos e payload salvos", body = OkResponse),
        (status = 400, description = "payload_text não é um objeto JSON válido; nada foi gravado"),
        (status = 404, description = "Anúncio não encontrado")
    )
)]
pub async fn save_production(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<SaveProductionPayload>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .listing_service
        .save_production(&app_state.db_pool, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(OkResponse::ok())))
}

// DELETE /api/listings/{id}
#[utoipa::path(
    delete,
    path = "/api/listings/{id}",
    tag = "Anúncios",
    params(("id" = Uuid, Path, description = "ID do anúncio")),
    responses(
        (status = 200, description = "Removido", body = OkResponse),
        (status = 404, description = "Anúncio não encontrado")
    )
)]
pub async fn delete_listing(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .listing_service
        .delete(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(OkResponse::ok())))
}

// GET /api/listings/{id}/materiais
#[utoipa::path(
    get,
    path = "/api/listings/{id}/materiais",
    tag = "Materiais",
    params(("id" = Uuid, Path, description = "ID do anúncio")),
    responses(
        (status = 200, description = "Pasta do anunciante e arquivos do manifest", body = MaterialsResponse),
        (status = 404, description = "Anúncio não encontrado")
    )
)]
pub async fn get_materials(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let materials = app_state
        .listing_service
        .materials(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(materials)))
}

// POST /api/listings/{id}/firemode
#[utoipa::path(
    post,
    path = "/api/listings/{id}/firemode",
    tag = "Central de Produção",
    params(("id" = Uuid, Path, description = "ID do anúncio")),
    request_body = FireModePayload,
    responses(
        (status = 200, description = "Resposta do webhook de produção (ok = false para status fora de 2xx)", body = WebhookResponse),
        (status = 400, description = "Webhook não configurado ou payload inválido"),
        (status = 404, description = "Anúncio não encontrado"),
        (status = 502, description = "O webhook não respondeu"),
        (status = 504, description = "Tempo limite excedido")
    )
)]
pub async fn fire_mode(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    payload: Option<Json<FireModePayload>>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload.unwrap_or_default();
    let response = app_state
        .listing_service
        .fire(&app_state.db_pool, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(response)))
}

// GET /api/listings/{id}/draft
#[utoipa::path(
    get,
    path = "/api/listings/{id}/draft",
    tag = "Central de Produção",
    params(("id" = Uuid, Path, description = "ID do anúncio")),
    responses(
        (status = 200, description = "Campos editáveis, fotos e payload inicial", body = DraftView),
        (status = 404, description = "Anúncio não encontrado")
    )
)]
pub async fn get_draft(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let draft = app_state
        .listing_service
        .draft(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(draft)))
}

// POST /api/listings/{id}/draft
#[utoipa::path(
    post,
    path = "/api/listings/{id}/draft",
    tag = "Central de Produção",
    params(("id" = Uuid, Path, description = "ID do anúncio")),
    request_body = ComposeDraftPayload,
    responses(
        (status = 200, description = "Rascunho com as edições aplicadas (nada é gravado)", body = DraftView),
        (status = 400, description = "Edição inválida"),
        (status = 404, description = "Anúncio não encontrado")
    )
)]
pub async fn compose_draft(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<ComposeDraftPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let draft = app_state
        .listing_service
        .compose_draft(&app_state.db_pool, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(draft)))
}
