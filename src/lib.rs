// src/lib.rs

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod payload;
pub mod services;

use crate::{config::AppState, docs::ApiDoc};

/// Limite do corpo JSON (documentos de anúncio com muitas fotos).
pub const BODY_LIMIT: usize = 2 * 1024 * 1024;

pub fn router(app_state: AppState) -> Router {
    let client_routes = Router::new()
        .route(
            "/",
            get(handlers::clients::list_clients).post(handlers::clients::create_client),
        )
        .route(
            "/{id}",
            get(handlers::clients::get_client)
                .put(handlers::clients::update_client)
                .delete(handlers::clients::delete_client),
        );

    let listing_routes = Router::new()
        .route(
            "/",
            get(handlers::listings::list_listings).post(handlers::listings::create_listing),
        )
        .route("/import", post(handlers::listings::import_listings))
        .route("/import-from-url", post(handlers::listings::import_from_url))
        .route(
            "/{id}",
            get(handlers::listings::get_listing)
                .put(handlers::listings::update_listing)
                .delete(handlers::listings::delete_listing),
        )
        .route("/{id}/materiais", get(handlers::listings::get_materials))
        .route("/{id}/production", put(handlers::listings::save_production))
        .route("/{id}/firemode", post(handlers::listings::fire_mode))
        .route(
            "/{id}/draft",
            get(handlers::listings::get_draft).post(handlers::listings::compose_draft),
        );

    let sale_routes = Router::new()
        .route("/", post(handlers::sales::create_venda))
        .route("/mensal", get(handlers::sales::monthly_sales));

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route(
            "/api/dashboard",
            get(handlers::dashboard::get_dashboard).put(handlers::dashboard::update_dashboard),
        )
        .route(
            "/api/settings/{key}",
            get(handlers::settings::get_setting).put(handlers::settings::update_setting),
        )
        .route("/api/seed", post(handlers::seed::seed))
        .route("/api/webhook/send", post(handlers::webhook::send_webhook))
        .nest("/api/clients", client_routes)
        .nest("/api/listings", listing_routes)
        .nest("/api/vendas", sale_routes)
        .with_state(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
