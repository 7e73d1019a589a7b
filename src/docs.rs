// src/docs.rs

use utoipa::OpenApi;

use crate::{handlers, models, payload, services};

#[derive(OpenApi)]
#[openapi(
    info(title = "Divulga Imob API", description = "Cadastro de clientes e anúncios, Central de Produção e webhooks do n8n"),
    paths(
        // --- Dashboard ---
        handlers::dashboard::get_dashboard,
        handlers::dashboard::update_dashboard,
        handlers::seed::seed,

        // --- Configurações ---
        handlers::settings::get_setting,
        handlers::settings::update_setting,

        // --- Vendas ---
        handlers::sales::create_venda,
        handlers::sales::monthly_sales,

        // --- Clientes ---
        handlers::clients::list_clients,
        handlers::clients::get_client,
        handlers::clients::create_client,
        handlers::clients::update_client,
        handlers::clients::delete_client,

        // --- Anúncios ---
        handlers::listings::list_listings,
        handlers::listings::get_listing,
        handlers::listings::create_listing,
        handlers::listings::import_listings,
        handlers::listings::import_from_url,
        handlers::listings::update_listing,
        handlers::listings::delete_listing,
        handlers::listings::get_materials,

        // --- Central de Produção ---
        handlers::listings::get_draft,
        handlers::listings::compose_draft,
        handlers::listings::save_production,
        handlers::listings::fire_mode,

        // --- Webhook ---
        handlers::webhook::send_webhook,
    ),
    components(
        schemas(
            handlers::OkResponse,
            handlers::CreatedResponse,

            // --- Dashboard / Configurações ---
            models::dashboard::Kpis,
            models::settings::Plan,
            models::settings::DashboardResponse,
            models::settings::UpdateDashboardRequest,
            models::settings::SettingEntry,
            models::settings::SettingValue,
            services::seed_service::SeedResponse,

            // --- Vendas ---
            models::sale::Venda,
            models::sale::CreateVendaPayload,
            models::sale::MonthlySales,

            // --- Clientes ---
            models::client::ClientStatus,
            models::client::Client,
            models::client::CreateClientPayload,
            models::client::UpdateClientPayload,

            // --- Anúncios ---
            models::listing::ListingView,
            models::listing::CreateListingPayload,
            models::listing::ImportListingsPayload,
            models::listing::ImportListingsResponse,
            models::listing::ImportFromUrlPayload,
            models::listing::ImportFromUrlResponse,
            models::listing::UpdateListingPayload,
            models::materials::MaterialFiles,
            models::materials::MaterialsResponse,

            // --- Central de Produção ---
            models::listing::SaveProductionPayload,
            models::listing::FireModePayload,
            models::listing::BulkSelection,
            models::listing::ComposeDraftPayload,
            models::listing::DraftRow,
            models::listing::DraftFieldView,
            models::listing::DraftView,
            payload::DraftField,
            payload::FieldShape,
            payload::DraftEdit,
            payload::MoveDirection,

            // --- Webhook ---
            handlers::webhook::SendWebhookPayload,
            services::webhook_service::WebhookResponse,
        )
    ),
    tags(
        (name = "Dashboard", description = "Indicadores, planos e dados de exemplo"),
        (name = "Configurações", description = "Acesso direto às chaves de configuração"),
        (name = "Vendas", description = "Registro de vendas e totais mensais"),
        (name = "Clientes", description = "Cadastro de clientes (imobiliárias)"),
        (name = "Anúncios", description = "Imóveis captados e importados"),
        (name = "Materiais", description = "Logos e fontes do anunciante"),
        (name = "Central de Produção", description = "Montagem do payload e disparo do vídeo"),
        (name = "Webhook", description = "Envio livre para uma URL qualquer")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/dashboard",
            "/api/settings/{key}",
            "/api/vendas",
            "/api/vendas/mensal",
            "/api/seed",
            "/api/clients",
            "/api/clients/{id}",
            "/api/listings",
            "/api/listings/{id}",
            "/api/listings/import",
            "/api/listings/import-from-url",
            "/api/listings/{id}/production",
            "/api/listings/{id}/materiais",
            "/api/listings/{id}/firemode",
            "/api/listings/{id}/draft",
            "/api/webhook/send",
        ] {
            assert!(doc.paths.paths.contains_key(path), "{path} sem documentação");
        }
    }
}
