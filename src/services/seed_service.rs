// src/services/seed_service.rs

use serde::Serialize;
use serde_json::{json, Map, Value};
use sqlx::PgPool;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ClientRepository, ListingRepository, NewListing},
    models::client::{ClientStatus, CreateClientPayload},
};

#[derive(Debug, Serialize, ToSchema)]
pub struct SeedResponse {
    pub ok: bool,
    pub message: String,
    pub client_id: Uuid,
}

/// Cliente de exemplo + um imóvel vinculado, para a primeira navegação.
#[derive(Clone)]
pub struct SeedService {
    clients: ClientRepository,
    listings: ListingRepository,
}

impl SeedService {
    pub fn new(clients: ClientRepository, listings: ListingRepository) -> Self {
        Self { clients, listings }
    }

    pub async fn seed(&self, pool: &PgPool) -> Result<SeedResponse, AppError> {
        let mut tx = pool.begin().await?;

        let client_id = self.clients.create(&mut *tx, &sample_client()).await?;
        let listing = NewListing {
            client_id: Some(client_id),
            raw_data: sample_listing(),
            ..NewListing::default()
        };
        let listing_id = self.listings.create(&mut *tx, &listing).await?;

        tx.commit().await?;
        tracing::info!(%client_id, %listing_id, "dados de exemplo carregados");

        Ok(SeedResponse {
            ok: true,
            message: "Cliente de exemplo carregado.".into(),
            client_id,
        })
    }
}

const SAMPLE_LOGO: &str =
    "https://resizedimgs.vivareal.com/img/vr-listing/e9cfb78f81731ee3743dc1b24339625a/regina-guerreiro-imoveis.webp";

fn sample_client() -> CreateClientPayload {
    let text = |s: &str| Some(s.to_string());
    CreateClientPayload {
        name: "Regina Guerreiro Imoveis".into(),
        status: Some(ClientStatus::Active),
        credits_remaining: Some(10),
        logo_url: text(SAMPLE_LOGO),
        plan: text("497"),
        contact_name: text("Regina Guerreiro"),
        email: text("contato@reginaguerreiroimoveis.com.br"),
        phone: text("(13) 3456-7890"),
        phone_secondary: text("(13) 99999-1234"),
        document: text("12.345.678/0001-90"),
        creci: text("12345-F"),
        address: text("Av. Beira Mar, 1000"),
        city: text("Peruíbe"),
        state: text("SP"),
        zip: text("11750-000"),
        website: text("https://reginaguerreiroimoveis.com.br"),
        instagram: text("@reginaguerreiroimoveis"),
        facebook: text("reginaguerreiroimoveis"),
        notes: text("Cliente desde 2024. Foco em imóveis no litoral sul."),
    }
}

fn sample_listing() -> Map<String, Value> {
    let photo = |hash: &str| {
        format!(
            "https://resizedimgs.vivareal.com/img/vr-listing/{hash}/casa-com-2-quartos-a-venda-82m-no-bal-stella-maris-peruibe.webp"
        )
    };
    let listing = json!({
        "carousel_images": [
            photo("9b66eb450db996a1e721b29ea90aab6e"),
            photo("d218dc756eddcb139a84a6160140af4a"),
            photo("c413fce3c20a97ae28849c6dba493726"),
        ],
        "title": "Casa com 2 Quartos e 2 banheiros à Venda, 82 m² por R$ 455.000",
        "description": "Casa nova com piscina a venda em Peruíbe, bairro Flora Rica II. Medindo 150m² de área total, 82m² de área construída.",
        "propertyCodes": "(Código do anunciante: CA2598 | Código no Viva Real: 2815108622)",
        "imobname": "Regina Guerreiro Imoveis",
        "logoimob": SAMPLE_LOGO,
        "advertiserCode": "CA2598",
        "vivaRealCode": "2815108622",
        "amenities-list": [
            { "name": "floorSize", "value": "82 m²" },
            { "name": "numberOfRooms", "value": "2 quartos" },
            { "name": "numberOfBathroomsTotal", "value": "2 banheiros" },
            { "name": "numberOfParkingSpaces", "value": "2 vagas" }
        ],
        "salePrice": "R$ 455.000",
        "prices": { "Venda": "R$ 455.000", "Condomínio": "Isento", "IPTU": "R$ 160" }
    });
    match listing {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
