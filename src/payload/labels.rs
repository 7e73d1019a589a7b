// src/payload/labels.rs

// Nomes técnicos das características (amenities-list[].name) -> rótulo em português.
const AMENITY_LABELS: &[(&str, &str)] = &[
    ("floorSize", "Área construída"),
    ("numberOfRooms", "Quartos"),
    ("numberOfBathroomsTotal", "Banheiros"),
    ("numberOfParkingSpaces", "Vagas"),
    ("numberOfSuites", "Suítes"),
    ("FURNISHED", "Mobiliado"),
    ("PETS_ALLOWED", "Aceita animais"),
    ("BACKYARD", "Quintal"),
    ("SERVICE_AREA", "Área de serviço"),
    ("CABLE_TV", "TV a cabo"),
    ("KITCHEN", "Cozinha"),
    ("GARDEN", "Jardim"),
    ("GYM", "Academia"),
    ("POOL", "Piscina"),
    ("PARTY_HALL", "Salão de festas"),
    ("GRILL", "Churrasqueira"),
    ("AIR_CONDITIONING", "Ar condicionado"),
    ("custom", "Outro"),
];

/// Rótulo de exibição; nomes desconhecidos voltam como vieram.
pub fn amenity_label(name: &str) -> &str {
    AMENITY_LABELS
        .iter()
        .find(|(key, _)| *key == name)
        .map_or(name, |(_, label)| *label)
}
