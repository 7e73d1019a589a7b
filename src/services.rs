pub mod client_service;
pub mod listing_service;
pub mod materials_service;
pub mod sale_service;
pub mod seed_service;
pub mod settings_service;
pub mod webhook_service;
