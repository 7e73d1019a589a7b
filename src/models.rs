pub mod client;
pub mod dashboard;
pub mod listing;
pub mod materials;
pub mod sale;
pub mod settings;
