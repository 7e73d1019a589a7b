pub mod client_repo;
pub use client_repo::ClientRepository;
pub mod listing_repo;
pub use listing_repo::{ListingRepository, NewListing};
pub mod settings_repo;
pub use settings_repo::SettingsRepository;
pub mod sale_repo;
pub use sale_repo::SaleRepository;
pub mod dashboard_repo;
pub use dashboard_repo::DashboardRepository;
