pub mod app_config;
pub mod cart_repo;
pub mod catalog_repo;
pub mod database;
pub mod memory;

pub use cart_repo::PgCartStore;
pub use catalog_repo::PgCatalogStore;
pub use database::DbClient;
pub use memory::MemStore;
