pub mod cart_store;
pub mod catalog_repo;
pub mod memory;
pub mod models;

pub use cart_store::CartStore;
pub use catalog_repo::DieselCatalogRepository;
pub use memory::InMemoryCatalog;
