use std::sync::Arc;

use crate::application::{CartService, CatalogService};
use crate::domain::ports::CatalogRepository;
use crate::infrastructure::CartStore;

pub type SharedCatalog = Arc<dyn CatalogRepository>;

/// Everything the handlers share; built once per process.
pub struct AppState {
    pub catalog: CatalogService<SharedCatalog>,
    pub cart: CartService<SharedCatalog>,
    pub carts: CartStore,
}

impl AppState {
    pub fn new(repo: SharedCatalog) -> Self {
        Self {
            catalog: CatalogService::new(Arc::clone(&repo)),
            cart: CartService::new(repo),
            carts: CartStore::new(),
        }
    }
}
