use super::catalog::{
    Category, CategoryCreateRequest, PageRequest, Product, ProductCreateRequest, ProductFilter,
    ProductPage,
};
use super::errors::DomainError;

/// Storage capability consumed by the catalog and the cart.
///
/// Implementations only persist and fetch; constraint checks happen in the
/// application layer before `create_*` is called. Every call is an
/// independent read or write, no transaction spans several calls.
pub trait CatalogRepository: Send + Sync + 'static {
    fn get_category(&self, id: i32) -> Result<Option<Category>, DomainError>;
    fn list_categories(&self) -> Result<Vec<Category>, DomainError>;
    fn create_category(&self, req: &CategoryCreateRequest) -> Result<Category, DomainError>;
    /// Returns `false` when no category had this id.
    fn delete_category(&self, id: i32) -> Result<bool, DomainError>;

    fn get_product(&self, id: i32) -> Result<Option<Product>, DomainError>;
    fn list_products(
        &self,
        filter: ProductFilter,
        page: PageRequest,
    ) -> Result<ProductPage, DomainError>;
    fn create_product(&self, req: &ProductCreateRequest) -> Result<Product, DomainError>;
    /// Returns `false` when no product had this id.
    fn delete_product(&self, id: i32) -> Result<bool, DomainError>;
}

impl<R: CatalogRepository + ?Sized> CatalogRepository for std::sync::Arc<R> {
    fn get_category(&self, id: i32) -> Result<Option<Category>, DomainError> {
        (**self).get_category(id)
    }

    fn list_categories(&self) -> Result<Vec<Category>, DomainError> {
        (**self).list_categories()
    }

    fn create_category(&self, req: &CategoryCreateRequest) -> Result<Category, DomainError> {
        (**self).create_category(req)
    }

    fn delete_category(&self, id: i32) -> Result<bool, DomainError> {
        (**self).delete_category(id)
    }

    fn get_product(&self, id: i32) -> Result<Option<Product>, DomainError> {
        (**self).get_product(id)
    }

    fn list_products(
        &self,
        filter: ProductFilter,
        page: PageRequest,
    ) -> Result<ProductPage, DomainError> {
        (**self).list_products(filter, page)
    }

    fn create_product(&self, req: &ProductCreateRequest) -> Result<Product, DomainError> {
        (**self).create_product(req)
    }

    fn delete_product(&self, id: i32) -> Result<bool, DomainError> {
        (**self).delete_product(id)
    }
}
