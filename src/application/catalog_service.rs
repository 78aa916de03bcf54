use crate::domain::catalog::{
    Category, CategoryCreateRequest, PageRequest, Product, ProductCreateRequest, ProductDetails,
    ProductFilter, ProductPage,
};
use crate::domain::errors::{DomainError, FieldError};
use crate::domain::ports::CatalogRepository;

pub struct CatalogService<R> {
    repo: R,
}

impl<R: CatalogRepository> CatalogService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn get_category(&self, id: i32) -> Result<Category, DomainError> {
        self.repo
            .get_category(id)?
            .ok_or_else(|| DomainError::category_not_found(id))
    }

    pub fn list_categories(&self) -> Result<Vec<Category>, DomainError> {
        self.repo.list_categories()
    }

    pub fn create_category(&self, req: &CategoryCreateRequest) -> Result<Category, DomainError> {
        let errors = req.validate();
        if !errors.is_empty() {
            return Err(DomainError::Validation(errors));
        }
        let category = self.repo.create_category(req)?;
        log::debug!("created category {} ({})", category.id, category.slug);
        Ok(category)
    }

    /// Deletes a category that no product references.
    pub fn delete_category(&self, id: i32) -> Result<(), DomainError> {
        self.get_category(id)?;

        let referencing = self
            .repo
            .list_products(ProductFilter { category_id: Some(id) }, PageRequest::new(1, 1))?;
        if referencing.total > 0 {
            return Err(DomainError::Conflict(format!(
                "category {id} is referenced by {} product(s)",
                referencing.total
            )));
        }

        if !self.repo.delete_category(id)? {
            return Err(DomainError::category_not_found(id));
        }
        log::debug!("deleted category {id}");
        Ok(())
    }

    pub fn get_product(&self, id: i32) -> Result<Product, DomainError> {
        self.repo
            .get_product(id)?
            .ok_or_else(|| DomainError::product_not_found(id))
    }

    /// Product joined with its category.
    pub fn get_product_details(&self, id: i32) -> Result<ProductDetails, DomainError> {
        let product = self.get_product(id)?;
        let category = self.get_category(product.category_id)?;
        Ok(ProductDetails { product, category })
    }

    pub fn list_products(
        &self,
        filter: ProductFilter,
        page: PageRequest,
    ) -> Result<ProductPage, DomainError> {
        if let Some(category_id) = filter.category_id {
            self.get_category(category_id)?;
        }
        self.repo.list_products(filter, page)
    }

    pub fn create_product(&self, req: &ProductCreateRequest) -> Result<Product, DomainError> {
        let mut errors = req.validate();
        if self.repo.get_category(req.category_id)?.is_none() {
            errors.push(FieldError::new(
                "category_id",
                format!("category {} does not exist", req.category_id),
            ));
        }
        if !errors.is_empty() {
            return Err(DomainError::Validation(errors));
        }
        let product = self.repo.create_product(req)?;
        log::debug!("created product {} in category {}", product.id, product.category_id);
        Ok(product)
    }

    pub fn delete_product(&self, id: i32) -> Result<(), DomainError> {
        if !self.repo.delete_product(id)? {
            return Err(DomainError::product_not_found(id));
        }
        log::debug!("deleted product {id}");
        Ok(())
    }
}
