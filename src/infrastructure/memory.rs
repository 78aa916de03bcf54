use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use bigdecimal::BigDecimal;
use chrono::Utc;

use crate::domain::catalog::{
    Category, CategoryCreateRequest, PageRequest, Product, ProductCreateRequest, ProductFilter,
    ProductPage, PRICE_SCALE,
};
use crate::domain::errors::DomainError;
use crate::domain::ports::CatalogRepository;

#[derive(Debug, Default)]
struct State {
    categories: BTreeMap<i32, Category>,
    products: BTreeMap<i32, Product>,
    next_category_id: i32,
    next_product_id: i32,
}

/// Process-local catalog store. Ids are assigned sequentially from 1 and the
/// same slug and reference rules as the database schema apply.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    state: Mutex<State>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, State>, DomainError> {
        self.state
            .lock()
            .map_err(|_| DomainError::Internal("catalog lock poisoned".to_string()))
    }

    /// Reprices a product in place.
    pub fn update_price(&self, id: i32, price: BigDecimal) -> Result<(), DomainError> {
        let mut state = self.state()?;
        let product = state
            .products
            .get_mut(&id)
            .ok_or_else(|| DomainError::product_not_found(id))?;
        product.price = price.with_scale(PRICE_SCALE);
        Ok(())
    }
}

impl CatalogRepository for InMemoryCatalog {
    fn get_category(&self, id: i32) -> Result<Option<Category>, DomainError> {
        Ok(self.state()?.categories.get(&id).cloned())
    }

    fn list_categories(&self) -> Result<Vec<Category>, DomainError> {
        Ok(self.state()?.categories.values().cloned().collect())
    }

    fn create_category(&self, req: &CategoryCreateRequest) -> Result<Category, DomainError> {
        let mut state = self.state()?;
        if state.categories.values().any(|c| c.slug == req.slug) {
            return Err(DomainError::Conflict(format!(
                "category slug '{}' already exists",
                req.slug
            )));
        }
        state.next_category_id += 1;
        let category = Category {
            id: state.next_category_id,
            name: req.name.clone(),
            slug: req.slug.clone(),
        };
        state.categories.insert(category.id, category.clone());
        Ok(category)
    }

    fn delete_category(&self, id: i32) -> Result<bool, DomainError> {
        let mut state = self.state()?;
        if state.products.values().any(|p| p.category_id == id) {
            return Err(DomainError::Conflict(format!(
                "category {id} is referenced by products"
            )));
        }
        Ok(state.categories.remove(&id).is_some())
    }

    fn get_product(&self, id: i32) -> Result<Option<Product>, DomainError> {
        Ok(self.state()?.products.get(&id).cloned())
    }

    fn list_products(
        &self,
        filter: ProductFilter,
        page: PageRequest,
    ) -> Result<ProductPage, DomainError> {
        let state = self.state()?;
        let matching: Vec<&Product> = state
            .products
            .values()
            .filter(|p| filter.category_id.map_or(true, |c| p.category_id == c))
            .collect();
        let total = matching.len() as i64;
        let items = matching
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(page.limit).unwrap_or(usize::MAX))
            .cloned()
            .collect();
        Ok(ProductPage {
            items,
            total,
            page: page.page,
            limit: page.limit,
        })
    }

    fn create_product(&self, req: &ProductCreateRequest) -> Result<Product, DomainError> {
        let mut state = self.state()?;
        if !state.categories.contains_key(&req.category_id) {
            return Err(DomainError::category_not_found(req.category_id));
        }
        state.next_product_id += 1;
        let product = Product {
            id: state.next_product_id,
            name: req.name.clone(),
            description: req.description.clone(),
            price: req.price.with_scale(PRICE_SCALE),
            category_id: req.category_id,
            image_url: req.image_url.clone(),
            created_at: Utc::now(),
        };
        state.products.insert(product.id, product.clone());
        Ok(product)
    }

    fn delete_product(&self, id: i32) -> Result<bool, DomainError> {
        Ok(self.state()?.products.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn category(store: &InMemoryCatalog, slug: &str) -> Category {
        store
            .create_category(&CategoryCreateRequest {
                name: format!("Category {slug}"),
                slug: slug.to_string(),
            })
            .expect("create category")
    }

    fn product(store: &InMemoryCatalog, category_id: i32, price: &str) -> Product {
        store
            .create_product(&ProductCreateRequest {
                name: "Sample product".to_string(),
                description: None,
                price: BigDecimal::from_str(price).expect("valid decimal"),
                category_id,
                image_url: None,
            })
            .expect("create product")
    }

    #[test]
    fn ids_are_sequential_per_entity() {
        let store = InMemoryCatalog::new();
        let c1 = category(&store, "first");
        let c2 = category(&store, "second");
        assert_eq!((c1.id, c2.id), (1, 2));
        assert_eq!(product(&store, c1.id, "1").id, 1);
    }

    #[test]
    fn duplicate_slug_conflicts() {
        let store = InMemoryCatalog::new();
        category(&store, "books");
        let err = store
            .create_category(&CategoryCreateRequest {
                name: "Other books".to_string(),
                slug: "books".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn stored_prices_carry_two_decimals() {
        let store = InMemoryCatalog::new();
        let c = category(&store, "tools");
        let p = product(&store, c.id, "7.5");
        assert_eq!(p.price.to_string(), "7.50");
    }

    #[test]
    fn list_filters_and_paginates() {
        let store = InMemoryCatalog::new();
        let a = category(&store, "aaaaa");
        let b = category(&store, "bbbbb");
        for _ in 0..3 {
            product(&store, a.id, "1.00");
        }
        product(&store, b.id, "2.00");

        let page = store
            .list_products(ProductFilter { category_id: Some(a.id) }, PageRequest::new(2, 2))
            .expect("list");
        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), 1);

        let all = store
            .list_products(ProductFilter::default(), PageRequest::default())
            .expect("list");
        assert_eq!(all.total, 4);
    }

    #[test]
    fn page_far_past_the_end_is_empty() {
        let store = InMemoryCatalog::new();
        let c = category(&store, "lamps");
        product(&store, c.id, "5.00");

        let page = store
            .list_products(ProductFilter::default(), PageRequest::new(i64::MAX, 20))
            .expect("list");
        assert_eq!(page.total, 1);
        assert!(page.items.is_empty());
    }

    #[test]
    fn referenced_category_cannot_be_deleted() {
        let store = InMemoryCatalog::new();
        let c = category(&store, "shoes");
        let p = product(&store, c.id, "30.00");
        assert!(matches!(store.delete_category(c.id), Err(DomainError::Conflict(_))));
        assert!(store.delete_product(p.id).expect("delete"));
        assert!(store.delete_category(c.id).expect("delete"));
    }

    #[test]
    fn update_price_rescales() {
        let store = InMemoryCatalog::new();
        let c = category(&store, "games");
        let p = product(&store, c.id, "10.00");
        store
            .update_price(p.id, BigDecimal::from(12))
            .expect("update price");
        let reloaded = store.get_product(p.id).expect("get").expect("exists");
        assert_eq!(reloaded.price.to_string(), "12.00");
    }
}
