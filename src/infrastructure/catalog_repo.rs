use bigdecimal::BigDecimal;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

use crate::db::DbPool;
use crate::domain::catalog::{
    Category, CategoryCreateRequest, PageRequest, Product, ProductCreateRequest, ProductFilter,
    ProductPage, PRICE_SCALE,
};
use crate::domain::errors::DomainError;
use crate::domain::ports::CatalogRepository;
use crate::schema::{category, product};

use super::models::{CategoryRow, NewCategoryRow, NewProductRow, ProductRow};

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<DieselError> for DomainError {
    fn from(e: DieselError) -> Self {
        match e {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                DomainError::Conflict(info.message().to_string())
            }
            DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
                DomainError::Conflict(info.message().to_string())
            }
            other => DomainError::Internal(other.to_string()),
        }
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

// ── Repository ────────────────────────────────────────────────────────────────

pub struct DieselCatalogRepository {
    pool: DbPool,
}

impl DieselCatalogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl CatalogRepository for DieselCatalogRepository {
    fn get_category(&self, id: i32) -> Result<Option<Category>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = category::table
            .filter(category::id.eq(id))
            .select(CategoryRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(row.map(Category::from))
    }

    fn list_categories(&self) -> Result<Vec<Category>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = category::table
            .select(CategoryRow::as_select())
            .order(category::id.asc())
            .load(&mut conn)?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    fn create_category(&self, req: &CategoryCreateRequest) -> Result<Category, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::insert_into(category::table)
            .values(&NewCategoryRow {
                name: &req.name,
                slug: &req.slug,
            })
            .returning(CategoryRow::as_returning())
            .get_result(&mut conn)?;

        Ok(row.into())
    }

    fn delete_category(&self, id: i32) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        // Restricted by the product foreign key, surfaces as a conflict.
        let deleted = diesel::delete(category::table.filter(category::id.eq(id)))
            .execute(&mut conn)?;

        Ok(deleted > 0)
    }

    fn get_product(&self, id: i32) -> Result<Option<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = product::table
            .filter(product::id.eq(id))
            .select(ProductRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(row.map(Product::from))
    }

    fn list_products(
        &self,
        filter: ProductFilter,
        page: PageRequest,
    ) -> Result<ProductPage, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let mut count_query = product::table.into_boxed();
            let mut rows_query = product::table.into_boxed();
            if let Some(category_id) = filter.category_id {
                count_query = count_query.filter(product::category_id.eq(category_id));
                rows_query = rows_query.filter(product::category_id.eq(category_id));
            }

            let total: i64 = count_query.count().get_result(conn)?;

            let rows = rows_query
                .select(ProductRow::as_select())
                .order(product::id.asc())
                .limit(page.limit)
                .offset(page.offset())
                .load(conn)?;

            Ok(ProductPage {
                items: rows.into_iter().map(Product::from).collect(),
                total,
                page: page.page,
                limit: page.limit,
            })
        })
    }

    fn create_product(&self, req: &ProductCreateRequest) -> Result<Product, DomainError> {
        let mut conn = self.pool.get()?;

        let price: BigDecimal = req.price.with_scale(PRICE_SCALE);
        let row = diesel::insert_into(product::table)
            .values(&NewProductRow {
                name: &req.name,
                description: req.description.as_deref(),
                price,
                category_id: req.category_id,
                image_url: req.image_url.as_deref(),
            })
            .returning(ProductRow::as_returning())
            .get_result(&mut conn)?;

        Ok(row.into())
    }

    fn delete_product(&self, id: i32) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        let deleted =
            diesel::delete(product::table.filter(product::id.eq(id))).execute(&mut conn)?;

        Ok(deleted > 0)
    }
}
