use actix_web::{web, HttpResponse};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::domain::catalog::{
    PageRequest, Product, ProductCreateRequest, ProductDetails, ProductFilter, ProductPage,
};
use crate::errors::AppError;
use crate::state::AppState;

// ── Pagination ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListProductsParams {
    /// Page number (1-based). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: i64,
    /// Number of items per page. Defaults to 20, maximum 100.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    PageRequest::DEFAULT_LIMIT
}

impl From<ListProductsParams> for PageRequest {
    fn from(params: ListProductsParams) -> Self {
        PageRequest::new(params.page, params.limit)
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /api/products
#[utoipa::path(
    get,
    path = "/api/products",
    params(ListProductsParams),
    responses(
        (status = 200, description = "Paginated list of products", body = ProductPage),
        (status = 500, description = "Internal server error"),
    ),
    tag = "products"
)]
pub async fn list_products(
    state: web::Data<AppState>,
    query: web::Query<ListProductsParams>,
) -> Result<HttpResponse, AppError> {
    let page = PageRequest::from(query.into_inner());
    let result =
        web::block(move || state.catalog.list_products(ProductFilter::default(), page)).await??;
    Ok(HttpResponse::Ok().json(result))
}

/// GET /api/products/category/{category_id}
#[utoipa::path(
    get,
    path = "/api/products/category/{category_id}",
    params(
        ("category_id" = i32, Path, description = "Category id"),
        ListProductsParams,
    ),
    responses(
        (status = 200, description = "Paginated products of one category", body = ProductPage),
        (status = 404, description = "Category not found"),
    ),
    tag = "products"
)]
pub async fn list_products_by_category(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    query: web::Query<ListProductsParams>,
) -> Result<HttpResponse, AppError> {
    let filter = ProductFilter {
        category_id: Some(path.into_inner()),
    };
    let page = PageRequest::from(query.into_inner());
    let result = web::block(move || state.catalog.list_products(filter, page)).await??;
    Ok(HttpResponse::Ok().json(result))
}

/// GET /api/products/{id}
///
/// Returns the product with its category embedded.
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product found", body = ProductDetails),
        (status = 404, description = "Product not found"),
    ),
    tag = "products"
)]
pub async fn get_product(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let details = web::block(move || state.catalog.get_product_details(id)).await??;
    Ok(HttpResponse::Ok().json(details))
}

/// POST /api/products
#[utoipa::path(
    post,
    path = "/api/products",
    request_body = ProductCreateRequest,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "One or more fields violate a constraint"),
    ),
    tag = "products"
)]
pub async fn create_product(
    state: web::Data<AppState>,
    body: web::Json<ProductCreateRequest>,
) -> Result<HttpResponse, AppError> {
    let req = body.into_inner();
    let product = web::block(move || state.catalog.create_product(&req)).await??;
    Ok(HttpResponse::Created().json(product))
}

/// DELETE /api/products/{id}
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Product not found"),
    ),
    tag = "products"
)]
pub async fn delete_product(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    web::block(move || state.catalog.delete_product(id)).await??;
    Ok(HttpResponse::NoContent().finish())
}
