pub mod carts;
pub mod categories;
pub mod products;

use actix_web::{web, HttpResponse};
use utoipa::OpenApi;

use crate::domain::cart::{AddItemRequest, CartLine, CartSummary, UpdateItemRequest};
use crate::domain::catalog::{
    Category, CategoryCreateRequest, Product, ProductCreateRequest, ProductDetails, ProductPage,
};
use crate::domain::errors::FieldError;

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        categories::list_categories,
        categories::get_category,
        categories::create_category,
        categories::delete_category,
        products::list_products,
        products::list_products_by_category,
        products::get_product,
        products::create_product,
        products::delete_product,
        carts::create_cart,
        carts::view_cart,
        carts::discard_cart,
        carts::add_item,
        carts::update_item,
        carts::remove_item,
        carts::clear_cart,
    ),
    components(schemas(
        Category,
        CategoryCreateRequest,
        Product,
        ProductCreateRequest,
        ProductDetails,
        ProductPage,
        AddItemRequest,
        UpdateItemRequest,
        CartLine,
        CartSummary,
        FieldError,
        carts::CreateCartResponse,
    )),
    tags(
        (name = "categories", description = "Product categories"),
        (name = "products", description = "Product catalog"),
        (name = "carts", description = "Shopping carts"),
    )
)]
pub struct ApiDoc;

/// GET /api/health
#[utoipa::path(
    get,
    path = "/api/health",
    responses((status = 200, description = "Service is up")),
    tag = "health"
)]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// Mounts every route under `/api`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health))
            .service(
                web::scope("/categories")
                    .route("", web::get().to(categories::list_categories))
                    .route("", web::post().to(categories::create_category))
                    .route("/{id}", web::get().to(categories::get_category))
                    .route("/{id}", web::delete().to(categories::delete_category)),
            )
            .service(
                web::scope("/products")
                    .route("", web::get().to(products::list_products))
                    .route("", web::post().to(products::create_product))
                    .route(
                        "/category/{category_id}",
                        web::get().to(products::list_products_by_category),
                    )
                    .route("/{id}", web::get().to(products::get_product))
                    .route("/{id}", web::delete().to(products::delete_product)),
            )
            .service(
                web::scope("/carts")
                    .route("", web::post().to(carts::create_cart))
                    .route("/{id}", web::get().to(carts::view_cart))
                    .route("/{id}", web::delete().to(carts::discard_cart))
                    .route("/{id}/items", web::post().to(carts::add_item))
                    .route("/{id}/items", web::put().to(carts::update_item))
                    .route("/{id}/items", web::delete().to(carts::clear_cart))
                    .route(
                        "/{id}/items/{product_id}",
                        web::delete().to(carts::remove_item),
                    ),
            ),
    );
}
