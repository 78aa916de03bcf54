use actix_web::{web, HttpResponse};

use crate::domain::catalog::{Category, CategoryCreateRequest};
use crate::errors::AppError;
use crate::state::AppState;

/// GET /api/categories
#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "All categories ordered by id", body = Vec<Category>),
        (status = 500, description = "Internal server error"),
    ),
    tag = "categories"
)]
pub async fn list_categories(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let categories = web::block(move || state.catalog.list_categories()).await??;
    Ok(HttpResponse::Ok().json(categories))
}

/// GET /api/categories/{id}
#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category found", body = Category),
        (status = 404, description = "Category not found"),
    ),
    tag = "categories"
)]
pub async fn get_category(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let category = web::block(move || state.catalog.get_category(id)).await??;
    Ok(HttpResponse::Ok().json(category))
}

/// POST /api/categories
#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = CategoryCreateRequest,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 400, description = "Name or slug violates a constraint"),
        (status = 409, description = "Slug already taken"),
    ),
    tag = "categories"
)]
pub async fn create_category(
    state: web::Data<AppState>,
    body: web::Json<CategoryCreateRequest>,
) -> Result<HttpResponse, AppError> {
    let req = body.into_inner();
    let category = web::block(move || state.catalog.create_category(&req)).await??;
    Ok(HttpResponse::Created().json(category))
}

/// DELETE /api/categories/{id}
///
/// Refused while any product still references the category.
#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Category is referenced by products"),
    ),
    tag = "categories"
)]
pub async fn delete_category(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    web::block(move || state.catalog.delete_category(id)).await??;
    Ok(HttpResponse::NoContent().finish())
}
