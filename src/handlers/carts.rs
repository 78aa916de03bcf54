use actix_web::{web, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::cart::{
    AddItemRequest, Cart, CartLine, CartSummary, RemoveItemRequest, UpdateItemRequest,
};
use crate::domain::errors::DomainError;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateCartResponse {
    pub id: Uuid,
}

fn cart_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Cart {id} not found"))
}

/// Runs a cart operation on the blocking pool with the cart locked.
async fn with_cart<T, F>(state: web::Data<AppState>, id: Uuid, op: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce(&AppState, &mut Cart) -> Result<T, DomainError> + Send + 'static,
{
    web::block(move || state.carts.with_cart(id, |cart| op(state.get_ref(), cart)))
        .await??
        .ok_or_else(|| cart_not_found(id))
}

/// POST /api/carts
///
/// Opens an empty cart for a new shopper session.
#[utoipa::path(
    post,
    path = "/api/carts",
    responses(
        (status = 201, description = "Cart created", body = CreateCartResponse),
    ),
    tag = "carts"
)]
pub async fn create_cart(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let id = state.carts.create()?;
    Ok(HttpResponse::Created().json(CreateCartResponse { id }))
}

/// GET /api/carts/{id}
///
/// Prices the cart at current catalog prices. Products deleted from the
/// catalog are dropped from the cart instead of failing the request.
#[utoipa::path(
    get,
    path = "/api/carts/{id}",
    params(("id" = Uuid, Path, description = "Cart id")),
    responses(
        (status = 200, description = "Cart contents", body = CartSummary),
        (status = 404, description = "Cart not found"),
    ),
    tag = "carts"
)]
pub async fn view_cart(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let summary = with_cart(state, path.into_inner(), |s, cart| s.cart.view(cart)).await?;
    Ok(HttpResponse::Ok().json(summary))
}

/// DELETE /api/carts/{id}
#[utoipa::path(
    delete,
    path = "/api/carts/{id}",
    params(("id" = Uuid, Path, description = "Cart id")),
    responses(
        (status = 204, description = "Cart discarded"),
        (status = 404, description = "Cart not found"),
    ),
    tag = "carts"
)]
pub async fn discard_cart(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    if !state.carts.discard(id)? {
        return Err(cart_not_found(id));
    }
    Ok(HttpResponse::NoContent().finish())
}

/// POST /api/carts/{id}/items
///
/// Adds units of a product. Adding a product already in the cart sums the
/// quantities.
#[utoipa::path(
    post,
    path = "/api/carts/{id}/items",
    params(("id" = Uuid, Path, description = "Cart id")),
    request_body = AddItemRequest,
    responses(
        (status = 201, description = "Resulting cart line", body = CartLine),
        (status = 400, description = "Quantity must be greater than 0"),
        (status = 404, description = "Cart or product not found"),
    ),
    tag = "carts"
)]
pub async fn add_item(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<AddItemRequest>,
) -> Result<HttpResponse, AppError> {
    let req = body.into_inner();
    let line = with_cart(state, path.into_inner(), move |s, cart| {
        s.cart.add_item(cart, &req)
    })
    .await?;
    Ok(HttpResponse::Created().json(line))
}

/// PUT /api/carts/{id}/items
///
/// Replaces the quantity of a product already in the cart.
#[utoipa::path(
    put,
    path = "/api/carts/{id}/items",
    params(("id" = Uuid, Path, description = "Cart id")),
    request_body = UpdateItemRequest,
    responses(
        (status = 200, description = "Updated cart line", body = CartLine),
        (status = 400, description = "Quantity must be greater than 0"),
        (status = 404, description = "Cart not found or product not in cart"),
    ),
    tag = "carts"
)]
pub async fn update_item(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateItemRequest>,
) -> Result<HttpResponse, AppError> {
    let req = body.into_inner();
    let line = with_cart(state, path.into_inner(), move |s, cart| {
        s.cart.update_item(cart, &req)
    })
    .await?;
    Ok(HttpResponse::Ok().json(line))
}

/// DELETE /api/carts/{id}/items/{product_id}
#[utoipa::path(
    delete,
    path = "/api/carts/{id}/items/{product_id}",
    params(
        ("id" = Uuid, Path, description = "Cart id"),
        ("product_id" = i32, Path, description = "Product id"),
    ),
    responses(
        (status = 204, description = "Item removed"),
        (status = 404, description = "Cart not found or product not in cart"),
    ),
    tag = "carts"
)]
pub async fn remove_item(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, i32)>,
) -> Result<HttpResponse, AppError> {
    let (id, product_id) = path.into_inner();
    let req = RemoveItemRequest { product_id };
    with_cart(state, id, move |s, cart| s.cart.remove_item(cart, &req)).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// DELETE /api/carts/{id}/items
#[utoipa::path(
    delete,
    path = "/api/carts/{id}/items",
    params(("id" = Uuid, Path, description = "Cart id")),
    responses(
        (status = 204, description = "Cart emptied"),
        (status = 404, description = "Cart not found"),
    ),
    tag = "carts"
)]
pub async fn clear_cart(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    with_cart(state, path.into_inner(), |s, cart| {
        s.cart.clear(cart);
        Ok(())
    })
    .await?;
    Ok(HttpResponse::NoContent().finish())
}
