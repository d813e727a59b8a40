use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::auth::AuthenticatedUser;
use crate::domain::cart::{
    AddToCartOutcome, CartCheck, CartId, CartSnapshot, CartSummary, ClearedCart, ProductId,
    RemovedLine, SyncOutcome, UpdateOutcome,
};
use crate::errors::AppError;
use crate::response;
use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    /// Defaults to 1.
    #[serde(default)]
    pub quantity: Option<i64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCartItemRequest {
    /// 0 removes the line.
    #[serde(default)]
    pub quantity: Option<i64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SyncCartRequest {
    /// `[{"productId": 1, "quantity": 2}, ...]`
    #[serde(default)]
    #[schema(value_type = Vec<Object>)]
    pub items: Value,
}

/// GET /cart
#[utoipa::path(
    get,
    path = "/cart",
    responses(
        (status = 200, description = "Lines newest first, with the summary", body = CartSnapshot),
        (status = 401, description = "No token"),
        (status = 403, description = "Invalid token or not a signed-in user"),
    ),
    security(("bearer_auth" = [])),
    tag = "cart"
)]
pub async fn get_cart(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let cart = web::block(move || state.carts.get_cart(user.id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(response::ok("Cart retrieved successfully", cart))
}

/// GET /cart/summary
#[utoipa::path(
    get,
    path = "/cart/summary",
    responses(
        (status = 200, description = "Line count and total amount", body = CartSummary),
    ),
    security(("bearer_auth" = [])),
    tag = "cart"
)]
pub async fn get_summary(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let summary = web::block(move || state.carts.get_summary(user.id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(response::ok("Cart summary retrieved", summary))
}

/// GET /cart/check/{productId}
#[utoipa::path(
    get,
    path = "/cart/check/{productId}",
    params(("productId" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Whether the product is in the cart", body = CartCheck),
    ),
    security(("bearer_auth" = [])),
    tag = "cart"
)]
pub async fn check_in_cart(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<ProductId>,
) -> Result<HttpResponse, AppError> {
    let product_id = path.into_inner();
    let check = web::block(move || state.carts.is_in_cart(user.id, product_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(response::ok("Cart status retrieved", check))
}

/// POST /cart/add
///
/// Adds to the stored quantity when the product is already in the cart.
#[utoipa::path(
    post,
    path = "/cart/add",
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Line inserted or incremented", body = AddToCartOutcome),
        (status = 400, description = "Quantity below 1"),
        (status = 404, description = "Product not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "cart"
)]
pub async fn add_to_cart(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    body: web::Json<AddToCartRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let outcome =
        web::block(move || state.carts.add_to_cart(user.id, body.product_id, body.quantity))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))??;

    let message = if outcome.updated {
        "Product quantity updated in cart"
    } else {
        "Product added to cart successfully"
    };
    Ok(response::ok(message, outcome))
}

/// PUT /cart/update/{productId}
#[utoipa::path(
    put,
    path = "/cart/update/{productId}",
    params(("productId" = i32, Path, description = "Product id")),
    request_body = UpdateCartItemRequest,
    responses(
        (status = 200, description = "Updated line, or the removal result for quantity 0", body = UpdateOutcome),
        (status = 400, description = "Quantity missing or negative"),
        (status = 404, description = "Cart item not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "cart"
)]
pub async fn update_cart_item(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<ProductId>,
    body: web::Json<UpdateCartItemRequest>,
) -> Result<HttpResponse, AppError> {
    let product_id = path.into_inner();
    let quantity = body.into_inner().quantity;
    let outcome = web::block(move || state.carts.update_cart_item(user.id, product_id, quantity))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(match outcome {
        UpdateOutcome::Removed(_) => response::ok("Item removed from cart", outcome),
        UpdateOutcome::Updated(_) => response::ok("Cart item updated successfully", outcome),
    })
}

/// DELETE /cart/remove/{productId}
#[utoipa::path(
    delete,
    path = "/cart/remove/{productId}",
    params(("productId" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Line removed", body = RemovedLine),
        (status = 404, description = "Cart item not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "cart"
)]
pub async fn remove_from_cart(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<ProductId>,
) -> Result<HttpResponse, AppError> {
    let product_id = path.into_inner();
    let removed = web::block(move || state.carts.remove_from_cart(user.id, product_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(response::ok("Item removed from cart successfully", removed))
}

/// DELETE /cart/remove-by-id/{cartId}
#[utoipa::path(
    delete,
    path = "/cart/remove-by-id/{cartId}",
    params(("cartId" = i32, Path, description = "Cart line id")),
    responses(
        (status = 200, description = "Line removed", body = RemovedLine),
        (status = 404, description = "No such line in this user's cart"),
    ),
    security(("bearer_auth" = [])),
    tag = "cart"
)]
pub async fn remove_from_cart_by_id(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<CartId>,
) -> Result<HttpResponse, AppError> {
    let cart_id = path.into_inner();
    let removed = web::block(move || state.carts.remove_from_cart_by_id(user.id, cart_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(response::ok("Item removed from cart successfully", removed))
}

/// DELETE /cart/clear
#[utoipa::path(
    delete,
    path = "/cart/clear",
    responses(
        (status = 200, description = "Every line removed", body = ClearedCart),
    ),
    security(("bearer_auth" = [])),
    tag = "cart"
)]
pub async fn clear_cart(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let cleared = web::block(move || state.carts.clear_cart(user.id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(response::ok("Cart cleared successfully", cleared))
}

/// POST /cart/sync
///
/// Replaces the cart with the posted items. Items that cannot be added are
/// listed under `syncResults.failed`; the rest are kept.
#[utoipa::path(
    post,
    path = "/cart/sync",
    request_body = SyncCartRequest,
    responses(
        (status = 200, description = "Per-item results and the rebuilt cart", body = SyncOutcome),
        (status = 400, description = "Items must be an array"),
    ),
    security(("bearer_auth" = [])),
    tag = "cart"
)]
pub async fn sync_cart(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    body: web::Json<SyncCartRequest>,
) -> Result<HttpResponse, AppError> {
    let items = body.into_inner().items;
    let outcome = web::block(move || state.carts.sync_cart(user.id, &items))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(response::ok("Cart synchronized successfully", outcome))
}
