use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::auth::{Permission, Principal};
use crate::domain::cart::ProductId;
use crate::domain::product::{NewProduct, Product, ProductChanges};
use crate::errors::AppError;
use crate::response;
use crate::state::AppState;

const ADMIN_ONLY: &[Permission] = &[Permission::Admin];

/// GET /products
#[utoipa::path(
    get,
    path = "/products",
    responses(
        (status = 200, description = "Every product, ordered by id", body = [Product]),
        (status = 401, description = "No token"),
    ),
    security(("bearer_auth" = [])),
    tag = "products"
)]
pub async fn list_products(
    state: web::Data<AppState>,
    principal: Principal,
) -> Result<HttpResponse, AppError> {
    principal.require(&[Permission::Public, Permission::User, Permission::Admin])?;

    let products = web::block(move || state.products.list())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(response::ok("Success", products))
}

/// GET /products/{id}
#[utoipa::path(
    get,
    path = "/products/{id}",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "Product not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "products"
)]
pub async fn get_product(
    state: web::Data<AppState>,
    principal: Principal,
    path: web::Path<ProductId>,
) -> Result<HttpResponse, AppError> {
    principal.require(ADMIN_ONLY)?;
    let id = path.into_inner();

    let product = web::block(move || state.products.get(id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(response::ok("Success", product))
}

/// POST /products/add
#[utoipa::path(
    post,
    path = "/products/add",
    request_body = NewProduct,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "A product with this name exists"),
    ),
    security(("bearer_auth" = [])),
    tag = "products"
)]
pub async fn add_product(
    state: web::Data<AppState>,
    principal: Principal,
    body: web::Json<NewProduct>,
) -> Result<HttpResponse, AppError> {
    principal.require(ADMIN_ONLY)?;
    let new = body.into_inner();

    let product = web::block(move || state.products.create(new))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(response::created("Product successfully added", product))
}

/// PUT /products/update/{id}
///
/// Omitted fields keep their stored value; an empty string clears an
/// optional text field.
#[utoipa::path(
    put,
    path = "/products/update/{id}",
    params(("id" = i32, Path, description = "Product id")),
    request_body = ProductChanges,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 400, description = "Validation failed or nothing to change"),
        (status = 404, description = "Product not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "products"
)]
pub async fn update_product(
    state: web::Data<AppState>,
    principal: Principal,
    path: web::Path<ProductId>,
    body: web::Json<ProductChanges>,
) -> Result<HttpResponse, AppError> {
    principal.require(ADMIN_ONLY)?;
    let id = path.into_inner();
    let changes = body.into_inner();

    let product = web::block(move || state.products.update(id, changes))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(response::ok("Product successfully updated", product))
}

/// DELETE /products/delete/{id}
///
/// Lines referencing the product are removed with it.
#[utoipa::path(
    delete,
    path = "/products/delete/{id}",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product deleted"),
        (status = 404, description = "Product not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "products"
)]
pub async fn delete_product(
    state: web::Data<AppState>,
    principal: Principal,
    path: web::Path<ProductId>,
) -> Result<HttpResponse, AppError> {
    principal.require(ADMIN_ONLY)?;
    let id = path.into_inner();

    web::block(move || state.products.delete(id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(response::ok("Product successfully deleted", json!({})))
}
