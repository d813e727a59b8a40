pub mod cart;
pub mod products;
pub mod users;

use actix_web::{web, HttpResponse};

use crate::errors::AppError;

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

/// Registers the cart, product and user routes along with the extractor configs
/// that keep malformed input inside the response envelope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .service(
            web::scope("/cart")
                .route("", web::get().to(cart::get_cart))
                .route("/summary", web::get().to(cart::get_summary))
                .route("/check/{productId}", web::get().to(cart::check_in_cart))
                .route("/add", web::post().to(cart::add_to_cart))
                .route("/update/{productId}", web::put().to(cart::update_cart_item))
                .route("/remove/{productId}", web::delete().to(cart::remove_from_cart))
                .route(
                    "/remove-by-id/{cartId}",
                    web::delete().to(cart::remove_from_cart_by_id),
                )
                .route("/clear", web::delete().to(cart::clear_cart))
                .route("/sync", web::post().to(cart::sync_cart)),
        )
        .service(
            web::scope("/products")
                .route("", web::get().to(products::list_products))
                .route("/add", web::post().to(products::add_product))
                .route("/update/{id}", web::put().to(products::update_product))
                .route("/delete/{id}", web::delete().to(products::delete_product))
                .route("/{id}", web::get().to(products::get_product)),
        )
        .service(
            web::scope("/users")
                .route("", web::get().to(users::list_users))
                .route("/register", web::post().to(users::register))
                .route("/login", web::post().to(users::login))
                .route("/delete/{id}", web::delete().to(users::delete_user))
                .route("/{id}", web::get().to(users::get_user)),
        );
}

pub async fn not_found() -> Result<HttpResponse, AppError> {
    Err(AppError::NotFound("Not Found".to_string()))
}
