use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::handlers::{cart, products, users};

#[derive(OpenApi)]
#[openapi(
    info(title = "Storefront API", description = "Cart, product catalog and accounts"),
    paths(
        cart::get_cart,
        cart::get_summary,
        cart::check_in_cart,
        cart::add_to_cart,
        cart::update_cart_item,
        cart::remove_from_cart,
        cart::remove_from_cart_by_id,
        cart::clear_cart,
        cart::sync_cart,
        products::list_products,
        products::get_product,
        products::add_product,
        products::update_product,
        products::delete_product,
        users::register,
        users::login,
        users::list_users,
        users::get_user,
        users::delete_user,
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "cart", description = "The signed-in user's cart"),
        (name = "products", description = "Product catalog"),
        (name = "users", description = "Registration, login and account admin"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
