pub mod db;
pub mod memory;

use std::sync::Arc;

use actix_web::http::header::{HeaderName, AUTHORIZATION};

use crate::application::{CartService, ProductService, UserService};
use crate::auth::{JwtAuth, Permission};
use crate::domain::cart::UserId;
use crate::state::AppState;

pub use memory::InMemoryStore;

pub const TEST_SECRET: &str = "test-secret";
pub const TEST_PUBLIC_TOKEN: &str = "public-test-token";

pub fn test_auth() -> JwtAuth {
    JwtAuth::new(TEST_SECRET, Some(TEST_PUBLIC_TOKEN.to_string()), 3600)
}

/// Application state backed entirely by `store`.
pub fn memory_state(store: Arc<InMemoryStore>) -> AppState {
    AppState {
        carts: CartService::new(store.clone(), store.clone()),
        products: ProductService::new(store.clone()),
        users: UserService::new(store),
        auth: test_auth(),
    }
}

pub fn test_bearer(user_id: UserId, permission: Permission) -> (HeaderName, String) {
    let token = test_auth()
        .issue(user_id, permission)
        .expect("issuing test token failed");
    (AUTHORIZATION, format!("Bearer {token}"))
}
