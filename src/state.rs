use std::sync::Arc;

use crate::application::{CartService, ProductService, UserService};
use crate::auth::JwtAuth;
use crate::db::DbPool;
use crate::infrastructure::{DieselCartRepository, DieselProductRepository, DieselUserRepository};

pub struct AppState {
    pub carts: CartService,
    pub products: ProductService,
    pub users: UserService,
    pub auth: JwtAuth,
}

impl AppState {
    pub fn from_pool(pool: DbPool, auth: JwtAuth) -> Self {
        let products = Arc::new(DieselProductRepository::new(pool.clone()));
        Self {
            carts: CartService::new(
                Arc::new(DieselCartRepository::new(pool.clone())),
                products.clone(),
            ),
            products: ProductService::new(products),
            users: UserService::new(Arc::new(DieselUserRepository::new(pool))),
            auth,
        }
    }
}
