use std::io;

use dotenvy::dotenv;
use storefront_service::auth::JwtAuth;
use storefront_service::config::Config;
use storefront_service::{build_server, create_pool, run_migrations, AppState};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(io::Error::other)?;

    let pool = create_pool(&config.database_url, config.database_pool_size)
        .map_err(io::Error::other)?;
    run_migrations(&pool).map_err(io::Error::other)?;

    let auth = JwtAuth::new(
        &config.jwt_secret,
        config.public_token.clone(),
        config.jwt_ttl_secs,
    );
    if config.public_token.is_none() {
        log::warn!("PUBLIC_TOKEN not set; only signed tokens will be accepted");
    }

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    build_server(AppState::from_pool(pool, auth), &config.host, config.port)?.await
}
