use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::info;

use account_service::app::{router, AppState};
use account_service::config::load_config;
use account_service::service::AccountService;
use account_service::store::PgUserStore;
use common_auth::TokenCodec;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let config = load_config()?;

    let pool = PgPool::connect(&config.database_url)
        .await
        .context("Failed to connect to Postgres")?;

    let codec = Arc::new(TokenCodec::new(&config.jwt_secret));
    let store = Arc::new(PgUserStore::new(pool));
    let service = Arc::new(AccountService::new(store, codec.clone()));
    let state = AppState { service, codec };

    let mut origins = Vec::with_capacity(config.cors_origins.len());
    for origin in &config.cors_origins {
        origins.push(
            HeaderValue::from_str(origin)
                .with_context(|| format!("Invalid CORS origin '{origin}'"))?,
        );
    }
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([ACCEPT, CONTENT_TYPE, AUTHORIZATION]);

    let app = router(state).layer(cors);

    let ip: std::net::IpAddr = config.host.parse().context("Failed to parse HOST")?;
    let addr = SocketAddr::from((ip, config.port));

    info!("starting account-service on {addr}");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
