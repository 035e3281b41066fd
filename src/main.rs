use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use marquee_api::{
    api::{create_router, AppState},
    config::Config,
    db::{create_pool, PgStore},
    middleware::{make_span, request_id_middleware},
    services::{ModelRegistry, TokenService},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    let store = Arc::new(PgStore::new(pool));

    let registry = ModelRegistry::with_defaults(
        Path::new(&config.checkpoint_dir),
        Duration::from_secs(config.model_timeout_secs),
    );
    let tokens = TokenService::new(&config.secret_key);

    let state = AppState::new(store, registry, tokens);
    // Layer order: request ids are assigned outermost so the trace span
    // (and everything under it) can pick them up.
    let app = create_router(state)
        .layer(TraceLayer::new_for_http().make_span_with(make_span))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
