use api::{auth::TokenService, config::Config, db, routes, state::AppState};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 0. Load .env before anything reads the environment. Missing file is fine.
    dotenvy::dotenv().ok();

    // 1. Sentry is a no-op without SENTRY_DSN. The guard has to outlive the server.
    let _guard = sentry::init((std::env::var("SENTRY_DSN").ok(), sentry::ClientOptions {
        release: sentry::release_name!(),
        traces_sample_rate: 1.0,
        ..Default::default()
    }));

    // 2. Logging. RUST_LOG wins, otherwise debug for us and tower_http.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "api=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!(
        production = config.production,
        store = %config.users_db_path.display(),
        token_ttl_secs = config.jwt_expiry.num_seconds(),
        "Starting auth API..."
    );

    // 3. Wire up the store and token service.
    let state = AppState {
        users: db::connect(&config),
        tokens: TokenService::new(&config.jwt_secret, config.jwt_expiry),
    };
    let app = routes::create_routes(state, &config)?;

    // 4. 0.0.0.0 so the port is reachable from outside a container.
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Api server is running on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
