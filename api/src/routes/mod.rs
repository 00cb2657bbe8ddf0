use crate::config::Config;
use crate::handlers::{
    auth::{login, register},
    health::{health_check, root},
    user::{get_box_info, profile, save_box_info, verify_token},
};
use crate::middleware::rate_limit;
use crate::state::AppState;
use anyhow::{Context, Result};
use axum::{
    Router,
    handler::Handler,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use tower_governor::GovernorLayer;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub fn create_routes(state: AppState, config: &Config) -> Result<Router> {
    let origin = config
        .cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("invalid CORS_ORIGIN '{}'", config.cors_origin))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    // Every request without proxy headers lands in one bucket, so the test suite
    // and some local setups run with RATE_LIMIT=off.
    let (login_route, register_route) = if config.rate_limit {
        (
            post(login.layer(GovernorLayer::new(rate_limit::create_login_config()?))),
            post(register.layer(GovernorLayer::new(rate_limit::create_register_config()?))),
        )
    } else {
        tracing::warn!("rate limiting on /login and /register is disabled");
        (post(login), post(register))
    };

    Ok(Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/login", login_route)
        .route("/register", register_route)
        .route("/verify-token", get(verify_token))
        .route("/user", get(profile))
        .route("/user/getBoxInfo", get(get_box_info))
        .route("/user/saveBoxInfo", post(save_box_info))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state))
}
