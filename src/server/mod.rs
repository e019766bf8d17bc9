use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{
    Router, middleware,
    http::{HeaderName, HeaderValue, Method, header},
    routing::get,
};
use tokio::{net::TcpListener, signal, sync::Mutex};
use tower_http::{
    cors::CorsLayer,
    set_header::SetResponseHeaderLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, info};

use crate::config::{self, Settings};
use crate::storage::PortfolioStore;

pub mod error;
pub mod extract;
pub mod rate_limit;
pub mod routes;
pub mod views;

pub use error::ApiError;
use rate_limit::RateLimiter;

const SECURITY_HEADERS: &[(&str, &str)] = &[
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "SAMEORIGIN"),
    ("x-dns-prefetch-control", "off"),
    ("referrer-policy", "no-referrer"),
    ("cross-origin-opener-policy", "same-origin"),
    ("strict-transport-security", "max-age=31536000; includeSubDomains"),
    ("content-security-policy", "default-src 'self'"),
];

/// Server state
pub struct AppState {
    pub store: Mutex<PortfolioStore>,
    pub limiter: RateLimiter,
}

impl AppState {
    pub fn new(store: PortfolioStore, settings: &Settings) -> Arc<Self> {
        Arc::new(Self {
            store: Mutex::new(store),
            limiter: RateLimiter::new(settings.rate_limit),
        })
    }
}

/// Build the full application router
pub fn router(state: Arc<AppState>, settings: &Settings) -> anyhow::Result<Router> {
    let api = Router::new()
        .route("/health", get(routes::health))
        .route(
            "/profile",
            get(routes::get_profile).post(routes::create_profile),
        )
        .route(
            "/profile/{id}",
            axum::routing::put(routes::update_profile).delete(routes::delete_profile),
        )
        .route("/projects", get(routes::list_projects))
        .route("/projects/{id}", get(routes::get_project))
        .route("/skills", get(routes::list_skills))
        .route("/skills/top", get(routes::top_skills))
        .route("/work", get(routes::list_work))
        .route("/search", get(routes::search))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::limit_requests,
        ));

    let mut app = Router::new()
        .route("/", get(routes::index))
        .nest("/api", api)
        .fallback(routes::not_found);

    for (name, value) in SECURITY_HEADERS {
        app = app.layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static(*name),
            HeaderValue::from_static(*value),
        ));
    }

    let app = app
        .layer(cors_layer(&settings.cors_origin)?)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state);

    Ok(app)
}

fn cors_layer(origin: &str) -> anyhow::Result<CorsLayer> {
    let origin: HeaderValue = origin
        .parse()
        .with_context(|| format!("invalid CORS origin {origin:?}"))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60)))
}

pub async fn start_server(settings: Settings) -> anyhow::Result<()> {
    config::ensure_db_dir(&settings.database_path)?;
    let store = PortfolioStore::open(&settings.database_path)
        .with_context(|| format!("opening {}", settings.database_path.display()))?;

    let state = AppState::new(store, &settings);
    let app = router(state, &settings)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    info!("Starting server on {}", addr);
    info!("Database: {}", settings.database_path.display());
    info!("CORS enabled for: {}", settings.cors_origin);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
