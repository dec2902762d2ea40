//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; request errors are rendered by
//! the attendance crate.

use anyhow::Context;
use attendance::{AttendanceConfig, JsonFileCatalog, attendance_router};
use axum::{
    Router, http,
    http::{Method, header},
};
use chrono::FixedOffset;
use std::env;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_PORT: u16 = 31113;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,attendance=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let port = match env::var("ATTENDANCE_PORT") {
        Ok(port) => port
            .parse::<u16>()
            .with_context(|| format!("ATTENDANCE_PORT is not a port number: {port}"))?,
        Err(_) => DEFAULT_PORT,
    };

    let config = attendance_config(port)?;
    tracing::info!(
        data_dir = %config.data_dir.display(),
        utc_offset = %config.utc_offset,
        base_url = %config.check_in_base_url,
        "Attendance configuration loaded"
    );

    // Reference data; tokens and the ledger start empty on every boot
    let catalog = JsonFileCatalog::open(config.data_dir.clone())
        .await
        .context("failed to open class/timetable catalog")?;

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:40922,http://127.0.0.1:40922".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([header::CONTENT_TYPE, header::ACCEPT]))
        .expose_headers([header::CONTENT_DISPOSITION, header::RETRY_AFTER]);

    // Build router
    let app = Router::new()
        .nest("/api", attendance_router(catalog, config))
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

fn attendance_config(port: u16) -> anyhow::Result<AttendanceConfig> {
    let mut config = AttendanceConfig::development();

    if let Ok(dir) = env::var("ATTENDANCE_DATA_DIR") {
        config.data_dir = dir.into();
    }

    config.check_in_base_url = env::var("ATTENDANCE_BASE_URL")
        .unwrap_or_else(|_| format!("http://localhost:{port}"));

    if let Ok(minutes) = env::var("ATTENDANCE_UTC_OFFSET_MINUTES") {
        let minutes: i32 = minutes
            .parse()
            .with_context(|| format!("ATTENDANCE_UTC_OFFSET_MINUTES is not a number: {minutes}"))?;
        config.utc_offset = FixedOffset::east_opt(minutes * 60)
            .with_context(|| format!("UTC offset out of range: {minutes} minutes"))?;
    }

    Ok(config)
}
