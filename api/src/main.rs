use api::auth::middleware::log_request;
use api::routes::routes;
use axum::{Router, middleware::from_fn};
use chrono::Utc;
use db::models::qr_token::Model as QrTokenModel;
use std::{net::SocketAddr, time::Duration};
use tower_http::cors::CorsLayer;
use tracing_appender::rolling;
use util::{config, state::AppState};

#[tokio::main]
async fn main() {
    // Load configuration and initialize logging
    let _log_guard = init_logging(&config::log_file());

    // Set up dependencies
    let db = db::connect().await;
    let app_state = AppState::new(db);

    // Run pending migrations before serving traffic.
    {
        use migration::{Migrator, MigratorTrait};
        Migrator::up(app_state.db(), None)
            .await
            .expect("Failed to run migrations");
    }

    // Spawn periodic cleanup of expired QR tokens
    spawn_qr_purge(app_state.clone());

    // Configure middleware
    let cors = CorsLayer::very_permissive();

    // Build app router
    let app = Router::new()
        .nest("/api", routes(app_state.clone()))
        .layer(from_fn(log_request))
        .layer(cors);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config::host(), config::port())
        .parse()
        .expect("Invalid address");

    println!(
        "Starting {} on http://{}:{}",
        config::project_name(),
        config::host(),
        config::port()
    );

    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Server crashed");
}

fn init_logging(log_file: &str) -> tracing_appender::non_blocking::WorkerGuard {
    use std::fs;
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    fs::create_dir_all("logs").ok();

    let file_appender = rolling::daily("logs", log_file);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true);

    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_target(true)
        .with_thread_ids(true);

    let env_filter =
        EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new("api=info"));

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer);

    if config::log_to_stdout() {
        registry.with(stdout_layer).init();
    } else {
        registry.init();
    }

    guard
}

/// Deletes expired QR tokens on a fixed interval. Tokens are validated
/// against their own expiry timestamp, so the purge is storage hygiene,
/// not a correctness requirement.
fn spawn_qr_purge(app_state: AppState) {
    let interval = Duration::from_secs(config::qr_purge_interval_seconds());
    let db = app_state.db_clone();

    tokio::spawn(async move {
        loop {
            tokio::time::sleep(interval).await;
            match QrTokenModel::purge_expired(&db, Utc::now()).await {
                Ok(0) => {}
                Ok(n) => tracing::info!(purged = n, "Expired QR tokens removed"),
                Err(e) => tracing::error!(error = %e, "QR token purge failed"),
            }
        }
    });
}
