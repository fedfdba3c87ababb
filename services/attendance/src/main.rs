use sea_orm::Database;
use tracing::info;

use muster_attendance::config::AttendanceConfig;
use muster_attendance::infra::routing::DistanceMatrixClient;
use muster_attendance::router::build_router;
use muster_attendance::state::AppState;
use muster_core::config::load_dotenv;
use muster_core::tracing::init_tracing;

#[tokio::main]
async fn main() {
    let dotenv_path = load_dotenv();
    init_tracing("info,sqlx=warn");
    if let Some(path) = dotenv_path {
        info!(path = %path.display(), "loaded .env");
    }

    let config = AttendanceConfig::from_env();
    if config.routing.api_key.is_none() {
        tracing::warn!("ROUTING_API_KEY is not set; /validate-location will fail");
    }

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let routing =
        DistanceMatrixClient::new(config.routing).expect("failed to build routing HTTP client");

    let state = AppState { db, routing };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.attendance_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("attendance service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
