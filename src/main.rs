mod app;
mod auth;
mod config;
mod db;
mod envelope;
mod error;
mod geo;
mod state;
mod users;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "geouser=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let app_state = state::AppState::init().await?;
    match app_state.config.utc_offset {
        Some(offset) => tracing::info!(utc_offset = %offset, "week windows use a fixed offset"),
        None => tracing::info!("week windows follow the host time zone"),
    }

    app::serve(app::build_app(app_state)).await
}
