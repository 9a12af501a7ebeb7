use std::{env, net::SocketAddr};
use tokio::fs;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use trackboard::{api::ApiClient, app, profile, state::AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let backend_url =
        env::var("BACKEND_URL").unwrap_or_else(|_| "http://127.0.0.1:8000".to_string());

    let profile_path = profile::resolve_profile_path()?;
    if let Some(parent) = profile_path.parent() {
        fs::create_dir_all(parent).await?;
    }
    let loaded = profile::load_profile(&profile_path).await;
    // Persist right away so the device key stays stable across restarts.
    profile::persist_profile(&profile_path, &loaded)
        .await
        .map_err(|err| err.message)?;

    let state = AppState::new(ApiClient::new(&backend_url), profile_path, loaded);
    let app = app::router(state);

    let port = env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("listening on http://{addr}, backend at {backend_url}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
