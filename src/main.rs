use doodlebucks::{AppState, LocalStore, Settings, router};
use std::net::SocketAddr;
use tokio::fs;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let settings = Settings::from_env()?;
    if let Some(parent) = settings.data_path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }

    let store = LocalStore::open(settings.data_path.clone()).await;
    let state = AppState::new(&settings, store);
    let demo_note = match &settings.api_base {
        Some(base) => format!("Economy backend: {:?}, API_BASE={base}.", settings.backend),
        None => "Demo mode active. Set API_BASE to probe a live API.".to_string(),
    };
    state.log(demo_note).await;

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    info!(
        data_path = %settings.data_path.display(),
        cooldown_secs = settings.rules.cooldown_secs,
        reward = settings.rules.reward,
        "listening on http://{addr}"
    );
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
