// src/main.rs

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use civic_complaints::{
    config::{AppState, Settings},
    routes::create_router,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logger: RUST_LOG ou "info"
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let settings = Settings::from_env()?;
    let app_state = AppState::new(&settings).await?;

    let app = create_router(app_state);

    // Inicia o servidor
    let listener = TcpListener::bind(&settings.app_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
