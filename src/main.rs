//src/main.rs

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use painel_revendas::{
    config::{AppState, Settings},
    routes::build_router,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let settings = Settings::from_env()?;
    let app_state = AppState::new(settings).await?;

    let shutdown = CancellationToken::new();
    let reconciliation = app_state
        .reconciliation_service
        .clone()
        .spawn_periodic(app_state.settings.reconcile_period, shutdown.child_token());

    let listener = TcpListener::bind(&app_state.settings.addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);

    axum::serve(listener, build_router(app_state))
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .await?;

    shutdown.cancel();
    if let Err(e) = reconciliation.await {
        tracing::warn!("Tarefa de verificação terminou com erro: {}", e);
    }
    tracing::info!("Servidor encerrado");
    Ok(())
}

async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Falha ao escutar o sinal de encerramento: {}", e);
    }
    tracing::info!("Sinal de encerramento recebido");
    shutdown.cancel();
}
