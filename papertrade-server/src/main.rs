//! papertrade HTTP server binary.
//!
//! Configuration is read from `PAPERTRADE_*` environment variables (see
//! `papertrade_server::config`); log filtering follows `RUST_LOG` (default: info).

use papertrade_server::{AppState, ServerSettings, create_router, telemetry};
use tokio::net::TcpListener;
use tokio::signal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init();

    let settings = ServerSettings::from_env()?;
    let addr = settings.socket_addr().await?;
    let service = settings.build_service()?;

    tracing::info!(
        %addr,
        provider = settings.provider.as_str(),
        max_concurrent_fetches = settings.service.max_concurrent_fetches,
        batch_attempts = ?settings.service.batch_attempts,
        "papertrade server starting"
    );
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health");
    tracing::info!("  GET  /api/instrument");
    tracing::info!("  GET  /api/StockSummaryData");
    tracing::info!("  GET  /api/instruments");
    tracing::info!("  POST /api/instruments");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, create_router(AppState::new(service)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("papertrade server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C, initiating shutdown"),
        () = terminate => tracing::info!("Received SIGTERM, initiating shutdown"),
    }
}
