//! axumサーバー起動・シャットダウンハンドリング

use std::future::Future;

use tokio::net::TcpListener;
use tracing::info;

use crate::common::error::{DalError, DalResult};
use crate::AppState;

/// axumサーバーを起動し、シャットダウンシグナルを待機する
pub async fn run(state: AppState, bind_addr: &str) -> DalResult<()> {
    let listener = TcpListener::bind(bind_addr)
        .await
        .map_err(|e| DalError::Internal(format!("Failed to bind to {}: {}", bind_addr, e)))?;

    info!("Data access log server listening on {}", bind_addr);

    serve(listener, state, shutdown_signal()).await?;

    info!("Server shutdown complete");
    Ok(())
}

/// バインド済みのリスナーでサーバーを動かす
///
/// `shutdown`が完了すると処理中のリクエストを終えてから戻る。
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> DalResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = crate::api::create_app(state);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| DalError::Internal(format!("Server error: {}", e)))
}

/// シャットダウンシグナルを待機
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
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
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down...");
        }
    }
}
