//! Shutdown signal handling.

use std::error::Error;

use tokio::signal::ctrl_c;

/// Resolves once the OS asks the process to stop.
pub async fn shutdown() {
    tokio::select! {
        result = ctrl_c() => match result {
            Ok(()) => tracing::info!("Received SIGINT, shutting down"),
            Err(err) => {
                tracing::error!(error = &err as &dyn Error, "Failed listening for SIGINT");
            }
        },
        () = terminate() => {},
    }
}

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut signal) => {
            if signal.recv().await.is_some() {
                tracing::info!("Received SIGTERM, shutting down");
            }
        }
        Err(err) => {
            tracing::error!(error = &err as &dyn Error, "Failed listening for SIGTERM");
            std::future::pending::<()>().await
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending().await
}
