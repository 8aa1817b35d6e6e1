// Signal handling module
//
// Supported signals:
// - SIGTERM: Graceful shutdown
// - SIGINT:  Graceful shutdown (Ctrl+C)
//
// On non-Unix targets only Ctrl+C is available.

use std::sync::Arc;
use tokio::sync::Notify;

/// Spawn a task that notifies `shutdown` on the first termination signal
pub fn start_signal_handler(shutdown: Arc<Notify>) {
    tokio::spawn(async move {
        let signal_name = wait_for_signal().await;
        tracing::info!(signal = signal_name, "initiating graceful shutdown");
        // notify_one keeps a permit if the loop is not waiting yet
        shutdown.notify_one();
    });
}

#[cfg(unix)]
async fn wait_for_signal() -> &'static str {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            crate::logger::log_warning(&format!("Failed to register SIGTERM handler: {e}"));
            return wait_for_ctrl_c().await;
        }
    };

    tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        name = wait_for_ctrl_c() => name,
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> &'static str {
    wait_for_ctrl_c().await
}

async fn wait_for_ctrl_c() -> &'static str {
    if let Err(e) = tokio::signal::ctrl_c().await {
        crate::logger::log_warning(&format!("Failed to listen for Ctrl+C: {e}"));
        std::future::pending::<()>().await;
    }
    "SIGINT"
}
