//! Long-running mode: periodic validation plus the providers server

use crate::config::CheckerConfig;
use crate::rpc::MethodCaller;
use crate::scheduler::Scheduler;
use crate::server;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::broadcast;

pub async fn handle(config: CheckerConfig, caller: Arc<dyn MethodCaller>) -> anyhow::Result<()> {
    let (shutdown_tx, _) = broadcast::channel::<()>(1);

    tracing::info!(
        interval_seconds = config.interval_seconds,
        output = %config.output_providers_path.display(),
        "Starting provider validation"
    );

    let scheduler_handle =
        Scheduler::new(config.clone(), caller).start_with_shutdown(shutdown_tx.subscribe());

    let server = server::bind_and_serve(
        config.listen_addr,
        config.output_providers_path.clone(),
        shutdown_tx.subscribe(),
    );
    tokio::pin!(server);

    let result = tokio::select! {
        result = &mut server => result,
        () = shutdown_signal() => {
            let _ = shutdown_tx.send(());
            server.await
        }
    };

    let _ = shutdown_tx.send(());
    if let Err(e) = scheduler_handle.await {
        tracing::error!(error = %e, "Scheduler task failed");
    }

    result.map_err(|e| anyhow::anyhow!("Server failed on {}: {}", config.listen_addr, e))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
