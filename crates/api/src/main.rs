use std::sync::Arc;

use anyhow::Context;

use bizdir_infra::{AppConfig, AppServices};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    bizdir_observability::init(config.log_format);

    let services = Arc::new(AppServices::from_config(&config).context("failed to build services")?);

    if let Some(admin) = config.bootstrap_admin.clone() {
        let services = services.clone();
        tokio::task::spawn_blocking(move || services.users.ensure_admin(&admin.email, &admin.password))
            .await?
            .context("failed to create bootstrap admin")?;
    }

    let app = bizdir_api::app::build_app(services);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    wait_for_shutdown(tokio::signal::ctrl_c()).await;
}

/// Resolves once `signal` fires. If the handler could not be installed the
/// future never resolves, so the server keeps running until killed.
async fn wait_for_shutdown(signal: impl Future<Output = std::io::Result<()>>) {
    match signal.await {
        Ok(()) => tracing::info!("shutdown signal received"),
        Err(err) => {
            tracing::error!(error = %err, "failed to install Ctrl-C handler; graceful shutdown disabled");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn received_signal_triggers_shutdown() {
        let fired = tokio::time::timeout(Duration::from_millis(100), wait_for_shutdown(async { Ok(()) })).await;
        assert!(fired.is_ok());
    }

    #[tokio::test]
    async fn failed_handler_install_keeps_serving() {
        let failed = async { Err(std::io::Error::other("signal handling unavailable")) };
        let fired = tokio::time::timeout(Duration::from_millis(100), wait_for_shutdown(failed)).await;
        assert!(fired.is_err());
    }
}
