//! Server setup and lifecycle.

use std::future::Future;
use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::info;

use crate::api::{create_router, AppContext};
use crate::config::Config;
use crate::error::Result;
use crate::metrics;
use crate::utils::shutdown_signal;

/// Install metrics, load the context, bind and serve until Ctrl-C / SIGTERM.
pub async fn run(config: Config) -> Result<()> {
    if let Some(metrics_port) = config.metrics_port {
        metrics::install_prometheus(SocketAddr::from(([0, 0, 0, 0], metrics_port)))?;
    }
    metrics::init_metrics();

    info!("{} v{}", config.app_title, config.app_version);

    let addr = config.bind_addr();
    let ctx = AppContext::load(config)?;

    let listener = TcpListener::bind(&addr).await?;
    info!("HTTP server listening on {}", listener.local_addr()?);

    serve(listener, ctx, shutdown_signal()).await?;

    info!("HTTP server stopped");
    Ok(())
}

/// Serve the API on an already bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, ctx: AppContext, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, create_router(ctx))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
