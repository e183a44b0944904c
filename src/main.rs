use anyhow::{Context, Result};
use clap::Parser;
use employee_registry::{api, config, employees::EmployeeStore, logging};
use std::net::IpAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

#[derive(Parser)]
#[command(
    name = "employee-registry",
    about = "In-memory employee registry with a REST API"
)]
struct Cli {
    /// Address to bind (overrides `SERVER_HOST`).
    #[arg(long)]
    host: Option<IpAddr>,
    /// Port to bind (overrides `SERVER_PORT`).
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::load()
        .context("failed to load configuration")?
        .with_overrides(cli.host, cli.port);
    logging::init_tracing(config.log_file.as_deref());
    tracing::debug!(
        server_host = %config.server_host,
        server_port = config.server_port,
        log_file = ?config.log_file,
        "Loaded configuration"
    );

    let app = api::create_router(Arc::new(EmployeeStore::new()));

    let listener = TcpListener::bind((config.server_host, config.server_port))
        .await
        .with_context(|| {
            format!(
                "failed to bind {}:{}",
                config.server_host, config.server_port
            )
        })?;
    let address = listener.local_addr().context("listener has no local address")?;
    tracing::info!("Listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server terminated unexpectedly")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
