//! Server setup and lifecycle management

use crate::api::{create_router, AppState};
use crate::config::DaemonConfig;
use crate::error::{DaemonError, DaemonResult};
use crate::service::DetectionService;
use std::sync::Arc;
use tokio::net::TcpListener;

/// SSVEP Daemon Server
pub struct Server {
    config: DaemonConfig,
    service: Arc<DetectionService>,
}

impl Server {
    /// Create a new server with the given configuration
    pub fn new(config: DaemonConfig) -> DaemonResult<Self> {
        config.detection.validate().map_err(DaemonError::Config)?;

        let service = Arc::new(DetectionService::from_config(&config));

        Ok(Self { config, service })
    }

    pub fn service(&self) -> Arc<DetectionService> {
        self.service.clone()
    }

    /// Run the server until a shutdown signal arrives
    pub async fn run(self) -> DaemonResult<()> {
        let addr = self.config.server.listen_addr;

        let state = AppState::new(self.service.clone(), self.config.server.clone());
        let app = create_router(state);

        let listener = TcpListener::bind(addr).await?;

        tracing::info!("SSVEP daemon listening on {}", listener.local_addr()?);
        tracing::info!(
            log_capacity = self.config.detection.log_capacity,
            fault_rate = self.config.detection.fault_rate,
            "Detection pipeline configured"
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| DaemonError::Server(e.to_string()))?;

        tracing::info!("SSVEP daemon shutting down");

        Ok(())
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install signal handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}
