//! Number station server
//!
//! Binds the listen address and serves the upgrade route. Each upgraded
//! socket runs its lifecycle handler on its own task.

use std::future::Future;
use std::net::SocketAddr;

use tokio::net::TcpListener;

use crate::error::{Error, Result};
use crate::hub::Hub;
use crate::server::config::ServerConfig;
use crate::server::routes::{self, AppState};

/// Number station server
pub struct StationServer {
    config: ServerConfig,
    hub: Hub,
}

impl StationServer {
    /// Create a server and start its hub
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(config: ServerConfig) -> Self {
        let hub = Hub::spawn(config.hub.clone());
        Self { config, hub }
    }

    /// Get a handle to the broadcast hub
    pub fn hub(&self) -> &Hub {
        &self.hub
    }

    /// Get the configured bind address
    pub fn bind_addr(&self) -> SocketAddr {
        self.config.bind_addr
    }

    /// Bind the configured address
    pub async fn bind(&self) -> Result<TcpListener> {
        let addr = self.config.bind_addr;
        TcpListener::bind(addr)
            .await
            .map_err(|source| Error::Bind { addr, source })
    }

    /// Run the server
    ///
    /// Returns only if binding or serving fails.
    pub async fn run(&self) -> Result<()> {
        let listener = self.bind().await?;
        self.serve(listener).await
    }

    /// Run the server until `shutdown` completes
    pub async fn run_until<F>(&self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = self.bind().await?;
        self.serve_until(listener, shutdown).await
    }

    /// Serve on an already-bound listener
    pub async fn serve(&self, listener: TcpListener) -> Result<()> {
        self.serve_until(listener, std::future::pending()).await
    }

    /// Serve on an already-bound listener until `shutdown` completes
    pub async fn serve_until<F>(&self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(
            addr = %addr,
            interval_ms = self.config.hub.interval.as_millis() as u64,
            "Number station listening"
        );

        let state = AppState {
            hub: self.hub.clone(),
            idle_timeout: self.config.idle_timeout,
        };
        let app = routes::router(state).into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bind_failure_is_reported() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = taken.local_addr().unwrap();

        let server = StationServer::new(ServerConfig::with_addr(addr));
        let err = server.run().await.unwrap_err();

        match err {
            Error::Bind { addr: failed, .. } => assert_eq!(failed, addr),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_run_until_stops_on_shutdown() {
        let config = ServerConfig::with_addr("127.0.0.1:0".parse().unwrap());
        let server = StationServer::new(config);

        let result = server.run_until(async {}).await;

        assert!(result.is_ok());
        assert_eq!(server.hub().stats().await.subscribers, 0);
    }
}
