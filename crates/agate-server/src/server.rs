use std::future::Future;

use agate_store::Database;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;
use crate::state::AppState;

/// Agate HTTP server.
pub struct AgateServer {
    config: ServerConfig,
    state: AppState,
}

impl AgateServer {
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Open the configured database, check it answers, and wire the services.
    pub async fn connect(config: ServerConfig) -> ServerResult<Self> {
        let db = Database::open(&config.database)?;
        db.ping().await?;
        let state = AppState::from_database(&db);
        Ok(Self::new(config, state))
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.state.clone(), self.config.request_timeout())
    }

    /// Serve on the configured address until Ctrl-C.
    pub async fn serve(self) -> ServerResult<()> {
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        self.serve_with_shutdown(listener, shutdown_signal()).await
    }

    /// Serve on `listener` until `signal` resolves, then drain in-flight requests.
    pub async fn serve_with_shutdown(
        self,
        listener: TcpListener,
        signal: impl Future<Output = ()> + Send + 'static,
    ) -> ServerResult<()> {
        let app = self.router();
        tracing::info!("Agate server listening on {}", listener.local_addr()?);
        axum::serve(listener, app)
            .with_graceful_shutdown(signal)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))?;
        tracing::info!("Agate server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}

#[cfg(test)]
mod tests {
    use super::*;
    use agate_store::DatabaseConfig;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    fn in_memory_config() -> ServerConfig {
        ServerConfig {
            database: DatabaseConfig::in_memory(),
            ..Default::default()
        }
    }

    #[test]
    fn server_construction() {
        let server = AgateServer::new(ServerConfig::default(), AppState::in_memory());
        assert_eq!(server.config().bind_addr, "127.0.0.1:8000".parse().unwrap());
        let _router = server.router();
    }

    #[tokio::test]
    async fn connect_pings_database() {
        let server = AgateServer::connect(in_memory_config()).await.unwrap();
        assert_eq!(server.config().database.url, ":memory:");
    }

    #[tokio::test]
    async fn connect_fails_on_unopenable_database() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = in_memory_config();
        config.database.url = dir.path().join("no/such/dir.db").display().to_string();
        let err = AgateServer::connect(config).await.err().unwrap();
        assert!(matches!(err, ServerError::Store(_)));
    }

    #[tokio::test]
    async fn serves_until_shutdown() {
        let server = AgateServer::connect(in_memory_config()).await.unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop, stopped) = tokio::sync::oneshot::channel::<()>();
        let handle = tokio::spawn(server.serve_with_shutdown(listener, async {
            let _ = stopped.await;
        }));

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut raw = String::new();
        stream.read_to_string(&mut raw).await.unwrap();
        assert!(raw.starts_with("HTTP/1.1 200"), "unexpected response: {raw}");
        assert!(raw.contains("\"status\":\"ok\""));

        stop.send(()).unwrap();
        handle.await.unwrap().unwrap();
    }
}
