use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use axum::Router;
use snapshot_logging::{snap_debug, snap_info};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tower_http::services::{ServeDir, ServeFile};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("could not bind port {port}: {source}")]
    Bind { port: u16, source: io::Error },
    #[error("server failed while serving: {0}")]
    Serve(io::Error),
    #[error("server task did not shut down cleanly: {0}")]
    Task(String),
}

/// Local server that exposes the built application to the crawler.
#[async_trait::async_trait]
pub trait StaticServer: Send {
    /// Starts serving; resolves once the listener is accepting connections.
    async fn listen(&mut self, port: u16) -> Result<SocketAddr, ServerError>;
    /// Stops serving; resolves after the server task has exited.
    async fn close(&mut self) -> Result<(), ServerError>;
}

/// Serves a build directory over loopback, answering unknown routes with
/// `index.html` so client-side routes render.
pub struct AxumStaticServer {
    root_dir: PathBuf,
    running: Option<Running>,
}

struct Running {
    shutdown: CancellationToken,
    task: JoinHandle<io::Result<()>>,
}

impl AxumStaticServer {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            running: None,
        }
    }

    fn router(&self) -> Router {
        let index = ServeFile::new(self.root_dir.join("index.html"));
        Router::new().fallback_service(ServeDir::new(&self.root_dir).fallback(index))
    }
}

#[async_trait::async_trait]
impl StaticServer for AxumStaticServer {
    async fn listen(&mut self, port: u16) -> Result<SocketAddr, ServerError> {
        if self.running.is_some() {
            self.close().await?;
        }

        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, port))
            .await
            .map_err(|source| ServerError::Bind { port, source })?;
        let addr = listener
            .local_addr()
            .map_err(|source| ServerError::Bind { port, source })?;

        let shutdown = CancellationToken::new();
        let signal = shutdown.clone();
        let app = self.router();
        let task = tokio::spawn(async move {
            axum::serve(listener, app.into_make_service())
                .with_graceful_shutdown(async move { signal.cancelled().await })
                .await
        });

        snap_info!("Serving {:?} on {}", self.root_dir, addr);
        self.running = Some(Running { shutdown, task });
        Ok(addr)
    }

    async fn close(&mut self) -> Result<(), ServerError> {
        let Some(running) = self.running.take() else {
            return Ok(());
        };
        running.shutdown.cancel();
        match running.task.await {
            Ok(Ok(())) => {
                snap_debug!("Static server stopped");
                Ok(())
            }
            Ok(Err(err)) => Err(ServerError::Serve(err)),
            Err(err) => Err(ServerError::Task(err.to_string())),
        }
    }
}
