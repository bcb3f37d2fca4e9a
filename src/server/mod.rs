//! HTTP server hosting marker-aware pages.

pub mod health;
mod logging;
mod pages;
pub mod router;
pub mod session;
pub mod shutdown;

pub use logging::init_tracing;
pub use router::{build_router, AppState};

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::ConfigStore;
use crate::server::shutdown::ShutdownManager;
use crate::session::MemorySessions;

pub type ServerError = Box<dyn std::error::Error + Send + Sync>;

pub struct PageServer {
    pub addr: SocketAddr,
    /// The bound listener, kept alive to prevent port race conditions.
    /// Populated by try_bind(), consumed by run().
    listener: Option<TcpListener>,
    config: ConfigStore,
    sessions: MemorySessions,
    shutdown: Arc<ShutdownManager>,
}

impl PageServer {
    pub fn new(config: ConfigStore) -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 0)), // Will be determined at bind time
            listener: None,
            config,
            sessions: MemorySessions::new(),
            shutdown: Arc::new(ShutdownManager::new()),
        }
    }

    /// Try to bind to the configured address, falling back to incremental
    /// ports if busy.
    ///
    /// The listener is kept alive so no other process can claim the port
    /// between try_bind() and run().
    pub async fn try_bind(&mut self) -> Result<SocketAddr, ServerError> {
        let bind_addr_str = self.config.get().server.bind_addr;
        let bind_addr: SocketAddr = bind_addr_str
            .parse()
            .map_err(|e| format!("Invalid bind address '{}': {}", bind_addr_str, e))?;

        let start_port = bind_addr.port();
        let host = bind_addr.ip();

        // Port 0 asks the OS for any free port; no fall-forward needed.
        let end_port = if start_port == 0 {
            0
        } else {
            start_port.saturating_add(100)
        };

        for port in start_port..=end_port {
            let try_addr = SocketAddr::new(host, port);
            match TcpListener::bind(try_addr).await {
                Ok(listener) => {
                    let actual_addr = listener.local_addr()?;
                    self.addr = actual_addr;
                    self.listener = Some(listener);
                    tracing::info!("Server bound to {}", actual_addr);
                    return Ok(actual_addr);
                }
                Err(e) => {
                    tracing::debug!("Port {} busy: {}", port, e);
                    continue;
                }
            }
        }

        Err(format!("Could not find available port in range {}-{}", start_port, end_port).into())
    }

    pub fn handle(&self) -> ServerHandle {
        ServerHandle {
            shutdown: self.shutdown.clone(),
        }
    }

    /// Run the server until shutdown is signaled.
    ///
    /// Consumes self to take ownership of the pre-bound listener.
    /// Call try_bind() before run() to bind to an available port.
    pub async fn run(self) -> Result<(), ServerError> {
        let listener = self.listener.ok_or("try_bind() must be called before run()")?;

        tracing::info!("Starting page server on {}", self.addr);

        let listen_port = Some(self.addr.port());
        let state = AppState::new(self.config.clone(), self.sessions.clone(), listen_port);
        let app = build_router(state);

        let shutdown = self.shutdown.clone();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                if let Err(e) = shutdown.wait_for_shutdown().await {
                    tracing::warn!(error = %e, "Signal handling failed, shutting down");
                }
            })
            .into_future()
            .await?;

        tracing::info!("Server stopped");
        Ok(())
    }
}

#[derive(Clone)]
pub struct ServerHandle {
    shutdown: Arc<ShutdownManager>,
}

impl ServerHandle {
    pub fn shutdown(&self) {
        self.shutdown.signal_shutdown();
    }
}
