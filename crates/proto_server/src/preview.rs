//! Static preview server for published prototypes.
//!
//! One server per output directory, started lazily and shared by every run
//! publishing into that directory. Serves the directory read-only with
//! permissive CORS so browser tooling can load the prototypes from
//! anywhere.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::{debug, error, info, warn};

use crate::error::{ServerError, ServerResult};

/// How many ports above the preferred one are probed before falling back
/// to an ephemeral bind.
const PORT_SCAN_SPAN: u16 = 20;

/// A running preview server.
#[derive(Debug, Clone)]
pub struct PreviewHandle {
    pub output_dir: PathBuf,
    pub port: u16,
    pub url: String,
}

struct Running {
    handle: PreviewHandle,
    shutdown: Option<oneshot::Sender<()>>,
}

/// Tracks the preview servers, keyed by canonical output directory.
///
/// `ensure_started` is idempotent: concurrent publishers into the same
/// directory share one server and get back the same URL.
#[derive(Default)]
pub struct PreviewRegistry {
    running: Mutex<HashMap<PathBuf, Running>>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a server for `output_dir` unless one is already running, and
    /// return its handle. The directory is created if missing.
    ///
    /// `preferred_port` is tried first, then the next few ports, then an
    /// ephemeral port. Pass 0 to skip straight to an ephemeral bind.
    pub async fn ensure_started(
        &self,
        output_dir: &Path,
        preferred_port: u16,
    ) -> ServerResult<PreviewHandle> {
        std::fs::create_dir_all(output_dir)?;
        let canonical = output_dir.canonicalize()?;

        if let Some(running) = self.running.lock().unwrap().get(&canonical) {
            debug!(dir = %canonical.display(), url = %running.handle.url, "preview server already running");
            return Ok(running.handle.clone());
        }

        let listener = bind_preview_listener(preferred_port).await?;
        let addr = listener.local_addr()?;
        let handle = PreviewHandle {
            output_dir: canonical.clone(),
            port: addr.port(),
            url: format!("http://localhost:{}", addr.port()),
        };

        let app = Router::new()
            .fallback_service(ServeDir::new(&canonical))
            .layer(CorsLayer::permissive());

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let serve_dir = canonical.clone();
        tokio::spawn(async move {
            let server = axum::serve(listener, app).with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            });
            if let Err(e) = server.await {
                error!(dir = %serve_dir.display(), error = %e, "preview server exited with error");
            }
        });

        info!(dir = %canonical.display(), url = %handle.url, "preview server started");

        let mut running = self.running.lock().unwrap();
        // A racing caller may have inserted between the check and the bind;
        // keep the first server and let ours shut down when its sender drops.
        let entry = running.entry(canonical).or_insert(Running {
            handle: handle.clone(),
            shutdown: Some(shutdown_tx),
        });
        Ok(entry.handle.clone())
    }

    /// The handle for `output_dir`, if a server is running there.
    pub fn status(&self, output_dir: &Path) -> Option<PreviewHandle> {
        let canonical = output_dir.canonicalize().ok()?;
        self.running
            .lock()
            .unwrap()
            .get(&canonical)
            .map(|r| r.handle.clone())
    }

    /// Stop the server for `output_dir`. Returns whether one was running.
    pub fn stop(&self, output_dir: &Path) -> bool {
        let Ok(canonical) = output_dir.canonicalize() else {
            return false;
        };
        match self.running.lock().unwrap().remove(&canonical) {
            Some(mut running) => {
                if let Some(tx) = running.shutdown.take() {
                    let _ = tx.send(());
                }
                info!(dir = %canonical.display(), "preview server stopped");
                true
            }
            None => false,
        }
    }
}

impl Drop for PreviewRegistry {
    fn drop(&mut self) {
        for (_, mut running) in self.running.lock().unwrap().drain() {
            if let Some(tx) = running.shutdown.take() {
                let _ = tx.send(());
            }
        }
    }
}

async fn bind_preview_listener(preferred_port: u16) -> ServerResult<TcpListener> {
    if preferred_port != 0 {
        let end = preferred_port.saturating_add(PORT_SCAN_SPAN);
        for port in preferred_port..end {
            let addr = SocketAddr::from(([127, 0, 0, 1], port));
            match TcpListener::bind(addr).await {
                Ok(listener) => return Ok(listener),
                Err(e) => debug!(port, error = %e, "port unavailable, trying next"),
            }
        }
        warn!(
            start = preferred_port,
            end, "no free port in the scan range, falling back to an ephemeral bind"
        );
    }

    TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .map_err(|e| ServerError::NoPortAvailable {
            start: preferred_port,
            end: preferred_port.saturating_add(PORT_SCAN_SPAN),
            reason: e.to_string(),
        })
}
