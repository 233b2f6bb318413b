//! Shared infrastructure for control-plane integration tests.

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use relay_core::config::ControlPlaneSettings;
use relay_core::control_plane::{create_app, AppState};
use relay_core::system_state::SystemStateManager;

/// A control-plane instance bound to an ephemeral port
pub struct TestServer {
    base_url: String,
    shutdown_tx: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a control plane with fresh default state and no downstream
    /// handles, on a dynamically allocated port.
    pub async fn start() -> Self {
        let app_state = AppState::new(
            ControlPlaneSettings::default(),
            SystemStateManager::new(),
            None,
        );
        let app = create_app(app_state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .expect("Test server failed");
        });

        Self {
            base_url: format!("http://{addr}"),
            shutdown_tx,
            handle,
        }
    }

    #[allow(dead_code)]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[allow(dead_code)]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Stop the server and wait for it to drain.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
        self.handle.await.expect("Test server panicked");
    }
}
