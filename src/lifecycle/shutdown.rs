//! Shutdown coordination.
//!
//! A single latch shared by the signal task and every listener. Once
//! triggered it stays triggered, so a server that subscribes late (for
//! example after a slow bind) still stops instead of waiting forever.

use std::sync::Arc;

use tokio::sync::watch;

/// Owner side of the shutdown latch. Clones trigger the same latch.
#[derive(Clone)]
pub struct Shutdown {
    tx: Arc<watch::Sender<bool>>,
}

/// Listener side, handed to `HttpServer::run` / `GatewayServer::run`.
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn subscribe(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Latch the shutdown flag and wake every listener.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownSignal {
    /// Resolve once shutdown is triggered or every `Shutdown` handle is dropped.
    pub async fn wait(mut self) {
        // Err means the last sender is gone; nobody is left to keep us running.
        let _ = self.rx.wait_for(|triggered| *triggered).await;
    }
}
