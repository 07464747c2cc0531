// Application state module
// Shared, read-mostly state handed to every connection task

use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{watch, Notify};

use super::types::Config;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Connections currently being served
    pub active_connections: AtomicUsize,
    /// Notified once when the server should stop accepting
    pub shutdown: Notify,
    /// Flips to `true` once open connections should finish and close
    pub closing: watch::Sender<bool>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            active_connections: AtomicUsize::new(0),
            shutdown: Notify::new(),
            closing: watch::Sender::new(false),
        }
    }

    pub fn connection_count(&self) -> usize {
        self.active_connections.load(Ordering::SeqCst)
    }

    /// Ask every open connection to close after its in-flight request
    pub fn begin_close(&self) {
        self.closing.send_replace(true);
    }
}
