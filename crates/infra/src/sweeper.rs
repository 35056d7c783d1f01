use std::io;
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};

use sharebook_auth::RefreshTokenStore;

/// Periodically deletes refresh-token rows past their expiry.
#[derive(Debug, Clone)]
pub struct RefreshTokenSweeper {
    pub interval: Duration,
}

impl RefreshTokenSweeper {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// One purge pass. Returns how many rows were removed.
    pub fn sweep_once<R: RefreshTokenStore + ?Sized>(store: &R) -> usize {
        match store.purge_expired(Utc::now()) {
            Ok(purged) => {
                if purged > 0 {
                    info!(purged, "expired refresh tokens purged");
                }
                purged
            }
            Err(e) => {
                warn!(error = %e, "refresh token purge failed");
                0
            }
        }
    }

    /// Start the sweep thread. It sweeps once immediately, then every
    /// `interval`, until the handle is shut down or dropped.
    pub fn spawn<R>(&self, store: Arc<R>) -> io::Result<RefreshTokenSweeperHandle>
    where
        R: RefreshTokenStore + ?Sized + 'static,
    {
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();
        let interval = self.interval;

        let join = thread::Builder::new()
            .name("refresh-token-sweeper".to_string())
            .spawn(move || {
                info!(interval_secs = interval.as_secs(), "refresh token sweeper started");
                loop {
                    Self::sweep_once(store.as_ref());
                    match shutdown_rx.recv_timeout(interval) {
                        Err(mpsc::RecvTimeoutError::Timeout) => continue,
                        // Explicit shutdown or the handle went away.
                        Ok(()) | Err(mpsc::RecvTimeoutError::Disconnected) => break,
                    }
                }
                info!("refresh token sweeper stopped");
            })?;

        Ok(RefreshTokenSweeperHandle {
            shutdown: shutdown_tx,
            join: Some(join),
        })
    }
}

#[derive(Debug)]
pub struct RefreshTokenSweeperHandle {
    shutdown: mpsc::Sender<()>,
    join: Option<thread::JoinHandle<()>>,
}

impl RefreshTokenSweeperHandle {
    /// Stop the thread and wait for it to exit.
    pub fn shutdown(mut self) {
        let _ = self.shutdown.send(());
        if let Some(j) = self.join.take() {
            let _ = j.join();
        }
    }
}
