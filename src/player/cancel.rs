use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;

use crate::foundation::error::{RouteCamError, RouteCamResult};

/// Cooperative cancellation signal shared by every suspension point of one playback.
///
/// Clones observe the same signal. Once cancelled a token stays cancelled; playback that needs
/// to start again takes a fresh token.
#[derive(Clone, Debug)]
pub struct CancellationToken {
    tx: Arc<watch::Sender<bool>>,
}

impl CancellationToken {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// `Err(Cancelled)` once the token has fired.
    pub fn check(&self) -> RouteCamResult<()> {
        if self.is_cancelled() {
            Err(RouteCamError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Resolves when the token is cancelled; immediately if it already is.
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        // the sender lives in `self`, so the channel cannot close under us
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }

    /// Drive `fut` to completion unless the token fires first.
    pub async fn run_until_cancelled<F, T>(&self, fut: F) -> RouteCamResult<T>
    where
        F: Future<Output = RouteCamResult<T>>,
    {
        tokio::select! {
            biased;
            _ = self.cancelled() => Err(RouteCamError::Cancelled),
            r = fut => r,
        }
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/player/cancel.rs"]
mod tests;
