//! Runs page actions on background tasks.
//!
//! Results travel back over a channel and are applied on the UI thread by
//! [`ActionDispatcher::drain`]. Once the dispatcher is closed or dropped, tasks
//! that are still running finish their work but discard the result.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::inspector::{ActionOutcome, ModelInspector, PendingAction};

pub struct ActionDispatcher {
    tx: mpsc::UnboundedSender<ActionOutcome>,
    rx: mpsc::UnboundedReceiver<ActionOutcome>,
    active: Arc<AtomicBool>,
}

impl ActionDispatcher {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx,
            active: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Run `pending` on the current tokio runtime.
    pub fn spawn(&self, pending: PendingAction) -> JoinHandle<()> {
        let tx = self.tx.clone();
        let active = Arc::clone(&self.active);
        tokio::spawn(async move {
            let outcome = pending.run().await;
            if !active.load(Ordering::Acquire) {
                debug!(
                    action = ?outcome.ticket.action,
                    "Page torn down; discarding action result"
                );
                return;
            }
            let _ = tx.send(outcome);
        })
    }

    /// Apply every finished result. Returns how many were applied.
    pub fn drain(&mut self, inspector: &mut ModelInspector) -> usize {
        let mut applied = 0;
        while let Ok(outcome) = self.rx.try_recv() {
            if inspector.apply(outcome) {
                applied += 1;
            }
        }
        applied
    }

    /// Stop delivering results. Tasks still running finish their work and
    /// drop what they produce.
    pub fn close(&self) {
        self.active.store(false, Ordering::Release);
    }

    /// Wait for the next finished result.
    pub async fn next(&mut self) -> Option<ActionOutcome> {
        self.rx.recv().await
    }
}

impl Default for ActionDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ActionDispatcher {
    fn drop(&mut self) {
        self.close();
    }
}
