//! Outstanding bulk-refresh tracking.
//!
//! A bulk refresh raises the flag when it is requested and lowers it when
//! its completion arrives. The poller only observes the flag through a
//! [`WriteWatch`]; it never raises or lowers it.

use std::sync::Arc;
use tokio::sync::watch;

/// Owner side: hands out [`PendingWrite`] guards and watchers.
#[derive(Debug, Clone)]
pub struct WriteTracker {
    tx: Arc<watch::Sender<usize>>,
}

impl Default for WriteTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl WriteTracker {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self { tx: Arc::new(tx) }
    }

    /// Raises the flag until the returned guard completes or is dropped.
    pub fn begin(&self) -> PendingWrite {
        self.tx.send_modify(|count| *count += 1);
        PendingWrite {
            tx: Arc::clone(&self.tx),
            done: false,
        }
    }

    pub fn watch(&self) -> WriteWatch {
        WriteWatch {
            rx: self.tx.subscribe(),
        }
    }

    pub fn is_pending(&self) -> bool {
        *self.tx.borrow() > 0
    }
}

/// One outstanding bulk refresh.
#[derive(Debug)]
pub struct PendingWrite {
    tx: Arc<watch::Sender<usize>>,
    done: bool,
}

impl PendingWrite {
    /// Lowers this write's share of the flag.
    pub fn complete(mut self) {
        self.finish();
    }

    fn finish(&mut self) {
        if !self.done {
            self.done = true;
            self.tx.send_modify(|count| *count = count.saturating_sub(1));
        }
    }
}

impl Drop for PendingWrite {
    fn drop(&mut self) {
        self.finish();
    }
}

/// Read-only view of the flag handed to the poller.
#[derive(Debug, Clone)]
pub struct WriteWatch {
    rx: watch::Receiver<usize>,
}

impl WriteWatch {
    pub fn is_pending(&self) -> bool {
        *self.rx.borrow() > 0
    }
}
