//! Flood-control gate
//!
//! A binary open/closed latch built on a `watch` channel. Publishers wait
//! for it to be open before contending for the account's request lock, so a
//! caller stuck behind flood control never holds that lock. Closing is a
//! compare-and-set: only one cooldown driver can own the closed gate, and it
//! reopens when that driver's `GateGuard` is dropped.

use std::sync::Arc;

use tokio::sync::watch;

/// Open/closed latch; `true` means open.
#[derive(Debug)]
pub struct FloodGate {
    state: Arc<watch::Sender<bool>>,
}

impl Default for FloodGate {
    fn default() -> Self {
        Self::new()
    }
}

impl FloodGate {
    /// Create an open gate.
    pub fn new() -> Self {
        let (state, _) = watch::channel(true);
        Self {
            state: Arc::new(state),
        }
    }

    pub fn is_open(&self) -> bool {
        *self.state.borrow()
    }

    /// Resolve once the gate is open. Returns immediately if it already is.
    pub async fn wait_open(&self) {
        let mut rx = self.state.subscribe();
        // The sender lives as long as `self`, so this cannot fail.
        let _ = rx.wait_for(|open| *open).await;
    }

    /// Close the gate if it is open.
    ///
    /// Returns the guard that reopens it, or `None` when another holder
    /// already closed it.
    pub fn try_close(&self) -> Option<GateGuard> {
        let closed = self.state.send_if_modified(|open| {
            if *open {
                *open = false;
                true
            } else {
                false
            }
        });
        closed.then(|| GateGuard {
            state: Arc::clone(&self.state),
        })
    }
}

/// Ownership of a closed gate. Dropping it reopens the gate and wakes every
/// waiter.
#[derive(Debug)]
pub struct GateGuard {
    state: Arc<watch::Sender<bool>>,
}

impl Drop for GateGuard {
    fn drop(&mut self) {
        self.state.send_replace(true);
    }
}
