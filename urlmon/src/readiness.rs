//! Readiness signal shared between the shutdown sequence and the `/ready` probe.
//!
//! Starts out ready. The termination sequence flips it to not-ready so an
//! upstream load balancer stops routing traffic before the listener closes.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use tracing::info;

/// Cloneable handle to a single readiness flag.
#[derive(Clone, Debug)]
pub struct Readiness {
    inner: Arc<AtomicBool>,
}

impl Default for Readiness {
    fn default() -> Self {
        Self {
            inner: Arc::new(AtomicBool::new(true)),
        }
    }
}

impl Readiness {
    /// Returns true while the process wishes to receive traffic.
    pub fn is_ready(&self) -> bool {
        self.inner.load(Ordering::SeqCst)
    }

    /// Set readiness, changing what `/ready` returns.
    pub fn set_ready(&self, value: bool) {
        self.inner.store(value, Ordering::SeqCst);
        info!(value, "/ready result changed");
    }
}
