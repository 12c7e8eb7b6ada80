//! Cooperative cancellation for running probes.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// A flag shared between a probe and whoever may want to stop it.
///
/// Probes poll the token once per buffer, so cancelling takes effect at the next buffer
/// boundary of whichever pass is running.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}
