/// Cancellation signal owned by the workflow controller.
///
/// Checked by the poller before every attempt and by the controller
/// before a poll outcome is applied to view state, so a stale
/// in-flight poll cannot overwrite the view after a reset.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
