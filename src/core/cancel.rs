use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Cancellation signal shared between the caller and ranking workers
///
/// Trips when `cancel` is called on any clone or once the optional
/// deadline has passed. Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelSignal {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancelSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            deadline: Some(deadline),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
            || self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_is_shared_between_clones() {
        let signal = CancelSignal::new();
        let worker_view = signal.clone();
        assert!(!worker_view.is_cancelled());

        signal.cancel();
        assert!(worker_view.is_cancelled());
    }

    #[test]
    fn test_elapsed_deadline() {
        let signal = CancelSignal::with_deadline(Instant::now());
        assert!(signal.is_cancelled());

        let signal = CancelSignal::with_timeout(Duration::from_secs(3600));
        assert!(!signal.is_cancelled());
    }
}
