use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::Duration;

/// Cancellation flag shared by the background loops.
///
/// Loops sleep through [`ShutdownSignal::sleep`], so a cancel wakes them
/// immediately instead of waiting out the current interval.
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        let (cancelled, wake) = &*self.inner;
        *cancelled.lock().unwrap_or_else(PoisonError::into_inner) = true;
        wake.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        let (cancelled, _) = &*self.inner;
        *cancelled.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Blocks for `timeout` or until cancelled. Returns `true` if cancelled.
    pub fn sleep(&self, timeout: Duration) -> bool {
        let (cancelled, wake) = &*self.inner;
        let guard = cancelled.lock().unwrap_or_else(PoisonError::into_inner);
        let (guard, _) = wake
            .wait_timeout_while(guard, timeout, |cancelled| !*cancelled)
            .unwrap_or_else(PoisonError::into_inner);
        *guard
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Instant;

    #[test]
    fn sleep_runs_full_interval_when_not_cancelled() {
        let signal = ShutdownSignal::new();
        let started = Instant::now();
        assert!(!signal.sleep(Duration::from_millis(20)));
        assert!(started.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn cancel_wakes_a_sleeping_thread() {
        let signal = ShutdownSignal::new();
        let sleeper = {
            let signal = signal.clone();
            thread::spawn(move || {
                let started = Instant::now();
                (signal.sleep(Duration::from_secs(30)), started.elapsed())
            })
        };

        thread::sleep(Duration::from_millis(20));
        signal.cancel();
        let (cancelled, slept) = sleeper.join().unwrap();
        assert!(cancelled);
        assert!(slept < Duration::from_secs(30));
    }

    #[test]
    fn sleeping_after_cancel_returns_immediately() {
        let signal = ShutdownSignal::new();
        signal.cancel();
        assert!(signal.is_cancelled());
        assert!(signal.sleep(Duration::from_secs(30)));
    }
}
