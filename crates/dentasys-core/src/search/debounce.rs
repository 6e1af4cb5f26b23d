//! Search-as-you-type debouncing.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Default delay between the last keystroke and the search.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Delays an action until input has been quiet for `delay`.
///
/// Every [`Debouncer::trigger`] stamps a new generation. The spawned thread
/// sleeps, then runs the action only if no newer trigger (or cancel) has
/// happened since.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    generation: Arc<AtomicU64>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `action`. The handle yields `true` if the action ran.
    pub fn trigger<F>(&self, action: F) -> JoinHandle<bool>
    where
        F: FnOnce() + Send + 'static,
    {
        let stamp = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let generation = Arc::clone(&self.generation);
        let delay = self.delay;

        thread::spawn(move || {
            thread::sleep(delay);
            if generation.load(Ordering::SeqCst) != stamp {
                return false;
            }
            action();
            true
        })
    }

    /// Drop any pending action.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_only_last_trigger_fires() {
        let debouncer = Debouncer::new(Duration::from_millis(200));
        let fired = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (1..=3)
            .map(|i| {
                let fired = Arc::clone(&fired);
                debouncer.trigger(move || {
                    fired.store(i, Ordering::SeqCst);
                })
            })
            .collect();

        let ran: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(ran, vec![false, false, true]);
        assert_eq!(fired.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_cancel_drops_pending() {
        let debouncer = Debouncer::new(Duration::from_millis(200));
        let fired = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&fired);
        let handle = debouncer.trigger(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        debouncer.cancel();

        assert!(!handle.join().unwrap());
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_default_delay() {
        assert_eq!(Debouncer::default().delay(), Duration::from_millis(500));
    }
}
