//! # Cooperative cancellation: a one-shot shared flag with observer fan-out.
//!
//! [`CancellationSource`] owns the flag; [`CancellationSignal`] is the
//! read-only capability handed to task bodies and observers.
//!
//! ```text
//! CancellationSource ──┬── cancel()            flag: false ─► true (one-way)
//!                      │                       callbacks fired once, in
//!                      │                       registration order, then cleared
//!                      └── signal() ──► CancellationSignal (any number)
//!                                        ├── is_requested()        poll
//!                                        ├── bail_if_requested()?  raise
//!                                        └── on_cancel(f)          observe
//! ```
//!
//! ## Rules
//! - The flag flips exactly once; repeated `cancel()` calls are no-ops.
//! - Every callback registered before the flip runs exactly once, in
//!   registration order; the registry is cleared by the flip.
//! - A callback registered after the flip runs immediately on the caller.
//! - Cancellation is cooperative only: a body that never checks its signal
//!   runs to its natural completion. There is no preemption.
//!
//! ## Example
//! ```
//! use taskling::{CancellationSource, TaskError};
//!
//! let source = CancellationSource::new();
//! let signal = source.signal();
//!
//! assert!(signal.bail_if_requested().is_ok());
//! source.cancel();
//! assert_eq!(signal.bail_if_requested(), Err(TaskError::Canceled));
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::TaskError;

type Callback = Box<dyn FnOnce() + Send>;

/// Shared flag + registry. The flag is checked and flipped under the registry
/// lock so a registration can never be both queued and missed.
struct CancelState {
    requested: AtomicBool,
    callbacks: Mutex<Vec<Callback>>,
}

/// # Owner side of a cancellation flag.
///
/// Create one per logical operation, hand out [`CancellationSignal`]s to the
/// bodies that should observe it, and call [`cancel`](CancellationSource::cancel)
/// to request a cooperative stop.
#[derive(Clone)]
pub struct CancellationSource {
    state: Arc<CancelState>,
}

impl CancellationSource {
    /// Creates a new source with the flag clear and no registrations.
    pub fn new() -> Self {
        Self {
            state: Arc::new(CancelState {
                requested: AtomicBool::new(false),
                callbacks: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Derives a read-only signal sharing this source's flag.
    pub fn signal(&self) -> CancellationSignal {
        CancellationSignal {
            state: Arc::clone(&self.state),
        }
    }

    /// Requests cancellation.
    ///
    /// First call flips the flag and fires every registered callback exactly
    /// once, in registration order, on the calling thread. Subsequent calls do
    /// nothing.
    pub fn cancel(&self) {
        let fired = {
            let mut callbacks = self
                .state
                .callbacks
                .lock()
                .expect("cancellation registry lock poisoned");
            if self.state.requested.swap(true, Ordering::SeqCst) {
                return;
            }
            std::mem::take(&mut *callbacks)
        };
        log::debug!("cancellation requested; firing {} callback(s)", fired.len());
        for callback in fired {
            callback();
        }
    }

    /// True once cancellation has been requested.
    pub fn is_requested(&self) -> bool {
        self.state.requested.load(Ordering::SeqCst)
    }
}

impl Default for CancellationSource {
    fn default() -> Self {
        Self::new()
    }
}

/// # Read-only capability over a [`CancellationSource`].
///
/// Cheap to clone; any number may observe the same flag. Task bodies hold one
/// (by capture) and poll it at points where stopping is safe.
#[derive(Clone)]
pub struct CancellationSignal {
    state: Arc<CancelState>,
}

impl CancellationSignal {
    /// True once cancellation has been requested.
    pub fn is_requested(&self) -> bool {
        self.state.requested.load(Ordering::SeqCst)
    }

    /// Raises the distinguished cancellation fault if cancellation was
    /// requested; does nothing otherwise.
    ///
    /// Designed for `?` inside task bodies: a body that propagates
    /// [`TaskError::Canceled`] moves its task to the `Canceled` state rather
    /// than `Faulted`.
    pub fn bail_if_requested(&self) -> Result<(), TaskError> {
        if self.is_requested() {
            Err(TaskError::Canceled)
        } else {
            Ok(())
        }
    }

    /// Registers a callback to run when cancellation is requested.
    ///
    /// Runs exactly once: either on the thread that calls `cancel()` (in
    /// registration order), or immediately on the caller if cancellation was
    /// already requested.
    pub fn on_cancel(&self, callback: impl FnOnce() + Send + 'static) {
        {
            let mut callbacks = self
                .state
                .callbacks
                .lock()
                .expect("cancellation registry lock poisoned");
            if !self.state.requested.load(Ordering::SeqCst) {
                callbacks.push(Box::new(callback));
                return;
            }
        }
        callback();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_flag_starts_clear() {
        let source = CancellationSource::new();
        let signal = source.signal();
        assert!(!source.is_requested());
        assert!(!signal.is_requested());
        assert!(signal.bail_if_requested().is_ok());
    }

    #[test]
    fn test_cancel_is_one_way_and_idempotent() {
        let source = CancellationSource::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let h = hits.clone();
        source.signal().on_cancel(move || {
            h.fetch_add(1, Ordering::SeqCst);
        });

        source.cancel();
        source.cancel();
        source.cancel();

        assert!(source.is_requested());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_callbacks_fire_in_registration_order() {
        let source = CancellationSource::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for tag in 1..=4 {
            let order = order.clone();
            source.signal().on_cancel(move || {
                order.lock().unwrap().push(tag);
            });
        }

        source.cancel();
        assert_eq!(*order.lock().unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_registration_after_cancel_runs_immediately() {
        let source = CancellationSource::new();
        source.cancel();

        let hits = Arc::new(AtomicUsize::new(0));
        let h = hits.clone();
        source.signal().on_cancel(move || {
            h.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_bail_raises_the_cancellation_fault() {
        let source = CancellationSource::new();
        let signal = source.signal();
        source.cancel();

        let err = signal.bail_if_requested().unwrap_err();
        assert!(err.is_cancellation());
        assert_eq!(err, TaskError::Canceled);
    }

    #[test]
    fn test_signals_share_one_flag() {
        let source = CancellationSource::new();
        let a = source.signal();
        let b = a.clone();
        source.cancel();
        assert!(a.is_requested());
        assert!(b.is_requested());
    }
}
