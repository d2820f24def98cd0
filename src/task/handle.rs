//! # `Task<T>`: the public handle over a deferred unit of work.
//!
//! A `Task` is created around a body, explicitly started, and observed through
//! `wait`/`result` and the state predicates. Handles are cheap clones sharing
//! one [`Core`]; the task lives as long as its longest-lived holder (caller,
//! continuation edge, or join).
//!
//! ## Lifecycle
//! ```text
//! Task::create(body) ─► start() ─► substrate runs body ─► Completed
//!                                                      ─► Faulted   (body raised)
//!                                                      ─► Canceled  (body bailed)
//!          │
//!          └─ continue_with(f) ─► successor Task, auto-started once this
//!                                 task is terminal (any terminal state)
//! ```
//!
//! ## Example
//! ```
//! use taskling::{Task, TaskError, TokioSpawner};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = TokioSpawner::arc();
//!
//!     let task = Task::create(&pool, async { Ok::<_, TaskError>(21 * 2) });
//!     task.start()?;
//!     assert_eq!(task.result().await?, 42);
//!
//!     let chained = task.continue_with(|prev| async move {
//!         Ok::<_, TaskError>(prev.is_completed())
//!     });
//!     assert!(chained.result().await?);
//!     Ok(())
//! }
//! ```

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;

use crate::error::{JoinError, StartError, TaskError};
use crate::spawn::SpawnRef;
use crate::task::core::{Body, Core};
use crate::task::state::{Outcome, TaskState};
use crate::task::untyped::{Observe, TaskHandle};

/// A unit of deferred, once-executed work with an observable terminal outcome.
///
/// Cloning produces another handle to the same task.
pub struct Task<T> {
    core: Arc<Core<T>>,
}

impl<T: Send + 'static> Task<T> {
    /// Allocates a task around `body` with no execution side effects.
    ///
    /// The body runs at most once, on the injected substrate, after
    /// [`start`](Task::start). Its result maps onto the terminal state: `Ok`
    /// completes, [`TaskError::Canceled`] cancels, any other fault moves the
    /// task to `Faulted` with a single-entry fault list. A panic inside the
    /// body is caught and recorded as a fault; it never takes down the worker.
    pub fn create<F>(spawner: &SpawnRef, body: F) -> Self
    where
        F: Future<Output = Result<T, TaskError>> + Send + 'static,
    {
        Self {
            core: Core::new(spawner, false, Box::pin(body.map(Outcome::from))),
        }
    }

    /// Create + immediate start, fused.
    pub fn run<F>(spawner: &SpawnRef, body: F) -> Self
    where
        F: Future<Output = Result<T, TaskError>> + Send + 'static,
    {
        let task = Self::create(spawner, body);
        let started = task.core.try_start();
        debug_assert!(started.is_ok(), "a fresh task is always startable");
        task
    }

    /// Crate-internal constructor for continuation- and join-owned tasks.
    ///
    /// Linked tasks are started by their trigger, never by callers.
    pub(crate) fn new_linked(spawner: &SpawnRef, body: Body<T>) -> Self {
        Self {
            core: Core::new(spawner, true, body),
        }
    }

    /// Submits the task to the substrate.
    ///
    /// Valid only once, from `Created`. A second call (or a call on an
    /// already-finished task) returns [`StartError::AlreadyStarted`] and
    /// leaves the state unchanged. Continuation/join tasks return
    /// [`StartError::NotStartable`].
    pub fn start(&self) -> Result<(), StartError> {
        if self.core.is_linked() {
            return Err(StartError::NotStartable);
        }
        self.core
            .try_start()
            .map_err(|state| StartError::AlreadyStarted { state })
    }

    /// Fires a linked task from its predecessor's completion transition.
    pub(crate) fn start_from_link(&self) {
        let started = self.core.try_start();
        debug_assert!(started.is_ok(), "a linked task has exactly one trigger");
    }

    /// Suspends the caller until this task reaches a terminal state.
    ///
    /// Inspects nothing and never raises; use [`result`](Task::result) to
    /// observe the outcome.
    pub async fn wait(&self) {
        self.core.terminal().await;
    }

    /// Suspends until terminal, then returns the outcome.
    ///
    /// - `Completed` → `Ok(value)`
    /// - `Faulted` → [`JoinError::Faulted`] carrying every fault, in order
    /// - `Canceled` → [`JoinError::Canceled`]
    ///
    /// Idempotent: any number of observers may call this concurrently or
    /// repeatedly; each sees the same outcome.
    pub async fn result(&self) -> Result<T, JoinError>
    where
        T: Clone,
    {
        self.core.terminal().await;
        self.core.snapshot_result()
    }

    /// Lock-free read of the current state.
    pub fn state(&self) -> TaskState {
        self.core.state()
    }

    /// True once the task reached **any** terminal state.
    pub fn is_completed(&self) -> bool {
        self.state().is_terminal()
    }

    /// True iff the task terminated in `Faulted`.
    pub fn is_faulted(&self) -> bool {
        self.state() == TaskState::Faulted
    }

    /// True iff the task terminated in `Canceled`.
    pub fn is_canceled(&self) -> bool {
        self.state() == TaskState::Canceled
    }

    /// Snapshot of the fault list; non-empty iff the task is `Faulted`.
    pub fn faults(&self) -> Vec<TaskError> {
        self.core.faults()
    }

    /// Unique id of this task (monotonic, process-wide).
    pub fn id(&self) -> u64 {
        self.core.id()
    }

    /// Untyped observer view, usable in [`when_all`](crate::when_all) joins
    /// over tasks of different result types.
    pub fn handle(&self) -> TaskHandle {
        let observed: Arc<dyn Observe> = self.core.clone();
        TaskHandle::new(observed)
    }

    /// Attaches a continuation and returns its task.
    ///
    /// The continuation runs regardless of the predecessor's outcome. Its body
    /// receives the (by then terminal) predecessor itself, so it can branch on
    /// `is_faulted`/`is_canceled` before deciding what to do. The returned
    /// task is auto-started the moment the predecessor completes; if the
    /// predecessor is already terminal, it is scheduled immediately. Either
    /// way the attach is atomic with respect to the completion transition: the
    /// trigger fires exactly once.
    ///
    /// The continuation body follows the same outcome rules as any task body,
    /// and chains compose: `t1.continue_with(..).continue_with(..)` runs each
    /// link only after its immediate predecessor is terminal.
    pub fn continue_with<U, F, Fut>(&self, continuation: F) -> Task<U>
    where
        U: Send + 'static,
        F: FnOnce(Task<T>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<U, TaskError>> + Send + 'static,
    {
        let predecessor = self.clone();
        let body = async move { continuation(predecessor).await };
        let next = Task::new_linked(self.core.spawner(), Box::pin(body.map(Outcome::from)));

        let trigger = next.clone();
        self.core.attach(Box::new(move || trigger.start_from_link()));
        next
    }
}

impl<T> Clone for Task<T> {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
        }
    }
}

impl<T: Send + 'static> fmt::Debug for Task<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("id", &self.core.id())
            .field("state", &self.core.state())
            .finish()
    }
}
