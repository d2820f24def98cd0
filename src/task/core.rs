//! # Core: the shared state machine behind every task handle.
//!
//! One [`Core`] exists per logical task, shared (`Arc`) between the caller's
//! handle, continuation edges, and join combinators. It owns all of the task's
//! mutable fields:
//!
//! ```text
//! Core
//!  ├── state: AtomicU8            lock-free published TaskState
//!  ├── done: CancellationToken    one-shot completion latch
//!  └── lifecycle: Mutex
//!       ├── body      pending work, taken exactly once by start
//!       ├── outcome   Some(..) iff terminal
//!       ├── links     continuation triggers, drained on completion
//!       └── closed    true once the links were drained
//! ```
//!
//! ## Rules
//! - `try_start` admits exactly one starter (CAS `Created → Scheduled`).
//! - The completion transition publishes outcome + state **under the lifecycle
//!   lock**, then fires the latch, then fires the drained links in
//!   registration order. Observers woken by the latch therefore always see the
//!   fully published outcome.
//! - `attach` and the drain are serialized by the same lock: a link is either
//!   queued before the drain (fired by the completer, in order) or attached
//!   after `closed` and fired immediately by the attacher. Never both, never
//!   neither.

use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio_util::sync::CancellationToken;

use crate::error::{JoinError, TaskError};
use crate::spawn::SpawnRef;
use crate::task::state::{Outcome, TaskState};

/// Global counter for task ids (for logs and `Debug` output).
static TASK_SEQ: AtomicU64 = AtomicU64::new(0);

const LOCK_POISONED: &str = "task lifecycle lock poisoned";

/// A continuation trigger: starts the successor task when fired.
pub(crate) type Link = Box<dyn FnOnce() + Send>;

/// A stored task body, already mapped to its terminal outcome.
pub(crate) type Body<T> = BoxFuture<'static, Outcome<T>>;

struct Lifecycle<T> {
    body: Option<Body<T>>,
    outcome: Option<Outcome<T>>,
    links: Vec<Link>,
    closed: bool,
}

pub(crate) struct Core<T> {
    id: u64,
    /// True for continuation/combinator-owned tasks; they refuse public start.
    linked: bool,
    state: AtomicU8,
    done: CancellationToken,
    lifecycle: Mutex<Lifecycle<T>>,
    spawner: SpawnRef,
}

impl<T: Send + 'static> Core<T> {
    pub(crate) fn new(spawner: &SpawnRef, linked: bool, body: Body<T>) -> Arc<Self> {
        Arc::new(Self {
            id: TASK_SEQ.fetch_add(1, Ordering::Relaxed),
            linked,
            state: AtomicU8::new(TaskState::Created as u8),
            done: CancellationToken::new(),
            lifecycle: Mutex::new(Lifecycle {
                body: Some(body),
                outcome: None,
                links: Vec::new(),
                closed: false,
            }),
            spawner: Arc::clone(spawner),
        })
    }

    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    pub(crate) fn is_linked(&self) -> bool {
        self.linked
    }

    pub(crate) fn spawner(&self) -> &SpawnRef {
        &self.spawner
    }

    /// Lock-free read of the published state.
    pub(crate) fn state(&self) -> TaskState {
        TaskState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Transitions `Created → Scheduled` and submits the driver.
    ///
    /// Exactly one caller wins the exchange; losers get the state they
    /// observed. The driver publishes `Running`, runs the body (panics are
    /// caught and recorded as a fault), then performs the completion
    /// transition.
    pub(crate) fn try_start(self: &Arc<Self>) -> Result<(), TaskState> {
        if let Err(current) = self.state.compare_exchange(
            TaskState::Created as u8,
            TaskState::Scheduled as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        ) {
            return Err(TaskState::from_u8(current));
        }

        let body = {
            let mut lifecycle = self.lifecycle.lock().expect(LOCK_POISONED);
            lifecycle.body.take()
        };
        let Some(body) = body else {
            unreachable!("a task in the created state always holds its body");
        };
        log::trace!("task {} scheduled", self.id);

        let core = Arc::clone(self);
        let driver = async move {
            core.state.store(TaskState::Running as u8, Ordering::Release);
            let outcome = match AssertUnwindSafe(body).catch_unwind().await {
                Ok(outcome) => outcome,
                Err(payload) => Outcome::Faulted(vec![TaskError::from_panic(payload)]),
            };
            core.complete(outcome);
        };
        self.spawner.submit(Box::pin(driver));
        Ok(())
    }

    /// The completion transition: runs at most once per task.
    ///
    /// Publishes outcome and state under the lifecycle lock, marks the link
    /// list closed and drains it, fires the completion latch, then fires the
    /// drained links in registration order.
    fn complete(&self, outcome: Outcome<T>) {
        let links = {
            let mut lifecycle = self.lifecycle.lock().expect(LOCK_POISONED);
            debug_assert!(
                lifecycle.outcome.is_none(),
                "completion transition runs exactly once"
            );
            let state = outcome.state();
            match &outcome {
                Outcome::Faulted(faults) => {
                    log::warn!("task {} faulted with {} fault(s)", self.id, faults.len());
                }
                Outcome::Canceled => log::debug!("task {} canceled", self.id),
                Outcome::Completed(_) => log::trace!("task {} completed", self.id),
            }
            lifecycle.outcome = Some(outcome);
            lifecycle.closed = true;
            self.state.store(state as u8, Ordering::Release);
            std::mem::take(&mut lifecycle.links)
        };

        self.done.cancel();
        for link in links {
            link();
        }
    }

    /// Attaches a continuation trigger.
    ///
    /// Queued if the task has not completed yet (the completer fires it, in
    /// registration order); fired immediately by this caller otherwise.
    pub(crate) fn attach(&self, link: Link) {
        {
            let mut lifecycle = self.lifecycle.lock().expect(LOCK_POISONED);
            if !lifecycle.closed {
                lifecycle.links.push(link);
                return;
            }
        }
        link();
    }

    /// Resolves once the task reaches a terminal state.
    pub(crate) async fn terminal(&self) {
        self.done.cancelled().await;
    }

    /// Converts the published outcome into the observer-facing result.
    ///
    /// Callers must only invoke this after [`terminal`](Core::terminal)
    /// resolved.
    pub(crate) fn snapshot_result(&self) -> Result<T, JoinError>
    where
        T: Clone,
    {
        let lifecycle = self.lifecycle.lock().expect(LOCK_POISONED);
        match lifecycle.outcome.as_ref() {
            Some(Outcome::Completed(value)) => Ok(value.clone()),
            Some(Outcome::Faulted(faults)) => Err(JoinError::faulted(faults.clone())),
            Some(Outcome::Canceled) => Err(JoinError::Canceled),
            None => unreachable!("completion latch fired before the outcome was published"),
        }
    }

    /// Snapshot of the fault list; empty unless the task is `Faulted`.
    pub(crate) fn faults(&self) -> Vec<TaskError> {
        let lifecycle = self.lifecycle.lock().expect(LOCK_POISONED);
        match lifecycle.outcome.as_ref() {
            Some(Outcome::Faulted(faults)) => faults.clone(),
            _ => Vec::new(),
        }
    }
}
