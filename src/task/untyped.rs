//! # `TaskHandle`: an untyped observer view of any task.
//!
//! Joins need to observe siblings whose result types differ; `TaskHandle`
//! erases the result type while keeping everything an observer is allowed to
//! do: read the published state, wait for termination, and snapshot faults.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::TaskError;
use crate::task::core::Core;
use crate::task::state::TaskState;

/// Observer contract implemented by every task core, independent of its
/// result type.
#[async_trait]
pub(crate) trait Observe: Send + Sync {
    fn id(&self) -> u64;
    fn state(&self) -> TaskState;
    fn faults(&self) -> Vec<TaskError>;

    /// Resolves once the task reaches a terminal state.
    async fn terminal(&self);
}

#[async_trait]
impl<T: Send + 'static> Observe for Core<T> {
    fn id(&self) -> u64 {
        Core::id(self)
    }

    fn state(&self) -> TaskState {
        Core::state(self)
    }

    fn faults(&self) -> Vec<TaskError> {
        Core::faults(self)
    }

    async fn terminal(&self) {
        Core::terminal(self).await;
    }
}

/// Untyped, cloneable view of a task.
///
/// Obtained from [`Task::handle`](crate::Task::handle). Carries no result
/// accessor; observe the typed [`Task`](crate::Task) for that.
#[derive(Clone)]
pub struct TaskHandle {
    observed: Arc<dyn Observe>,
}

impl TaskHandle {
    pub(crate) fn new(observed: Arc<dyn Observe>) -> Self {
        Self { observed }
    }

    /// Unique id of the underlying task.
    pub fn id(&self) -> u64 {
        self.observed.id()
    }

    /// Lock-free read of the current state.
    pub fn state(&self) -> TaskState {
        self.observed.state()
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

    /// Suspends the caller until the task reaches a terminal state.
    pub async fn wait(&self) {
        self.observed.terminal().await;
    }

    /// Snapshot of the fault list; non-empty iff the task is `Faulted`.
    pub fn faults(&self) -> Vec<TaskError> {
        self.observed.faults()
    }
}

impl fmt::Debug for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskHandle")
            .field("id", &self.observed.id())
            .field("state", &self.observed.state())
            .finish()
    }
}
