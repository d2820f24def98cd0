//! Error types used by the task engine and by task bodies.
//!
//! This module defines the full error surface:
//!
//! - [`StartError`] — an operation was not legal in the task's current state.
//! - [`TaskError`] — a fault raised by an individual task body.
//! - [`AggregateError`] — an ordered, non-empty collection of task faults.
//! - [`JoinError`] — what [`Task::result`](crate::Task::result) raises to observers.
//!
//! All types provide `as_label` (stable snake_case, for logs/metrics) and the
//! richer ones `as_message`. Faults are `Clone + PartialEq` so aggregated lists
//! can be inspected and compared by callers.

use std::any::Any;

use thiserror::Error;

use crate::task::TaskState;

/// # Errors produced by illegal lifecycle operations.
///
/// Raised by [`Task::start`](crate::Task::start) when the task is not in a
/// startable state.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartError {
    /// The task has already been started (or already finished).
    #[error("task already started or finished (state: {state})")]
    AlreadyStarted {
        /// The state observed at the time of the call.
        state: TaskState,
    },

    /// The task is owned by a continuation edge or a join combinator and is
    /// started by its predecessor's completion, never by callers.
    #[error("task is driven by a continuation or join and cannot be started directly")]
    NotStartable,
}

impl StartError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use taskling::{StartError, TaskState};
    ///
    /// let err = StartError::AlreadyStarted { state: TaskState::Running };
    /// assert_eq!(err.as_label(), "start_already_started");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            StartError::AlreadyStarted { .. } => "start_already_started",
            StartError::NotStartable => "start_not_startable",
        }
    }
}

/// # Faults raised by task bodies.
///
/// A body signals failure by returning one of these; the owning task captures
/// it and re-surfaces it only when an observer calls
/// [`Task::result`](crate::Task::result).
///
/// [`TaskError::Canceled`] is distinguished from ordinary faults: a body that
/// returns it moves its task to [`TaskState::Canceled`] with an empty fault
/// list, instead of [`TaskState::Faulted`].
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// The body raised a domain error.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// The body observed a cancellation request and stopped cooperatively.
    ///
    /// Produced by [`CancellationSignal::bail_if_requested`](crate::CancellationSignal::bail_if_requested).
    #[error("cancellation requested")]
    Canceled,
}

impl TaskError {
    /// Convenience constructor for a domain fault.
    ///
    /// # Example
    /// ```
    /// use taskling::TaskError;
    ///
    /// let err = TaskError::fail("boom");
    /// assert_eq!(err, TaskError::Fail { error: "boom".into() });
    /// ```
    pub fn fail(error: impl Into<String>) -> Self {
        TaskError::Fail {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Fail { .. } => "task_failed",
            TaskError::Canceled => "task_canceled",
        }
    }

    /// True if this fault is the distinguished cancellation fault.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, TaskError::Canceled)
    }

    /// Builds a fault from a caught panic payload.
    ///
    /// Extracts the panic message when it is a string; falls back to a generic
    /// description otherwise.
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let error = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "task body panicked".to_string());
        TaskError::Fail { error }
    }
}

/// # An ordered, non-empty collection of task faults.
///
/// A single task contributes at most the faults its own body raised (typically
/// one); [`when_all`](crate::when_all) concatenates the fault lists of every
/// faulted input, in input order, preserving multiplicity and each fault's
/// identity.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{} task fault(s)", .faults.len())]
pub struct AggregateError {
    faults: Vec<TaskError>,
}

impl AggregateError {
    pub(crate) fn new(faults: Vec<TaskError>) -> Self {
        debug_assert!(!faults.is_empty(), "aggregate must carry at least one fault");
        Self { faults }
    }

    /// The underlying faults, in the order they were collected.
    pub fn faults(&self) -> &[TaskError] {
        &self.faults
    }

    /// Consumes the aggregate and returns the owned fault list.
    pub fn into_faults(self) -> Vec<TaskError> {
        self.faults
    }

    /// Number of faults carried.
    pub fn len(&self) -> usize {
        self.faults.len()
    }

    /// Always false: an aggregate carries at least one fault.
    pub fn is_empty(&self) -> bool {
        self.faults.is_empty()
    }

    /// Returns a human-readable message listing every fault.
    ///
    /// # Example
    /// ```
    /// use taskling::{JoinError, TaskError};
    ///
    /// let agg = JoinError::faulted(vec![TaskError::fail("a"), TaskError::fail("b")]);
    /// if let JoinError::Faulted(inner) = agg {
    ///     assert_eq!(inner.as_message(), "execution failed: a; execution failed: b");
    /// }
    /// ```
    pub fn as_message(&self) -> String {
        let parts: Vec<String> = self.faults.iter().map(|f| f.to_string()).collect();
        parts.join("; ")
    }
}

/// # Errors raised to observers of a finished task.
///
/// Returned by [`Task::result`](crate::Task::result) once the observed task
/// reached a terminal state. [`Task::wait`](crate::Task::wait) never raises.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JoinError {
    /// The task faulted; carries every underlying fault in order.
    #[error(transparent)]
    Faulted(#[from] AggregateError),

    /// The task was canceled before producing a result.
    #[error("task was canceled")]
    Canceled,
}

impl JoinError {
    /// Builds the faulted variant from an ordered fault list.
    pub fn faulted(faults: Vec<TaskError>) -> Self {
        JoinError::Faulted(AggregateError::new(faults))
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use taskling::JoinError;
    ///
    /// assert_eq!(JoinError::Canceled.as_label(), "join_canceled");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            JoinError::Faulted(_) => "join_faulted",
            JoinError::Canceled => "join_canceled",
        }
    }

    /// True if the observed task was canceled rather than faulted.
    pub fn is_canceled(&self) -> bool {
        matches!(self, JoinError::Canceled)
    }
}
