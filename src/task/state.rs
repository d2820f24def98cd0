//! Task lifecycle states and the internally stored outcome.

use std::fmt;

use crate::error::TaskError;

/// Lifecycle state of a task.
///
/// A task moves through exactly one path:
///
/// ```text
/// Created ──► Scheduled ──► Running ──► Completed
///                  │            ├─────► Faulted
///                  │            └─────► Canceled
///                  └──────────────────► Canceled   (observed before the body ran)
/// ```
///
/// Terminal states (`Completed`, `Faulted`, `Canceled`) are immutable: once
/// entered, state, result, and faults never change.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Allocated, body stored, not yet submitted to the substrate.
    Created = 0,
    /// Submitted to the substrate, body not yet running.
    Scheduled = 1,
    /// The body is executing on some worker.
    Running = 2,
    /// The body returned a value; the result is available.
    Completed = 3,
    /// The body raised one or more faults.
    Faulted = 4,
    /// The body observed a cancellation request and stopped.
    Canceled = 5,
}

impl TaskState {
    /// True for `Completed`, `Faulted`, and `Canceled`.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskState::Completed | TaskState::Faulted | TaskState::Canceled
        )
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskState::Created => "created",
            TaskState::Scheduled => "scheduled",
            TaskState::Running => "running",
            TaskState::Completed => "completed",
            TaskState::Faulted => "faulted",
            TaskState::Canceled => "canceled",
        }
    }

    /// Decodes the atomically published representation.
    ///
    /// Only values produced by `TaskState as u8` are ever stored.
    pub(crate) fn from_u8(raw: u8) -> TaskState {
        match raw {
            0 => TaskState::Created,
            1 => TaskState::Scheduled,
            2 => TaskState::Running,
            3 => TaskState::Completed,
            4 => TaskState::Faulted,
            5 => TaskState::Canceled,
            other => unreachable!("invalid task state encoding: {other}"),
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Terminal outcome of a task, stored once under the lifecycle lock and
/// converted to a raised error only at the `result()` boundary.
#[derive(Debug)]
pub(crate) enum Outcome<T> {
    Completed(T),
    Faulted(Vec<TaskError>),
    Canceled,
}

impl<T> Outcome<T> {
    /// The terminal state this outcome publishes.
    pub(crate) fn state(&self) -> TaskState {
        match self {
            Outcome::Completed(_) => TaskState::Completed,
            Outcome::Faulted(_) => TaskState::Faulted,
            Outcome::Canceled => TaskState::Canceled,
        }
    }
}

impl<T> From<Result<T, TaskError>> for Outcome<T> {
    /// Body results map onto outcomes: `Ok` completes, the distinguished
    /// cancellation fault cancels, any other fault populates a single-entry
    /// fault list.
    fn from(result: Result<T, TaskError>) -> Self {
        match result {
            Ok(value) => Outcome::Completed(value),
            Err(TaskError::Canceled) => Outcome::Canceled,
            Err(fault) => Outcome::Faulted(vec![fault]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_predicate() {
        assert!(!TaskState::Created.is_terminal());
        assert!(!TaskState::Scheduled.is_terminal());
        assert!(!TaskState::Running.is_terminal());
        assert!(TaskState::Completed.is_terminal());
        assert!(TaskState::Faulted.is_terminal());
        assert!(TaskState::Canceled.is_terminal());
    }

    #[test]
    fn test_encoding_round_trip() {
        for state in [
            TaskState::Created,
            TaskState::Scheduled,
            TaskState::Running,
            TaskState::Completed,
            TaskState::Faulted,
            TaskState::Canceled,
        ] {
            assert_eq!(TaskState::from_u8(state as u8), state);
        }
    }

    #[test]
    fn test_outcome_from_body_result() {
        let ok: Outcome<i32> = Ok(7).into();
        assert_eq!(ok.state(), TaskState::Completed);

        let canceled: Outcome<i32> = Err(TaskError::Canceled).into();
        assert_eq!(canceled.state(), TaskState::Canceled);

        let faulted: Outcome<i32> = Err(TaskError::fail("boom")).into();
        assert_eq!(faulted.state(), TaskState::Faulted);
        match faulted {
            Outcome::Faulted(faults) => assert_eq!(faults, vec![TaskError::fail("boom")]),
            other => panic!("expected faulted outcome, got {:?}", other.state()),
        }
    }
}
