//! # `when_all`: join N sibling tasks into one.
//!
//! The joined task reaches a terminal state only after **every** input is
//! terminal, and summarizes their outcomes:
//!
//! ```text
//! all Completed                    ─► Completed
//! any Faulted                      ─► Faulted, faults = concatenation of every
//!                                     faulted input's fault list, in input order
//! no Faulted, any Canceled         ─► Canceled
//! ```
//!
//! Faulted wins over Canceled when both are present. Multiplicity is
//! preserved: N faulted inputs contribute N faults to the join, never a
//! truncated single error.
//!
//! ## Example
//! ```
//! use taskling::{when_all, Task, TaskError, TokioSpawner};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let pool = TokioSpawner::arc();
//!     let a = Task::run(&pool, async { Ok::<_, TaskError>(1) });
//!     let b = Task::run(&pool, async { Ok::<_, TaskError>("two") });
//!
//!     let joined = when_all(&pool, [a.handle(), b.handle()]);
//!     joined.wait().await;
//!     assert!(joined.is_completed() && !joined.is_faulted());
//! }
//! ```

use crate::spawn::SpawnRef;
use crate::task::{Outcome, Task, TaskHandle, TaskState};

/// Joins the given tasks into one `Task<()>`.
///
/// The join is returned already started; it does not start its inputs. Inputs
/// may be in any state, including not yet started; the join simply stays
/// pending until every input finishes. An empty input set completes
/// immediately.
///
/// The aggregated fault list keeps each input's own faults intact and in input
/// order; [`Task::result`](crate::Task::result) on the join re-raises them as
/// one [`AggregateError`](crate::AggregateError).
pub fn when_all<I>(spawner: &SpawnRef, tasks: I) -> Task<()>
where
    I: IntoIterator<Item = TaskHandle>,
{
    let handles: Vec<TaskHandle> = tasks.into_iter().collect();
    log::trace!("when_all joining {} task(s)", handles.len());

    let body = async move {
        for handle in &handles {
            handle.wait().await;
        }

        let mut faults = Vec::new();
        let mut any_canceled = false;
        for handle in &handles {
            match handle.state() {
                TaskState::Faulted => faults.extend(handle.faults()),
                TaskState::Canceled => any_canceled = true,
                _ => {}
            }
        }

        if !faults.is_empty() {
            Outcome::Faulted(faults)
        } else if any_canceled {
            Outcome::Canceled
        } else {
            Outcome::Completed(())
        }
    };

    let joined = Task::new_linked(spawner, Box::pin(body));
    joined.start_from_link();
    joined
}
