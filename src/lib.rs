//! # taskling
//!
//! **Taskling** is a minimal deferred-execution task engine for Rust.
//!
//! It provides a unit of asynchronous work that is created first and started
//! explicitly, can be awaited for its result by any number of observers,
//! chained into dependent continuations, cancelled cooperatively, and joined
//! with siblings while faithfully propagating every fault (including multiple
//! simultaneous faults) to whoever observes the outcome.
//!
//! ## Architecture
//! ```text
//!   Task::create(body)          CancellationSource ── cancel()
//!        │                              │
//!        ▼                              └─► CancellationSignal (captured by bodies)
//!   start() ──► Spawn::submit(driver)             │
//!        │           (injected substrate)         │ bail_if_requested()?
//!        ▼                                        ▼
//!   Scheduled ──► Running ──► Completed | Faulted | Canceled
//!                                  │
//!        completion transition:    │  publish outcome ─► fire latch ─► fire links
//!                                  ▼
//!            ┌─ continue_with successors (auto-started, registration order)
//!            └─ when_all joins (aggregate every fault, in input order)
//! ```
//!
//! ## Semantics at a glance
//! | Concern          | Behavior                                                              | Key types                                |
//! |------------------|-----------------------------------------------------------------------|------------------------------------------|
//! | **Lifecycle**    | `Created → Scheduled → Running → {Completed, Faulted, Canceled}`      | [`Task`], [`TaskState`]                  |
//! | **Observation**  | `wait` never raises; `result` re-raises faults/cancellation           | [`JoinError`], [`AggregateError`]        |
//! | **Continuations**| Run after the predecessor is terminal, regardless of its outcome      | [`Task::continue_with`]                  |
//! | **Cancellation** | Cooperative flag, polled by bodies; callbacks fire in order, once     | [`CancellationSource`], [`CancellationSignal`] |
//! | **Joins**        | Terminal after all inputs; faults concatenated in input order         | [`when_all`], [`TaskHandle`]             |
//! | **Substrate**    | Injected; fire-and-forget `submit`                                    | [`Spawn`], [`TokioSpawner`], [`SerialSpawner`] |
//!
//! ## Rules
//! - A fault raised inside a body never crashes a worker: it is captured by
//!   the owning task and surfaces only at [`Task::result`].
//! - A body that propagates [`TaskError::Canceled`] (from
//!   [`CancellationSignal::bail_if_requested`]) cancels its task instead of
//!   faulting it; its fault list stays empty.
//! - A single task carries at most the faults its own body raised; only
//!   [`when_all`] concatenates fault lists across tasks.
//! - There is no forced preemption and no built-in timeout: build deadlines by
//!   racing a task against a delay-then-cancel task.
//!
//! ## Example
//! ```rust
//! use taskling::{when_all, CancellationSource, Task, TaskError, TokioSpawner};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = TokioSpawner::arc();
//!
//!     // Deferred: nothing runs until start().
//!     let doubled = Task::create(&pool, async { Ok::<_, TaskError>(21 * 2) });
//!     doubled.start()?;
//!     assert_eq!(doubled.result().await?, 42);
//!
//!     // Cooperative cancellation.
//!     let source = CancellationSource::new();
//!     let signal = source.signal();
//!     source.cancel();
//!     let stopped = Task::run(&pool, async move {
//!         signal.bail_if_requested()?;
//!         Ok::<_, TaskError>(())
//!     });
//!     stopped.wait().await;
//!     assert!(stopped.is_canceled());
//!
//!     // Continuations observe the finished predecessor, whatever its outcome.
//!     let report = stopped.continue_with(|prev| async move {
//!         Ok::<_, TaskError>(prev.is_canceled())
//!     });
//!     assert!(report.result().await?);
//!
//!     // Joins aggregate every fault.
//!     let joined = when_all(&pool, [doubled.handle(), report.handle()]);
//!     joined.wait().await;
//!     assert!(!joined.is_faulted());
//!     Ok(())
//! }
//! ```

mod cancel;
mod error;
mod join;
mod spawn;
mod task;

// ---- Public re-exports ----

pub use cancel::{CancellationSignal, CancellationSource};
pub use error::{AggregateError, JoinError, StartError, TaskError};
pub use join::when_all;
pub use spawn::{SerialSpawner, Spawn, SpawnRef, TokioSpawner, Work};
pub use task::{Task, TaskHandle, TaskState};
