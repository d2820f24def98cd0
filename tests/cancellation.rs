//! Cooperative cancellation end to end: bodies bailing, cancel-before-run,
//! bodies that never look, and the delay-then-cancel deadline pattern.

use std::time::Duration;

use taskling::{
    CancellationSource, JoinError, Task, TaskError, TaskState, TokioSpawner,
};

async fn within<T>(fut: impl std::future::Future<Output = T>) -> T {
    tokio::time::timeout(Duration::from_secs(5), fut)
        .await
        .expect("test task did not finish in time")
}

#[tokio::test]
async fn test_cancel_before_run_yields_canceled_not_faulted() {
    let pool = TokioSpawner::arc();
    let source = CancellationSource::new();
    let signal = source.signal();
    source.cancel();

    let task = Task::run(&pool, async move {
        signal.bail_if_requested()?;
        Ok::<_, TaskError>("unreached")
    });

    within(task.wait()).await;
    assert_eq!(task.state(), TaskState::Canceled);
    assert!(task.is_canceled());
    assert!(!task.is_faulted());
    assert!(task.faults().is_empty());
    assert_eq!(within(task.result()).await.unwrap_err(), JoinError::Canceled);
}

#[tokio::test]
async fn test_cancel_mid_body_stops_at_the_next_check() {
    let pool = TokioSpawner::arc();
    let source = CancellationSource::new();
    let signal = source.signal();

    let task: Task<()> = Task::run(&pool, async move {
        loop {
            signal.bail_if_requested()?;
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    });

    tokio::time::sleep(Duration::from_millis(25)).await;
    source.cancel();

    within(task.wait()).await;
    assert!(task.is_canceled());
}

#[tokio::test]
async fn test_body_that_never_checks_runs_to_completion() {
    let pool = TokioSpawner::arc();
    let source = CancellationSource::new();
    source.cancel();

    // No preemption: the request is invisible to a body that never polls.
    let task = Task::run(&pool, async { Ok::<_, TaskError>(11) });
    assert_eq!(within(task.result()).await.unwrap(), 11);
    assert!(!task.is_canceled());
}

#[tokio::test]
async fn test_canceled_predecessor_is_visible_to_continuation() {
    let pool = TokioSpawner::arc();
    let source = CancellationSource::new();
    let signal = source.signal();
    source.cancel();

    let canceled = Task::run(&pool, async move {
        signal.bail_if_requested()?;
        Ok::<_, TaskError>(())
    });

    let verdict = canceled.continue_with(|prev| async move {
        Ok::<_, TaskError>(prev.is_canceled())
    });
    assert!(within(verdict.result()).await.unwrap());
}

#[tokio::test]
async fn test_deadline_built_from_delay_then_cancel() {
    let pool = TokioSpawner::arc();
    let source = CancellationSource::new();
    let signal = source.signal();

    let worker: Task<()> = Task::run(&pool, async move {
        loop {
            signal.bail_if_requested()?;
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    });

    let deadline_source = source.clone();
    let deadline = Task::run(&pool, async move {
        tokio::time::sleep(Duration::from_millis(40)).await;
        deadline_source.cancel();
        Ok::<_, TaskError>(())
    });

    within(worker.wait()).await;
    within(deadline.wait()).await;
    assert!(worker.is_canceled());
    assert!(deadline.is_completed() && !deadline.is_faulted());
}
