//! Task state machine: creation, explicit start, observation, fault capture.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use taskling::{JoinError, StartError, Task, TaskError, TaskState, TokioSpawner};

async fn within<T>(fut: impl std::future::Future<Output = T>) -> T {
    tokio::time::timeout(Duration::from_secs(5), fut)
        .await
        .expect("test task did not finish in time")
}

#[tokio::test]
async fn test_create_defers_execution() {
    let pool = TokioSpawner::arc();
    let ran = Arc::new(AtomicBool::new(false));

    let flag = ran.clone();
    let task = Task::create(&pool, async move {
        flag.store(true, Ordering::SeqCst);
        Ok::<_, TaskError>(())
    });

    assert_eq!(task.state(), TaskState::Created);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!ran.load(Ordering::SeqCst), "body ran before start()");
    assert!(!task.is_completed());

    task.start().unwrap();
    within(task.wait()).await;
    assert!(ran.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_value_body_completes_with_value() {
    let pool = TokioSpawner::arc();
    let task = Task::create(&pool, async { Ok::<_, TaskError>(1 + 2) });
    task.start().unwrap();

    assert_eq!(within(task.result()).await.unwrap(), 3);
    assert_eq!(task.state(), TaskState::Completed);
    assert!(task.is_completed());
    assert!(!task.is_faulted());
    assert!(!task.is_canceled());
    assert!(task.faults().is_empty());
}

#[tokio::test]
async fn test_second_start_is_rejected_and_harmless() {
    let pool = TokioSpawner::arc();
    let task = Task::create(&pool, async { Ok::<_, TaskError>(5) });
    task.start().unwrap();

    let err = task.start().unwrap_err();
    assert!(matches!(err, StartError::AlreadyStarted { .. }));
    assert_eq!(err.as_label(), "start_already_started");

    // The rejected call left the task unharmed.
    assert_eq!(within(task.result()).await.unwrap(), 5);
}

#[tokio::test]
async fn test_start_after_finish_reports_terminal_state() {
    let pool = TokioSpawner::arc();
    let task = Task::run(&pool, async { Ok::<_, TaskError>(()) });
    within(task.wait()).await;

    match task.start().unwrap_err() {
        StartError::AlreadyStarted { state } => assert_eq!(state, TaskState::Completed),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_faulting_body_captures_exactly_its_fault() {
    let pool = TokioSpawner::arc();
    let task = Task::run(&pool, async {
        Err::<(), _>(TaskError::fail("noop"))
    });

    let err = within(task.result()).await.unwrap_err();
    match err {
        JoinError::Faulted(aggregate) => {
            assert_eq!(aggregate.faults(), &[TaskError::fail("noop")]);
        }
        JoinError::Canceled => panic!("expected a fault, got cancellation"),
        _ => unreachable!("unexpected JoinError variant"),
    }
    assert!(task.is_faulted());
    assert_eq!(task.faults(), vec![TaskError::fail("noop")]);
}

#[tokio::test]
async fn test_wait_never_raises() {
    let pool = TokioSpawner::arc();
    let task = Task::run(&pool, async {
        Err::<(), _>(TaskError::fail("quiet"))
    });

    // wait() observes termination without inspecting the fault...
    within(task.wait()).await;
    assert!(task.is_faulted());

    // ...and the fault is still there for result().
    assert!(within(task.result()).await.is_err());
}

#[tokio::test]
async fn test_run_is_create_plus_start() {
    let pool = TokioSpawner::arc();
    let task = Task::run(&pool, async { Ok::<_, TaskError>("hello world") });
    assert_ne!(task.state(), TaskState::Created);
    assert_eq!(within(task.result()).await.unwrap(), "hello world");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_ten_observers_see_the_same_fault() {
    let pool = TokioSpawner::arc();
    let task = Task::run(&pool, async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        Err::<(), _>(TaskError::fail("shared"))
    });

    let mut observers = Vec::new();
    for _ in 0..10 {
        let observed = task.clone();
        observers.push(tokio::spawn(async move { observed.result().await }));
    }

    for observer in observers {
        let err = within(observer).await.unwrap().unwrap_err();
        match err {
            JoinError::Faulted(aggregate) => {
                assert_eq!(aggregate.faults(), &[TaskError::fail("shared")]);
            }
            JoinError::Canceled => panic!("expected a fault"),
            _ => unreachable!("unexpected JoinError variant"),
        }
    }
}

#[tokio::test]
async fn test_result_is_idempotent() {
    let pool = TokioSpawner::arc();
    let task = Task::run(&pool, async { Ok::<_, TaskError>(9) });

    assert_eq!(within(task.result()).await.unwrap(), 9);
    assert_eq!(within(task.result()).await.unwrap(), 9);
}

#[tokio::test]
async fn test_panicking_body_faults_its_own_task_only() {
    let pool = TokioSpawner::arc();
    let doomed: Task<()> = Task::run(&pool, async { panic!("kaboom") });

    let err = within(doomed.result()).await.unwrap_err();
    match err {
        JoinError::Faulted(aggregate) => {
            assert_eq!(aggregate.faults(), &[TaskError::fail("kaboom")]);
        }
        JoinError::Canceled => panic!("expected a fault"),
        _ => unreachable!("unexpected JoinError variant"),
    }

    // The substrate survived; later tasks run normally.
    let next = Task::run(&pool, async { Ok::<_, TaskError>(1) });
    assert_eq!(within(next.result()).await.unwrap(), 1);
}
