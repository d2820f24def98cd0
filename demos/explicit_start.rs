//! # Example: explicit_start
//!
//! Demonstrates the explicit-start lifecycle and result observation.
//!
//! Shows how to:
//! - Create a deferred task and start it by hand
//! - Catch the error raised by a second `start()`
//! - Read results from value-producing tasks
//! - Observe a fault raised inside a body via `result()`
//!
//! ## Run
//! ```bash
//! cargo run --example explicit_start
//! ```

use std::time::Duration;

use taskling::{JoinError, Task, TaskError, TokioSpawner};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    println!("=== explicit_start example ===\n");

    let pool = TokioSpawner::arc();

    // 1. Create, start, wait.
    let hello = Task::create(&pool, async {
        println!("[hello] hello world");
        Ok::<_, TaskError>(())
    });
    hello.start()?;
    hello.wait().await;

    // 2. A second start is rejected and leaves the task untouched.
    match hello.start() {
        Err(e) => println!("[hello] second start rejected: {e}"),
        Ok(()) => unreachable!("a finished task must refuse start"),
    }

    // 3. Value-producing task.
    let (a, b) = (1, 2);
    let sum = Task::create(&pool, async move { Ok::<_, TaskError>(a + b) });
    sum.start()?;
    println!("[sum] second result : {}", sum.result().await?);

    // 4. Create + start fused.
    let greeting = Task::run(&pool, async { Ok::<_, TaskError>("hello world") });
    println!("[greeting] third result : {}", greeting.result().await?);

    // 5. A body fault surfaces only when the result is observed.
    let always = true;
    let doomed = Task::run(&pool, async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        if always {
            return Err(TaskError::fail("noop"));
        }
        Ok(10)
    });
    match doomed.result().await {
        Ok(v) => println!("[doomed] unexpected value: {v}"),
        Err(JoinError::Faulted(aggregate)) => {
            println!("[doomed] faulted: {}", aggregate.as_message());
        }
        Err(JoinError::Canceled) => println!("[doomed] canceled"),
        Err(_) => unreachable!("unexpected JoinError variant"),
    }

    println!("\n=== example completed successfully ===");
    Ok(())
}
