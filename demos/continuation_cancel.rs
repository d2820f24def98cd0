//! # Example: continuation_cancel
//!
//! Demonstrates a continuation chain crossing a cooperative cancellation.
//!
//! ## Flow
//! ```text
//! t1 (delay, then fault)
//!  └─► t2 inspects t1.is_faulted()
//!       └─► t3 checks the cancellation signal ──► Canceled
//!            └─► t4 inspects t3.is_canceled()
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example continuation_cancel
//! ```

use std::time::Duration;

use taskling::{CancellationSource, Task, TaskError, TokioSpawner};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    println!("=== continuation_cancel example ===\n");

    let pool = TokioSpawner::arc();

    // 1. A task that works for a while, then faults.
    let t1: Task<()> = Task::run(&pool, async {
        tokio::time::sleep(Duration::from_millis(300)).await;
        Err(TaskError::fail("noop"))
    });

    // 2. Runs regardless of t1's outcome, and inspects it.
    let t2 = t1.continue_with(|prev| async move {
        if prev.is_faulted() {
            println!("[t2] previous task was faulted");
        } else {
            println!("[t2] not faulted");
        }
        Ok::<_, TaskError>(())
    });

    // 3. The next link observes a cancellation request.
    let source = CancellationSource::new();
    let signal = source.signal();
    let t3 = t2.continue_with(move |_prev| async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        signal.bail_if_requested()?;
        Ok::<_, TaskError>(())
    });
    source.cancel();

    // 4. And the last link reports what happened to t3.
    let t4 = t3.continue_with(|prev| async move {
        if prev.is_canceled() {
            println!("[t4] previous task was canceled");
        } else {
            println!("[t4] not canceled");
        }
        Ok::<_, TaskError>(())
    });

    t4.wait().await;
    println!("\n=== example completed successfully ===");
    Ok(())
}
