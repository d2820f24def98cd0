//! # Execution substrate: where task bodies actually run.
//!
//! The engine never owns worker threads. Every unit of work (a task driver) is
//! handed to an injected [`Spawn`] implementation, so callers pick the
//! substrate and tests can substitute a deterministic one.
//!
//! Two implementations ship with the crate:
//! - [`TokioSpawner`] — submits onto the ambient tokio runtime; the production
//!   substrate.
//! - [`SerialSpawner`] — a single worker drains submitted units one at a time,
//!   in submission order; makes scheduling-order assertions reproducible.
//!
//! ## Contract
//! - `submit` is fire-and-forget: it returns immediately and never blocks.
//! - No ordering is guaranteed between independently submitted units beyond
//!   what the task graph itself enforces ([`SerialSpawner`] tightens this to
//!   strict submission order).

use std::sync::Arc;

use futures::future::BoxFuture;
use tokio::sync::mpsc;

/// A unit of work as handed to the substrate.
pub type Work = BoxFuture<'static, ()>;

/// Shared handle to an execution substrate.
pub type SpawnRef = Arc<dyn Spawn>;

/// # Fire-and-forget scheduling of a unit of work onto some worker.
///
/// Implementations must return from [`submit`](Spawn::submit) immediately; the
/// submitted future runs to completion on whatever worker the substrate picks.
pub trait Spawn: Send + Sync + 'static {
    /// Schedules `work` for execution and returns immediately.
    fn submit(&self, work: Work);
}

/// Substrate backed by the ambient tokio runtime.
///
/// Each submitted unit becomes its own `tokio::spawn`ed task, so independent
/// units may run in parallel across runtime workers.
///
/// Must be used from within a tokio runtime context.
#[derive(Debug, Default)]
pub struct TokioSpawner;

impl TokioSpawner {
    /// Creates the spawner as a shared [`SpawnRef`].
    pub fn arc() -> SpawnRef {
        Arc::new(TokioSpawner)
    }
}

impl Spawn for TokioSpawner {
    fn submit(&self, work: Work) {
        tokio::spawn(work);
    }
}

/// Deterministic substrate: one worker, strict submission order.
///
/// Submitted units are queued and driven **to completion one at a time**, in
/// the order they were submitted. This pins down interleavings that a
/// multi-worker substrate leaves open, which is what ordering tests need.
///
/// ### Caveat
/// A unit that awaits work submitted *after* it will deadlock the worker:
/// nothing behind it in the queue runs until it finishes. Task drivers never do
/// this (a continuation is only submitted once its predecessor's driver has
/// finished), but joins over not-yet-finished siblings should use
/// [`TokioSpawner`] instead.
pub struct SerialSpawner {
    tx: mpsc::UnboundedSender<Work>,
}

impl SerialSpawner {
    /// Creates the spawner and its worker as a shared [`SpawnRef`].
    ///
    /// Must be called from within a tokio runtime context; the worker is a
    /// single spawned task draining the queue.
    pub fn arc() -> SpawnRef {
        let (tx, mut rx) = mpsc::unbounded_channel::<Work>();
        tokio::spawn(async move {
            while let Some(work) = rx.recv().await {
                work.await;
            }
        });
        Arc::new(SerialSpawner { tx })
    }
}

impl Spawn for SerialSpawner {
    fn submit(&self, work: Work) {
        if self.tx.send(work).is_err() {
            log::warn!("serial spawner worker is gone; dropping submitted work");
        }
    }
}
