// Background job scheduler — a FIFO queue drained by a fixed worker pool.
//
// The webhook handler pushes raw bodies with `JobQueue::submit`, which
// never blocks. Each worker pulls one body at a time and runs the whole
// comment pipeline for it. The job runs in its own tokio task so a panic
// surfaces as a JoinError instead of killing the worker; every failure is
// handed to the error reporter and the worker moves on.
//
// No ordering is guaranteed between different comments.
//
// Counters are read through `SchedulerStatus`, which does not hold the
// channel sender. Only `JobQueue` keeps the workers alive.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::pipeline::comment::CommentJob;
use crate::pipeline::error::{FailureContext, PipelineError};
use crate::report::ErrorReporter;

/// Counters shared by the queue and the workers.
#[derive(Debug, Default)]
struct SchedulerStats {
    accepted: AtomicU64,
    completed: AtomicU64,
    failed: AtomicU64,
    in_flight: AtomicU64,
}

/// Point-in-time view of the counters, served by GET /api/status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SchedulerSnapshot {
    pub workers: usize,
    pub accepted: u64,
    pub completed: u64,
    pub failed: u64,
    pub in_flight: u64,
    pub queued: u64,
}

/// Producer side. Cheap to clone into every request handler.
///
/// Dropping the last clone closes the queue.
#[derive(Clone)]
pub struct JobQueue {
    sender: mpsc::UnboundedSender<Vec<u8>>,
    stats: Arc<SchedulerStats>,
}

impl JobQueue {
    /// Enqueue a webhook body. Returns false only if the pool has shut down.
    pub fn submit(&self, payload: Vec<u8>) -> bool {
        match self.sender.send(payload) {
            Ok(()) => {
                self.stats.accepted.fetch_add(1, Ordering::SeqCst);
                true
            }
            Err(_) => {
                warn!("Job queue closed, dropping webhook payload");
                false
            }
        }
    }
}

/// Read-only view of the counters. Holding one never delays shutdown.
#[derive(Clone)]
pub struct SchedulerStatus {
    stats: Arc<SchedulerStats>,
    workers: usize,
}

impl SchedulerStatus {
    pub fn snapshot(&self) -> SchedulerSnapshot {
        let accepted = self.stats.accepted.load(Ordering::SeqCst);
        let completed = self.stats.completed.load(Ordering::SeqCst);
        let failed = self.stats.failed.load(Ordering::SeqCst);
        let in_flight = self.stats.in_flight.load(Ordering::SeqCst);
        SchedulerSnapshot {
            workers: self.workers,
            accepted,
            completed,
            failed,
            in_flight,
            queued: accepted.saturating_sub(completed + failed + in_flight),
        }
    }
}

/// Consumer side: the running workers.
pub struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
    status: SchedulerStatus,
}

impl WorkerPool {
    pub fn status(&self) -> SchedulerStatus {
        self.status.clone()
    }

    /// Wait for the workers to finish.
    ///
    /// Workers exit once every `JobQueue` clone is dropped and the backlog
    /// is drained.
    pub async fn join(self) {
        for handle in self.handles {
            if let Err(e) = handle.await {
                warn!(error = %e, "Worker task ended abnormally");
            }
        }
    }
}

/// Start `workers` workers running `job` for each queued payload.
pub fn start(
    job: Arc<dyn CommentJob>,
    reporter: Arc<dyn ErrorReporter>,
    workers: usize,
) -> (JobQueue, WorkerPool) {
    let workers = workers.max(1);
    let (sender, receiver) = mpsc::unbounded_channel();
    let receiver = Arc::new(Mutex::new(receiver));
    let stats = Arc::new(SchedulerStats::default());

    let handles = (0..workers)
        .map(|worker_id| {
            tokio::spawn(worker_loop(
                worker_id,
                receiver.clone(),
                job.clone(),
                reporter.clone(),
                stats.clone(),
            ))
        })
        .collect();

    info!(workers, "Job scheduler started");

    let status = SchedulerStatus {
        stats: stats.clone(),
        workers,
    };
    (JobQueue { sender, stats }, WorkerPool { handles, status })
}

async fn worker_loop(
    worker_id: usize,
    receiver: Arc<Mutex<mpsc::UnboundedReceiver<Vec<u8>>>>,
    job: Arc<dyn CommentJob>,
    reporter: Arc<dyn ErrorReporter>,
    stats: Arc<SchedulerStats>,
) {
    loop {
        // Only one idle worker waits on the channel at a time
        let next = { receiver.lock().await.recv().await };
        let Some(payload) = next else {
            break;
        };

        stats.in_flight.fetch_add(1, Ordering::SeqCst);
        let task_job = job.clone();
        let result = tokio::spawn(async move { task_job.run(payload).await }).await;

        match result {
            Ok(Ok(outcome)) => {
                stats.completed.fetch_add(1, Ordering::SeqCst);
                info!(worker = worker_id, outcome = ?outcome, "Comment processed");
            }
            Ok(Err(err)) => {
                stats.failed.fetch_add(1, Ordering::SeqCst);
                reporter.report(&err, &err.context()).await;
            }
            Err(join_err) => {
                stats.failed.fetch_add(1, Ordering::SeqCst);
                let err = PipelineError::Aborted(join_err.to_string());
                reporter.report(&err, &FailureContext::default()).await;
            }
        }
        stats.in_flight.fetch_sub(1, Ordering::SeqCst);
    }

    info!(worker = worker_id, "Worker stopped");
}
