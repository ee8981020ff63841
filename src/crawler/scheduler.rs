//! Scheduler for dispatching fetches and detecting when a traversal has drained
//!
//! This module handles:
//! - The dispatch queue new fetches are pushed onto from inside running fetch tasks
//! - Global concurrency limiting via a semaphore
//! - Tracking in-flight tasks until none remain and nothing is queued

use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

/// A claimed address waiting to be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchJob {
    /// Canonical address to fetch
    pub url: Url,

    /// Hop distance from the root along the path that claimed it
    pub depth: u32,
}

/// Cloneable handle for dispatching fetches into a running scheduler
#[derive(Debug, Clone)]
pub struct Dispatcher {
    tx: UnboundedSender<FetchJob>,
}

impl Dispatcher {
    /// Queues a fetch
    ///
    /// Returns false if the scheduler is gone and the job was dropped.
    pub fn dispatch(&self, job: FetchJob) -> bool {
        self.tx.send(job).is_ok()
    }
}

/// Scheduler owns the dispatch queue and the set of in-flight fetch tasks
///
/// The queue is unbounded; backpressure comes from the semaphore, which caps how many
/// spawned tasks may be past their permit acquisition at once.
pub struct Scheduler {
    /// Global semaphore for limiting concurrent fetches
    semaphore: Arc<Semaphore>,

    /// Sending side handed out through [`Scheduler::dispatcher`]
    tx: UnboundedSender<FetchJob>,

    /// Receiving side of the dispatch queue
    rx: UnboundedReceiver<FetchJob>,

    /// Spawned fetch tasks
    tasks: JoinSet<()>,

    /// Total jobs taken off the queue
    dispatched: usize,
}

/// What woke the drain loop
enum Wake {
    Job(Option<FetchJob>),
    Joined(Option<Result<(), tokio::task::JoinError>>),
}

impl Scheduler {
    /// Creates a scheduler allowing at most `max_concurrent` fetches at once
    pub fn new(max_concurrent: usize) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent.max(1))),
            tx,
            rx,
            tasks: JoinSet::new(),
            dispatched: 0,
        }
    }

    /// Returns a handle for queueing fetches
    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher {
            tx: self.tx.clone(),
        }
    }

    /// Total number of jobs started so far
    pub fn dispatched(&self) -> usize {
        self.dispatched
    }

    /// Number of tasks currently spawned and not yet joined
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// Runs queued jobs until no task is in flight and the queue is empty
    ///
    /// `handler` turns each job into the future that processes it; that future may queue
    /// further jobs through a [`Dispatcher`]. Because a task's dispatches happen before
    /// the task completes, an empty queue observed while no task is running means the
    /// traversal is exhausted.
    pub async fn drain<H, Fut>(&mut self, mut handler: H)
    where
        H: FnMut(FetchJob) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        loop {
            while let Ok(job) = self.rx.try_recv() {
                let fut = handler(job);
                self.spawn(fut);
            }

            if self.tasks.is_empty() {
                break;
            }

            let wake = tokio::select! {
                job = self.rx.recv() => Wake::Job(job),
                joined = self.tasks.join_next() => Wake::Joined(joined),
            };

            match wake {
                Wake::Job(Some(job)) => {
                    let fut = handler(job);
                    self.spawn(fut);
                }
                Wake::Job(None) => break,
                Wake::Joined(Some(Err(e))) if e.is_panic() => {
                    tracing::error!("Fetch task panicked: {}", e);
                }
                Wake::Joined(_) => {}
            }
        }

        tracing::debug!("Scheduler drained after {} jobs", self.dispatched);
    }

    /// Aborts every in-flight task and waits for them to stop
    ///
    /// Queued jobs that never started are discarded.
    pub async fn shutdown(&mut self) {
        self.tasks.abort_all();
        while self.tasks.join_next().await.is_some() {}

        let mut discarded = 0;
        while self.rx.try_recv().is_ok() {
            discarded += 1;
        }
        if discarded > 0 {
            tracing::debug!("Discarded {} queued jobs on shutdown", discarded);
        }
    }

    /// Spawns a job behind a semaphore permit
    fn spawn<Fut>(&mut self, fut: Fut)
    where
        Fut: Future<Output = ()> + Send + 'static,
    {
        let semaphore = Arc::clone(&self.semaphore);
        self.dispatched += 1;

        self.tasks.spawn(async move {
            let Ok(_permit) = semaphore.acquire_owned().await else {
                return;
            };
            fut.await;
        });
    }
}
