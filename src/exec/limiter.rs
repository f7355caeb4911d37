//! Bounded concurrent execution
//!
//! All tasks are spawned up front; a shared semaphore admits at most
//! `max_concurrent` of them into their body at a time. Results come back in
//! submission order no matter which task finishes first.

use futures::future::join_all;
use std::any::Any;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::time::Instant;

/// Why a task slot produced no value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskFailure {
    #[error("task panicked: {0}")]
    Panicked(String),

    #[error("task was cancelled")]
    Cancelled,

    #[error("deadline exceeded before the task finished")]
    DeadlineExceeded,
}

/// Admission gate for concurrent operations
#[derive(Debug, Clone)]
pub struct ConcurrencyLimiter {
    semaphore: Arc<Semaphore>,
    max_concurrent: usize,
}

impl ConcurrencyLimiter {
    /// Creates a limiter admitting `max_concurrent` operations (at least one)
    pub fn new(max_concurrent: usize) -> Self {
        let max_concurrent = max_concurrent.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
            max_concurrent,
        }
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Number of free slots right now
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Runs a single operation once a slot is free
    pub async fn run<T, Fut>(&self, task: Fut) -> Result<T, TaskFailure>
    where
        Fut: Future<Output = T>,
    {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| TaskFailure::Cancelled)?;
        Ok(task.await)
    }

    /// Runs every task with bounded concurrency, preserving input order
    ///
    /// A panicking task only fails its own slot. With a `deadline`, tasks
    /// still waiting for a slot or still running at that instant yield
    /// [`TaskFailure::DeadlineExceeded`].
    pub async fn run_bounded<T, Fut>(
        &self,
        tasks: Vec<Fut>,
        deadline: Option<Instant>,
    ) -> Vec<Result<T, TaskFailure>>
    where
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        tracing::debug!(
            "Running {} tasks with at most {} in flight",
            tasks.len(),
            self.max_concurrent
        );

        let handles = tasks.into_iter().map(|task| {
            let semaphore = Arc::clone(&self.semaphore);
            tokio::spawn(async move {
                let admission = semaphore.acquire_owned();
                let _permit = match deadline {
                    Some(deadline) => tokio::time::timeout_at(deadline, admission)
                        .await
                        .map_err(|_| TaskFailure::DeadlineExceeded)?,
                    None => admission.await,
                }
                .map_err(|_| TaskFailure::Cancelled)?;

                match deadline {
                    Some(deadline) => tokio::time::timeout_at(deadline, task)
                        .await
                        .map_err(|_| TaskFailure::DeadlineExceeded),
                    None => Ok(task.await),
                }
            })
        });

        join_all(handles)
            .await
            .into_iter()
            .enumerate()
            .map(|(index, joined)| match joined {
                Ok(result) => result,
                Err(e) if e.is_panic() => {
                    let message = panic_message(e.into_panic());
                    tracing::error!("Task {} panicked: {}", index, message);
                    Err(TaskFailure::Panicked(message))
                }
                Err(_) => Err(TaskFailure::Cancelled),
            })
            .collect()
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
