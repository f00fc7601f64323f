//! Processing strategies for the versions missing from a mirror.
//!
//! Implements the Strategy pattern for sequential vs parallel processing.
//! Both strategies run every item to completion regardless of sibling
//! failures and hand back one outcome per finished item.

use std::sync::mpsc;
use std::thread;

use parking_lot::Mutex;
use tracing::error;

use crate::error::DumperResult;

/// Result of processing one item.
#[derive(Debug)]
pub struct ItemOutcome<T> {
    /// The processed item.
    pub item: T,
    /// Whether processing succeeded.
    pub result: DumperResult<()>,
}

/// Strategy for processing a batch of items.
pub trait FetchStrategy: Send + Sync {
    /// Process every item in `items` with `work`.
    ///
    /// `on_done` is called once per finished item, possibly from a worker
    /// thread. Outcomes are returned in completion order.
    fn execute<T, W, P>(&self, items: Vec<T>, work: W, on_done: P) -> Vec<ItemOutcome<T>>
    where
        T: Send,
        W: Fn(&T) -> DumperResult<()> + Sync,
        P: Fn(&ItemOutcome<T>) + Sync;
}

/// Sequential strategy.
///
/// Processes items one at a time on the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct SequentialStrategy;

impl SequentialStrategy {
    /// Create a new sequential strategy.
    pub fn new() -> Self {
        Self
    }
}

impl FetchStrategy for SequentialStrategy {
    fn execute<T, W, P>(&self, items: Vec<T>, work: W, on_done: P) -> Vec<ItemOutcome<T>>
    where
        T: Send,
        W: Fn(&T) -> DumperResult<()> + Sync,
        P: Fn(&ItemOutcome<T>) + Sync,
    {
        items
            .into_iter()
            .map(|item| {
                let result = work(&item);
                let outcome = ItemOutcome { item, result };
                on_done(&outcome);
                outcome
            })
            .collect()
    }
}

/// Parallel strategy.
///
/// A bounded pool of scoped worker threads drains a shared queue. Outcomes
/// travel back over a channel and are collected once every worker has been
/// joined. A worker that panics loses only its in-flight item.
#[derive(Debug, Clone, Copy)]
pub struct ParallelStrategy {
    /// Maximum number of concurrent workers.
    pub concurrency: usize,
}

impl ParallelStrategy {
    /// Create a new parallel strategy.
    ///
    /// # Arguments
    ///
    /// * `concurrency` - Maximum number of concurrent workers (minimum 1)
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
        }
    }
}

impl Default for ParallelStrategy {
    fn default() -> Self {
        Self::new(4)
    }
}

impl FetchStrategy for ParallelStrategy {
    fn execute<T, W, P>(&self, items: Vec<T>, work: W, on_done: P) -> Vec<ItemOutcome<T>>
    where
        T: Send,
        W: Fn(&T) -> DumperResult<()> + Sync,
        P: Fn(&ItemOutcome<T>) + Sync,
    {
        let workers = self.concurrency.min(items.len());
        if workers == 0 {
            return Vec::new();
        }

        let queue = Mutex::new(items.into_iter());
        let (tx, rx) = mpsc::channel();

        thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|_| {
                    let tx = tx.clone();
                    let queue = &queue;
                    let work = &work;
                    let on_done = &on_done;
                    scope.spawn(move || loop {
                        // Release the lock before working on the item.
                        let next = queue.lock().next();
                        let Some(item) = next else { break };

                        let result = work(&item);
                        let outcome = ItemOutcome { item, result };
                        on_done(&outcome);
                        if tx.send(outcome).is_err() {
                            break;
                        }
                    })
                })
                .collect();

            for handle in handles {
                if handle.join().is_err() {
                    error!("Worker thread panicked; its in-flight item was not recorded");
                }
            }
        });

        drop(tx);
        rx.into_iter().collect()
    }
}
