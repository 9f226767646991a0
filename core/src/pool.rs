//! Fixed-size worker pool used by the `pool-test` smoke test.

use crossbeam::channel;
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("A worker pool needs at least one worker")]
    NoWorkers,
    #[error("A worker panicked")]
    WorkerPanicked,
    #[error("Worker channel closed early")]
    Disconnected,
}

#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    workers: usize,
}

impl WorkerPool {
    pub fn new(workers: usize) -> Result<Self, Error> {
        if workers == 0 {
            return Err(Error::NoWorkers);
        }
        Ok(Self { workers })
    }

    pub fn size(&self) -> usize {
        self.workers
    }

    /// Applies `f` to every item on the pool's workers and returns the results
    /// in input order.
    #[instrument(skip(self, items, f), fields(workers = self.workers))]
    pub fn map<T, R, F>(&self, items: impl IntoIterator<Item = T>, f: F) -> Result<Vec<R>, Error>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> R + Sync,
    {
        let (task_tx, task_rx) = channel::unbounded::<(usize, T)>();
        let (result_tx, result_rx) = channel::unbounded::<(usize, R)>();

        let mut len = 0;
        for (i, item) in items.into_iter().enumerate() {
            task_tx.send((i, item)).map_err(|_| Error::Disconnected)?;
            len += 1;
        }
        drop(task_tx);
        debug!(tasks = len, "Queued tasks");

        let f = &f;
        crossbeam::scope(|scope| {
            for _ in 0..self.workers {
                let task_rx = task_rx.clone();
                let result_tx = result_tx.clone();
                scope.spawn(move |_| {
                    for (i, item) in task_rx {
                        if result_tx.send((i, f(item))).is_err() {
                            break;
                        }
                    }
                });
            }
        })
        .map_err(|_| Error::WorkerPanicked)?;
        drop(result_tx);

        let mut results = (0..len).map(|_| None).collect::<Vec<Option<R>>>();
        for (i, result) in result_rx {
            results[i] = Some(result);
        }
        results
            .into_iter()
            .map(|r| r.ok_or(Error::Disconnected))
            .collect()
    }
}
