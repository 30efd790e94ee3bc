//! Bounded-concurrency batch execution.
//!
//! Entities are processed in consecutive slices of `batch_size`. Inside a
//! slice every call runs concurrently, gated by a semaphore of
//! `max_concurrent_calls` permits, and a slice finishes completely before
//! the next one starts. Results always come back in input order.

use crate::config::BatchConfig;
use futures::future::join_all;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::info;

/// Reported after each slice finishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceProgress {
    /// 1-based index of the finished slice
    pub slice: usize,
    pub total_slices: usize,
    /// Entities completed so far, across all slices
    pub completed: usize,
    /// Entities in this run
    pub total: usize,
}

pub type ProgressHook = Arc<dyn Fn(SliceProgress) + Send + Sync>;

#[derive(Clone)]
pub struct BatchScheduler {
    batch_size: usize,
    max_concurrent_calls: usize,
    on_slice: Option<ProgressHook>,
}

impl std::fmt::Debug for BatchScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchScheduler")
            .field("batch_size", &self.batch_size)
            .field("max_concurrent_calls", &self.max_concurrent_calls)
            .field("on_slice", &self.on_slice.is_some())
            .finish()
    }
}

impl Default for BatchScheduler {
    fn default() -> Self {
        Self::from_config(&BatchConfig::default())
    }
}

impl BatchScheduler {
    /// Zero sizes are raised to 1
    pub fn new(batch_size: usize, max_concurrent_calls: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
            max_concurrent_calls: max_concurrent_calls.max(1),
            on_slice: None,
        }
    }

    pub fn from_config(config: &BatchConfig) -> Self {
        Self::new(config.batch_size, config.max_concurrent_calls)
    }

    /// Call `hook` after every finished slice
    pub fn with_progress<F>(mut self, hook: F) -> Self
    where
        F: Fn(SliceProgress) + Send + Sync + 'static,
    {
        self.on_slice = Some(Arc::new(hook));
        self
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn max_concurrent_calls(&self) -> usize {
        self.max_concurrent_calls
    }

    /// Apply `op` to every entity and collect the results in input order
    ///
    /// A fresh semaphore is created per call, so concurrent invocations do
    /// not share permits. `op` is expected to handle its own failures.
    pub async fn batch_apply<'a, E, R, F, Fut>(&self, entities: &'a [E], op: F) -> Vec<R>
    where
        F: Fn(&'a E) -> Fut,
        Fut: Future<Output = R>,
    {
        let mut results = Vec::with_capacity(entities.len());
        if entities.is_empty() {
            return results;
        }

        let semaphore = Semaphore::new(self.max_concurrent_calls);
        let total_slices = entities.len().div_ceil(self.batch_size);

        for (index, slice) in entities.chunks(self.batch_size).enumerate() {
            info!(
                slice = index + 1,
                total_slices,
                size = slice.len(),
                "Processing batch"
            );

            let calls = slice.iter().map(|entity| {
                let semaphore = &semaphore;
                let op = &op;
                async move {
                    // the semaphore is never closed
                    let _permit = semaphore.acquire().await.ok();
                    op(entity).await
                }
            });
            results.extend(join_all(calls).await);

            let progress = SliceProgress {
                slice: index + 1,
                total_slices,
                completed: results.len(),
                total: entities.len(),
            };
            info!(
                slice = progress.slice,
                completed = progress.completed,
                "Completed batch"
            );
            if let Some(hook) = &self.on_slice {
                hook(progress);
            }
        }

        results
    }
}

/// One-off batch run without keeping a scheduler around
pub async fn batch_apply<'a, E, R, F, Fut>(
    entities: &'a [E],
    batch_size: usize,
    max_concurrent_calls: usize,
    op: F,
) -> Vec<R>
where
    F: Fn(&'a E) -> Fut,
    Fut: Future<Output = R>,
{
    BatchScheduler::new(batch_size, max_concurrent_calls)
        .batch_apply(entities, op)
        .await
}
