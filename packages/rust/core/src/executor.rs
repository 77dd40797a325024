//! Ordered, fail-fast parallel map.
//!
//! The single concurrency primitive of the pipeline: apply a fallible
//! transform to every item of a sequence on parallel workers, return the
//! results in input order, and resolve with the first error when any item
//! fails. Exactly one outcome ever surfaces — a complete ordered vector
//! or a single error; no partial results.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::debug;

use backfeed_shared::{BackfeedError, Result};

/// Map `items` through `transform` on up to `concurrency` parallel workers.
///
/// Each item is tagged with its submission index; completed results land in
/// their slot regardless of completion order, and the output is only
/// assembled once every slot is filled. The transform runs on blocking
/// worker threads since per-item work is CPU-bound.
///
/// On the first observed failure (including a worker panic, surfaced as
/// [`BackfeedError::Task`]) the whole call resolves with that single error.
/// In-flight work is abandoned, never delivered.
pub async fn ordered_try_map<T, R, F>(
    items: Vec<T>,
    concurrency: usize,
    transform: F,
) -> Result<Vec<R>>
where
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(T) -> Result<R> + Send + Sync + 'static,
{
    if items.is_empty() {
        return Ok(Vec::new());
    }

    let total = items.len();
    let limit = concurrency.max(1);
    let semaphore = Arc::new(Semaphore::new(limit));
    let transform = Arc::new(transform);
    let mut workers: JoinSet<(usize, Result<R>)> = JoinSet::new();

    debug!(total, limit, "dispatching ordered parallel map");

    for (index, item) in items.into_iter().enumerate() {
        // Permits free up as workers finish on the blocking pool, so this
        // submission loop bounds in-flight work without polling results.
        let permit = semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| BackfeedError::Task(format!("semaphore closed: {e}")))?;
        let transform = Arc::clone(&transform);

        workers.spawn_blocking(move || {
            let result = transform(item);
            drop(permit);
            (index, result)
        });
    }

    let mut slots: Vec<Option<R>> = (0..total).map(|_| None).collect();

    while let Some(joined) = workers.join_next().await {
        let (index, result) =
            joined.map_err(|e| BackfeedError::Task(format!("worker failed: {e}")))?;
        match result {
            Ok(value) => slots[index] = Some(value),
            // Fail fast: drop the set, abandon remaining workers.
            Err(error) => return Err(error),
        }
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| {
            slot.ok_or_else(|| BackfeedError::Task(format!("missing result for index {index}")))
        })
        .collect()
}
