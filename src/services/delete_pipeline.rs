//! Buffered soft-delete pipeline
//!
//! Callers only enqueue deletion requests; a single long-lived worker
//! drains the bounded queue into an in-memory buffer and writes it to
//! the backend in batches. Two independent triggers flush the buffer:
//! reaching the size threshold, and a recurring interval timer. A
//! third trigger, the shutdown signal, performs one final flush under
//! a grace deadline so buffered deletions are not silently lost.
//!
//! Deletion is only guaranteed visible after the next flush; callers
//! must not assume synchronous visibility.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::time::{interval_at, timeout, Duration, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::config::DeletePipelineConfig;
use crate::storage::{DeleteRequest, LinkStore};

pub(crate) async fn run_delete_worker(
    store: Arc<dyn LinkStore>,
    mut requests: mpsc::Receiver<DeleteRequest>,
    config: DeletePipelineConfig,
    mut shutdown: watch::Receiver<bool>,
) {
    info!("delete worker started");

    let mut buffer: Vec<DeleteRequest> = Vec::with_capacity(config.flush_threshold);
    let mut ticker = interval_at(
        Instant::now() + config.flush_interval(),
        config.flush_interval(),
    );
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            changed = shutdown.changed() => {
                // A dropped sender counts as shutdown as well.
                if changed.is_err() || *shutdown.borrow() {
                    final_flush(&store, &mut buffer, config.shutdown_grace()).await;
                    break;
                }
            }
            received = requests.recv() => match received {
                Some(request) => {
                    buffer.push(request);
                    if buffer.len() >= config.flush_threshold {
                        debug!("size threshold reached, flushing {} deletions", buffer.len());
                        flush(store.as_ref(), &mut buffer).await;
                        ticker.reset();
                    }
                }
                None => {
                    final_flush(&store, &mut buffer, config.shutdown_grace()).await;
                    break;
                }
            },
            _ = ticker.tick() => {
                if !buffer.is_empty() {
                    debug!("interval elapsed, flushing {} deletions", buffer.len());
                    flush(store.as_ref(), &mut buffer).await;
                }
            }
        }
    }

    info!("delete worker stopped");
}

/// Write the buffer to the backend and clear it. Failures are logged
/// and the batch is dropped (at-most-once); no caller of the queue
/// ever observes a flush failure synchronously.
async fn flush(store: &dyn LinkStore, buffer: &mut Vec<DeleteRequest>) {
    let batch = std::mem::take(buffer);
    let count = batch.len();
    match store.mark_deleted(&batch).await {
        Ok(()) => debug!("flushed {} deletions", count),
        Err(e) => error!("delete flush failed, dropping {} entries: {}", count, e),
    }
}

/// Flush a non-empty buffer on shutdown, bounded by the grace deadline.
/// Discarding here would silently lose acknowledged deletions.
async fn final_flush(store: &Arc<dyn LinkStore>, buffer: &mut Vec<DeleteRequest>, grace: Duration) {
    if buffer.is_empty() {
        return;
    }

    let batch = std::mem::take(buffer);
    let count = batch.len();
    info!("shutdown: final flush of {} queued deletions", count);

    match timeout(grace, store.mark_deleted(&batch)).await {
        Ok(Ok(())) => debug!("final flush completed"),
        Ok(Err(e)) => error!("final delete flush failed, dropping {} entries: {}", count, e),
        Err(_) => error!(
            "final delete flush timed out after {:?}, dropping {} entries",
            grace, count
        ),
    }
}
