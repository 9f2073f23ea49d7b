//! Link management service
//!
//! The facade composing the store backend and the delete pipeline.
//! Consumed directly by the (external) HTTP/gRPC transport layers;
//! `owner_id` is an opaque principal resolved upstream.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::DeletePipelineConfig;
use crate::errors::{LinkVaultError, Result};
use crate::services::delete_pipeline::run_delete_worker;
use crate::storage::{DeleteRequest, Link, LinkStore, StoreStats};
use crate::utils::{generate_random_code, SHORT_CODE_LENGTH};

// ============ Request/Response DTOs ============

/// Result of a single link creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddResult {
    /// The short code now mapped to the URL. When the URL already had a
    /// record this is the existing code, not a fresh one.
    pub short_code: String,
    /// Whether the URL resolved to an existing record. Transports use
    /// this to pick a different status; the call itself succeeded.
    pub already_exists: bool,
}

/// One batch creation input.
#[derive(Debug, Clone)]
pub struct BatchAddItem {
    /// Caller label, threaded through to the matching result untouched.
    pub correlation_id: String,
    pub original_url: String,
}

/// One batch creation result, at the same position as its input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchAddResult {
    pub correlation_id: String,
    pub short_code: String,
}

/// Result of a batch creation.
#[derive(Debug, Clone)]
pub struct BatchAddOutcome {
    /// Same length and order as the input batch.
    pub results: Vec<BatchAddResult>,
    /// Set when at least one item was substituted from an existing
    /// record (a single aggregate signal for the whole call).
    pub already_exists: bool,
}

// ============ Service ============

pub struct LinkService {
    store: Arc<dyn LinkStore>,
    pipeline_config: DeletePipelineConfig,
    delete_tx: mpsc::Sender<DeleteRequest>,
    delete_rx: Mutex<Option<mpsc::Receiver<DeleteRequest>>>,
}

impl LinkService {
    pub fn new(store: Arc<dyn LinkStore>, pipeline_config: DeletePipelineConfig) -> Self {
        let (delete_tx, delete_rx) = mpsc::channel(pipeline_config.queue_capacity);
        LinkService {
            store,
            pipeline_config,
            delete_tx,
            delete_rx: Mutex::new(Some(delete_rx)),
        }
    }

    /// Spawn the delete pipeline worker. Called once by the bootstrap;
    /// the worker runs until `shutdown` signals or the service is
    /// dropped, and the bootstrap joins the returned handle.
    pub fn start_delete_worker(
        &self,
        shutdown: watch::Receiver<bool>,
    ) -> Result<JoinHandle<()>> {
        let receiver = self
            .delete_rx
            .lock()
            .take()
            .ok_or_else(|| LinkVaultError::validation("delete worker already started"))?;

        Ok(tokio::spawn(run_delete_worker(
            self.store.clone(),
            receiver,
            self.pipeline_config.clone(),
            shutdown,
        )))
    }

    /// Map a long URL to a fresh short code. Idempotent with respect to
    /// the URL: a repeated call returns the existing code with
    /// `already_exists` set.
    pub async fn add(&self, owner_id: &str, original_url: &str) -> Result<AddResult> {
        if original_url.is_empty() {
            return Err(LinkVaultError::validation("original URL must not be empty"));
        }

        let link = Link {
            short_code: generate_random_code(SHORT_CODE_LENGTH),
            original_url: original_url.to_string(),
            ..Link::default()
        };

        let creation = self.store.create_link(link, owner_id).await?;
        if creation.deduplicated {
            info!(
                "add resolved to existing link {} for owner {}",
                creation.link.short_code, owner_id
            );
        }

        Ok(AddResult {
            short_code: creation.link.short_code,
            already_exists: creation.deduplicated,
        })
    }

    /// Create a batch of links, preserving input order and correlation
    /// labels across dedup substitutions.
    pub async fn add_batch(
        &self,
        owner_id: &str,
        items: Vec<BatchAddItem>,
    ) -> Result<BatchAddOutcome> {
        let links: Vec<Link> = items
            .into_iter()
            .map(|item| Link {
                short_code: generate_random_code(SHORT_CODE_LENGTH),
                original_url: item.original_url,
                correlation_id: Some(item.correlation_id),
                ..Link::default()
            })
            .collect();

        let creation = self.store.create_link_batch(links, owner_id).await?;

        let results = creation
            .links
            .into_iter()
            .map(|link| BatchAddResult {
                correlation_id: link.correlation_id.unwrap_or_default(),
                short_code: link.short_code,
            })
            .collect();

        Ok(BatchAddOutcome {
            results,
            already_exists: creation.deduplicated,
        })
    }

    /// Resolve a short code back to its original URL. Absent records
    /// report `NotFound`; soft-deleted records report `Deleted`. Both
    /// are expected outcomes, distinct from backend failures.
    pub async fn get(&self, short_code: &str) -> Result<String> {
        let link = self.store.get_link(short_code).await?;
        if link.presence == crate::storage::Presence::Absent {
            return Err(LinkVaultError::not_found(short_code));
        }
        if link.is_deleted {
            return Err(LinkVaultError::deleted(short_code));
        }
        Ok(link.original_url)
    }

    /// All records created by the owner, live and deleted.
    pub async fn list_owned(&self, owner_id: &str) -> Result<Vec<Link>> {
        self.store.list_by_owner(owner_id).await
    }

    /// Hand a deletion request to the pipeline queue. Never touches the
    /// backend synchronously; awaits only when the bounded queue is
    /// full (deliberate backpressure).
    pub async fn enqueue_delete(&self, request: DeleteRequest) -> Result<()> {
        self.delete_tx
            .send(request)
            .await
            .map_err(|_| LinkVaultError::write_failure("delete pipeline queue is closed"))
    }

    pub async fn ping(&self) -> Result<()> {
        self.store.ping().await
    }

    pub async fn stats(&self) -> Result<StoreStats> {
        self.store.stats().await
    }
}
