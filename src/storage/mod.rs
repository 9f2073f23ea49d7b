//! Store backends
//!
//! One capability set, three interchangeable implementations. The
//! backend is selected once at startup via configuration and injected
//! into the service layer as `Arc<dyn LinkStore>`.

use std::sync::Arc;

use tracing::error;

use crate::config::AppConfig;
use crate::errors::{LinkVaultError, Result};

pub mod backend;
pub mod file;
pub mod memory;
pub mod models;

pub use models::{BatchCreation, DeleteRequest, Link, LinkCreation, LogRecord, Presence, StoreStats};

#[async_trait::async_trait]
pub trait LinkStore: Send + Sync {
    /// Insert a link unless a record for its original URL already
    /// exists; in that case the stored record is returned with
    /// `deduplicated = true` instead of creating a duplicate.
    async fn create_link(&self, link: Link, owner_id: &str) -> Result<LinkCreation>;

    /// Insert a batch in one atomic unit. Items whose original URL
    /// already has a record are substituted from the store, preserving
    /// input length and order. Genuine backend failures abort the call.
    async fn create_link_batch(&self, links: Vec<Link>, owner_id: &str) -> Result<BatchCreation>;

    /// Fetch by short code. An absent record is not an error: the
    /// returned link carries `Presence::Absent`. Soft-deleted records
    /// are returned with `is_deleted = true` for the caller to interpret.
    async fn get_link(&self, short_code: &str) -> Result<Link>;

    /// All records (live and deleted) created by the owner. Empty vec,
    /// not an error, when none exist.
    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Link>>;

    /// Soft-delete each `{short_code, owner_id}` pair whose ownership
    /// matches. Mismatched or unknown entries are silently skipped.
    async fn mark_deleted(&self, requests: &[DeleteRequest]) -> Result<()>;

    /// Liveness check.
    async fn ping(&self) -> Result<()>;

    /// Idempotent setup: create schema, replay the log, or no-op.
    async fn initialize(&self) -> Result<()>;

    /// Best-effort aggregate counts.
    async fn stats(&self) -> Result<StoreStats>;

    fn backend_name(&self) -> String;
}

pub struct StoreFactory;

impl StoreFactory {
    pub async fn create(config: &AppConfig) -> Result<Arc<dyn LinkStore>> {
        let backend = config.storage.backend.as_str();

        match backend {
            "memory" => Ok(Arc::new(memory::MemoryStore::new()) as Arc<dyn LinkStore>),
            "file" => {
                let store = file::FileStore::new(&config.storage.links_file);
                Ok(Arc::new(store) as Arc<dyn LinkStore>)
            }
            "sqlite" | "postgres" | "mysql" | "mariadb" => {
                let store =
                    backend::SeaOrmStore::new(&config.storage.database_url, backend).await?;
                Ok(Arc::new(store) as Arc<dyn LinkStore>)
            }
            _ => {
                error!("Unknown storage backend: {}", backend);
                Err(LinkVaultError::storage_plugin_not_found(format!(
                    "Unknown storage backend: {}. Supported: memory, file, sqlite, postgres, mysql, mariadb",
                    backend
                )))
            }
        }
    }
}
