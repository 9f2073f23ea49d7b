//! SeaORM storage backend
//!
//! Relational store over SQLite, MySQL/MariaDB, and PostgreSQL. Content
//! dedup is enforced by the unique index on `original_url` at the
//! storage layer itself; no application-level lock is held, the
//! database's transaction isolation does the coordination.

mod connection;
mod converters;
mod operations;

use sea_orm::DatabaseConnection;
use tracing::info;

use crate::errors::{LinkVaultError, Result};
use crate::storage::models::{
    BatchCreation, DeleteRequest, Link, LinkCreation, StoreStats,
};
use crate::storage::LinkStore;

pub use connection::{connect_generic, connect_sqlite, run_migrations};
pub use converters::{link_to_active_model, model_to_link};

#[derive(Clone)]
pub struct SeaOrmStore {
    db: DatabaseConnection,
    backend_name: String,
}

impl SeaOrmStore {
    pub async fn new(database_url: &str, backend_name: &str) -> Result<Self> {
        if database_url.is_empty() {
            return Err(LinkVaultError::database_config("DATABASE_URL is not set"));
        }

        let db = if backend_name == "sqlite" {
            connect_sqlite(database_url).await?
        } else {
            connect_generic(database_url, backend_name).await?
        };

        info!("{} store connected", backend_name.to_uppercase());
        Ok(SeaOrmStore {
            db,
            backend_name: backend_name.to_string(),
        })
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait::async_trait]
impl LinkStore for SeaOrmStore {
    async fn create_link(&self, link: Link, owner_id: &str) -> Result<LinkCreation> {
        operations::create_link(&self.db, link, owner_id).await
    }

    async fn create_link_batch(&self, links: Vec<Link>, owner_id: &str) -> Result<BatchCreation> {
        operations::create_link_batch(&self.db, links, owner_id).await
    }

    async fn get_link(&self, short_code: &str) -> Result<Link> {
        operations::get_link(&self.db, short_code).await
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Link>> {
        operations::list_by_owner(&self.db, owner_id).await
    }

    async fn mark_deleted(&self, requests: &[DeleteRequest]) -> Result<()> {
        operations::mark_deleted(&self.db, requests).await
    }

    async fn ping(&self) -> Result<()> {
        self.db
            .ping()
            .await
            .map_err(|e| LinkVaultError::backend_unavailable(e.to_string()))
    }

    async fn initialize(&self) -> Result<()> {
        run_migrations(&self.db).await
    }

    async fn stats(&self) -> Result<StoreStats> {
        operations::stats(&self.db).await
    }

    fn backend_name(&self) -> String {
        self.backend_name.clone()
    }
}
