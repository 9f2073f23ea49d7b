//! In-memory map store
//!
//! A single mutex guards every read-modify-write sequence. Dedup is a
//! linear scan over stored values, acceptable while content volume
//! stays small. No durability.

use std::collections::{HashMap, HashSet};

use parking_lot::Mutex;
use tracing::debug;

use crate::errors::{LinkVaultError, Result};
use crate::storage::models::{
    BatchCreation, DeleteRequest, Link, LinkCreation, Presence, StoreStats,
};
use crate::storage::LinkStore;

#[derive(Default)]
pub struct MemoryStore {
    links: Mutex<HashMap<String, Link>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Guarded insert: rejects with `AlreadyExists` when any record for
    /// the URL is present. Soft-deleted records keep their claim on the
    /// URL so the dedup index stays consistent across backends.
    fn insert_guarded(links: &mut HashMap<String, Link>, link: Link) -> Result<Link> {
        if links.values().any(|l| l.original_url == link.original_url) {
            return Err(LinkVaultError::already_exists(link.original_url));
        }
        links.insert(link.short_code.clone(), link.clone());
        Ok(link)
    }

    fn find_by_url(links: &HashMap<String, Link>, original_url: &str) -> Option<Link> {
        links.values().find(|l| l.original_url == original_url).map(|l| {
            let mut link = l.clone();
            link.presence = Presence::Present;
            link
        })
    }
}

#[async_trait::async_trait]
impl LinkStore for MemoryStore {
    async fn create_link(&self, mut link: Link, owner_id: &str) -> Result<LinkCreation> {
        link.owner_id = owner_id.to_string();
        link.presence = Presence::Present;
        let correlation_id = link.correlation_id.clone();

        let mut links = self.links.lock();
        match Self::insert_guarded(&mut links, link) {
            Ok(stored) => Ok(LinkCreation {
                link: stored,
                deduplicated: false,
            }),
            Err(LinkVaultError::AlreadyExists(url)) => {
                let mut existing = Self::find_by_url(&links, &url)
                    .ok_or_else(|| LinkVaultError::validation("dedup index out of sync"))?;
                existing.correlation_id = correlation_id;
                Ok(LinkCreation {
                    link: existing,
                    deduplicated: true,
                })
            }
            Err(e) => Err(e),
        }
    }

    async fn create_link_batch(&self, batch: Vec<Link>, owner_id: &str) -> Result<BatchCreation> {
        // One lock hold for the whole batch keeps it an atomic unit.
        let mut links = self.links.lock();
        let mut stored = Vec::with_capacity(batch.len());
        let mut deduplicated = false;

        for mut link in batch {
            link.owner_id = owner_id.to_string();
            link.presence = Presence::Present;
            let correlation_id = link.correlation_id.clone();

            match Self::insert_guarded(&mut links, link) {
                Ok(created) => stored.push(created),
                Err(LinkVaultError::AlreadyExists(url)) => {
                    let mut existing = Self::find_by_url(&links, &url)
                        .ok_or_else(|| LinkVaultError::validation("dedup index out of sync"))?;
                    existing.correlation_id = correlation_id;
                    stored.push(existing);
                    deduplicated = true;
                }
                Err(e) => return Err(e),
            }
        }

        Ok(BatchCreation {
            links: stored,
            deduplicated,
        })
    }

    async fn get_link(&self, short_code: &str) -> Result<Link> {
        let links = self.links.lock();
        match links.get(short_code) {
            Some(link) => {
                let mut link = link.clone();
                link.presence = Presence::Present;
                Ok(link)
            }
            None => Ok(Link::absent()),
        }
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Link>> {
        let links = self.links.lock();
        Ok(links
            .values()
            .filter(|l| l.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn mark_deleted(&self, requests: &[DeleteRequest]) -> Result<()> {
        let mut links = self.links.lock();
        for request in requests {
            match links.get_mut(&request.short_code) {
                Some(link) if link.owner_id == request.owner_id => {
                    link.is_deleted = true;
                }
                // Unknown code or foreign owner: skipped, not an error.
                _ => {
                    debug!(
                        "mark_deleted skipped {} for owner {}",
                        request.short_code, request.owner_id
                    );
                }
            }
        }
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn initialize(&self) -> Result<()> {
        Ok(())
    }

    async fn stats(&self) -> Result<StoreStats> {
        let links = self.links.lock();
        let owners: HashSet<&str> = links.values().map(|l| l.owner_id.as_str()).collect();
        Ok(StoreStats {
            url_count: links.len() as u64,
            user_count: owners.len() as u64,
        })
    }

    fn backend_name(&self) -> String {
        "memory".to_string()
    }
}
