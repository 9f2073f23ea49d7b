//! Append-only log store
//!
//! A memory index backed by a durable JSONL log: every create appends
//! one record, and `initialize` replays the file in order to rebuild
//! the index (later records for the same short code win by map
//! overwrite). A failed append fails the create so the index never
//! runs ahead of the log. Deletions mutate only the index.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::Write;

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::errors::{LinkVaultError, Result};
use crate::storage::models::{
    BatchCreation, DeleteRequest, Link, LinkCreation, LogRecord, Presence, StoreStats,
};
use crate::storage::LinkStore;

pub struct FileStore {
    file_path: String,
    links: Mutex<HashMap<String, Link>>,
}

impl FileStore {
    pub fn new(file_path: &str) -> Self {
        FileStore {
            file_path: file_path.to_string(),
            links: Mutex::new(HashMap::new()),
        }
    }

    /// Append one record to the log. Called under the index lock so the
    /// log and the index cannot diverge.
    fn append_record(&self, record: &LogRecord) -> Result<()> {
        let line = serde_json::to_string(record)?;
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file_path)?;
        writeln!(file, "{}", line)?;
        Ok(())
    }

    fn record_for(link: &Link) -> LogRecord {
        LogRecord {
            id: link.correlation_id.clone().unwrap_or_default(),
            short_code: link.short_code.clone(),
            original_url: link.original_url.clone(),
        }
    }

    fn create_one(&self, links: &mut HashMap<String, Link>, link: Link) -> Result<LinkCreation> {
        if let Some(existing) = links.values().find(|l| l.original_url == link.original_url) {
            let mut existing = existing.clone();
            existing.presence = Presence::Present;
            existing.correlation_id = link.correlation_id;
            return Ok(LinkCreation {
                link: existing,
                deduplicated: true,
            });
        }

        self.append_record(&Self::record_for(&link))?;
        links.insert(link.short_code.clone(), link.clone());
        Ok(LinkCreation {
            link,
            deduplicated: false,
        })
    }
}

#[async_trait::async_trait]
impl LinkStore for FileStore {
    async fn create_link(&self, mut link: Link, owner_id: &str) -> Result<LinkCreation> {
        link.owner_id = owner_id.to_string();
        link.presence = Presence::Present;

        let mut links = self.links.lock();
        self.create_one(&mut links, link)
    }

    async fn create_link_batch(&self, batch: Vec<Link>, owner_id: &str) -> Result<BatchCreation> {
        let mut links = self.links.lock();
        let mut stored = Vec::with_capacity(batch.len());
        let mut deduplicated = false;

        for mut link in batch {
            link.owner_id = owner_id.to_string();
            link.presence = Presence::Present;
            let creation = self.create_one(&mut links, link)?;
            deduplicated |= creation.deduplicated;
            stored.push(creation.link);
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
        let content = match fs::read_to_string(&self.file_path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                fs::write(&self.file_path, "")?;
                info!("Created empty links log: {}", self.file_path);
                return Ok(());
            }
            Err(e) => {
                return Err(LinkVaultError::write_failure(format!(
                    "cannot read links log '{}': {}",
                    self.file_path, e
                )));
            }
        };

        let mut links = self.links.lock();
        links.clear();
        for line in content.lines().filter(|l| !l.trim().is_empty()) {
            let record: LogRecord = serde_json::from_str(line)?;
            links.insert(
                record.short_code.clone(),
                Link {
                    short_code: record.short_code,
                    original_url: record.original_url,
                    correlation_id: if record.id.is_empty() {
                        None
                    } else {
                        Some(record.id)
                    },
                    owner_id: String::new(),
                    is_deleted: false,
                    presence: Presence::Present,
                },
            );
        }

        info!("Links log replayed: {} records live", links.len());
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
        "file".to_string()
    }
}
