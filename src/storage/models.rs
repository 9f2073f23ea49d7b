use serde::{Deserialize, Serialize};

/// Tri-state lookup outcome, distinguishing "never created" from "found".
/// Records that have not been through a lookup carry `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    Present,
    Absent,
    #[default]
    Unknown,
}

/// The unit of persistence: one short-code to original-URL mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Opaque unique identifier, assigned at creation. Primary key.
    pub short_code: String,
    /// The long URL. Content-unique within a store.
    pub original_url: String,
    /// Caller-supplied label matching batch requests to batch responses.
    /// Not unique, never used for lookup.
    #[serde(default)]
    pub correlation_id: Option<String>,
    /// Principal that created the record. Fixed for the record's lifetime.
    #[serde(default)]
    pub owner_id: String,
    /// Soft-delete flag. The row outlives the deletion so the dedup
    /// index stays consistent.
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default)]
    pub presence: Presence,
}

impl Link {
    /// Zero-value link reported for lookups that found nothing.
    pub fn absent() -> Self {
        Link {
            presence: Presence::Absent,
            ..Link::default()
        }
    }

    pub fn is_live(&self) -> bool {
        !self.is_deleted
    }
}

/// Outcome of a single create: the stored record, plus whether it was
/// substituted from an existing record instead of freshly inserted.
#[derive(Debug, Clone)]
pub struct LinkCreation {
    pub link: Link,
    pub deduplicated: bool,
}

/// Outcome of a batch create. `links` has the same length and order as
/// the input; `deduplicated` is set when at least one item was
/// substituted from an existing record.
#[derive(Debug, Clone)]
pub struct BatchCreation {
    pub links: Vec<Link>,
    pub deduplicated: bool,
}

/// One soft-delete target, scoped to its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteRequest {
    pub short_code: String,
    pub owner_id: String,
}

/// Best-effort aggregate counts. Backends without cheap counting may
/// report zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub url_count: u64,
    pub user_count: u64,
}

/// One record of the append-only log, in the persisted wire format.
/// Replayed in file order at startup; later records for the same short
/// code win by map overwrite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecord {
    #[serde(rename = "uuid", default)]
    pub id: String,
    #[serde(rename = "short_url")]
    pub short_code: String,
    pub original_url: String,
}
