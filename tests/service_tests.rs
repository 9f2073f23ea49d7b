//! Service layer tests
//!
//! Exercise `LinkService` end to end over the in-memory backend: code
//! assignment, dedup semantics, resolution outcomes, ownership, and
//! the full create/resolve/delete lifecycle through the pipeline.

use std::sync::Arc;
use std::time::Duration;

use linkvault::config::DeletePipelineConfig;
use linkvault::errors::LinkVaultError;
use linkvault::services::{BatchAddItem, LinkService};
use linkvault::storage::memory::MemoryStore;
use linkvault::storage::{DeleteRequest, LinkStore};
use linkvault::utils::SHORT_CODE_LENGTH;
use tokio::sync::watch;

fn pipeline_config(flush_threshold: usize, flush_interval_secs: u64) -> DeletePipelineConfig {
    DeletePipelineConfig {
        queue_capacity: 100,
        flush_threshold,
        flush_interval_secs,
        shutdown_grace_secs: 5,
    }
}

fn service() -> (Arc<MemoryStore>, LinkService) {
    let store = Arc::new(MemoryStore::new());
    let service = LinkService::new(store.clone(), pipeline_config(10, 3600));
    (store, service)
}

#[tokio::test]
async fn add_assigns_a_code_of_expected_shape() {
    let (_, service) = service();

    let result = service.add("u1", "http://example.com").await.unwrap();
    assert!(!result.already_exists);
    assert_eq!(result.short_code.len(), SHORT_CODE_LENGTH);
    assert!(result.short_code.chars().all(|c| c.is_ascii_alphanumeric()));
}

#[tokio::test]
async fn add_rejects_empty_url() {
    let (_, service) = service();

    let err = service.add("u1", "").await.unwrap_err();
    assert!(matches!(err, LinkVaultError::Validation(_)));
}

#[tokio::test]
async fn add_is_idempotent_per_url() {
    let (_, service) = service();

    let first = service.add("u1", "http://example.com").await.unwrap();
    let second = service.add("u1", "http://example.com").await.unwrap();

    assert!(!first.already_exists);
    assert!(second.already_exists);
    assert_eq!(second.short_code, first.short_code);
}

#[tokio::test]
async fn get_resolves_live_links() {
    let (_, service) = service();

    let added = service.add("u1", "http://example.com").await.unwrap();
    let url = service.get(&added.short_code).await.unwrap();
    assert_eq!(url, "http://example.com");
}

#[tokio::test]
async fn get_distinguishes_not_found_from_deleted() {
    let (store, service) = service();

    let err = service.get("never-created").await.unwrap_err();
    assert!(matches!(err, LinkVaultError::NotFound(_)));

    let added = service.add("u1", "http://example.com").await.unwrap();
    store
        .mark_deleted(&[DeleteRequest {
            short_code: added.short_code.clone(),
            owner_id: "u1".to_string(),
        }])
        .await
        .unwrap();

    let err = service.get(&added.short_code).await.unwrap_err();
    assert!(matches!(err, LinkVaultError::Deleted(_)));
}

#[tokio::test]
async fn add_batch_preserves_order_and_correlation() {
    let (_, service) = service();

    let items = vec![
        BatchAddItem {
            correlation_id: "first".to_string(),
            original_url: "http://one.example".to_string(),
        },
        BatchAddItem {
            correlation_id: "second".to_string(),
            original_url: "http://two.example".to_string(),
        },
        BatchAddItem {
            correlation_id: "third".to_string(),
            original_url: "http://three.example".to_string(),
        },
    ];

    let outcome = service.add_batch("u1", items).await.unwrap();
    assert!(!outcome.already_exists);
    assert_eq!(outcome.results.len(), 3);
    assert_eq!(outcome.results[0].correlation_id, "first");
    assert_eq!(outcome.results[1].correlation_id, "second");
    assert_eq!(outcome.results[2].correlation_id, "third");

    // Each item got its own code.
    assert_ne!(outcome.results[0].short_code, outcome.results[1].short_code);
    assert_ne!(outcome.results[1].short_code, outcome.results[2].short_code);
}

#[tokio::test]
async fn add_batch_dedups_against_earlier_single_adds() {
    let (_, service) = service();

    let single = service.add("u1", "http://shared.example").await.unwrap();

    let items = vec![
        BatchAddItem {
            correlation_id: "a".to_string(),
            original_url: "http://fresh.example".to_string(),
        },
        BatchAddItem {
            correlation_id: "b".to_string(),
            original_url: "http://shared.example".to_string(),
        },
    ];

    let outcome = service.add_batch("u1", items).await.unwrap();
    assert!(outcome.already_exists);
    assert_eq!(outcome.results[1].short_code, single.short_code);
    assert_eq!(outcome.results[1].correlation_id, "b");
}

#[tokio::test]
async fn add_batch_dedups_within_itself() {
    let (_, service) = service();

    let items = vec![
        BatchAddItem {
            correlation_id: "a".to_string(),
            original_url: "http://same.example".to_string(),
        },
        BatchAddItem {
            correlation_id: "b".to_string(),
            original_url: "http://same.example".to_string(),
        },
    ];

    let outcome = service.add_batch("u1", items).await.unwrap();
    assert!(outcome.already_exists);
    assert_eq!(outcome.results[0].short_code, outcome.results[1].short_code);
}

#[tokio::test]
async fn list_owned_is_scoped_to_the_owner() {
    let (_, service) = service();

    service.add("alice", "http://a.example").await.unwrap();
    service.add("alice", "http://b.example").await.unwrap();
    service.add("bob", "http://c.example").await.unwrap();

    let alice = service.list_owned("alice").await.unwrap();
    assert_eq!(alice.len(), 2);
    assert!(alice.iter().all(|l| l.owner_id == "alice"));

    let nobody = service.list_owned("carol").await.unwrap();
    assert!(nobody.is_empty());
}

#[tokio::test]
async fn stats_counts_urls_and_owners() {
    let (_, service) = service();

    service.add("u1", "http://a.example").await.unwrap();
    service.add("u1", "http://b.example").await.unwrap();
    service.add("u2", "http://c.example").await.unwrap();
    // Duplicate: no new record.
    service.add("u2", "http://a.example").await.unwrap();

    let stats = service.stats().await.unwrap();
    assert_eq!(stats.url_count, 3);
    assert_eq!(stats.user_count, 2);

    service.ping().await.unwrap();
}

#[tokio::test]
async fn delete_worker_cannot_be_started_twice() {
    let (_, service) = service();

    let (_shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = service.start_delete_worker(shutdown_rx.clone()).unwrap();

    let err = service.start_delete_worker(shutdown_rx).unwrap_err();
    assert!(matches!(err, LinkVaultError::Validation(_)));

    handle.abort();
}

#[tokio::test]
async fn full_lifecycle_through_the_pipeline() {
    let store = Arc::new(MemoryStore::new());
    // Threshold of one so every enqueued deletion flushes immediately.
    let service = LinkService::new(store.clone(), pipeline_config(1, 3600));

    let (_shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = service.start_delete_worker(shutdown_rx).unwrap();

    let added = service.add("u1", "http://example.com").await.unwrap();
    assert_eq!(service.get(&added.short_code).await.unwrap(), "http://example.com");

    service
        .enqueue_delete(DeleteRequest {
            short_code: added.short_code.clone(),
            owner_id: "u1".to_string(),
        })
        .await
        .unwrap();

    // Deletion is asynchronous; poll until the flush lands.
    let mut deleted = false;
    for _ in 0..100 {
        match service.get(&added.short_code).await {
            Err(LinkVaultError::Deleted(_)) => {
                deleted = true;
                break;
            }
            _ => tokio::time::sleep(Duration::from_millis(10)).await,
        }
    }
    assert!(deleted, "enqueued deletion never became visible");

    // The same URL still resolves to its (now deleted) record.
    let again = service.add("u1", "http://example.com").await.unwrap();
    assert!(again.already_exists);
    assert_eq!(again.short_code, added.short_code);

    handle.abort();
}
