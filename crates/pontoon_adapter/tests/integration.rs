//! Integration tests for the plugin over the in-memory engine.

use pontoon_adapter::{BulkOperations, PluginConfig, RetryPolicy, StorePlugin};
use pontoon_store::{Document, MemoryEngine, Selector};
use pontoon_testkit::{doc, persisted_doc, populated_engine, FlakyEngine};
use std::sync::Arc;
use std::time::Duration;

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

fn plugin(engine: MemoryEngine, store: &str) -> StorePlugin {
    StorePlugin::new(Arc::new(engine), PluginConfig::new(store))
}

#[tokio::test]
async fn document_lifecycle_roundtrip() {
    init_tracing();
    let engine = MemoryEngine::new();
    let plugin = plugin(engine, "notes");

    // Admission: fresh documents only.
    let mut note = doc("note", "note-1");
    note.set("title", "groceries");
    assert!(plugin.can_add(&note));
    let prepared = plugin.prepare_additions(std::slice::from_ref(&note));
    assert!(prepared.ok);

    // Write and back-fill the store-assigned revision.
    let response = plugin
        .bulk_operations(BulkOperations {
            adds: prepared.docs,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(response.successes_count, 1);
    assert_eq!(response.errors_count, 0);

    let mut held = vec![note];
    response.apply_revisions(&mut held);
    let rev = held[0].rev().expect("back-filled revision").to_owned();
    assert_eq!(response.successes["note-1"].rev, rev);

    // The document is no longer addable.
    assert!(!plugin.can_add(&held[0]));

    // Update through the revision we hold.
    held[0].set("title", "groceries and hardware");
    let response = plugin
        .bulk_operations(BulkOperations {
            updates: held.clone(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(response.successes_count, 1);
    response.apply_revisions(&mut held);
    assert_ne!(held[0].rev(), Some(rev.as_str()));

    // Remove; the plugin shapes the tombstone itself.
    let response = plugin
        .bulk_operations(BulkOperations {
            removes: held,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(response.successes_count, 1);
    assert!(plugin.all(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn stale_update_surfaces_as_reconciled_error() {
    let engine = MemoryEngine::new();
    let plugin = plugin(engine, "notes");

    plugin
        .bulk_operations(BulkOperations {
            adds: vec![doc("note", "note-1")],
            ..Default::default()
        })
        .await
        .unwrap();

    let stale = persisted_doc("note", "note-1", "1-stale");
    let response = plugin
        .bulk_operations(BulkOperations {
            updates: vec![stale],
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(response.successes_count, 0);
    assert_eq!(response.errors_count, 1);
    let failure = &response.errors["note-1"];
    assert!(failure.error.contains("conflict"));
    // The store reports the revision the caller should have presented.
    assert!(failure.rev.is_some());
}

#[tokio::test]
async fn mixed_batch_partitions_into_both_maps() {
    let engine = populated_engine("notes", 3).await;
    let plugin = plugin(engine, "notes");

    // note-0 exists: adding it again conflicts. note-9 is new.
    let response = plugin
        .bulk_operations(BulkOperations {
            adds: vec![doc("note", "note-0"), doc("note", "note-9")],
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(response.successes_count, 1);
    assert_eq!(response.errors_count, 1);
    assert!(response.successes.contains_key("note-9"));
    assert!(response.errors.contains_key("note-0"));
    assert!(response.unattributed.is_empty());
}

#[tokio::test]
async fn attach_then_update_with_adopted_revision() {
    let engine = populated_engine("notes", 1).await;
    let plugin = plugin(engine, "notes");

    // Externally constructed document; its made-up revision is replaced
    // by the store-known one.
    let external = persisted_doc("note", "note-0", "1-external");
    let prepared = plugin
        .prepare_attachments(std::slice::from_ref(&external))
        .await
        .unwrap();
    assert!(prepared.ok);
    let attached = prepared.docs;
    assert_ne!(attached[0].rev(), Some("1-external"));

    let response = plugin
        .bulk_operations(BulkOperations {
            updates: attached,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(response.successes_count, 1);
}

#[tokio::test]
async fn detach_requires_full_identity() {
    let engine = MemoryEngine::new();
    let plugin = plugin(engine, "notes");

    let complete = persisted_doc("note", "note-1", "1-abc");
    assert!(plugin.prepare_detachments(std::slice::from_ref(&complete)).ok);

    let incomplete = doc("note", "note-2");
    let prepared = plugin.prepare_detachments(&[complete, incomplete]);
    assert!(!prepared.ok);
    assert!(prepared.docs.is_empty());
}

#[tokio::test(start_paused = true)]
async fn bulk_write_rides_out_transient_failures() {
    init_tracing();
    let flaky = FlakyEngine::new(Arc::new(MemoryEngine::new()), 2, 503);
    let plugin = StorePlugin::new(Arc::new(flaky), PluginConfig::new("notes"));

    let response = plugin
        .bulk_operations(BulkOperations {
            adds: vec![doc("note", "note-1")],
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(response.successes_count, 1);
    let docs = plugin.all(None).await.unwrap();
    assert_eq!(docs.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn bulk_write_gives_up_after_the_ceiling() {
    let flaky = FlakyEngine::new(Arc::new(MemoryEngine::new()), u32::MAX, 500);
    let plugin = StorePlugin::new(Arc::new(flaky), PluginConfig::new("notes"));

    let error = plugin
        .bulk_operations(BulkOperations {
            adds: vec![doc("note", "note-1")],
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(error.to_string().starts_with("Retry Failed. Max Wait: 2000."));
}

#[tokio::test(start_paused = true)]
async fn retry_policy_is_configurable() {
    // One injected failure with a tight ceiling: the single retry that
    // the schedule allows is enough.
    let flaky = FlakyEngine::new(Arc::new(MemoryEngine::new()), 1, 503);
    let config = PluginConfig::new("notes").with_retry(
        RetryPolicy::new()
            .with_first_wait(Duration::from_millis(1))
            .with_max_wait(Duration::from_millis(10)),
    );
    let plugin = StorePlugin::new(Arc::new(flaky), config);

    let response = plugin
        .bulk_operations(BulkOperations {
            adds: vec![doc("note", "note-1")],
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(response.successes_count, 1);
}

#[tokio::test]
async fn destroy_then_reopen_starts_empty() {
    let engine = populated_engine("notes", 4).await;
    let plugin = plugin(engine.clone(), "notes");

    plugin.destroy().await.unwrap();
    assert!(!engine.contains("notes"));

    // The next operation opens (and creates) a fresh, empty store.
    assert!(plugin.all(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn selector_reads_compose_with_the_plugin() {
    let engine = MemoryEngine::new();
    let plugin = plugin(engine, "mixed");

    plugin
        .bulk_operations(BulkOperations {
            adds: vec![doc("note", "n-1"), doc("task", "t-1"), doc("task", "t-2")],
            ..Default::default()
        })
        .await
        .unwrap();

    let tasks = plugin
        .all(Some(Selector::field("doc_type", "task")))
        .await
        .unwrap();
    assert_eq!(tasks.len(), 2);

    let by_id = plugin.get(&["n-1".into(), "t-2".into()]).await.unwrap();
    let ids: Vec<_> = by_id.iter().filter_map(Document::id).collect();
    assert_eq!(ids, vec!["n-1", "t-2"]);
}
