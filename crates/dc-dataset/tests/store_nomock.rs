//! No-mock storage tests.
//!
//! Exercises the full segment → serialize → store → label path on a real
//! temporary directory:
//! - Primary and version copies are byte-identical
//! - Same tag within the same second overwrites under `overwrite`
//! - Both datasets survive under `suffix`
//! - Labeling a new filename preserves existing entries
//! - Unsafe filenames are rejected before anything is written

use chrono::{NaiveDate, NaiveDateTime};
use dc_dataset::{
    parse_jsonl, segment, CollisionPolicy, DatasetError, LabelStore, Serializer, StoreLayout,
    TagPolicy, VersionStore,
};
use tempfile::TempDir;

// ============================================================================
// Helpers
// ============================================================================

fn fixed_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 11, 2)
        .expect("date")
        .and_hms_opt(14, 30, 22)
        .expect("time")
}

fn store_text(store: &VersionStore, text: &str, tag: &str) -> dc_dataset::StoreReceipt {
    let records = segment(text, tag);
    let artifact = Serializer::default()
        .serialize_at(&records, tag, fixed_time())
        .expect("serialize");
    store
        .store(&artifact.content, &artifact.filename)
        .expect("store")
}

fn count_files(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}

// ============================================================================
// Store
// ============================================================================

#[test]
fn stored_dataset_round_trips() {
    let dir = TempDir::new().expect("tempdir");
    let store = VersionStore::new(StoreLayout::new(dir.path()));

    let receipt = store_text(&store, "Q1\nA1\nQ2\nA2\nQ3", "grief support");
    assert_eq!(receipt.filename, "grief_support_20241102_143022.jsonl");
    assert!(receipt.primary_path.starts_with(dir.path().join("saved_datasets")));
    assert!(receipt.versioned_path.starts_with(dir.path().join("versioned_datasets")));

    let content = store.read(&receipt.filename).expect("read");
    let records = parse_jsonl(&content).expect("parse");
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].prompt, "Q2");
    assert_eq!(records[1].tag, "grief support");
}

#[test]
fn empty_dataset_is_still_stored() {
    let dir = TempDir::new().expect("tempdir");
    let store = VersionStore::new(StoreLayout::new(dir.path()));
    let receipt = store_text(&store, "only one paragraph", "t");
    assert_eq!(receipt.bytes, 0);
    assert_eq!(std::fs::read(&receipt.versioned_path).expect("mirror"), b"");
}

#[test]
fn same_second_collision_overwrites() {
    let dir = TempDir::new().expect("tempdir");
    let store = VersionStore::new(StoreLayout::new(dir.path()));

    let first = store_text(&store, "a\nb", "t");
    let second = store_text(&store, "c\nd", "t");

    assert_eq!(first.filename, second.filename);
    assert_eq!(count_files(&dir.path().join("saved_datasets")), 1);
    let records = parse_jsonl(&store.read(&second.filename).expect("read")).expect("parse");
    assert_eq!(records[0].prompt, "c");
}

#[test]
fn same_second_collision_suffixes() {
    let dir = TempDir::new().expect("tempdir");
    let store =
        VersionStore::new(StoreLayout::new(dir.path())).with_collision(CollisionPolicy::Suffix);

    let first = store_text(&store, "a\nb", "t");
    let second = store_text(&store, "c\nd", "t");
    let third = store_text(&store, "e\nf", "t");

    assert_eq!(first.filename, "t_20241102_143022.jsonl");
    assert_eq!(second.filename, "t_20241102_143022_1.jsonl");
    assert_eq!(third.filename, "t_20241102_143022_2.jsonl");
    assert_eq!(count_files(&dir.path().join("saved_datasets")), 3);
    assert_eq!(count_files(&dir.path().join("versioned_datasets")), 3);
}

#[test]
fn suffix_checks_version_directory_too() {
    let dir = TempDir::new().expect("tempdir");
    let store =
        VersionStore::new(StoreLayout::new(dir.path())).with_collision(CollisionPolicy::Suffix);

    let first = store_text(&store, "a\nb", "t");
    std::fs::remove_file(&first.primary_path).expect("remove primary");

    let second = store_text(&store, "c\nd", "t");
    assert_ne!(first.filename, second.filename);
}

#[test]
fn provision_creates_backup_dir_and_leaves_it_empty() {
    let dir = TempDir::new().expect("tempdir");
    let store = VersionStore::new(StoreLayout::new(dir.path()));
    store.provision().expect("provision");
    store_text(&store, "a\nb", "t");

    assert!(dir.path().join("saved_datasets").is_dir());
    assert!(dir.path().join("versioned_datasets").is_dir());
    assert!(dir.path().join("backup_datasets").is_dir());
    assert_eq!(count_files(&dir.path().join("backup_datasets")), 0);
}

#[test]
fn compat_tag_with_separator_is_rejected() {
    let dir = TempDir::new().expect("tempdir");
    let store = VersionStore::new(StoreLayout::new(dir.path()));
    let artifact = Serializer::new(TagPolicy::Compat)
        .serialize_at(&segment("a\nb", "../escape"), "../escape", fixed_time())
        .expect("serialize");

    let err = store
        .store(&artifact.content, &artifact.filename)
        .expect_err("must reject");
    assert!(matches!(err, DatasetError::UnsafeFilename(_)));
    assert_eq!(count_files(dir.path()), 0);
}

#[test]
fn strict_tag_with_separator_is_stored_inside_root() {
    let dir = TempDir::new().expect("tempdir");
    let store = VersionStore::new(StoreLayout::new(dir.path()));
    let artifact = Serializer::new(TagPolicy::Strict)
        .serialize_at(&segment("a\nb", "../escape"), "../escape", fixed_time())
        .expect("serialize");

    let receipt = store
        .store(&artifact.content, &artifact.filename)
        .expect("store");
    assert_eq!(receipt.filename, "__escape_20241102_143022.jsonl");
    assert_eq!(receipt.primary_path.parent(), Some(dir.path().join("saved_datasets").as_path()));
}

// ============================================================================
// Labels
// ============================================================================

#[test]
fn new_label_preserves_existing_entries() {
    let dir = TempDir::new().expect("tempdir");
    let layout = StoreLayout::new(dir.path());
    let labels = LabelStore::new(layout.labels_path());

    labels.label_version("a_20240101_000000.jsonl", "baseline").expect("label a");
    labels.label_version("b_20240102_000000.jsonl", "v2").expect("label b");

    let map = labels.load().expect("load");
    assert_eq!(map.len(), 2);
    assert_eq!(map["a_20240101_000000.jsonl"], "baseline");
    assert_eq!(map["b_20240102_000000.jsonl"], "v2");
}

#[test]
fn label_store_rereads_file_before_write() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("version_labels.json");
    let first = LabelStore::new(&path);
    let second = LabelStore::new(&path);

    first.label_version("a.jsonl", "one").expect("first");
    second.label_version("b.jsonl", "two").expect("second");
    first.label_version("c.jsonl", "three").expect("third");

    assert_eq!(first.load().expect("load").len(), 3);
}

#[test]
fn concurrent_labels_in_process_are_not_lost() {
    let dir = TempDir::new().expect("tempdir");
    let labels = std::sync::Arc::new(LabelStore::new(dir.path().join("version_labels.json")));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let labels = labels.clone();
            std::thread::spawn(move || {
                labels
                    .label_version(&format!("f{}.jsonl", i), &format!("label {}", i))
                    .expect("label");
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("join");
    }

    assert_eq!(labels.load().expect("load").len(), 8);
}

#[test]
fn concurrent_label_stores_on_one_file_are_serialized() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("version_labels.json");

    for round in 0..10 {
        let barrier = std::sync::Arc::new(std::sync::Barrier::new(8));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let path = path.clone();
                let barrier = barrier.clone();
                std::thread::spawn(move || {
                    let labels = LabelStore::new(path);
                    barrier.wait();
                    labels.label_version(&format!("r{}_f{}.jsonl", round, i), "label")
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("join").expect("label");
        }
    }

    assert_eq!(LabelStore::new(&path).load().expect("load").len(), 80);
    assert_eq!(count_files(dir.path()), 1);
}
