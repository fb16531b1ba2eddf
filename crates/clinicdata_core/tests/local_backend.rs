use clinicdata_core::seed::{seed_content, seed_rates};
use clinicdata_core::storage::{CONTENT_KEY, RATES_KEY};
use clinicdata_core::{
    DataBackend, DataError, KeyValueStore, LocalBackend, MemoryKeyValueStore, NewRate, RateItem,
    RatePatch, SectionContent, StorageError, WebContent, validate_sequence,
};
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::Arc;

fn local() -> (Arc<MemoryKeyValueStore>, LocalBackend) {
    let store = Arc::new(MemoryKeyValueStore::new());
    let backend = LocalBackend::new(store.clone());
    (store, backend)
}

fn stored(store: &MemoryKeyValueStore, key: &str) -> Value {
    let raw = store.get(key).unwrap().expect("slot should be written");
    serde_json::from_str(&raw).expect("slot should hold valid json")
}

fn rate_json(id: &str, name: &str, price: f64, active: bool) -> Value {
    json!({
        "id": id,
        "test_name": name,
        "price": price,
        "category": "Blood Tests",
        "description": null,
        "is_active": active
    })
}

#[tokio::test]
async fn absent_slot_is_seeded_and_persisted() {
    let (store, backend) = local();
    assert!(store.get(RATES_KEY).unwrap().is_none());

    let rates = backend.list_rates().await.unwrap();

    assert_eq!(rates, seed_rates().unwrap());
    let persisted = stored(&store, RATES_KEY);
    assert_eq!(persisted.as_array().unwrap().len(), rates.len());
}

#[tokio::test]
async fn unparsable_slot_is_overwritten_with_seed() {
    let (store, backend) = local();
    store.set(RATES_KEY, "{not json").unwrap();

    let rates = backend.list_rates().await.unwrap();

    assert_eq!(rates, seed_rates().unwrap());
    assert!(stored(&store, RATES_KEY).is_array());
}

#[tokio::test]
async fn one_invalid_element_is_dropped_and_cleaned_slot_persisted() {
    let (store, backend) = local();
    let slot = json!([
        rate_json("a", "CBC", 350.0, true),
        rate_json("b", "Broken", -5.0, true),
        rate_json("c", "ESR", 150.0, false),
    ]);
    store.set(RATES_KEY, &slot.to_string()).unwrap();

    let first = backend.list_rates().await.unwrap();
    let ids: Vec<_> = first.iter().map(|rate| rate.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "c"]);

    let raw_after_first = store.get(RATES_KEY).unwrap();
    let second = backend.list_rates().await.unwrap();
    assert_eq!(second, first);
    assert_eq!(store.get(RATES_KEY).unwrap(), raw_after_first);
    assert_eq!(stored(&store, RATES_KEY).as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn slot_without_any_valid_element_falls_back_to_seed() {
    let (store, backend) = local();
    let broken = json!([{ "test_name": "" }, 42]).to_string();
    store.set(RATES_KEY, &broken).unwrap();

    assert_eq!(backend.list_rates().await.unwrap(), seed_rates().unwrap());

    assert_ne!(store.get(RATES_KEY).unwrap().as_deref(), Some(broken.as_str()));
    let persisted: Vec<RateItem> = validate_sequence(&stored(&store, RATES_KEY)).unwrap();
    assert_eq!(persisted, seed_rates().unwrap());
}

#[tokio::test]
async fn invalid_content_block_is_dropped_and_cleaned_slot_persisted() {
    let (store, backend) = local();
    let mut blocks = serde_json::to_value(seed_content().unwrap()).unwrap();
    let total = blocks.as_array().unwrap().len();
    blocks[1]["section"] = json!("");
    let broken_id = blocks[1]["id"].as_str().unwrap().to_string();
    store.set(CONTENT_KEY, &blocks.to_string()).unwrap();

    let listed = backend.list_content().await.unwrap();

    assert_eq!(listed.len(), total - 1);
    assert!(listed.iter().all(|block| block.id != broken_id));
    let persisted: Vec<WebContent> = validate_sequence(&stored(&store, CONTENT_KEY)).unwrap();
    assert_eq!(persisted, listed);
    assert_eq!(backend.list_content().await.unwrap(), listed);
}

#[tokio::test]
async fn non_sequence_slot_falls_back_to_seed() {
    let (store, backend) = local();
    store.set(CONTENT_KEY, r#"{"hero":"x"}"#).unwrap();

    assert_eq!(backend.list_content().await.unwrap(), seed_content().unwrap());
}

#[tokio::test]
async fn valid_slot_applies_defaults_without_rewriting() {
    let (store, backend) = local();
    let raw = json!([{ "id": "a", "test_name": "CBC", "price": 1, "category": "Blood" }]).to_string();
    store.set(RATES_KEY, &raw).unwrap();

    let rates = backend.list_rates().await.unwrap();

    assert_eq!(rates.len(), 1);
    assert!(rates[0].is_active);
    assert_eq!(rates[0].description, None);
    assert_eq!(store.get(RATES_KEY).unwrap().as_deref(), Some(raw.as_str()));
}

#[tokio::test]
async fn fetch_active_is_ordered_subset_of_list() {
    let (store, backend) = local();
    let slot = json!([
        rate_json("a", "A", 1.0, true),
        rate_json("b", "B", 2.0, false),
        rate_json("c", "C", 3.0, true),
        rate_json("d", "D", 4.0, false),
        rate_json("e", "E", 5.0, true),
    ]);
    store.set(RATES_KEY, &slot.to_string()).unwrap();

    let all = backend.list_rates().await.unwrap();
    let active = backend.fetch_active_rates().await.unwrap();

    let expected: Vec<RateItem> = all.iter().filter(|rate| rate.is_active).cloned().collect();
    assert_eq!(active, expected);
    assert_eq!(
        active.iter().map(|rate| rate.id.as_str()).collect::<Vec<_>>(),
        vec!["a", "c", "e"]
    );
}

#[tokio::test]
async fn empty_storage_fetch_active_returns_active_seed_records() {
    let (_store, backend) = local();

    let active = backend.fetch_active_rates().await.unwrap();

    let expected: Vec<RateItem> = seed_rates()
        .unwrap()
        .into_iter()
        .filter(|rate| rate.is_active)
        .collect();
    assert!(!expected.is_empty());
    assert_eq!(active, expected);
}

#[tokio::test]
async fn add_rate_prepends_with_fresh_id() {
    let (_store, backend) = local();
    let before = backend.list_rates().await.unwrap();
    let existing: HashSet<String> = before.iter().map(|rate| rate.id.clone()).collect();

    let payload = NewRate {
        test_name: "Serum Creatinine".to_string(),
        price: 275.5,
        category: "Blood Tests".to_string(),
        description: Some("Kidney function".to_string()),
        is_active: false,
    };
    backend.add_rate(payload.clone()).await.unwrap();

    let after = backend.list_rates().await.unwrap();
    assert_eq!(after.len(), before.len() + 1);
    let added = &after[0];
    assert!(!existing.contains(&added.id));
    assert_eq!(added.test_name, payload.test_name);
    assert_eq!(added.price, payload.price);
    assert_eq!(added.category, payload.category);
    assert_eq!(added.description, payload.description);
    assert!(!added.is_active);
    assert_eq!(&after[1..], &before[..]);
}

#[tokio::test]
async fn add_rate_with_invalid_payload_is_rejected_without_write() {
    let (store, backend) = local();
    backend.list_rates().await.unwrap();
    let raw_before = store.get(RATES_KEY).unwrap();

    let err = backend
        .add_rate(NewRate::new("Broken", -10.0, "Blood Tests"))
        .await
        .unwrap_err();

    assert!(matches!(err, DataError::Validation(_)));
    assert_eq!(store.get(RATES_KEY).unwrap(), raw_before);
}

#[tokio::test]
async fn update_rate_changes_only_supplied_field() {
    let (_store, backend) = local();
    let before = backend.list_rates().await.unwrap();
    let target = before[1].id.clone();

    backend
        .update_rate(
            &target,
            RatePatch {
                price: Some(500.0),
                ..RatePatch::default()
            },
        )
        .await
        .unwrap();

    let after = backend.list_rates().await.unwrap();
    assert_eq!(after.len(), before.len());
    for (old, new) in before.iter().zip(after.iter()) {
        if old.id == target {
            let mut expected = old.clone();
            expected.price = 500.0;
            assert_eq!(new, &expected);
        } else {
            assert_eq!(new, old);
        }
    }
}

#[tokio::test]
async fn update_rate_with_unknown_id_is_silent_noop() {
    let (_store, backend) = local();
    let before = backend.list_rates().await.unwrap();

    backend
        .update_rate(
            "missing",
            RatePatch {
                is_active: Some(false),
                ..RatePatch::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(backend.list_rates().await.unwrap(), before);
}

#[tokio::test]
async fn update_rate_rejects_patch_that_breaks_schema() {
    let (_store, backend) = local();
    let before = backend.list_rates().await.unwrap();

    let err = backend
        .update_rate(
            &before[0].id,
            RatePatch {
                test_name: Some(String::new()),
                ..RatePatch::default()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, DataError::Validation(_)));
    assert_eq!(backend.list_rates().await.unwrap(), before);
}

#[tokio::test]
async fn delete_rate_removes_exactly_one_and_repeats_as_noop() {
    let (_store, backend) = local();
    let before = backend.list_rates().await.unwrap();
    let target = before[0].id.clone();

    backend.delete_rate(&target).await.unwrap();
    backend.delete_rate(&target).await.unwrap();

    let after = backend.list_rates().await.unwrap();
    assert_eq!(after.len(), before.len() - 1);
    assert!(after.iter().all(|rate| rate.id != target));
    assert_eq!(&after[..], &before[1..]);
}

#[tokio::test]
async fn save_of_listed_records_round_trips() {
    let (_store, backend) = local();
    let listed = backend.load::<RateItem>().unwrap();

    let written = backend.save(&listed).unwrap();

    assert_eq!(written, listed);
    assert_eq!(backend.load::<RateItem>().unwrap(), listed);
}

#[tokio::test]
async fn save_drops_invalid_elements_instead_of_writing_them() {
    let (store, backend) = local();
    let mut records = seed_rates().unwrap();
    records[0].category = String::new();

    let written = backend.save(&records).unwrap();

    assert_eq!(written.len(), records.len() - 1);
    assert_eq!(stored(&store, RATES_KEY).as_array().unwrap().len(), written.len());
}

#[tokio::test]
async fn content_add_stamps_local_actor_and_prepends() {
    let (_store, backend) = local();
    let before = backend.list_content().await.unwrap();

    let content = SectionContent {
        title: Some("Home collection".to_string()),
        ..SectionContent::default()
    };
    backend
        .add_content("home_collection".to_string(), content.clone())
        .await
        .unwrap();

    let after = backend.list_content().await.unwrap();
    assert_eq!(after.len(), before.len() + 1);
    let added: &WebContent = &after[0];
    assert_eq!(added.section, "home_collection");
    assert_eq!(added.content, content);
    assert_eq!(added.updated_by.as_deref(), Some("local"));
    assert!(chrono::DateTime::parse_from_rfc3339(&added.updated_at).is_ok());
}

#[tokio::test]
async fn content_update_replaces_payload_wholesale() {
    let (_store, backend) = local();
    let before = backend.list_content().await.unwrap();
    let target = before
        .iter()
        .find(|block| block.content.button_text.is_some())
        .expect("seed has a block with a button")
        .clone();

    let replacement = SectionContent {
        title: Some("New title".to_string()),
        ..SectionContent::default()
    };
    backend
        .update_content(&target.id, "landing".to_string(), replacement.clone())
        .await
        .unwrap();

    let after = backend.list_content().await.unwrap();
    let updated = after.iter().find(|block| block.id == target.id).unwrap();
    assert_eq!(updated.section, "landing");
    assert_eq!(updated.content, replacement);
    assert_eq!(updated.content.button_text, None);
    assert_ne!(updated.updated_at, target.updated_at);
    assert_eq!(updated.updated_by.as_deref(), Some("local"));
}

#[tokio::test]
async fn content_delete_removes_block() {
    let (_store, backend) = local();
    let before = backend.list_content().await.unwrap();

    backend.delete_content(&before[0].id).await.unwrap();

    assert_eq!(backend.list_content().await.unwrap(), before[1..].to_vec());
}

struct ReadOnlyStore;

impl KeyValueStore for ReadOnlyStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::AccessDenied("read-only medium".to_string()))
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::AccessDenied("read-only medium".to_string()))
    }
}

#[tokio::test]
async fn storage_errors_propagate_to_caller() {
    let backend = LocalBackend::new(Arc::new(ReadOnlyStore));

    let err = backend.list_rates().await.unwrap_err();

    assert!(matches!(
        err,
        DataError::Storage(StorageError::AccessDenied(_))
    ));
}

#[tokio::test]
async fn quota_exceeded_surfaces_as_storage_failure() {
    let backend = LocalBackend::new(Arc::new(MemoryKeyValueStore::with_quota(32)));

    let err = backend.list_content().await.unwrap_err();

    assert!(matches!(
        err,
        DataError::Storage(StorageError::QuotaExceeded { .. })
    ));
}
