//! Browser-only checks, run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

use qr_studio::config::STORAGE_KEY;
use qr_studio::storage::LocalStorage;
use qr_studio::{encode, FormRecord, HistoryStore, KeyValueStore, QrType};

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn history_survives_in_local_storage() {
    let mut storage = LocalStorage::new().unwrap();
    storage.remove(STORAGE_KEY).unwrap();

    let record = FormRecord {
        kind: QrType::Phone,
        phone: "+43 1 234".to_owned(),
        ..FormRecord::default()
    };
    let mut store = HistoryStore::open(storage);
    store.save(&record, "Office").unwrap();

    let reopened = HistoryStore::open(LocalStorage::new().unwrap());
    assert_eq!(reopened.len(), 1);
    assert_eq!(reopened.items()[0].name, "Office");
    assert_eq!(encode(&reopened.items()[0].record), "tel:+43 1 234");

    let mut cleared = reopened;
    cleared.clear().unwrap();
    assert!(LocalStorage::new().unwrap().get(STORAGE_KEY).unwrap().is_none());
}
