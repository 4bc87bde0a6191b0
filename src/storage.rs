use wasm_bindgen::JsValue;
use web_sys::Storage;

use crate::error::{Error, Result};
use crate::history::{KeyValueStore, MemoryStorage};

/// `window.localStorage`.
pub struct LocalStorage {
    storage: Storage,
}

impl LocalStorage {
    pub fn new() -> Result<Self> {
        let window =
            web_sys::window().ok_or_else(|| Error::Storage("no window object".to_owned()))?;
        let storage = window
            .local_storage()
            .map_err(js_error)?
            .ok_or_else(|| Error::Storage("localStorage is not available".to_owned()))?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage.get_item(key).map_err(js_error)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.storage.set_item(key, value).map_err(js_error)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.storage.remove_item(key).map_err(js_error)
    }
}

/// localStorage when the browser grants it, otherwise a history that
/// lives as long as the page.
pub fn browser_storage() -> Box<dyn KeyValueStore> {
    match LocalStorage::new() {
        Ok(storage) => Box::new(storage),
        Err(err) => {
            log::warn!("{}, history will not be persisted", err);
            Box::new(MemoryStorage::new())
        }
    }
}

fn js_error(err: JsValue) -> Error {
    Error::Storage(err.as_string().unwrap_or_else(|| format!("{:?}", err)))
}
