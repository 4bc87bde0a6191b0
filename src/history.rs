//! Saved form configurations.
//!
//! The whole list lives as one JSON array under [`STORAGE_KEY`], newest
//! entry first. [`HistoryStore`] keeps an in-memory copy and writes the
//! list back on every mutation; the in-memory list only changes once the
//! write went through.

use std::collections::HashMap;

use chrono::{TimeZone, Utc};
use uuid::Uuid;

use crate::config::STORAGE_KEY;
use crate::error::{Error, Result};
use crate::types::{FormRecord, HistoryItem};

/// String key-value storage, shaped like the browser's `localStorage`.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// In-memory store for tests and non-browser hosts.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

impl HistoryItem {
    /// The saved form, ready to be loaded back into the editor.
    pub fn record(&self) -> &FormRecord {
        &self.record
    }

    /// Creation time for display, in UTC.
    pub fn created_label(&self) -> String {
        match Utc.timestamp_millis_opt(self.created_at).single() {
            Some(created) => created.format("%b %d, %Y · %H:%M").to_string(),
            None => String::new(),
        }
    }
}

/// Decodes the stored list entry by entry, so one damaged entry only loses itself.
fn parse_items(json: &str) -> Vec<HistoryItem> {
    let entries: Vec<serde_json::Value> = match serde_json::from_str(json) {
        Ok(entries) => entries,
        Err(err) => {
            log::warn!("Failed to parse history, starting empty: {}", err);
            return Vec::new();
        }
    };

    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value(entry) {
            Ok(item) => Some(item),
            Err(err) => {
                log::warn!("Skipping unreadable history entry {}: {}", index, err);
                None
            }
        })
        .collect()
}

pub struct HistoryStore<S> {
    storage: S,
    items: Vec<HistoryItem>,
}

impl<S: KeyValueStore> HistoryStore<S> {
    /// Loads the saved list. Missing or unreadable data starts an empty history.
    pub fn open(storage: S) -> Self {
        let items = match storage.get(STORAGE_KEY) {
            Ok(Some(json)) => parse_items(&json),
            Ok(None) => Vec::new(),
            Err(err) => {
                log::warn!("Failed to read history: {}", err);
                Vec::new()
            }
        };
        log::debug!("Loaded {} history entries", items.len());

        Self { storage, items }
    }

    /// Newest first.
    pub fn items(&self) -> &[HistoryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&HistoryItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Stores `record` under `name` as the newest entry.
    pub fn save(&mut self, record: &FormRecord, name: &str) -> Result<&HistoryItem> {
        self.save_at(record, name, Utc::now().timestamp_millis())
    }

    fn save_at(&mut self, record: &FormRecord, name: &str, created_at: i64) -> Result<&HistoryItem> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::EmptyName);
        }

        let item = HistoryItem {
            id: Uuid::new_v4().to_string(),
            name: name.to_owned(),
            created_at,
            record: record.clone(),
        };
        let mut updated = Vec::with_capacity(self.items.len() + 1);
        updated.push(item);
        updated.extend(self.items.iter().cloned());
        self.commit(updated)?;

        Ok(&self.items[0])
    }

    /// Returns whether an entry was removed.
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        if self.get(id).is_none() {
            return Ok(false);
        }
        let updated = self
            .items
            .iter()
            .filter(|item| item.id != id)
            .cloned()
            .collect();
        self.commit(updated)?;
        Ok(true)
    }

    /// Returns whether an entry with `id` exists.
    pub fn rename(&mut self, id: &str, name: &str) -> Result<bool> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::EmptyName);
        }
        if self.get(id).is_none() {
            return Ok(false);
        }
        let updated = self
            .items
            .iter()
            .map(|item| {
                let mut item = item.clone();
                if item.id == id {
                    item.name = name.to_owned();
                }
                item
            })
            .collect();
        self.commit(updated)?;
        Ok(true)
    }

    /// Drops every entry and removes the storage key.
    pub fn clear(&mut self) -> Result<()> {
        self.storage.remove(STORAGE_KEY)?;
        self.items.clear();
        Ok(())
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn commit(&mut self, updated: Vec<HistoryItem>) -> Result<()> {
        let json = serde_json::to_string(&updated)?;
        self.storage.set(STORAGE_KEY, &json)?;
        self.items = updated;
        Ok(())
    }
}
