//! The cart: staged operations waiting for submission, saved after every change.
use super::error::StorageError;
use super::operation::StagedOperation;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Durable slot the cart is saved to and restored from.
pub trait CartStore {
    /// Absent data loads as an empty cart.
    fn load(&self) -> Result<Vec<StagedOperation>, StorageError>;
    fn save(&self, entries: &[StagedOperation]) -> Result<(), StorageError>;
}

pub fn encode_entries(entries: &[StagedOperation]) -> Result<String, StorageError> {
    Ok(serde_json::to_string(entries)?)
}

pub fn decode_entries(raw: &str) -> Result<Vec<StagedOperation>, StorageError> {
    Ok(serde_json::from_str(raw)?)
}

/// In-process slot holding the same JSON text a browser would keep. Clones share the slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryCartStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryCartStore {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_raw(raw: &str) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(raw.to_string()))),
        }
    }
    pub fn raw(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }
}

impl CartStore for MemoryCartStore {
    fn load(&self) -> Result<Vec<StagedOperation>, StorageError> {
        match self.raw() {
            Some(raw) => decode_entries(&raw),
            None => Ok(Vec::new()),
        }
    }
    fn save(&self, entries: &[StagedOperation]) -> Result<(), StorageError> {
        let raw = encode_entries(entries)?;
        let mut slot = self
            .slot
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        *slot = Some(raw);
        Ok(())
    }
}

#[derive(Debug)]
pub struct Cart<S: CartStore> {
    entries: Vec<StagedOperation>,
    store: S,
}

impl<S: CartStore> Cart<S> {
    /// Reload the cart from `store`. A corrupt or unreadable slot gives an empty cart.
    pub fn restore(store: S) -> Self {
        let entries = store.load().unwrap_or_else(|e| {
            warn!(error = %e, "discarding unreadable cart");
            Vec::new()
        });
        debug!(entries = entries.len(), "cart restored");

        Self { entries, store }
    }
    pub fn entries(&self) -> &[StagedOperation] {
        &self.entries
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|entry| entry.total_cost).sum()
    }
    pub fn add(&mut self, entry: StagedOperation) {
        self.entries.push(entry);
        self.persist();
    }
    /// Returns whether an entry was removed; an unknown key changes nothing.
    pub fn remove_by_key(&mut self, key: &str) -> bool {
        let Some(index) = self.entries.iter().position(|entry| entry.key == key) else {
            return false;
        };
        self.entries.remove(index);
        self.persist();
        true
    }
    pub fn clear(&mut self) {
        self.entries.clear();
        self.persist();
    }
    /// Drop the first `count` entries once they have been turned into orders.
    pub fn drop_submitted(&mut self, count: usize) {
        let count = count.min(self.entries.len());
        if count == 0 {
            return;
        }
        self.entries.drain(..count);
        self.persist();
    }

    /// Save the entries; a failed save is logged and otherwise ignored.
    pub fn persist(&self) {
        if let Err(e) = self.store.save(&self.entries) {
            warn!(error = %e, "cart could not be saved");
        }
    }
}
