//! Core PersistedCollectionStore implementation

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::item::Keyed;
use crate::observer::{Change, ChangeKind, Observers, SubscriptionId};
use crate::slot::DurableSlot;

/// Ordered collection of uniquely keyed items mirrored to a durable slot.
///
/// Every mutating call rewrites the whole collection to the slot and then
/// notifies observers, including calls that leave the items unchanged
/// (a duplicate `add`, a `remove` of an absent key).
pub struct PersistedCollectionStore<T: Keyed, S> {
    slot: S,
    key: String,
    items: Vec<T>,
    observers: Observers<T>,
}

impl<T, S> PersistedCollectionStore<T, S>
where
    T: Keyed + Serialize + DeserializeOwned,
    S: DurableSlot,
{
    /// Open a store over `slot`, hydrating from the value under `key`.
    ///
    /// An absent or unparsable value yields an empty collection. Only a
    /// failure to read the slot at all is returned as an error.
    pub fn open(slot: S, key: impl Into<String>) -> StoreResult<Self> {
        let key = key.into();
        let items = hydrate(&slot, &key)?;
        info!(key, count = items.len(), "Opened collection");
        Ok(Self {
            slot,
            key,
            items,
            observers: Observers::new(),
        })
    }

    /// Append `item` unless its key is already present. Returns whether it was inserted.
    pub fn add(&mut self, item: T) -> StoreResult<bool> {
        let key = item.key().clone();
        let inserted = !self.contains(&key);
        if inserted {
            self.items.push(item);
        }

        let kind = if inserted {
            ChangeKind::Added(key)
        } else {
            ChangeKind::Unchanged(key)
        };
        self.commit(kind)?;
        Ok(inserted)
    }

    /// Remove the item under `key`, returning it if it was present
    pub fn remove(&mut self, key: &T::Key) -> StoreResult<Option<T>> {
        let removed = self.position(key).map(|idx| self.items.remove(idx));

        let kind = if removed.is_some() {
            ChangeKind::Removed(key.clone())
        } else {
            ChangeKind::Missing(key.clone())
        };
        self.commit(kind)?;
        Ok(removed)
    }

    /// Remove `item` if its key is present, otherwise add it. Returns whether it is now present.
    pub fn toggle(&mut self, item: T) -> StoreResult<bool> {
        let key = item.key().clone();
        if let Some(idx) = self.position(&key) {
            self.items.remove(idx);
            self.commit(ChangeKind::Removed(key))?;
            Ok(false)
        } else {
            self.items.push(item);
            self.commit(ChangeKind::Added(key))?;
            Ok(true)
        }
    }

    /// Empty the collection
    pub fn clear(&mut self) -> StoreResult<()> {
        self.items.clear();
        self.commit(ChangeKind::Cleared)
    }

    /// Replace in-memory state with the slot's current value
    pub fn reload(&mut self) -> StoreResult<()> {
        self.items = hydrate(&self.slot, &self.key)?;
        self.observers.notify(&Change {
            kind: ChangeKind::Reloaded,
            items: &self.items,
        });
        Ok(())
    }

    pub fn contains(&self, key: &T::Key) -> bool {
        self.position(key).is_some()
    }

    pub fn get(&self, key: &T::Key) -> Option<&T> {
        self.items.iter().find(|item| item.key() == key)
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The items in insertion order
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Register a callback run after every mutating call
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&Change<'_, T>) + 'static,
    {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Slot key this store mirrors into
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }

    fn position(&self, key: &T::Key) -> Option<usize> {
        self.items.iter().position(|item| item.key() == key)
    }

    fn commit(&mut self, kind: ChangeKind<T::Key>) -> StoreResult<()> {
        self.flush()?;
        debug!(key = %self.key, change = ?kind, count = self.items.len(), "Committed change");
        self.observers.notify(&Change {
            kind,
            items: &self.items,
        });
        Ok(())
    }

    /// Serialize the whole collection and overwrite the slot value
    fn flush(&mut self) -> StoreResult<()> {
        let payload = serde_json::to_string(&self.items).map_err(StoreError::Serialize)?;
        self.slot.set(&self.key, &payload)?;
        Ok(())
    }
}

fn hydrate<T, S>(slot: &S, key: &str) -> StoreResult<Vec<T>>
where
    T: Keyed + DeserializeOwned,
    S: DurableSlot,
{
    let Some(raw) = slot.get(key)? else {
        debug!(key, "Slot empty, starting with no items");
        return Ok(Vec::new());
    };

    match parse::<T>(key, &raw) {
        Ok(items) => Ok(dedup_first(items)),
        Err(e) if e.is_recoverable() => {
            warn!(error = %e, "Discarding unreadable slot value");
            Ok(Vec::new())
        }
        Err(e) => Err(e),
    }
}

/// Parse the slot as an array, skipping only the elements that do not decode
fn parse<T: DeserializeOwned>(key: &str, raw: &str) -> StoreResult<Vec<T>> {
    let values: Vec<serde_json::Value> = serde_json::from_str(raw).map_err(|source| StoreError::Hydration {
        key: key.to_string(),
        source,
    })?;

    let items = values
        .into_iter()
        .enumerate()
        .filter_map(|(idx, value)| match serde_json::from_value(value) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!(key, index = idx, error = %e, "Skipping unreadable item in slot value");
                None
            }
        })
        .collect();
    Ok(items)
}

/// Drop later items whose key already appeared, keeping the first
fn dedup_first<T: Keyed>(items: Vec<T>) -> Vec<T> {
    let total = items.len();
    let mut kept: Vec<T> = Vec::with_capacity(total);
    for item in items {
        if !kept.iter().any(|k| k.key() == item.key()) {
            kept.push(item);
        }
    }
    if kept.len() != total {
        warn!(dropped = total - kept.len(), "Dropped duplicate keys from slot value");
    }
    kept
}
