//! A read-through cache over [`Store::list_all`].
//!
//! The unit of caching is the whole collection: either the cache holds the
//! full, sorted list of records from the last successful scan or it holds
//! nothing. Readers share the cached list through an [`Arc`]; a refresh
//! builds a new list completely before swapping it in, so no reader ever sees
//! a partial collection.

use crate::document::ParsedRecord;
use crate::store::{Result, Store};
use parking_lot::RwLock;
use std::sync::Arc;

/// The sorted collection of records, as shared by the cache.
pub type Collection = Arc<Vec<ParsedRecord>>;

/// Memoizes the post listing produced by a [`Store`].
#[derive(Debug)]
pub struct Cache {
    store: Store,
    listing: RwLock<Option<Collection>>,
}

impl Cache {
    /// Creates an empty cache; nothing is read until the first
    /// [`Cache::get_all`].
    pub fn new(store: Store) -> Cache {
        Cache {
            store,
            listing: RwLock::new(None),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Returns the cached collection, scanning the store if the cache is
    /// empty. A failed scan is returned as an error and leaves the cache
    /// empty, so the next call retries.
    pub fn get_all(&self) -> Result<Collection> {
        if let Some(listing) = self.listing.read().as_ref() {
            log::debug!("post listing cache hit");
            return Ok(Arc::clone(listing));
        }

        let mut slot = self.listing.write();
        // Another caller may have refreshed while we waited for the lock.
        if let Some(listing) = slot.as_ref() {
            return Ok(Arc::clone(listing));
        }

        let listing = Arc::new(self.store.list_all()?);
        log::info!(
            "refreshed post listing from `{}` ({} posts)",
            self.store.directory().display(),
            listing.len()
        );
        *slot = Some(Arc::clone(&listing));
        Ok(listing)
    }

    /// Drops the cached collection so the next [`Cache::get_all`] rescans the
    /// store.
    pub fn invalidate(&self) {
        *self.listing.write() = None;
        log::debug!("post listing cache invalidated");
    }
}
