//! The favorites collection: single source of truth for "is this title
//! favorited" and the ordered list of favorited titles.
//!
//! Split in two layers so the mutation logic stays free of I/O:
//! [`FavoritesList`] is the pure in-memory collection, and
//! [`FavoritesStore`] decorates it with a save-on-change observer that
//! writes the whole snapshot after every mutation.

use chrono::Utc;

use crate::models::{CatalogItem, FavoriteItem};
use crate::snapshot::SnapshotSink;

/// Ordered in-memory favorites collection. Most recently added first.
#[derive(Debug, Default)]
pub struct FavoritesList {
    items: Vec<FavoriteItem>,
}

impl FavoritesList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a collection from persisted items, preserving their order.
    pub fn from_items(items: Vec<FavoriteItem>) -> Self {
        Self { items }
    }

    /// Project the catalog record and prepend it to the collection.
    ///
    /// Does NOT guard against duplicate ids: two raw `add` calls for the
    /// same id produce two entries. UI-driven flows go through [`toggle`],
    /// which is the sole dedup point.
    ///
    /// [`toggle`]: FavoritesList::toggle
    pub fn add(&mut self, item: &CatalogItem) {
        let favorite = FavoriteItem::project(item, Utc::now().timestamp_millis());
        self.items.insert(0, favorite);
    }

    /// Remove every entry matching `mal_id`. Silently does nothing if the
    /// id is not in the collection.
    pub fn remove(&mut self, mal_id: u64) {
        self.items.retain(|f| f.mal_id != mal_id);
    }

    pub fn is_favorite(&self, mal_id: u64) -> bool {
        self.items.iter().any(|f| f.mal_id == mal_id)
    }

    /// Remove the title if favorited, add it otherwise.
    pub fn toggle(&mut self, item: &CatalogItem) {
        if self.is_favorite(item.mal_id) {
            self.remove(item.mal_id);
        } else {
            self.add(item);
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[FavoriteItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Favorites collection with durable persistence.
///
/// Every mutation is applied in memory, then the whole collection is
/// written through the sink. Write failures are logged and swallowed: the
/// session keeps the mutation, it just won't survive a restart.
pub struct FavoritesStore<S: SnapshotSink> {
    list: FavoritesList,
    sink: S,
}

impl<S: SnapshotSink> FavoritesStore<S> {
    /// Open the store, restoring whatever the sink holds.
    pub fn open(sink: S) -> Self {
        let list = FavoritesList::from_items(sink.load());
        Self { list, sink }
    }

    pub fn add(&mut self, item: &CatalogItem) {
        self.list.add(item);
        self.persist();
    }

    pub fn remove(&mut self, mal_id: u64) {
        self.list.remove(mal_id);
        self.persist();
    }

    pub fn toggle(&mut self, item: &CatalogItem) {
        self.list.toggle(item);
        self.persist();
    }

    pub fn clear(&mut self) {
        self.list.clear();
        self.persist();
    }

    pub fn is_favorite(&self, mal_id: u64) -> bool {
        self.list.is_favorite(mal_id)
    }

    pub fn items(&self) -> &[FavoriteItem] {
        self.list.items()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    fn persist(&self) {
        if let Err(e) = self.sink.save(self.list.items()) {
            tracing::warn!("Failed to persist favorites: {e}");
        }
    }
}
