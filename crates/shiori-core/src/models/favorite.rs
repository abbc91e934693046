use serde::{Deserialize, Serialize};

use super::catalog::CatalogItem;

/// The narrowed, persisted projection of a catalog item kept in the
/// favorites collection. Deliberately drops most catalog fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteItem {
    pub mal_id: u64,
    pub title: String,
    pub image_url: Option<String>,
    pub score: Option<f32>,
    pub episodes: Option<u32>,
    pub kind: Option<String>,
    /// Milliseconds since epoch, stamped at insertion. Never mutated.
    pub added_at: i64,
}

impl FavoriteItem {
    /// Project a full catalog record down to the persisted favorite shape,
    /// stamping `added_at` with the given timestamp.
    pub fn project(item: &CatalogItem, added_at: i64) -> Self {
        Self {
            mal_id: item.mal_id,
            title: item.title.clone(),
            image_url: item.images.best().map(str::to_owned),
            score: item.score,
            episodes: item.episodes,
            kind: item.kind.clone(),
            added_at,
        }
    }
}
