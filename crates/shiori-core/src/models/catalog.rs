use serde::{Deserialize, Serialize};

/// Cover art variants for a catalog entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoverImages {
    pub standard: Option<String>,
    pub small: Option<String>,
    pub large: Option<String>,
}

impl CoverImages {
    /// Returns the best available cover: the large variant if present,
    /// otherwise the standard one.
    pub fn best(&self) -> Option<&str> {
        self.large.as_deref().or(self.standard.as_deref())
    }
}

/// A genre tag from the remote catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub mal_id: u64,
    pub name: String,
}

/// A production studio credit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Studio {
    pub mal_id: u64,
    pub name: String,
}

/// A full catalog record for one anime title, as the application sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItem {
    pub mal_id: u64,
    pub title: String,
    pub title_english: Option<String>,
    pub title_japanese: Option<String>,
    pub images: CoverImages,
    /// Category label from the source: TV, Movie, OVA, ...
    pub kind: Option<String>,
    pub episodes: Option<u32>,
    pub status: Option<String>,
    pub airing: bool,
    pub score: Option<f32>,
    pub rank: Option<u32>,
    pub popularity: Option<u32>,
    pub members: Option<u64>,
    pub synopsis: Option<String>,
    pub season: Option<String>,
    pub year: Option<u32>,
    pub rating: Option<String>,
    pub genres: Vec<Genre>,
    pub studios: Vec<Studio>,
    pub url: Option<String>,
}

/// One fetch response from the remote list endpoint, with continuation
/// metadata. Pages are never reordered after the fact; the reported page
/// number is authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogPage {
    pub items: Vec<CatalogItem>,
    /// Page number reported by the source for this response.
    pub page: u32,
    pub has_next: bool,
    pub last_page: u32,
    /// Total item count across all pages, as reported by the source.
    pub total: u32,
}
