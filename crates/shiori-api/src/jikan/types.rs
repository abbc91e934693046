use serde::Deserialize;

use shiori_core::models::{CatalogItem, CatalogPage, CoverImages, Genre, Studio};

// ── Response envelopes ───────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct JikanListResponse {
    pub pagination: JikanPagination,
    pub data: Vec<JikanAnime>,
}

#[derive(Debug, Deserialize)]
pub struct JikanDetailResponse {
    pub data: JikanAnime,
}

#[derive(Debug, Deserialize)]
pub struct JikanGenreListResponse {
    pub data: Vec<JikanGenre>,
}

#[derive(Debug, Deserialize)]
pub struct JikanPagination {
    pub last_visible_page: u32,
    pub has_next_page: bool,
    pub current_page: u32,
    #[serde(default)]
    pub items: JikanPaginationItems,
}

#[derive(Debug, Default, Deserialize)]
pub struct JikanPaginationItems {
    pub count: u32,
    pub total: u32,
    pub per_page: u32,
}

// ── Records ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct JikanAnime {
    pub mal_id: u64,
    pub url: Option<String>,
    #[serde(default)]
    pub images: JikanImages,
    pub title: String,
    pub title_english: Option<String>,
    pub title_japanese: Option<String>,
    /// TV, Movie, OVA, ... — `type` in the wire format.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub episodes: Option<u32>,
    pub status: Option<String>,
    #[serde(default)]
    pub airing: bool,
    pub score: Option<f32>,
    pub rank: Option<u32>,
    pub popularity: Option<u32>,
    pub members: Option<u64>,
    pub synopsis: Option<String>,
    pub season: Option<String>,
    pub year: Option<u32>,
    pub rating: Option<String>,
    #[serde(default)]
    pub genres: Vec<JikanGenre>,
    #[serde(default)]
    pub studios: Vec<JikanGenre>,
}

#[derive(Debug, Default, Deserialize)]
pub struct JikanImages {
    #[serde(default)]
    pub jpg: JikanImageSet,
}

#[derive(Debug, Default, Deserialize)]
pub struct JikanImageSet {
    pub image_url: Option<String>,
    pub small_image_url: Option<String>,
    pub large_image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct JikanGenre {
    pub mal_id: u64,
    pub name: String,
}

// ── Conversions ──────────────────────────────────────────────────

impl JikanAnime {
    pub fn into_catalog_item(self) -> CatalogItem {
        CatalogItem {
            mal_id: self.mal_id,
            title: self.title,
            title_english: self.title_english,
            title_japanese: self.title_japanese,
            images: CoverImages {
                standard: self.images.jpg.image_url,
                small: self.images.jpg.small_image_url,
                large: self.images.jpg.large_image_url,
            },
            kind: self.kind,
            episodes: self.episodes,
            status: self.status,
            airing: self.airing,
            score: self.score,
            rank: self.rank,
            popularity: self.popularity,
            members: self.members,
            synopsis: self.synopsis,
            season: self.season,
            year: self.year,
            rating: self.rating,
            genres: self.genres.into_iter().map(JikanGenre::into_genre).collect(),
            studios: self
                .studios
                .into_iter()
                .map(|s| Studio {
                    mal_id: s.mal_id,
                    name: s.name,
                })
                .collect(),
            url: self.url,
        }
    }
}

impl JikanGenre {
    pub fn into_genre(self) -> Genre {
        Genre {
            mal_id: self.mal_id,
            name: self.name,
        }
    }
}

impl JikanListResponse {
    pub fn into_page(self) -> CatalogPage {
        CatalogPage {
            items: self
                .data
                .into_iter()
                .map(JikanAnime::into_catalog_item)
                .collect(),
            page: self.pagination.current_page,
            has_next: self.pagination.has_next_page,
            last_page: self.pagination.last_visible_page,
            total: self.pagination.items.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_list_response() {
        let json = r#"{
            "pagination": {
                "last_visible_page": 1100,
                "has_next_page": true,
                "current_page": 1,
                "items": { "count": 24, "total": 26394, "per_page": 24 }
            },
            "data": [
                {
                    "mal_id": 52991,
                    "url": "https://myanimelist.net/anime/52991/Sousou_no_Frieren",
                    "images": {
                        "jpg": {
                            "image_url": "https://cdn.myanimelist.net/images/anime/1015/138006.jpg",
                            "small_image_url": "https://cdn.myanimelist.net/images/anime/1015/138006t.jpg",
                            "large_image_url": "https://cdn.myanimelist.net/images/anime/1015/138006l.jpg"
                        },
                        "webp": {
                            "image_url": "https://cdn.myanimelist.net/images/anime/1015/138006.webp"
                        }
                    },
                    "title": "Sousou no Frieren",
                    "title_english": "Frieren: Beyond Journey's End",
                    "title_japanese": "葬送のフリーレン",
                    "type": "TV",
                    "episodes": 28,
                    "status": "Finished Airing",
                    "airing": false,
                    "score": 9.31,
                    "rank": 1,
                    "popularity": 150,
                    "members": 1000000,
                    "synopsis": "The adventure is over but life goes on...",
                    "season": "fall",
                    "year": 2023,
                    "rating": "PG-13",
                    "genres": [
                        { "mal_id": 2, "type": "anime", "name": "Adventure", "url": "" },
                        { "mal_id": 8, "type": "anime", "name": "Drama", "url": "" }
                    ],
                    "studios": [
                        { "mal_id": 11, "type": "anime", "name": "Madhouse", "url": "" }
                    ]
                }
            ]
        }"#;

        let resp: JikanListResponse = serde_json::from_str(json).unwrap();
        let page = resp.into_page();

        assert_eq!(page.page, 1);
        assert!(page.has_next);
        assert_eq!(page.last_page, 1100);
        assert_eq!(page.total, 26394);
        assert_eq!(page.items.len(), 1);

        let item = &page.items[0];
        assert_eq!(item.mal_id, 52991);
        assert_eq!(item.title, "Sousou no Frieren");
        assert_eq!(item.kind.as_deref(), Some("TV"));
        assert_eq!(item.episodes, Some(28));
        assert!((item.score.unwrap() - 9.31).abs() < 0.001);
        assert_eq!(item.genres.len(), 2);
        assert_eq!(item.genres[0].name, "Adventure");
        assert_eq!(item.studios[0].name, "Madhouse");
        // Large variant wins when picking a cover.
        assert!(item.images.best().unwrap().ends_with("138006l.jpg"));
    }

    #[test]
    fn test_deserialize_sparse_record() {
        // Entries with barely any metadata exist in the catalog.
        let json = r#"{
            "pagination": {
                "last_visible_page": 1,
                "has_next_page": false,
                "current_page": 1
            },
            "data": [
                { "mal_id": 99999, "title": "Obscure OVA" }
            ]
        }"#;

        let resp: JikanListResponse = serde_json::from_str(json).unwrap();
        let page = resp.into_page();

        assert_eq!(page.total, 0);
        let item = &page.items[0];
        assert_eq!(item.title, "Obscure OVA");
        assert!(item.images.best().is_none());
        assert!(item.episodes.is_none());
        assert!(!item.airing);
    }

    #[test]
    fn test_deserialize_genre_list() {
        let json = r#"{
            "data": [
                { "mal_id": 1, "name": "Action", "url": "", "count": 5000 },
                { "mal_id": 22, "name": "Romance", "url": "", "count": 3000 }
            ]
        }"#;

        let resp: JikanGenreListResponse = serde_json::from_str(json).unwrap();
        let genres: Vec<Genre> = resp.data.into_iter().map(JikanGenre::into_genre).collect();
        assert_eq!(genres.len(), 2);
        assert_eq!(genres[1].name, "Romance");
        assert_eq!(genres[1].mal_id, 22);
    }
}
