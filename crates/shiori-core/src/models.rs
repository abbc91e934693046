pub mod catalog;
pub mod favorite;

pub use catalog::{CatalogItem, CatalogPage, CoverImages, Genre, Studio};
pub use favorite::FavoriteItem;
