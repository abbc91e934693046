//! Trait seam between the application and the remote catalog.
//!
//! The browse session and the UI consume this interface; [`JikanClient`]
//! is the production implementation and tests substitute scripted ones.
//!
//! [`JikanClient`]: crate::jikan::JikanClient

use std::future::Future;

use shiori_core::browse::SearchFilters;
use shiori_core::models::{CatalogItem, CatalogPage, Genre};

use crate::error::ApiError;

/// A paginated, searchable anime catalog.
pub trait CatalogService: Send + Sync {
    /// Fetch one page of the listing for the given filter set.
    fn fetch_page(
        &self,
        filters: &SearchFilters,
        page: u32,
    ) -> impl Future<Output = Result<CatalogPage, ApiError>> + Send;

    /// Fetch the full record for a single title.
    fn fetch_detail(
        &self,
        mal_id: u64,
    ) -> impl Future<Output = Result<CatalogItem, ApiError>> + Send;

    /// Fetch the list of available genres.
    fn fetch_genres(&self) -> impl Future<Output = Result<Vec<Genre>, ApiError>> + Send;
}
