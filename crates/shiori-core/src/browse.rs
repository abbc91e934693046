//! Client-side aggregation of a paginated catalog listing.
//!
//! [`BrowseSession`] merges successive pages of one remote query into a
//! single flat sequence. The session itself never performs I/O: the event
//! loop asks it for the next [`PageRequest`], runs the fetch, and feeds
//! the outcome back through [`BrowseSession::apply_page`]. Responses carry
//! the epoch of the filter set that issued them, so a late response for an
//! abandoned query is dropped instead of corrupting the new one.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::models::{CatalogItem, CatalogPage};

// ── Filters ───────────────────────────────────────────────────────

/// Sort key accepted by the remote list endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderBy {
    Score,
    Popularity,
    Rank,
    Title,
}

impl OrderBy {
    pub fn as_param(self) -> &'static str {
        match self {
            Self::Score => "score",
            Self::Popularity => "popularity",
            Self::Rank => "rank",
            Self::Title => "title",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn as_param(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

/// Airing status filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiringStatus {
    Airing,
    Complete,
    Upcoming,
}

impl AiringStatus {
    pub fn as_param(self) -> &'static str {
        match self {
            Self::Airing => "airing",
            Self::Complete => "complete",
            Self::Upcoming => "upcoming",
        }
    }
}

/// The filter set identifying one logical listing query. Changing any
/// field starts a new session epoch.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchFilters {
    pub query: Option<String>,
    /// Genre ids, combined by the source.
    pub genres: Vec<u64>,
    pub order_by: Option<OrderBy>,
    pub sort: Option<SortDirection>,
    pub status: Option<AiringStatus>,
    pub rating: Option<String>,
}

impl SearchFilters {
    pub fn with_query(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Self::default()
        }
    }
}

// ── Session ───────────────────────────────────────────────────────

/// Token identifying one issued fetch. Returned by [`BrowseSession`] and
/// handed back with the response so stale work can be recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub epoch: u64,
    pub page: u32,
}

/// Accumulator for one paginated listing.
#[derive(Debug, Default)]
pub struct BrowseSession {
    filters: SearchFilters,
    /// Bumped whenever the filter set changes; stamped into every request.
    epoch: u64,
    /// Loaded pages in page-number order.
    pages: Vec<CatalogPage>,
    /// Responses that arrived ahead of a missing predecessor, keyed by the
    /// page number they were requested as. Only populated if the single
    /// in-flight rule is ever violated upstream.
    pending: BTreeMap<u32, CatalogPage>,
    in_flight: Option<u32>,
    /// Assumed true until the first response says otherwise.
    has_more: Option<bool>,
    error: Option<String>,
}

impl BrowseSession {
    pub fn new(filters: SearchFilters) -> Self {
        Self {
            filters,
            ..Self::default()
        }
    }

    pub fn filters(&self) -> &SearchFilters {
        &self.filters
    }

    /// Replace the filter set, discarding all loaded pages and making any
    /// in-flight response stale. No-op when the filters are unchanged.
    pub fn set_filters(&mut self, filters: SearchFilters) {
        if filters == self.filters {
            return;
        }
        self.filters = filters;
        self.epoch += 1;
        self.pages.clear();
        self.pending.clear();
        self.in_flight = None;
        self.has_more = None;
        self.error = None;
    }

    /// Whether the source has (or is assumed to have) more pages.
    pub fn has_more(&self) -> bool {
        self.has_more.unwrap_or(true)
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    /// The surfaced fetch error, if the session is suspended on one.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Flattened view of all loaded pages, in page order, duplicates
    /// preserved as the source sent them.
    pub fn items(&self) -> impl Iterator<Item = &CatalogItem> {
        self.pages.iter().flat_map(|p| p.items.iter())
    }

    /// Number of items across all loaded pages.
    pub fn len(&self) -> usize {
        self.pages.iter().map(|p| p.items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Total result count reported by the source, once known.
    pub fn total(&self) -> Option<u32> {
        self.pages.last().map(|p| p.total)
    }

    /// The page number the next fetch should ask for: one past the last
    /// loaded page's reported number, so a source that skips or renumbers
    /// pages is followed faithfully.
    fn next_page_number(&self) -> u32 {
        self.pages.last().map(|p| p.page + 1).unwrap_or(1)
    }

    /// Issue the next fetch request, if one is warranted: more pages
    /// remain, nothing is in flight, and the session is not suspended on
    /// an error. Marks the request in flight.
    pub fn next_request(&mut self) -> Option<PageRequest> {
        if self.error.is_some() || !self.has_more() || self.in_flight.is_some() {
            return None;
        }
        let page = self.next_page_number();
        self.in_flight = Some(page);
        Some(PageRequest {
            epoch: self.epoch,
            page,
        })
    }

    /// Level-triggered load-more policy: call whenever the end-of-list
    /// marker's visibility or the in-flight state changes. Issues at most
    /// one request per call.
    pub fn poll(&mut self, marker_visible: bool) -> Option<PageRequest> {
        if marker_visible {
            self.next_request()
        } else {
            None
        }
    }

    /// Clear a surfaced error so the same page can be fetched again.
    pub fn retry(&mut self) {
        self.error = None;
    }

    /// Feed back the outcome of a fetch issued by [`next_request`].
    ///
    /// Responses from a previous epoch are dropped entirely. Successful
    /// pages are appended in increasing page-number order; a page arriving
    /// ahead of its predecessor waits in a reorder buffer.
    ///
    /// [`next_request`]: BrowseSession::next_request
    pub fn apply_page(&mut self, request: PageRequest, result: Result<CatalogPage, String>) {
        if request.epoch != self.epoch {
            debug!(
                page = request.page,
                epoch = request.epoch,
                "Dropping stale page response"
            );
            return;
        }

        if self.in_flight == Some(request.page) {
            self.in_flight = None;
        }

        match result {
            Ok(page) => {
                self.pending.insert(request.page, page);
                self.drain_pending();
            }
            Err(message) => {
                warn!(page = request.page, error = %message, "Page fetch failed");
                self.error = Some(message);
            }
        }
    }

    /// Append every buffered page whose predecessor has landed.
    fn drain_pending(&mut self) {
        while let Some(page) = self.pending.remove(&self.next_page_number()) {
            self.has_more = Some(page.has_next);
            self.pages.push(page);
        }
    }
}
