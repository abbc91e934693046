//! Remote catalog access for shiori.
//!
//! The catalog is the public Jikan v4 REST API. [`JikanClient`] implements
//! the [`traits::CatalogService`] seam so the rest of the application (and
//! tests) never depend on the concrete transport.

pub mod cache;
pub mod error;
pub mod jikan;
pub mod traits;

pub use error::ApiError;
pub use jikan::JikanClient;
