pub mod browse;
pub mod config;
pub mod debounce;
pub mod error;
pub mod favorites;
pub mod models;
pub mod snapshot;
