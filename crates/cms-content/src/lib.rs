//! Typed, paginated read access to a headless CMS (microCMS-style API).
//!
//! [`ContentClient`] turns listing and detail queries for blog posts, news
//! and categories into authenticated GET requests. Through [`ContentSource`]
//! it never fails outward: errors are logged and collapse to empty results.
//! Only configuration is fatal, and it is checked before any request.

pub mod client;
pub mod config;
pub mod errors;
pub mod filter;
pub mod listing;
pub mod models;
pub mod pagination;
pub mod source;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use client::ContentClient;
pub use config::ClientConfig;
pub use errors::{ConfigError, FetchError, PaginationError};
pub use filter::ContentFilter;
pub use listing::{CategoryView, DetailView, Listing, PendingPage, Settled};
pub use models::{Category, ContentItem, ContentKind, ImageRef, Page};
pub use pagination::{DEFAULT_PAGE_SIZE, PageRequest, Pagination, total_pages};
pub use source::ContentSource;
