//! SiteRoute Routing Engine
//!
//! This crate provides URL resolution for a published content tree:
//! - Bidirectional route cache per published snapshot
//! - Domain selection by culture and current host
//! - Segment assembly (top-level hiding, directory URLs, trailing slash)
//! - URL router with an ordered list of providers

pub mod domain;
pub mod provider;
pub mod route_cache;
pub mod segments;
pub mod snapshot;
pub mod url_router;

// Re-export commonly used types
pub use domain::{DomainMatch, DomainResolver};
pub use provider::{DefaultUrlProvider, UrlProvider, UrlRequest};
pub use route_cache::{RouteCache, RouteCacheStats, RouteKey, RouteLookup};
pub use snapshot::{PublishedSnapshot, SnapshotService};
pub use url_router::{NOT_FOUND_URL, UrlRouter};
