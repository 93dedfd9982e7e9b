//! Content tree collaborator traits
//!
//! The content tree (the published content cache) owns node storage, route
//! computation and invalidation. URL resolution only consumes these views of
//! a published snapshot.

use crate::{ContentId, Culture, Domain, Route};

/// Published content view producing routes
///
/// Implementations must be cheap and non-blocking: every method is called on
/// the request path with all data already in memory.
pub trait ContentTree: Send + Sync {
    /// Route of a node, or `None` if it does not exist or is unpublished
    ///
    /// The route is rooted at the nearest ancestor (or self) with an assigned
    /// domain, if any.
    fn get_route_by_id(&self, id: ContentId, culture: Option<&Culture>) -> Option<Route>;

    /// Node addressed by a route, or `None` if nothing is published there
    fn get_id_by_route(&self, route: &Route, culture: Option<&Culture>) -> Option<ContentId>;

    /// URL segment of the first root node (the section hidden when top-level
    /// hiding is enabled)
    fn top_level_segment(&self, culture: Option<&Culture>) -> Option<String>;
}

/// Domains assigned to content roots
pub trait DomainCache: Send + Sync {
    /// Domains assigned directly to `root`, in configuration order
    ///
    /// Wildcard domains are included only when `include_wildcards` is set.
    fn get_assigned(&self, root: ContentId, include_wildcards: bool) -> Vec<Domain>;
}

/// Domain cache with no domains configured
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDomains;

impl DomainCache for NoDomains {
    fn get_assigned(&self, _root: ContentId, _include_wildcards: bool) -> Vec<Domain> {
        Vec::new()
    }
}
