//! Route Cache
//!
//! Bidirectional cache between content keys and routes for one published
//! snapshot. Both directions live behind a single lock so that a reader sees
//! either a complete pair or nothing.
//!
//! Invariants, per culture:
//! - at most one cached route per content id
//! - at most one cached content id per route
//!
//! A route that arrives for a second id indicates a content tree bug. The
//! conflict is logged and the last write wins.

use siteroute_core::{ContentId, Culture, Route};
use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Cache key: a node, optionally in a specific culture
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteKey {
    pub id: ContentId,
    pub culture: Option<Culture>,
}

impl RouteKey {
    /// Key for a node in the given culture
    pub fn new(id: ContentId, culture: Option<&Culture>) -> Self {
        Self {
            id,
            culture: culture.cloned(),
        }
    }

    /// Key for the invariant (culture-less) variant of a node
    pub fn invariant(id: ContentId) -> Self {
        Self { id, culture: None }
    }
}

impl From<ContentId> for RouteKey {
    fn from(id: ContentId) -> Self {
        Self::invariant(id)
    }
}

/// Reverse lookup key: a route within a culture
pub type RouteLookup = (Route, Option<Culture>);

#[derive(Debug, Default)]
struct RouteMaps {
    routes: HashMap<RouteKey, Route>,
    ids: HashMap<RouteLookup, ContentId>,
}

/// Cache hit/miss counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub conflicts: u64,
}

/// Bidirectional key <-> route cache
#[derive(Debug, Default)]
pub struct RouteCache {
    maps: RwLock<RouteMaps>,
    hits: AtomicU64,
    misses: AtomicU64,
    conflicts: AtomicU64,
}

impl RouteCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached route for a key
    pub fn get_route(&self, key: &RouteKey) -> Option<Route> {
        let route = self
            .maps
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .routes
            .get(key)
            .cloned();
        self.count(route.is_some());
        route
    }

    /// Cached content id for a route in a culture
    pub fn get_id(&self, route: &Route, culture: Option<&Culture>) -> Option<ContentId> {
        let lookup = (route.clone(), culture.cloned());
        let id = self
            .maps
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .ids
            .get(&lookup)
            .copied();
        self.count(id.is_some());
        id
    }

    /// Store a key/route pair in both directions
    ///
    /// Overwrites any previous route of `key` and any previous id of `route`
    /// in the same culture, dropping the stale halves of those pairs.
    pub fn store(&self, key: RouteKey, route: Route) {
        let lookup = (route.clone(), key.culture.clone());
        let mut maps = self
            .maps
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(&owner) = maps.ids.get(&lookup)
            && owner != key.id
        {
            tracing::warn!(
                route = %route,
                existing = %owner,
                incoming = %key.id,
                "Route cached for two different content ids, keeping the latest"
            );
            self.conflicts.fetch_add(1, Ordering::Relaxed);
            maps.routes.remove(&RouteKey {
                id: owner,
                culture: key.culture.clone(),
            });
        }

        if let Some(previous) = maps.routes.insert(key.clone(), route.clone())
            && previous != route
        {
            maps.ids.remove(&(previous, key.culture.clone()));
        }
        maps.ids.insert(lookup, key.id);
    }

    /// Empty both directions
    pub fn clear(&self) {
        let mut maps = self
            .maps
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        maps.routes.clear();
        maps.ids.clear();
    }

    /// Number of cached pairs
    pub fn len(&self) -> usize {
        self.maps
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .routes
            .len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the key -> route direction
    pub fn cached_routes(&self) -> HashMap<RouteKey, Route> {
        self.maps
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .routes
            .clone()
    }

    /// Copy of the route -> id direction
    pub fn cached_ids(&self) -> HashMap<RouteLookup, ContentId> {
        self.maps
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .ids
            .clone()
    }

    /// Hit/miss counters since creation
    pub fn stats(&self) -> RouteCacheStats {
        RouteCacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            conflicts: self.conflicts.load(Ordering::Relaxed),
        }
    }

    fn count(&self, hit: bool) {
        if hit {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
    }
}
