//! Published snapshots
//!
//! A snapshot is one immutable version of the content tree and its domains.
//! Each snapshot owns a fresh [`RouteCache`]; publishing replaces the whole
//! snapshot, so cached routes never leak across generations.

use dashmap::DashMap;
use siteroute_core::{ContentId, ContentTree, Culture, Domain, DomainCache, Route};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use crate::route_cache::{RouteCache, RouteKey};

/// One published version of the content tree
pub struct PublishedSnapshot {
    generation: u64,
    content: Arc<dyn ContentTree>,
    domains: Arc<dyn DomainCache>,
    routes: RouteCache,
    /// Domain sets per root, memoised for the snapshot lifetime
    domain_sets: DashMap<ContentId, Arc<[Domain]>>,
}

impl std::fmt::Debug for PublishedSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublishedSnapshot")
            .field("generation", &self.generation)
            .field("cached_routes", &self.routes.len())
            .finish()
    }
}

impl PublishedSnapshot {
    /// Create a snapshot over the given collaborators
    pub fn new(
        generation: u64,
        content: Arc<dyn ContentTree>,
        domains: Arc<dyn DomainCache>,
    ) -> Self {
        Self {
            generation,
            content,
            domains,
            routes: RouteCache::new(),
            domain_sets: DashMap::new(),
        }
    }

    /// Generation number (increases with every publish)
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Route cache of this snapshot
    pub fn routes(&self) -> &RouteCache {
        &self.routes
    }

    /// Content tree of this snapshot
    pub fn content(&self) -> &dyn ContentTree {
        self.content.as_ref()
    }

    /// Route of a node, served from the cache when possible
    ///
    /// Unknown or unpublished nodes are not cached.
    pub fn get_route_by_id(&self, id: ContentId, culture: Option<&Culture>) -> Option<Route> {
        let key = RouteKey::new(id, culture);
        if let Some(route) = self.routes.get_route(&key) {
            tracing::debug!(id = %id, route = %route, "Route cache hit");
            return Some(route);
        }

        let route = self.content.get_route_by_id(id, culture)?;
        tracing::debug!(id = %id, route = %route, "Route cache miss, storing");
        self.routes.store(key, route.clone());
        Some(route)
    }

    /// Node addressed by a route, served from the cache when possible
    pub fn get_id_by_route(&self, route: &Route, culture: Option<&Culture>) -> Option<ContentId> {
        if let Some(id) = self.routes.get_id(route, culture) {
            tracing::debug!(id = %id, route = %route, "Reverse route cache hit");
            return Some(id);
        }

        let id = self.content.get_id_by_route(route, culture)?;
        self.routes.store(RouteKey::new(id, culture), route.clone());
        Some(id)
    }

    /// Segment of the first root node, for top-level hiding
    pub fn top_level_segment(&self, culture: Option<&Culture>) -> Option<String> {
        self.content.top_level_segment(culture)
    }

    /// Non-wildcard domains assigned to `root`, in configuration order
    pub fn assigned_domains(&self, root: ContentId) -> Arc<[Domain]> {
        self.domain_sets
            .entry(root)
            .or_insert_with(|| Arc::from(self.domains.get_assigned(root, false)))
            .clone()
    }
}

/// Holder of the current snapshot
///
/// Readers take an `Arc` to the live snapshot and keep using it for the rest
/// of their request even if a publish happens meanwhile.
pub struct SnapshotService {
    current: RwLock<Arc<PublishedSnapshot>>,
    generation: AtomicU64,
}

impl SnapshotService {
    /// Create a service with an initial snapshot (generation 1)
    pub fn new(content: Arc<dyn ContentTree>, domains: Arc<dyn DomainCache>) -> Self {
        Self {
            current: RwLock::new(Arc::new(PublishedSnapshot::new(1, content, domains))),
            generation: AtomicU64::new(1),
        }
    }

    /// The live snapshot
    pub fn current(&self) -> Arc<PublishedSnapshot> {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Install a new snapshot with an empty route cache
    ///
    /// Returns the new generation number.
    pub fn publish(&self, content: Arc<dyn ContentTree>, domains: Arc<dyn DomainCache>) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        let snapshot = Arc::new(PublishedSnapshot::new(generation, content, domains));

        *self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = snapshot;

        tracing::info!(generation, "Published new content snapshot");
        generation
    }
}

impl std::fmt::Debug for SnapshotService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotService")
            .field("generation", &self.generation.load(Ordering::Acquire))
            .finish()
    }
}
