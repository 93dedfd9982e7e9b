//! In-memory content tree built from a [`SiteConfig`]

use siteroute_core::{ContentId, ContentTree, Culture, Domain, DomainCache, Result, Route};
use std::collections::{HashMap, HashSet};

use crate::config::{NodeConfig, SiteConfig};

/// Content tree and domain assignments held in memory
///
/// Routes are rooted at the nearest node (self included) carrying a
/// non-wildcard domain; that node's own segment is not part of the route.
#[derive(Debug)]
pub struct MemorySite {
    nodes: HashMap<ContentId, NodeConfig>,
    /// Node ids in configuration order
    order: Vec<ContentId>,
    domains: Vec<Domain>,
    /// Nodes with at least one non-wildcard domain
    domain_roots: HashSet<ContentId>,
    /// Cultures that have their own segments or domains
    cultures: HashSet<Culture>,
    /// Reverse index, first node in configuration order wins
    index: HashMap<(Route, Option<Culture>), ContentId>,
}

impl MemorySite {
    /// Build the tree from a configuration
    ///
    /// # Errors
    /// `Error::ConfigValidation` if the configuration is inconsistent
    pub fn from_config(config: &SiteConfig) -> Result<Self> {
        config.validate()?;

        let nodes: HashMap<ContentId, NodeConfig> = config
            .nodes
            .iter()
            .map(|node| (node.id, node.clone()))
            .collect();
        let order = config.nodes.iter().map(|node| node.id).collect();
        let domains: Vec<Domain> = config.domains.iter().map(|d| d.to_domain()).collect();
        let domain_roots = domains
            .iter()
            .filter(|d| !d.is_wildcard)
            .map(|d| d.root_content_id)
            .collect();
        let cultures = config
            .nodes
            .iter()
            .flat_map(|node| node.culture_segments.keys().cloned())
            .chain(domains.iter().map(|d| d.culture.clone()))
            .collect();

        let mut site = Self {
            nodes,
            order,
            domains,
            domain_roots,
            cultures,
            index: HashMap::new(),
        };
        site.index = site.build_index();

        tracing::info!(
            nodes = site.order.len(),
            domains = site.domains.len(),
            "Built in-memory content tree"
        );
        Ok(site)
    }

    fn build_index(&self) -> HashMap<(Route, Option<Culture>), ContentId> {
        let variants: Vec<Option<Culture>> = std::iter::once(None)
            .chain(self.cultures.iter().cloned().map(Some))
            .collect();

        let mut index = HashMap::new();
        for culture in variants {
            for &id in &self.order {
                let Some(route) = self.route_for(id, culture.as_ref()) else {
                    continue;
                };
                match index.entry((route, culture.clone())) {
                    std::collections::hash_map::Entry::Vacant(entry) => {
                        entry.insert(id);
                    }
                    std::collections::hash_map::Entry::Occupied(entry) => {
                        tracing::warn!(
                            route = %entry.key().0,
                            existing = %entry.get(),
                            shadowed = %id,
                            "Two nodes share a route, keeping the first"
                        );
                    }
                }
            }
        }
        index
    }

    /// Compute the route of a node by walking its ancestors
    fn route_for(&self, id: ContentId, culture: Option<&Culture>) -> Option<Route> {
        let mut segments = Vec::new();
        let mut domain_root = None;
        let mut current = Some(id);

        while let Some(node_id) = current {
            let node = self.nodes.get(&node_id)?;
            if !node.published {
                return None;
            }
            if domain_root.is_none() {
                if self.domain_roots.contains(&node_id) {
                    domain_root = Some(node_id);
                } else {
                    segments.push(node.segment_for(culture));
                }
            }
            current = node.parent;
        }

        segments.reverse();
        Some(Route::from_segments(domain_root, &segments))
    }

    /// Node ids in configuration order
    pub fn node_ids(&self) -> &[ContentId] {
        &self.order
    }

    /// All configured domains, wildcards included
    pub fn domains(&self) -> &[Domain] {
        &self.domains
    }
}

impl ContentTree for MemorySite {
    fn get_route_by_id(&self, id: ContentId, culture: Option<&Culture>) -> Option<Route> {
        self.route_for(id, culture)
    }

    fn get_id_by_route(&self, route: &Route, culture: Option<&Culture>) -> Option<ContentId> {
        // cultures without own segments share the invariant routes
        let culture = culture.filter(|c| self.cultures.contains(*c)).cloned();
        self.index.get(&(route.clone(), culture)).copied()
    }

    fn top_level_segment(&self, culture: Option<&Culture>) -> Option<String> {
        self.order
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .find(|node| node.parent.is_none())
            .map(|node| node.segment_for(culture).to_string())
    }
}

impl DomainCache for MemorySite {
    fn get_assigned(&self, root: ContentId, include_wildcards: bool) -> Vec<Domain> {
        self.domains
            .iter()
            .filter(|d| d.root_content_id == root && (include_wildcards || !d.is_wildcard))
            .cloned()
            .collect()
    }
}
