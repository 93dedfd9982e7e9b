//! Site configuration
//!
//! ```yaml
//! settings:
//!   hide_top_level_node_from_path: true
//!   default_mode: auto
//! logging:
//!   level: info
//! nodes:
//!   - id: 1046
//!     segment: home
//!   - id: 1173
//!     parent: 1046
//!     segment: sub1
//!     culture_segments:
//!       fr-FR: sous1
//! domains:
//!   - id: 2
//!     name: example.us
//!     root: 1046
//!     culture: en-US
//!     default: true
//! ```

use serde::{Deserialize, Serialize};
use siteroute_core::{ContentId, Culture, Domain, Error, Result, RoutingSettings, UrlMode};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Complete site configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    /// URL generation settings
    #[serde(default)]
    pub settings: RoutingSettings,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Content nodes, parents before children, siblings in sort order
    #[serde(default)]
    pub nodes: Vec<NodeConfig>,

    /// Domain assignments
    #[serde(default)]
    pub domains: Vec<DomainConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// A content node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    pub id: ContentId,

    /// Parent node; root nodes have none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ContentId>,

    /// Invariant URL segment
    pub segment: String,

    /// Per-culture URL segments, falling back to `segment`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub culture_segments: BTreeMap<Culture, String>,

    #[serde(default = "default_true")]
    pub published: bool,
}

impl NodeConfig {
    /// URL segment for a culture
    pub fn segment_for(&self, culture: Option<&Culture>) -> &str {
        culture
            .and_then(|c| self.culture_segments.get(c))
            .map(String::as_str)
            .unwrap_or(&self.segment)
    }
}

fn default_true() -> bool {
    true
}

/// A domain assigned to a content root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainConfig {
    pub id: i32,

    /// Host name, or `*<id>` for a culture-only wildcard
    pub name: String,

    /// Node the domain is assigned to
    pub root: ContentId,

    pub culture: Culture,

    /// Default domain of its root
    #[serde(default)]
    pub default: bool,
}

impl DomainConfig {
    pub fn to_domain(&self) -> Domain {
        Domain::new(
            self.id,
            self.name.clone(),
            self.root,
            self.culture.clone(),
            self.default,
        )
    }

    pub fn is_wildcard(&self) -> bool {
        self.name.starts_with('*')
    }
}

impl SiteConfig {
    /// Merge environment variables into config
    ///
    /// Invalid values are logged and ignored.
    pub fn merge_env(&mut self) {
        // URL settings
        if let Some(enabled) = env_bool("SITEROUTE_USE_DIRECTORY_URLS") {
            self.settings.use_directory_urls = enabled;
        }

        if let Some(enabled) = env_bool("SITEROUTE_HIDE_TOP_LEVEL") {
            self.settings.hide_top_level_node_from_path = enabled;
        }

        if let Some(enabled) = env_bool("SITEROUTE_ADD_TRAILING_SLASH") {
            self.settings.add_trailing_slash = enabled;
        }

        if let Some(enabled) = env_bool("SITEROUTE_USE_DOMAIN_PREFIXES") {
            self.settings.use_domain_prefixes = enabled;
        }

        if let Ok(val) = std::env::var("SITEROUTE_MODE") {
            match val.parse::<UrlMode>() {
                Ok(mode) => self.settings.default_mode = mode,
                Err(e) => {
                    tracing::warn!(value = %val, error = %e, "Ignoring invalid SITEROUTE_MODE")
                }
            }
        }

        // Logging settings
        if let Ok(val) = std::env::var("SITEROUTE_LOG_LEVEL") {
            self.logging.level = val;
        }
    }

    /// Check the content tree and domains for consistency
    ///
    /// # Errors
    /// `Error::ConfigValidation` describing the first problem found
    pub fn validate(&self) -> Result<()> {
        let mut parents: HashMap<ContentId, Option<ContentId>> = HashMap::new();
        for node in &self.nodes {
            if parents.insert(node.id, node.parent).is_some() {
                return Err(invalid(format!("duplicate node id {}", node.id)));
            }
            validate_segment(node.id, &node.segment)?;
            for segment in node.culture_segments.values() {
                validate_segment(node.id, segment)?;
            }
        }

        for node in &self.nodes {
            if let Some(parent) = node.parent
                && !parents.contains_key(&parent)
            {
                return Err(invalid(format!("node {} has unknown parent {}", node.id, parent)));
            }
        }

        for node in &self.nodes {
            let mut seen = HashSet::from([node.id]);
            let mut current = node.parent;
            while let Some(id) = current {
                if !seen.insert(id) {
                    return Err(invalid(format!("node {} is part of a cycle", node.id)));
                }
                current = parents.get(&id).copied().flatten();
            }
        }

        let mut domain_ids = HashSet::new();
        let mut defaults: HashMap<ContentId, i32> = HashMap::new();
        for domain in &self.domains {
            if !domain_ids.insert(domain.id) {
                return Err(invalid(format!("duplicate domain id {}", domain.id)));
            }
            if domain.name.trim().is_empty() {
                return Err(invalid(format!("domain {} has an empty name", domain.id)));
            }
            if !parents.contains_key(&domain.root) {
                return Err(invalid(format!(
                    "domain {} is assigned to unknown node {}",
                    domain.name, domain.root
                )));
            }
            if domain.default
                && !domain.is_wildcard()
                && let Some(other) = defaults.insert(domain.root, domain.id)
            {
                return Err(invalid(format!(
                    "node {} has more than one default domain ({} and {})",
                    domain.root, other, domain.id
                )));
            }
        }

        Ok(())
    }
}

fn validate_segment(id: ContentId, segment: &str) -> Result<()> {
    if segment.trim().is_empty() {
        return Err(invalid(format!("node {} has an empty segment", id)));
    }
    if segment.contains('/') {
        return Err(invalid(format!("segment '{}' of node {} contains '/'", segment, id)));
    }
    Ok(())
}

fn invalid(message: String) -> Error {
    Error::ConfigValidation(message)
}

fn env_bool(name: &str) -> Option<bool> {
    let val = std::env::var(name).ok()?;
    match val.parse::<bool>() {
        Ok(enabled) => Some(enabled),
        Err(_) => {
            tracing::warn!(variable = name, value = %val, "Ignoring non-boolean value");
            None
        }
    }
}
