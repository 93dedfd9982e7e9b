//! Content identifiers and routes
//!
//! A route is the compact string form of a content node's path as produced by
//! the content tree:
//!
//! ```text
//! /home/sub1/sub2        path from the absolute root
//! 9876/home/test-fr      path below the domain root node 9876
//! 9876/                  the domain root node itself
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::{Error, Result};

/// Opaque identifier of a content node, owned by the content tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(i32);

impl ContentId {
    /// Create a content ID from its raw value
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Get the raw value
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl From<i32> for ContentId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ContentId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<i32>()
            .map(Self)
            .map_err(|e| Error::InvalidRequest(format!("Invalid content id '{}': {}", s, e)))
    }
}

/// A node's route, optionally rooted at a domain-assigned node
///
/// Routes are stored in canonical form: `/<segments>` or
/// `<domainRootId>/<segments>`, without empty segments or a trailing slash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Route {
    raw: Arc<str>,
    domain_root: Option<ContentId>,
}

impl Route {
    /// Parse a route string
    ///
    /// # Errors
    /// - `Error::InvalidRoute` if the string is empty or the domain root
    ///   prefix is not a content id
    pub fn parse(route: &str) -> Result<Self> {
        let trimmed = route.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidRoute("route is empty".to_string()));
        }

        let (prefix, path) = match trimmed.find('/') {
            Some(idx) => (&trimmed[..idx], &trimmed[idx..]),
            None => (trimmed, ""),
        };

        let domain_root = if prefix.is_empty() {
            None
        } else {
            let id = prefix.parse::<i32>().map_err(|_| {
                Error::InvalidRoute(format!(
                    "'{}' does not start with '/' or a domain root id",
                    route
                ))
            })?;
            Some(ContentId(id))
        };

        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let mut raw = domain_root.map(|id| id.to_string()).unwrap_or_default();
        raw.push('/');
        raw.push_str(&segments.join("/"));

        Ok(Self {
            raw: Arc::from(raw),
            domain_root,
        })
    }

    /// Build a route from segments below an optional domain root
    pub fn from_segments<S: AsRef<str>>(domain_root: Option<ContentId>, segments: &[S]) -> Self {
        let mut raw = domain_root.map(|id| id.to_string()).unwrap_or_default();
        let joined = segments
            .iter()
            .map(|s| s.as_ref().trim_matches('/'))
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("/");
        raw.push('/');
        raw.push_str(&joined);

        Self {
            raw: Arc::from(raw),
            domain_root,
        }
    }

    /// Domain root node this route is relative to, if any
    pub fn domain_root(&self) -> Option<ContentId> {
        self.domain_root
    }

    /// Path part of the route (always starts with `/`)
    pub fn path(&self) -> &str {
        let start = self.raw.find('/').unwrap_or(self.raw.len());
        &self.raw[start..]
    }

    /// Ordered path segments
    pub fn segments(&self) -> Vec<&str> {
        self.path().split('/').filter(|s| !s.is_empty()).collect()
    }

    /// Whether the route addresses a root (site root or domain root)
    pub fn is_root(&self) -> bool {
        self.path() == "/"
    }

    /// Canonical route string
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for Route {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Route {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Route> for String {
    fn from(route: Route) -> Self {
        route.raw.to_string()
    }
}

impl AsRef<str> for Route {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

impl PartialEq<&str> for Route {
    fn eq(&self, other: &&str) -> bool {
        self.raw.as_ref() == *other
    }
}
