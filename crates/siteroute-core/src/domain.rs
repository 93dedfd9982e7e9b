//! Configured domains
//!
//! A domain binds a host name (optionally with scheme and path) and a culture
//! to a content sub-tree. Several domains may share a root node, one per
//! culture variant of that sub-tree.

use serde::{Deserialize, Serialize};

use crate::{ContentId, Culture, SegmentOptions};

/// A domain assigned to a content root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    /// Domain identifier (stable within a snapshot)
    pub id: i32,
    /// Host name, e.g. `example.fr`, `https://example.fr` or `example.com/en`
    pub name: String,
    /// Content node the domain is assigned to
    pub root_content_id: ContentId,
    /// Culture served by this domain
    pub culture: Culture,
    /// Wildcard domains (`*1234`) only carry a culture, never a host
    #[serde(default)]
    pub is_wildcard: bool,
    /// Default domain of its root group
    #[serde(default)]
    pub is_default: bool,
}

impl Domain {
    /// Create a domain; names starting with `*` are wildcards
    pub fn new(
        id: i32,
        name: impl Into<String>,
        root_content_id: ContentId,
        culture: Culture,
        is_default: bool,
    ) -> Self {
        let name = name.into();
        let is_wildcard = name.starts_with('*');
        Self {
            id,
            name,
            root_content_id,
            culture,
            is_wildcard,
            is_default,
        }
    }

    /// Resolve the domain name into scheme, authority and path prefix
    ///
    /// Names without a scheme inherit `default_scheme` (the current request's).
    /// Wildcard domains have no URI.
    pub fn uri(&self, default_scheme: &str) -> Option<DomainUri> {
        if self.is_wildcard {
            return None;
        }
        DomainUri::parse(&self.name, default_scheme)
    }
}

/// Scheme, authority and path prefix of a domain name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainUri {
    /// `http` or `https`
    pub scheme: String,
    /// Lower-cased host with optional port
    pub authority: String,
    /// Path below the host, empty or starting with `/` without trailing slash
    pub path_prefix: String,
}

impl DomainUri {
    /// Parse a domain name such as `https://Example.com:8080/en/`
    pub fn parse(name: &str, default_scheme: &str) -> Option<Self> {
        let name = name.trim();
        let (scheme, rest) = match name.split_once("://") {
            Some((scheme, rest)) => (scheme.to_ascii_lowercase(), rest),
            None => (default_scheme.to_ascii_lowercase(), name),
        };

        let (authority, path) = match rest.find('/') {
            Some(idx) => (&rest[..idx], &rest[idx..]),
            None => (rest, ""),
        };

        if authority.is_empty() {
            return None;
        }

        let path_prefix = path.trim_end_matches('/');
        Some(Self {
            scheme,
            authority: authority.to_ascii_lowercase(),
            path_prefix: path_prefix.to_string(),
        })
    }

    /// `scheme://authority`
    pub fn base_url(&self) -> String {
        format!("{}://{}", self.scheme, self.authority)
    }

    /// Whether the domain is served on the given host (case-insensitive)
    pub fn matches_host(&self, host: &str) -> bool {
        self.authority.eq_ignore_ascii_case(host.trim())
    }

    /// Prepend the path prefix to an assembled path
    ///
    /// The site root below a prefix (`/`) keeps its trailing slash only with
    /// directory URLs and `add_trailing_slash`, like any other path.
    pub fn join_path(&self, path: &str, options: &SegmentOptions) -> String {
        if self.path_prefix.is_empty() {
            return path.to_string();
        }
        if path == "/" {
            return if options.use_directory_urls && options.add_trailing_slash {
                format!("{}/", self.path_prefix)
            } else {
                self.path_prefix.clone()
            };
        }
        format!("{}{}", self.path_prefix, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn culture(tag: &str) -> Culture {
        Culture::new(tag).unwrap()
    }

    #[test]
    fn test_domain_wildcard_detection() {
        let wildcard = Domain::new(1, "*1234", ContentId::new(1234), culture("fr-FR"), false);
        assert!(wildcard.is_wildcard);
        assert!(wildcard.uri("http").is_none());

        let host = Domain::new(2, "example.fr", ContentId::new(1234), culture("fr-FR"), false);
        assert!(!host.is_wildcard);
    }

    #[test]
    fn test_domain_uri_plain_host() {
        let uri = DomainUri::parse("Example.FR", "http").unwrap();
        assert_eq!(uri.scheme, "http");
        assert_eq!(uri.authority, "example.fr");
        assert_eq!(uri.path_prefix, "");
        assert_eq!(uri.base_url(), "http://example.fr");
    }

    #[test]
    fn test_domain_uri_with_scheme_port_and_path() {
        let uri = DomainUri::parse("https://example.com:8443/en/", "http").unwrap();
        assert_eq!(uri.scheme, "https");
        assert_eq!(uri.authority, "example.com:8443");
        assert_eq!(uri.path_prefix, "/en");
        let options = SegmentOptions::default();
        assert_eq!(uri.join_path("/home/", &options), "/en/home/");
        assert_eq!(uri.join_path("/", &options), "/en/");
    }

    #[test]
    fn test_domain_uri_prefix_root_follows_slash_options() {
        let uri = DomainUri::parse("example.com/en", "http").unwrap();
        let no_slash = SegmentOptions {
            add_trailing_slash: false,
            ..SegmentOptions::default()
        };
        let no_directories = SegmentOptions {
            use_directory_urls: false,
            ..SegmentOptions::default()
        };

        assert_eq!(uri.join_path("/", &no_slash), "/en");
        assert_eq!(uri.join_path("/", &no_directories), "/en");
        assert_eq!(uri.join_path("/home", &no_slash), "/en/home");
    }

    #[test]
    fn test_domain_uri_matches_host() {
        let uri = DomainUri::parse("example.fr", "http").unwrap();
        assert!(uri.matches_host("EXAMPLE.fr"));
        assert!(!uri.matches_host("example.us"));
    }

    #[test]
    fn test_domain_uri_rejects_empty_authority() {
        assert!(DomainUri::parse("http:///en", "http").is_none());
        assert!(DomainUri::parse("", "http").is_none());
    }
}
