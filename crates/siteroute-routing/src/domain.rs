//! Domain resolution
//!
//! Picks the domain a URL should be generated on from the set of domains
//! assigned to a route's root node.
//!
//! With a requested culture:
//! 1. exact culture match
//! 2. neutral match (one side is the bare language, e.g. `fr` ↔ `fr-FR`)
//! 3. the group's default domain
//! 4. nothing: a culture-specific URL is never guessed
//!
//! Without a culture:
//! 1. the domain the visitor is currently on
//! 2. the group's default domain
//! 3. the first domain in configuration order
//!
//! Ties are broken by the lowest domain id so the pick is stable within a
//! snapshot.

use siteroute_core::{Culture, Domain, DomainUri};

/// Domain chosen for a URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainMatch {
    /// The selected domain
    pub domain: Domain,
    /// Scheme, authority and path prefix of the domain
    pub uri: DomainUri,
    /// Whether the current request already arrived on this domain's host
    pub is_current_host: bool,
}

/// Stateless domain selection
#[derive(Debug, Clone, Copy, Default)]
pub struct DomainResolver;

impl DomainResolver {
    /// Create a resolver
    pub fn new() -> Self {
        Self
    }

    /// Select a domain for `requested_culture` from `domains`
    ///
    /// `domains` is the configuration-ordered set assigned to one root.
    /// Wildcard domains are ignored. `scheme` is the current request's scheme,
    /// used for domain names that do not carry one.
    pub fn resolve(
        &self,
        domains: &[Domain],
        requested_culture: Option<&Culture>,
        current_host: &str,
        scheme: &str,
    ) -> Option<DomainMatch> {
        let candidates: Vec<(&Domain, DomainUri)> = domains
            .iter()
            .filter_map(|domain| domain.uri(scheme).map(|uri| (domain, uri)))
            .collect();

        if candidates.is_empty() {
            return None;
        }

        let (domain, uri) = match requested_culture {
            Some(culture) => Self::by_culture(&candidates, culture)?,
            None => Self::by_host(&candidates, current_host)?,
        };

        let is_current_host = uri.matches_host(current_host);
        tracing::debug!(
            domain = %domain.name,
            culture = %domain.culture,
            is_current_host,
            "Resolved domain"
        );

        Some(DomainMatch {
            domain: Domain::clone(domain),
            uri: DomainUri::clone(uri),
            is_current_host,
        })
    }

    /// Every usable domain other than `chosen`, in configuration order
    pub fn other_domains<'a>(
        &self,
        domains: &'a [Domain],
        chosen: Option<&Domain>,
        scheme: &str,
    ) -> Vec<(&'a Domain, DomainUri)> {
        domains
            .iter()
            .filter(|domain| chosen.is_none_or(|c| c.id != domain.id))
            .filter_map(|domain| domain.uri(scheme).map(|uri| (domain, uri)))
            .collect()
    }

    fn by_culture<'a>(
        candidates: &'a [(&'a Domain, DomainUri)],
        culture: &Culture,
    ) -> Option<&'a (&'a Domain, DomainUri)> {
        lowest_id(candidates.iter().filter(|(d, _)| d.culture == *culture))
            .or_else(|| {
                lowest_id(
                    candidates
                        .iter()
                        .filter(|(d, _)| d.culture.matches_neutral(culture)),
                )
            })
            .or_else(|| Self::default_domain(candidates))
    }

    fn by_host<'a>(
        candidates: &'a [(&'a Domain, DomainUri)],
        current_host: &str,
    ) -> Option<&'a (&'a Domain, DomainUri)> {
        lowest_id(
            candidates
                .iter()
                .filter(|(_, uri)| uri.matches_host(current_host)),
        )
        .or_else(|| Self::default_domain(candidates))
        .or_else(|| candidates.first())
    }

    fn default_domain<'a>(
        candidates: &'a [(&'a Domain, DomainUri)],
    ) -> Option<&'a (&'a Domain, DomainUri)> {
        let defaults: Vec<_> = candidates.iter().filter(|(d, _)| d.is_default).collect();
        if defaults.len() > 1 {
            tracing::warn!(
                root = %defaults[0].0.root_content_id,
                count = defaults.len(),
                "Multiple default domains assigned to one root, using the lowest id"
            );
        }
        lowest_id(defaults.into_iter())
    }
}

fn lowest_id<'a, I>(iter: I) -> Option<&'a (&'a Domain, DomainUri)>
where
    I: Iterator<Item = &'a (&'a Domain, DomainUri)>,
{
    iter.min_by_key(|(domain, _)| domain.id)
}
