//! URL providers
//!
//! A [`UrlProvider`] turns a content id into a URL against one published
//! snapshot. The [`UrlRouter`](crate::UrlRouter) holds an ordered list of
//! providers and returns the first success. [`DefaultUrlProvider`] implements
//! route-based resolution:
//!
//! ```text
//! id ──► route (cache / content tree) ──► domain root? ──► DomainResolver
//!                                              │                 │
//!                                              ▼                 ▼
//!                                       segment assembly ──► host prefix ──► URL
//! ```

use siteroute_core::{ContentId, Culture, Error, RequestContext, Result, RoutingSettings, UrlMode};
use std::sync::Arc;

use crate::domain::{DomainMatch, DomainResolver};
use crate::segments;
use crate::snapshot::PublishedSnapshot;

/// A single URL resolution request
#[derive(Debug, Clone)]
pub struct UrlRequest {
    /// Node to resolve
    pub id: ContentId,
    /// Requested culture, if any
    pub culture: Option<Culture>,
    /// Effective mode (explicit or router default)
    pub mode: UrlMode,
    /// Scheme and host of the current request
    pub context: RequestContext,
}

/// Strategy turning content ids into URLs
pub trait UrlProvider: Send + Sync {
    /// Provider name (for logging)
    fn name(&self) -> &'static str;

    /// Resolve a URL
    ///
    /// # Errors
    /// - `Error::ContentNotFound` if the node has no published route
    /// - `Error::CultureNotFound` if the requested culture has no domain
    fn get_url(&self, snapshot: &PublishedSnapshot, request: &UrlRequest) -> Result<String>;

    /// Absolute URLs of the node on every other domain it is reachable from
    fn get_other_urls(
        &self,
        _snapshot: &PublishedSnapshot,
        _id: ContentId,
        _context: &RequestContext,
    ) -> Vec<String> {
        Vec::new()
    }
}

/// Route-based URL provider
#[derive(Debug, Clone)]
pub struct DefaultUrlProvider {
    settings: Arc<RoutingSettings>,
    resolver: DomainResolver,
}

impl DefaultUrlProvider {
    /// Create a provider with the given settings
    pub fn new(settings: Arc<RoutingSettings>) -> Self {
        Self {
            settings,
            resolver: DomainResolver::new(),
        }
    }

    /// Settings in use
    pub fn settings(&self) -> &RoutingSettings {
        &self.settings
    }

    /// Render a route's path, hiding the top-level section for site-rooted routes
    fn assemble_path(
        &self,
        snapshot: &PublishedSnapshot,
        segments: &[&str],
        domain_rooted: bool,
        culture: Option<&Culture>,
    ) -> String {
        let options = self.settings.segment_options();
        let hidden_root = if options.hide_top_level && !domain_rooted {
            snapshot.top_level_segment(culture)
        } else {
            None
        };
        segments::assemble(segments, &options, hidden_root.as_deref())
    }

    /// Combine path and host according to the mode
    fn combine(
        &self,
        path: &str,
        domain: Option<&DomainMatch>,
        mode: UrlMode,
        context: &RequestContext,
    ) -> String {
        let path = match domain {
            Some(found) => found.uri.join_path(path, &self.settings.segment_options()),
            None => path.to_string(),
        };

        let prefix = match mode {
            UrlMode::Relative => false,
            UrlMode::Absolute => true,
            UrlMode::Auto => {
                domain.is_some_and(|found| !found.is_current_host)
                    || self.settings.use_domain_prefixes
            }
        };

        if !prefix {
            return path;
        }

        let base = match domain {
            Some(found) => found.uri.base_url(),
            None => context.base_url(),
        };
        format!("{}{}", base, path)
    }
}

impl UrlProvider for DefaultUrlProvider {
    fn name(&self) -> &'static str {
        "default"
    }

    fn get_url(&self, snapshot: &PublishedSnapshot, request: &UrlRequest) -> Result<String> {
        let route = snapshot
            .get_route_by_id(request.id, request.culture.as_ref())
            .ok_or(Error::ContentNotFound { id: request.id })?;

        let domain = match route.domain_root() {
            Some(root) => {
                let domains = snapshot.assigned_domains(root);
                let found = self.resolver.resolve(
                    &domains,
                    request.culture.as_ref(),
                    &request.context.host,
                    &request.context.scheme,
                );
                if found.is_none()
                    && let Some(culture) = &request.culture
                {
                    tracing::debug!(
                        id = %request.id,
                        culture = %culture,
                        root = %root,
                        "No domain for requested culture"
                    );
                    return Err(Error::CultureNotFound {
                        id: request.id,
                        culture: culture.clone(),
                    });
                }
                found
            }
            None => None,
        };

        let segments = route.segments();
        let path = self.assemble_path(
            snapshot,
            &segments,
            route.domain_root().is_some(),
            request.culture.as_ref(),
        );

        let url = self.combine(&path, domain.as_ref(), request.mode, &request.context);
        tracing::debug!(
            id = %request.id,
            route = %route,
            mode = %request.mode,
            url = %url,
            "Resolved URL"
        );
        Ok(url)
    }

    fn get_other_urls(
        &self,
        snapshot: &PublishedSnapshot,
        id: ContentId,
        context: &RequestContext,
    ) -> Vec<String> {
        let Some(route) = snapshot.get_route_by_id(id, None) else {
            return Vec::new();
        };
        let Some(root) = route.domain_root() else {
            return Vec::new();
        };

        let domains = snapshot.assigned_domains(root);
        let chosen = self
            .resolver
            .resolve(&domains, None, &context.host, &context.scheme);

        self.resolver
            .other_domains(&domains, chosen.as_ref().map(|found| &found.domain), &context.scheme)
            .into_iter()
            .map(|(domain, uri)| {
                let culture_route = snapshot
                    .get_route_by_id(id, Some(&domain.culture))
                    .unwrap_or_else(|| route.clone());
                let segments = culture_route.segments();
                let path =
                    self.assemble_path(snapshot, &segments, true, Some(&domain.culture));
                let options = self.settings.segment_options();
                format!("{}{}", uri.base_url(), uri.join_path(&path, &options))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use siteroute_core::{ContentTree, Domain, DomainCache, Route};
    use std::collections::HashMap;

    struct StaticTree {
        routes: HashMap<(i32, Option<Culture>), Route>,
    }

    impl StaticTree {
        fn new(entries: &[(i32, Option<&str>, &str)]) -> Self {
            let routes = entries
                .iter()
                .map(|(id, culture, route)| {
                    (
                        (*id, culture.map(|c| Culture::new(c).unwrap())),
                        Route::parse(route).unwrap(),
                    )
                })
                .collect();
            Self { routes }
        }
    }

    impl ContentTree for StaticTree {
        fn get_route_by_id(&self, id: ContentId, culture: Option<&Culture>) -> Option<Route> {
            self.routes.get(&(id.get(), culture.cloned())).cloned()
        }

        fn get_id_by_route(&self, route: &Route, culture: Option<&Culture>) -> Option<ContentId> {
            self.routes
                .iter()
                .find(|((_, c), r)| *r == route && c.as_ref() == culture)
                .map(|((id, _), _)| ContentId::new(*id))
        }

        fn top_level_segment(&self, _culture: Option<&Culture>) -> Option<String> {
            Some("home".to_string())
        }
    }

    struct StaticDomains(Vec<Domain>);

    impl DomainCache for StaticDomains {
        fn get_assigned(&self, root: ContentId, include_wildcards: bool) -> Vec<Domain> {
            self.0
                .iter()
                .filter(|d| d.root_content_id == root && (include_wildcards || !d.is_wildcard))
                .cloned()
                .collect()
        }
    }

    fn culture(tag: &str) -> Culture {
        Culture::new(tag).unwrap()
    }

    fn snapshot() -> PublishedSnapshot {
        let tree = StaticTree::new(&[
            (1046, None, "/home"),
            (1173, None, "/home/sub1"),
            (1172, None, "/test-page"),
            (1234, None, "9876/home/test"),
            (1234, Some("fr-FR"), "9876/home/test-fr"),
            (1234, Some("en-US"), "9876/home/test-us"),
        ]);
        let root = ContentId::new(9876);
        let domains = StaticDomains(vec![
            Domain::new(2, "example.us", root, culture("en-US"), true),
            Domain::new(3, "example.fr", root, culture("fr-FR"), false),
            Domain::new(4, "*9876", root, culture("fr-FR"), false),
        ]);
        PublishedSnapshot::new(1, Arc::new(tree), Arc::new(domains))
    }

    fn request(id: i32, culture: Option<&str>, mode: UrlMode, current: &str) -> UrlRequest {
        UrlRequest {
            id: ContentId::new(id),
            culture: culture.map(|c| Culture::new(c).unwrap()),
            mode,
            context: RequestContext::from_uri(current).unwrap(),
        }
    }

    fn provider(settings: RoutingSettings) -> DefaultUrlProvider {
        DefaultUrlProvider::new(Arc::new(settings))
    }

    #[test]
    fn test_site_rooted_route_is_relative_in_auto_mode() {
        let url = provider(RoutingSettings::default())
            .get_url(&snapshot(), &request(1173, None, UrlMode::Auto, "http://example.com/"))
            .unwrap();
        assert_eq!(url, "/home/sub1/");
    }

    #[test]
    fn test_hide_top_level_only_for_first_root() {
        let settings = RoutingSettings {
            hide_top_level_node_from_path: true,
            ..RoutingSettings::default()
        };
        let provider = provider(settings);
        let snapshot = snapshot();
        let auto = |id| request(id, None, UrlMode::Auto, "http://example.com/");

        assert_eq!(provider.get_url(&snapshot, &auto(1046)).unwrap(), "/");
        assert_eq!(provider.get_url(&snapshot, &auto(1173)).unwrap(), "/sub1/");
        assert_eq!(provider.get_url(&snapshot, &auto(1172)).unwrap(), "/test-page/");
    }

    #[test]
    fn test_hide_top_level_ignored_for_domain_rooted_routes() {
        let settings = RoutingSettings {
            hide_top_level_node_from_path: true,
            ..RoutingSettings::default()
        };
        let url = provider(settings)
            .get_url(
                &snapshot(),
                &request(1234, Some("fr-FR"), UrlMode::Auto, "http://example.fr/test"),
            )
            .unwrap();
        assert_eq!(url, "/home/test-fr/");
    }

    #[test]
    fn test_culture_on_current_domain_is_relative() {
        let url = provider(RoutingSettings::default())
            .get_url(
                &snapshot(),
                &request(1234, Some("fr-FR"), UrlMode::Auto, "http://example.fr/test"),
            )
            .unwrap();
        assert_eq!(url, "/home/test-fr/");
    }

    #[test]
    fn test_culture_on_other_domain_is_absolute() {
        let url = provider(RoutingSettings::default())
            .get_url(
                &snapshot(),
                &request(1234, Some("fr-FR"), UrlMode::Auto, "http://example.us/test"),
            )
            .unwrap();
        assert_eq!(url, "http://example.fr/home/test-fr/");
    }

    #[test]
    fn test_culture_without_domain_is_culture_not_found() {
        let domains = StaticDomains(vec![Domain::new(
            3,
            "example.fr",
            ContentId::new(9876),
            culture("fr-FR"),
            false,
        )]);
        let snapshot = PublishedSnapshot::new(
            1,
            Arc::new(StaticTree::new(&[(1234, Some("de-DE"), "9876/home/test-de")])),
            Arc::new(domains),
        );

        let result = provider(RoutingSettings::default()).get_url(
            &snapshot,
            &request(1234, Some("de-DE"), UrlMode::Auto, "http://example.fr/"),
        );
        assert!(matches!(result, Err(Error::CultureNotFound { .. })));
    }

    #[test]
    fn test_unknown_content_is_not_found() {
        let result = provider(RoutingSettings::default()).get_url(
            &snapshot(),
            &request(999999, None, UrlMode::Auto, "http://example.com/"),
        );
        assert!(matches!(result, Err(Error::ContentNotFound { .. })));
    }

    #[test]
    fn test_modes() {
        let provider = provider(RoutingSettings::default());
        let snapshot = snapshot();

        assert_eq!(
            provider
                .get_url(
                    &snapshot,
                    &request(1173, None, UrlMode::Absolute, "https://example.com/x")
                )
                .unwrap(),
            "https://example.com/home/sub1/"
        );
        assert_eq!(
            provider
                .get_url(
                    &snapshot,
                    &request(1234, Some("fr-FR"), UrlMode::Relative, "http://example.us/")
                )
                .unwrap(),
            "/home/test-fr/"
        );
    }

    #[test]
    fn test_domain_prefixes_in_auto_mode() {
        let settings = RoutingSettings {
            use_domain_prefixes: true,
            ..RoutingSettings::default()
        };
        let url = provider(settings)
            .get_url(&snapshot(), &request(1173, None, UrlMode::Auto, "http://example.com/"))
            .unwrap();
        assert_eq!(url, "http://example.com/home/sub1/");
    }

    #[test]
    fn test_other_urls_use_domain_culture_routes() {
        let urls = provider(RoutingSettings::default()).get_other_urls(
            &snapshot(),
            ContentId::new(1234),
            &RequestContext::from_uri("http://example.us/").unwrap(),
        );
        assert_eq!(urls, vec!["http://example.fr/home/test-fr/"]);
    }

    #[test]
    fn test_other_urls_empty_without_domains() {
        let urls = provider(RoutingSettings::default()).get_other_urls(
            &snapshot(),
            ContentId::new(1173),
            &RequestContext::default(),
        );
        assert!(urls.is_empty());
    }

    fn prefixed_snapshot() -> PublishedSnapshot {
        let tree = StaticTree::new(&[(5000, None, "5000/"), (5001, None, "5000/about")]);
        let domains = StaticDomains(vec![Domain::new(
            9,
            "example.com/en",
            ContentId::new(5000),
            culture("en-US"),
            true,
        )]);
        PublishedSnapshot::new(1, Arc::new(tree), Arc::new(domains))
    }

    #[test]
    fn test_path_prefix_root_honours_trailing_slash_setting() {
        let ctx = "http://example.com/en/";
        let snapshot = prefixed_snapshot();

        let with_slash = provider(RoutingSettings::default());
        assert_eq!(
            with_slash.get_url(&snapshot, &request(5000, None, UrlMode::Auto, ctx)).unwrap(),
            "/en/"
        );

        let without_slash = provider(RoutingSettings {
            add_trailing_slash: false,
            ..RoutingSettings::default()
        });
        assert_eq!(
            without_slash.get_url(&snapshot, &request(5000, None, UrlMode::Auto, ctx)).unwrap(),
            "/en"
        );
        assert_eq!(
            without_slash.get_url(&snapshot, &request(5001, None, UrlMode::Auto, ctx)).unwrap(),
            "/en/about"
        );
    }

    #[test]
    fn test_other_region_without_default_is_culture_not_found() {
        let domains = StaticDomains(vec![
            Domain::new(2, "example.us", ContentId::new(9876), culture("en-US"), false),
            Domain::new(3, "example.fr", ContentId::new(9876), culture("fr-FR"), false),
        ]);
        let snapshot = PublishedSnapshot::new(
            1,
            Arc::new(StaticTree::new(&[(1234, Some("fr-CA"), "9876/home/x")])),
            Arc::new(domains),
        );

        let result = provider(RoutingSettings::default()).get_url(
            &snapshot,
            &request(1234, Some("fr-CA"), UrlMode::Auto, "http://example.us/"),
        );
        assert!(matches!(result, Err(Error::CultureNotFound { .. })));
    }
}
