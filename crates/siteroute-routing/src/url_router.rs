//! URL router
//!
//! Public entry point for URL resolution. The router coordinates:
//! - the live [`PublishedSnapshot`] and its route cache
//! - an ordered list of [`UrlProvider`]s, first success wins
//! - the router-wide default [`UrlMode`]
//!
//! Unresolvable ids come back as the [`NOT_FOUND_URL`] sentinel rather than
//! an error, since links to unpublished content are routine while rendering.

use siteroute_core::{
    ContentId, Culture, Error, RequestContext, Result, Route, RoutingSettings, UrlMode,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use crate::provider::{DefaultUrlProvider, UrlProvider, UrlRequest};
use crate::snapshot::{PublishedSnapshot, SnapshotService};

/// URL returned for content that cannot be resolved
pub const NOT_FOUND_URL: &str = "#";

/// Router that delegates URL resolution to an ordered list of providers
pub struct UrlRouter {
    /// Source of the live snapshot
    snapshots: Arc<SnapshotService>,

    /// Providers, tried in order
    providers: Vec<Arc<dyn UrlProvider>>,

    /// Default mode (encoded as u8 for atomic updates)
    mode: AtomicU8,
}

impl UrlRouter {
    /// Create a router over the given providers
    pub fn new(
        snapshots: Arc<SnapshotService>,
        providers: Vec<Arc<dyn UrlProvider>>,
        mode: UrlMode,
    ) -> Self {
        Self {
            snapshots,
            providers,
            mode: AtomicU8::new(mode as u8),
        }
    }

    /// Create a router with only the default provider
    pub fn with_defaults(snapshots: Arc<SnapshotService>, settings: RoutingSettings) -> Self {
        let mode = settings.default_mode;
        let provider: Arc<dyn UrlProvider> = Arc::new(DefaultUrlProvider::new(Arc::new(settings)));
        Self::new(snapshots, vec![provider], mode)
    }

    /// Current default mode
    pub fn mode(&self) -> UrlMode {
        UrlMode::from(self.mode.load(Ordering::Acquire))
    }

    /// Change the default mode for subsequent calls
    pub fn set_mode(&self, mode: UrlMode) {
        self.mode.store(mode as u8, Ordering::Release);
    }

    /// The live snapshot
    pub fn snapshot(&self) -> Arc<PublishedSnapshot> {
        self.snapshots.current()
    }

    /// Resolve the URL of a node, or [`NOT_FOUND_URL`]
    ///
    /// `mode` overrides the router's default for this call only.
    pub fn get_url(
        &self,
        id: ContentId,
        culture: Option<&Culture>,
        mode: Option<UrlMode>,
        context: &RequestContext,
    ) -> String {
        match self.try_get_url(id, culture, mode, context) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!(id = %id, error = %e, "URL not resolvable");
                NOT_FOUND_URL.to_string()
            }
        }
    }

    /// Resolve the URL of a node, keeping the reason for failures
    ///
    /// # Errors
    /// The first provider's error when every provider fails:
    /// - `Error::ContentNotFound` for unknown or unpublished nodes
    /// - `Error::CultureNotFound` when the culture has no matching domain
    pub fn try_get_url(
        &self,
        id: ContentId,
        culture: Option<&Culture>,
        mode: Option<UrlMode>,
        context: &RequestContext,
    ) -> Result<String> {
        let snapshot = self.snapshots.current();
        let request = UrlRequest {
            id,
            culture: culture.cloned(),
            mode: mode.unwrap_or_else(|| self.mode()),
            context: context.clone(),
        };

        let mut first_error = None;
        for provider in &self.providers {
            match provider.get_url(&snapshot, &request) {
                Ok(url) => return Ok(url),
                Err(e) => {
                    tracing::trace!(
                        provider = provider.name(),
                        error = %e,
                        "Provider could not resolve URL"
                    );
                    first_error.get_or_insert(e);
                }
            }
        }

        Err(first_error.unwrap_or(Error::ContentNotFound { id }))
    }

    /// Absolute URLs of a node on every other domain, across all providers
    pub fn get_other_urls(&self, id: ContentId, context: &RequestContext) -> Vec<String> {
        let snapshot = self.snapshots.current();
        let mut urls: Vec<String> = Vec::new();
        for provider in &self.providers {
            for url in provider.get_other_urls(&snapshot, id, context) {
                if !urls.contains(&url) {
                    urls.push(url);
                }
            }
        }
        urls
    }

    /// Node addressed by a route, served from the route cache when possible
    pub fn get_content_id_by_route(
        &self,
        route: &Route,
        culture: Option<&Culture>,
    ) -> Option<ContentId> {
        self.snapshots.current().get_id_by_route(route, culture)
    }
}

impl std::fmt::Debug for UrlRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UrlRouter")
            .field("providers", &self.providers.iter().map(|p| p.name()).collect::<Vec<_>>())
            .field("mode", &self.mode())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::mock;
    use siteroute_core::{ContentTree, NoDomains};

    mock! {
        pub Provider {}

        impl UrlProvider for Provider {
            fn name(&self) -> &'static str;
            fn get_url(&self, snapshot: &PublishedSnapshot, request: &UrlRequest) -> Result<String>;
            fn get_other_urls(
                &self,
                snapshot: &PublishedSnapshot,
                id: ContentId,
                context: &RequestContext,
            ) -> Vec<String>;
        }
    }

    struct EmptyTree;

    impl ContentTree for EmptyTree {
        fn get_route_by_id(&self, _id: ContentId, _culture: Option<&Culture>) -> Option<Route> {
            None
        }

        fn get_id_by_route(&self, _route: &Route, _culture: Option<&Culture>) -> Option<ContentId> {
            None
        }

        fn top_level_segment(&self, _culture: Option<&Culture>) -> Option<String> {
            None
        }
    }

    fn snapshots() -> Arc<SnapshotService> {
        Arc::new(SnapshotService::new(Arc::new(EmptyTree), Arc::new(NoDomains)))
    }

    fn failing_provider(error: fn(ContentId) -> Error) -> MockProvider {
        let mut provider = MockProvider::new();
        provider.expect_name().return_const("failing");
        provider
            .expect_get_url()
            .returning(move |_, request| Err(error(request.id)));
        provider
    }

    #[test]
    fn test_first_successful_provider_wins() {
        let first = failing_provider(|id| Error::ContentNotFound { id });

        let mut second = MockProvider::new();
        second.expect_name().return_const("second");
        second
            .expect_get_url()
            .times(1)
            .returning(|_, _| Ok("/from-second/".to_string()));

        let mut third = MockProvider::new();
        third.expect_name().return_const("third");
        third.expect_get_url().never();

        let router = UrlRouter::new(
            snapshots(),
            vec![Arc::new(first), Arc::new(second), Arc::new(third)],
            UrlMode::Auto,
        );

        let url = router.get_url(ContentId::new(1), None, None, &RequestContext::default());
        assert_eq!(url, "/from-second/");
    }

    #[test]
    fn test_all_providers_failing_returns_sentinel() {
        let router = UrlRouter::new(
            snapshots(),
            vec![Arc::new(failing_provider(|id| Error::ContentNotFound { id }))],
            UrlMode::Auto,
        );

        let url = router.get_url(ContentId::new(1), None, None, &RequestContext::default());
        assert_eq!(url, NOT_FOUND_URL);
    }

    #[test]
    fn test_try_get_url_keeps_first_error() {
        let culture_error = |id: ContentId| Error::CultureNotFound {
            id,
            culture: Culture::new("de-DE").unwrap(),
        };
        let router = UrlRouter::new(
            snapshots(),
            vec![
                Arc::new(failing_provider(culture_error)),
                Arc::new(failing_provider(|id| Error::ContentNotFound { id })),
            ],
            UrlMode::Auto,
        );

        let result = router.try_get_url(ContentId::new(7), None, None, &RequestContext::default());
        assert!(matches!(result, Err(Error::CultureNotFound { .. })));
    }

    #[test]
    fn test_no_providers_is_not_found() {
        let router = UrlRouter::new(snapshots(), vec![], UrlMode::Auto);
        let result = router.try_get_url(ContentId::new(7), None, None, &RequestContext::default());
        assert!(matches!(result, Err(Error::ContentNotFound { .. })));
    }

    #[test]
    fn test_explicit_mode_overrides_default() {
        let mut provider = MockProvider::new();
        provider.expect_name().return_const("echo");
        provider
            .expect_get_url()
            .returning(|_, request| Ok(request.mode.to_string()));

        let router = UrlRouter::new(snapshots(), vec![Arc::new(provider)], UrlMode::Relative);
        let context = RequestContext::default();

        assert_eq!(router.get_url(ContentId::new(1), None, None, &context), "relative");
        assert_eq!(
            router.get_url(ContentId::new(1), None, Some(UrlMode::Absolute), &context),
            "absolute"
        );

        router.set_mode(UrlMode::Absolute);
        assert_eq!(router.mode(), UrlMode::Absolute);
        assert_eq!(router.get_url(ContentId::new(1), None, None, &context), "absolute");
    }

    #[test]
    fn test_other_urls_are_deduplicated_in_order() {
        let mut first = MockProvider::new();
        first.expect_name().return_const("first");
        first
            .expect_get_other_urls()
            .returning(|_, _, _| vec!["http://a/".to_string(), "http://b/".to_string()]);

        let mut second = MockProvider::new();
        second.expect_name().return_const("second");
        second
            .expect_get_other_urls()
            .returning(|_, _, _| vec!["http://b/".to_string(), "http://c/".to_string()]);

        let router = UrlRouter::new(
            snapshots(),
            vec![Arc::new(first), Arc::new(second)],
            UrlMode::Auto,
        );

        assert_eq!(
            router.get_other_urls(ContentId::new(1), &RequestContext::default()),
            vec!["http://a/", "http://b/", "http://c/"]
        );
    }
}
