//! Current request context
//!
//! Resolution never reads ambient request state; callers pass the scheme and
//! host the visitor arrived on with every call.

use http::Uri;

use crate::{Error, Result};

/// Scheme and host of the request currently being served
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// `http` or `https`
    pub scheme: String,
    /// Lower-cased host with optional port
    pub host: String,
    /// Preview requests see unpublished content upstream
    pub preview: bool,
}

impl RequestContext {
    /// Create a context from scheme and host
    pub fn new(scheme: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into().to_ascii_lowercase(),
            host: host.into().trim().to_ascii_lowercase(),
            preview: false,
        }
    }

    /// Create a context from the absolute URI of the current request
    ///
    /// # Errors
    /// - `Error::InvalidRequest` if the URI does not parse or is not absolute
    pub fn from_uri(uri: &str) -> Result<Self> {
        let parsed: Uri = uri
            .parse()
            .map_err(|e| Error::InvalidRequest(format!("Invalid request URI '{}': {}", uri, e)))?;

        let scheme = parsed
            .scheme_str()
            .ok_or_else(|| Error::InvalidRequest(format!("Request URI '{}' has no scheme", uri)))?;
        let host = parsed
            .host()
            .ok_or_else(|| Error::InvalidRequest(format!("Request URI '{}' has no host", uri)))?;

        let host = match parsed.port_u16() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };

        Ok(Self::new(scheme, host))
    }

    /// Mark the context as a preview request
    pub fn with_preview(mut self, preview: bool) -> Self {
        self.preview = preview;
        self
    }

    /// `scheme://host`
    pub fn base_url(&self) -> String {
        format!("{}://{}", self.scheme, self.host)
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new("http", "localhost")
    }
}
