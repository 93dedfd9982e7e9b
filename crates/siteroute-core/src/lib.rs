//! SiteRoute Core Types and Traits
//!
//! This crate provides the fundamental types and traits used throughout SiteRoute:
//! - Content identifiers, routes, cultures and domains
//! - URL modes, settings and the explicit request context
//! - Content tree collaborator traits
//! - Core error types

pub mod content;
pub mod culture;
pub mod domain;
pub mod error;
pub mod request;
pub mod settings;
pub mod types;

pub use content::{ContentTree, DomainCache, NoDomains};
pub use culture::Culture;
pub use domain::{Domain, DomainUri};
pub use error::{Error, Result};
pub use request::RequestContext;
pub use settings::{RoutingSettings, SegmentOptions, UrlMode};
pub use types::{ContentId, Route};
