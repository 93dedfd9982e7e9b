//! File-based site configuration for SiteRoute
//!
//! Loads routing settings, the content tree and domain assignments from a
//! YAML or TOML file, and serves them through the `ContentTree` and
//! `DomainCache` traits.

pub mod config;
pub mod file_store;
pub mod memory;

pub use config::{DomainConfig, LoggingConfig, NodeConfig, SiteConfig};
pub use file_store::FileSiteStore;
pub use memory::MemorySite;
