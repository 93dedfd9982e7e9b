//! URL generation settings

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Whether generated URLs carry a scheme and host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlMode {
    /// Relative unless the target domain differs from the current host
    #[default]
    Auto = 0,
    /// Never prefix with a host
    Relative = 1,
    /// Always prefix with a host
    Absolute = 2,
}

impl From<u8> for UrlMode {
    fn from(value: u8) -> Self {
        match value {
            1 => UrlMode::Relative,
            2 => UrlMode::Absolute,
            _ => UrlMode::Auto,
        }
    }
}

impl fmt::Display for UrlMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UrlMode::Auto => "auto",
            UrlMode::Relative => "relative",
            UrlMode::Absolute => "absolute",
        };
        f.write_str(name)
    }
}

impl FromStr for UrlMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(UrlMode::Auto),
            "relative" => Ok(UrlMode::Relative),
            "absolute" => Ok(UrlMode::Absolute),
            _ => Err(Error::Config(format!(
                "Invalid URL mode '{}'. Use 'auto', 'relative' or 'absolute'",
                s
            ))),
        }
    }
}

/// Settings driving path assembly and host prefixing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingSettings {
    /// Directory-style URLs (`/home/sub1/`); enables the trailing slash convention
    #[serde(default = "default_true")]
    pub use_directory_urls: bool,

    /// Hide the first root section from every path below it
    #[serde(default)]
    pub hide_top_level_node_from_path: bool,

    /// Append `/` to directory-style paths
    #[serde(default = "default_true")]
    pub add_trailing_slash: bool,

    /// Always prefix URLs with a host in auto mode
    #[serde(default)]
    pub use_domain_prefixes: bool,

    /// Initial mode of a router
    #[serde(default)]
    pub default_mode: UrlMode,
}

impl Default for RoutingSettings {
    fn default() -> Self {
        Self {
            use_directory_urls: true,
            hide_top_level_node_from_path: false,
            add_trailing_slash: true,
            use_domain_prefixes: false,
            default_mode: UrlMode::Auto,
        }
    }
}

impl RoutingSettings {
    /// Options for the segment assembler
    pub fn segment_options(&self) -> SegmentOptions {
        SegmentOptions {
            use_directory_urls: self.use_directory_urls,
            hide_top_level: self.hide_top_level_node_from_path,
            add_trailing_slash: self.add_trailing_slash,
        }
    }
}

/// Flags consumed by path assembly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentOptions {
    pub use_directory_urls: bool,
    pub hide_top_level: bool,
    pub add_trailing_slash: bool,
}

impl Default for SegmentOptions {
    fn default() -> Self {
        RoutingSettings::default().segment_options()
    }
}

fn default_true() -> bool {
    true
}
