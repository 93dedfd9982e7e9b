//! Culture (language/region) tags

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// A language/region tag such as `fr-FR`
///
/// Tags are normalised on construction so that equality and hashing are
/// case-insensitive: the language subtag is lower-case, two-letter regions
/// upper-case, four-letter scripts title-case. `_` separators become `-`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Culture(String);

impl Culture {
    /// Parse and normalise a culture tag
    ///
    /// # Errors
    /// - `Error::InvalidCulture` for empty tags, empty subtags, or characters
    ///   other than ASCII alphanumerics and separators
    pub fn new(tag: &str) -> Result<Self> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(Error::InvalidCulture("culture tag is empty".to_string()));
        }

        let mut parts = Vec::new();
        for (i, part) in tag.split(['-', '_']).enumerate() {
            if part.is_empty() || !part.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(Error::InvalidCulture(format!("'{}' is not a culture tag", tag)));
            }
            let normalized = match (i, part.len()) {
                (0, _) => part.to_ascii_lowercase(),
                (_, 2) => part.to_ascii_uppercase(),
                (_, 4) => {
                    let lower = part.to_ascii_lowercase();
                    let mut chars = lower.chars();
                    match chars.next() {
                        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                        None => lower,
                    }
                }
                _ => part.to_ascii_lowercase(),
            };
            parts.push(normalized);
        }

        Ok(Self(parts.join("-")))
    }

    /// Normalised tag
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Neutral language part (`fr` for `fr-FR`)
    pub fn language(&self) -> &str {
        self.0.split('-').next().unwrap_or(&self.0)
    }

    /// Whether this tag carries only a language
    pub fn is_neutral(&self) -> bool {
        !self.0.contains('-')
    }

    /// Whether one tag is the neutral language of the other
    ///
    /// `fr` matches `fr-FR` in either direction; `fr-CA` does not match `fr-FR`.
    pub fn matches_neutral(&self, other: &Culture) -> bool {
        (self.is_neutral() || other.is_neutral()) && self.language() == other.language()
    }
}

impl fmt::Display for Culture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Culture {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for Culture {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(&value)
    }
}

impl TryFrom<&str> for Culture {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Culture> for String {
    fn from(culture: Culture) -> Self {
        culture.0
    }
}
