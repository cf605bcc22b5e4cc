//! Slash-delimited translation keys.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors produced while parsing a translation key.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("key cannot be empty")]
    Empty,

    #[error("key '{0}' has no path segments")]
    NoSegments(String),

    /// Every segment becomes an XML element in the language file.
    #[error("segment '{segment}' of key '{key}' is not a valid element name")]
    InvalidSegment { key: String, segment: String },
}

/// A normalized translation key, e.g. `/Errors/Required`.
///
/// Keys are case-sensitive and segment order is significant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TranslationKey {
    /// Normalized form, always starting with `/`.
    normalized: String,
    /// Non-empty path segments in order.
    segments: Vec<String>,
}

impl TranslationKey {
    /// Parses a raw key.
    ///
    /// A key not starting with `/` gets one prepended; empty segments are dropped.
    ///
    /// # Examples
    /// ```
    /// use fallback_translator::key::TranslationKey;
    ///
    /// let key = TranslationKey::parse("Errors/Required").unwrap();
    /// assert_eq!(key.as_str(), "/Errors/Required");
    /// assert_eq!(key.segments(), ["Errors", "Required"]);
    /// ```
    pub fn parse(raw: &str) -> Result<Self, KeyError> {
        if raw.trim().is_empty() {
            return Err(KeyError::Empty);
        }

        let normalized = if raw.starts_with('/') { raw.to_string() } else { format!("/{raw}") };

        let segments: Vec<String> =
            normalized.split('/').filter(|s| !s.is_empty()).map(str::to_string).collect();

        if segments.is_empty() {
            return Err(KeyError::NoSegments(normalized));
        }

        if let Some(bad) = segments.iter().find(|s| !is_element_name(s)) {
            return Err(KeyError::InvalidSegment { key: normalized.clone(), segment: bad.clone() });
        }

        Ok(Self { normalized, segments })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.normalized
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The terminal segment, which names the leaf holding the text.
    #[must_use]
    pub fn leaf_name(&self) -> &str {
        self.segments.last().map_or("", String::as_str)
    }
}

impl FromStr for TranslationKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TranslationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.normalized)
    }
}

/// Checks that a segment can be used as an unprefixed XML element name.
fn is_element_name(segment: &str) -> bool {
    let mut chars = segment.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    (first.is_alphabetic() || first == '_')
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}
