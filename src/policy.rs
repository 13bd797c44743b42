//! Tag policy: which tags are allowed, forbidden, void or structurally
//! constrained.
//!
//! A [`Policy`] is immutable once built and cheap to clone, so one instance can
//! be shared by any number of threads. The built-in policy is available through
//! [`Policy::default`].
//!
//! ```rust
//! use htmlsanitizer::{Policy, TagClass};
//!
//! let policy = Policy::default();
//! assert_eq!(policy.classify("b"), TagClass::Allowed);
//! assert_eq!(policy.classify("script"), TagClass::Forbidden);
//! // forbidden wins over allowed
//! assert_eq!(policy.classify("embed"), TagClass::Forbidden);
//! assert_eq!(policy.classify("marquee"), TagClass::Unknown);
//! ```

use crate::constants::{
    DEFAULT_ALLOWED_TAGS, DEFAULT_FORBIDDEN_TAGS, RAW_TEXT_TAGS, STRUCTURAL_RULES, VOID_TAGS,
};
use crate::error::{Result, SanitizerError};
use once_cell::sync::Lazy;
use regex::Regex;

static DEFAULT_POLICY: Lazy<Policy> = Lazy::new(|| {
    Policy::from_tags(DEFAULT_ALLOWED_TAGS, DEFAULT_FORBIDDEN_TAGS)
        .expect("built-in tag lists compile")
});

/// How a policy treats a tag name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagClass {
    /// Never emitted
    Forbidden,
    /// Emitted after attribute filtering
    Allowed,
    /// Not on either list; emitted as escaped text
    Unknown,
}

/// Whitelist and blacklist of tag names.
///
/// Both lists are regular expressions matched against the lowercased tag
/// name, so callers can supply patterns such as `^h[1-6]$`. The forbidden
/// pattern is consulted first.
#[derive(Debug, Clone)]
pub struct Policy {
    allowed: Regex,
    forbidden: Regex,
}

impl Default for Policy {
    fn default() -> Self {
        DEFAULT_POLICY.clone()
    }
}

impl Policy {
    /// Build a policy from precompiled patterns.
    pub fn new(allowed: Regex, forbidden: Regex) -> Self {
        Self { allowed, forbidden }
    }

    /// Compile a policy from pattern strings.
    ///
    /// # Errors
    /// Returns [`SanitizerError::InvalidPattern`] if either pattern does not compile.
    pub fn from_patterns(allowed: &str, forbidden: &str) -> Result<Self> {
        let allowed = Regex::new(allowed).map_err(|source| SanitizerError::InvalidPattern {
            which: "allowed",
            source,
        })?;
        let forbidden = Regex::new(forbidden).map_err(|source| SanitizerError::InvalidPattern {
            which: "forbidden",
            source,
        })?;
        Ok(Self::new(allowed, forbidden))
    }

    /// Build a policy from plain tag names, matched exactly.
    ///
    /// An empty list matches nothing.
    pub fn from_tags<S: AsRef<str>>(allowed: &[S], forbidden: &[S]) -> Result<Self> {
        Self::from_patterns(&exact_match_pattern(allowed), &exact_match_pattern(forbidden))
    }

    /// Classify a lowercased tag name.
    pub fn classify(&self, name: &str) -> TagClass {
        if self.forbidden.is_match(name) {
            TagClass::Forbidden
        } else if self.allowed.is_match(name) {
            TagClass::Allowed
        } else {
            TagClass::Unknown
        }
    }

    /// Elements that never take a closing tag.
    pub fn is_void(&self, name: &str) -> bool {
        VOID_TAGS.contains(&name)
    }

    /// Forbidden elements whose whole content is discarded.
    pub fn is_raw_text(&self, name: &str) -> bool {
        RAW_TEXT_TAGS.contains(&name)
    }

    /// The ancestor that must already be open before `name` is accepted.
    pub fn required_ancestor(&self, name: &str) -> Option<&'static str> {
        STRUCTURAL_RULES
            .iter()
            .find(|(children, _)| children.contains(&name))
            .map(|(_, ancestor)| *ancestor)
    }
}

fn exact_match_pattern<S: AsRef<str>>(names: &[S]) -> String {
    if names.is_empty() {
        // matches no tag name
        return r"[^\s\S]".to_string();
    }
    let alternatives: Vec<String> = names
        .iter()
        .map(|name| regex::escape(&name.as_ref().to_lowercase()))
        .collect();
    format!("^(?:{})$", alternatives.join("|"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = Policy::default();
        for tag in ["b", "a", "img", "h6", "big", "table", "td"] {
            assert_eq!(policy.classify(tag), TagClass::Allowed, "{}", tag);
        }
        for tag in ["script", "object", "embed", "link", "style", "form", "input"] {
            assert_eq!(policy.classify(tag), TagClass::Forbidden, "{}", tag);
        }
        assert_eq!(policy.classify("iframe"), TagClass::Unknown);
        assert_eq!(policy.classify("bb"), TagClass::Unknown);
    }

    #[test]
    fn test_from_patterns() {
        let policy = Policy::from_patterns("^(b|i|h[1-6])$", "^i$").unwrap();
        assert_eq!(policy.classify("h3"), TagClass::Allowed);
        assert_eq!(policy.classify("i"), TagClass::Forbidden);
        assert_eq!(policy.classify("p"), TagClass::Unknown);
    }

    #[test]
    fn test_invalid_pattern() {
        let err = Policy::from_patterns("^(b", "^x$").unwrap_err();
        assert!(matches!(
            err,
            SanitizerError::InvalidPattern {
                which: "allowed",
                ..
            }
        ));
    }

    #[test]
    fn empty_tag_list_matches_nothing() {
        let policy = Policy::from_tags(&["b"], &[]).unwrap();
        assert_eq!(policy.classify("b"), TagClass::Allowed);
        assert_eq!(policy.classify(""), TagClass::Unknown);
        assert_eq!(policy.classify("script"), TagClass::Unknown);
    }

    #[test]
    fn test_structural_rules() {
        let policy = Policy::default();
        assert_eq!(policy.required_ancestor("tbody"), Some("table"));
        assert_eq!(policy.required_ancestor("tr"), Some("table"));
        assert_eq!(policy.required_ancestor("th"), Some("tr"));
        assert_eq!(policy.required_ancestor("div"), None);
    }

    #[test]
    fn test_void_and_raw_text() {
        let policy = Policy::default();
        assert!(policy.is_void("br"));
        assert!(policy.is_void("img"));
        assert!(!policy.is_void("div"));
        assert!(policy.is_raw_text("script"));
        assert!(!policy.is_raw_text("form"));
    }
}
