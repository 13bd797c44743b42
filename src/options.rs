//! Configuration options for the sanitizer.
//!
//! This module provides [`SanitizerOptions`] and [`SanitizerOptionsBuilder`]
//! for tuning limits and URL handling. Which tags are allowed is decided by a
//! [`Policy`](crate::Policy), not by these options.
//!
//! ## Example
//!
//! ```rust
//! use htmlsanitizer::{Policy, Sanitizer, SanitizerOptions};
//!
//! let options = SanitizerOptions::builder()
//!     .max_violations_tracked(20)
//!     .allowed_url_schemes(vec!["https".to_string()])
//!     .build();
//!
//! let sanitizer = Sanitizer::new(Policy::default(), options).unwrap();
//! let result = sanitizer.sanitize(r#"<a href="http://example.com">x</a>"#);
//! assert_eq!(result.html(), "x");
//! ```

use crate::constants::{DEFAULT_URL_SCHEMES, MAX_INVALID_TAGS_TRACKED};
use crate::error::{Result, SanitizerError};

/// Configuration options for the sanitizer.
///
/// ## Creating Options
///
/// ### Using Default
///
/// ```rust
/// use htmlsanitizer::SanitizerOptions;
///
/// let options = SanitizerOptions::default();
/// assert_eq!(options.max_violations_tracked, 100);
/// ```
///
/// ### Using Builder
///
/// ```rust
/// use htmlsanitizer::SanitizerOptions;
///
/// let options = SanitizerOptions::builder()
///     .rewrite_mailto(false)
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct SanitizerOptions {
    /// Maximum number of violations kept verbatim in a result.
    ///
    /// Adversarial input can repeat the same rejected construct millions of
    /// times; only the first violations are stored. Frequency statistics are
    /// not capped. Values below 1 are treated as 1.
    ///
    /// Default: `100`
    pub max_violations_tracked: usize,

    /// Schemes accepted for `<a href>`, `<img src>`, `<embed src>` and
    /// `url(...)` inside styles.
    ///
    /// Default: `["http", "https"]`
    pub allowed_url_schemes: Vec<String>,

    /// Accept `mailto:user@domain` links on `<a>`.
    ///
    /// The part after `@` is validated as if it were `http://www.<domain>`.
    ///
    /// Default: `true`
    pub rewrite_mailto: bool,
}

impl Default for SanitizerOptions {
    fn default() -> Self {
        Self {
            max_violations_tracked: MAX_INVALID_TAGS_TRACKED,
            allowed_url_schemes: DEFAULT_URL_SCHEMES.iter().map(|s| s.to_string()).collect(),
            rewrite_mailto: true,
        }
    }
}

impl SanitizerOptions {
    /// Creates a new builder for SanitizerOptions
    pub fn builder() -> SanitizerOptionsBuilder {
        SanitizerOptionsBuilder::default()
    }

    /// Check that every configured scheme is a legal URL scheme.
    pub fn validate(&self) -> Result<()> {
        match self
            .allowed_url_schemes
            .iter()
            .find(|scheme| !is_valid_scheme(scheme))
        {
            Some(bad) => Err(SanitizerError::InvalidScheme(bad.clone())),
            None => Ok(()),
        }
    }
}

/// RFC 3986: `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`
fn is_valid_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        _ => false,
    }
}

/// Builder for [`SanitizerOptions`].
#[derive(Default)]
pub struct SanitizerOptionsBuilder {
    max_violations_tracked: Option<usize>,
    allowed_url_schemes: Option<Vec<String>>,
    rewrite_mailto: Option<bool>,
}

impl SanitizerOptionsBuilder {
    /// Set the violation ledger cap
    pub fn max_violations_tracked(mut self, max: usize) -> Self {
        self.max_violations_tracked = Some(max);
        self
    }

    /// Set the accepted URL schemes
    pub fn allowed_url_schemes(mut self, schemes: Vec<String>) -> Self {
        self.allowed_url_schemes = Some(schemes);
        self
    }

    /// Enable or disable mailto links
    pub fn rewrite_mailto(mut self, enabled: bool) -> Self {
        self.rewrite_mailto = Some(enabled);
        self
    }

    /// Build the SanitizerOptions
    pub fn build(self) -> SanitizerOptions {
        let defaults = SanitizerOptions::default();
        SanitizerOptions {
            max_violations_tracked: self
                .max_violations_tracked
                .unwrap_or(defaults.max_violations_tracked)
                .max(1),
            allowed_url_schemes: self
                .allowed_url_schemes
                .unwrap_or(defaults.allowed_url_schemes),
            rewrite_mailto: self.rewrite_mailto.unwrap_or(defaults.rewrite_mailto),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let options = SanitizerOptions::builder().build();
        assert_eq!(options.max_violations_tracked, 100);
        assert_eq!(options.allowed_url_schemes, vec!["http", "https"]);
        assert!(options.rewrite_mailto);
    }

    #[test]
    fn test_builder_overrides() {
        let options = SanitizerOptions::builder()
            .max_violations_tracked(0)
            .rewrite_mailto(false)
            .build();
        assert_eq!(options.max_violations_tracked, 1);
        assert!(!options.rewrite_mailto);
    }

    #[test]
    fn test_validate_schemes() {
        assert!(SanitizerOptions::default().validate().is_ok());

        let options = SanitizerOptions::builder()
            .allowed_url_schemes(vec!["https".to_string(), "".to_string()])
            .build();
        assert!(matches!(
            options.validate(),
            Err(SanitizerError::InvalidScheme(s)) if s.is_empty()
        ));

        let options = SanitizerOptions::builder()
            .allowed_url_schemes(vec!["java script".to_string()])
            .build();
        assert!(options.validate().is_err());
    }
}
