//! Absolute URL validation.
//!
//! The sanitizer does not decide what a good URL is by itself; it asks a
//! [`UrlValidator`]. [`AbsoluteUrlValidator`] is the default and accepts only
//! absolute URLs with a host whose scheme is in the allowed set.

use url::Url;

/// Decides whether a string is an acceptable absolute URL.
pub trait UrlValidator: Send + Sync {
    /// `true` if `candidate` is a syntactically valid absolute URL using one
    /// of `schemes` (compared case-insensitively).
    fn is_valid(&self, candidate: &str, schemes: &[String]) -> bool;
}

/// Default validator built on the `url` crate.
///
/// The raw string must already be in `scheme://host...` form: the WHATWG
/// parser repairs inputs such as `http:/x` or `http:\\x`, and a repaired URL
/// is not what the author wrote.
#[derive(Debug, Clone, Copy, Default)]
pub struct AbsoluteUrlValidator;

impl UrlValidator for AbsoluteUrlValidator {
    fn is_valid(&self, candidate: &str, schemes: &[String]) -> bool {
        if candidate.is_empty() || candidate.chars().any(is_rejected_char) {
            return false;
        }

        let Some((scheme, rest)) = candidate.split_once("://") else {
            return false;
        };
        if !schemes.iter().any(|s| s.eq_ignore_ascii_case(scheme)) {
            return false;
        }
        if rest.is_empty() || rest.starts_with('/') {
            return false;
        }

        match Url::parse(candidate) {
            Ok(url) => url.host_str().is_some_and(|host| !host.is_empty()),
            Err(_) => false,
        }
    }
}

fn is_rejected_char(c: char) -> bool {
    c.is_whitespace() || c.is_control() || matches!(c, '"' | '\'' | '<' | '>' | '\\' | '`')
}
