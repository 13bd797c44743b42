//! Error types for the sanitizer library.
//!
//! Sanitizing never fails. Errors only come out of building a custom
//! [`Policy`](crate::Policy) or [`SanitizerOptions`](crate::SanitizerOptions).

use thiserror::Error;

/// Result type alias for sanitizer configuration
pub type Result<T> = std::result::Result<T, SanitizerError>;

/// Errors that can occur while configuring the sanitizer
#[derive(Error, Debug)]
pub enum SanitizerError {
    /// A caller-supplied tag pattern failed to compile
    #[error("Invalid {which} tag pattern: {source}")]
    InvalidPattern {
        which: &'static str,
        #[source]
        source: regex::Error,
    },

    /// A URL scheme in the options is empty or contains illegal characters
    #[error("Invalid URL scheme: {0:?}")]
    InvalidScheme(String),
}
