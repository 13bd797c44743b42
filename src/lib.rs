//! # htmlsanitizer
//!
//! A single-pass, whitelist-based HTML sanitizer for untrusted markup such as
//! blog comments and entries written by untrusted authors.
//!
//! ## Overview
//!
//! One scan over the input produces three representations and a verdict:
//!
//! - **html**: safe to render; forbidden tags are removed, unknown tags are
//!   shown as escaped text, attributes are filtered and tags are balanced.
//! - **text**: plain text with whitespace collapsed, for excerpts and search.
//! - **val**: cleaned markup for storage.
//! - **is_valid**: `false` as soon as anything had to be rejected.
//!
//! ## Key Features
//!
//! - **Tag whitelist and blacklist**: the blacklist wins when a tag is on both
//! - **Attribute rules**: URL validation for links and images, numeric
//!   dimensions, inline CSS filtering, event handlers always dropped
//! - **Tag balance repair**: closing an outer tag closes everything opened
//!   inside it, and every tag still open at the end is closed
//! - **Violation accounting**: capped ledger, per-name statistics and a 0-100
//!   risk score for moderation workflows
//! - **Never fails**: linear time, no panics, no errors for any input
//!
//! ## Basic Usage
//!
//! ```rust
//! use htmlsanitizer::{get_text, is_sanitized, sanitize};
//!
//! let comment = r#"<p>Nice post! <a href="http://example.com">link</a><script>steal()</script></p>"#;
//!
//! assert_eq!(
//!     sanitize(comment),
//!     r#"<p>Nice post! <a href="http://example.com">link</a></p>"#
//! );
//! assert!(!is_sanitized(comment));
//! assert_eq!(get_text(comment), "Nice post! link");
//! ```
//!
//! ## Full Results
//!
//! ```rust
//! use htmlsanitizer::sanitizer;
//!
//! let result = sanitizer(r#"<img src="javascript:alert(1)" onerror="alert(2)">"#);
//!
//! assert_eq!(result.html(), "");
//! assert_eq!(result.invalid_tag_count(), 2);
//! assert_eq!(result.most_common_invalid_tag(), Some("src"));
//! println!("risk score: {}", result.security_risk_score());
//! ```
//!
//! ## Custom Policies
//!
//! ```rust
//! use htmlsanitizer::{Policy, Sanitizer, SanitizerOptions};
//!
//! let policy = Policy::from_patterns("^(b|i|em|strong|p)$", "^(script|style)$")?;
//! let options = SanitizerOptions::builder().max_violations_tracked(10).build();
//! let sanitizer = Sanitizer::new(policy, options)?;
//!
//! assert_eq!(sanitizer.sanitize("<div><b>x</b></div>").html(), "&lt;div&gt;<b>x</b>&lt;/div&gt;");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Error Handling
//!
//! Sanitizing cannot fail. Only building a policy or options can:
//!
//! ```rust
//! use htmlsanitizer::{Policy, SanitizerError};
//!
//! match Policy::from_patterns("^(b|i", "^script$") {
//!     Ok(_) => unreachable!(),
//!     Err(SanitizerError::InvalidPattern { which, .. }) => assert_eq!(which, "allowed"),
//!     Err(e) => panic!("unexpected error: {}", e),
//! }
//! ```
//!
//! ## Logging
//!
//! Rejections are reported through the [`log`] facade at `debug` level, token
//! transitions at `trace` level. Install any `log` backend to see them.

mod attributes;
mod constants;
mod error;
mod options;
mod policy;
mod result;
mod sanitizer;
mod style;
mod tokenizer;
mod url_validator;
mod utils;

// Public exports
pub use attributes::{rule_for, AttributeAction, AttributeRule, ATTRIBUTE_RULES};
pub use error::{Result, SanitizerError};
pub use options::{SanitizerOptions, SanitizerOptionsBuilder};
pub use policy::{Policy, TagClass};
pub use result::SanitizeResult;
pub use sanitizer::{
    conditionally_sanitize, get_text, is_sanitized, sanitize, sanitize_with_patterns,
    sanitize_with_policy, sanitizer, Sanitizer,
};
pub use tokenizer::{tokenize, Token, Tokenizer};
pub use url_validator::{AbsoluteUrlValidator, UrlValidator};
