//! Sanitization output and violation accounting.
//!
//! A [`SanitizeResult`] carries three independent representations of the
//! input:
//!
//! - `html`: safe to embed in a page; every rejected construct is removed or
//!   entity-encoded.
//! - `text`: whitespace-normalized plain text for excerpts and search indexing.
//! - `val`: cleaned markup for storage, with minimal encoding.
//!
//! Alongside the buffers it records every violation (capped) and how often each
//! tag or attribute name was rejected, which feeds [`SanitizeResult::is_valid`]
//! and [`SanitizeResult::security_risk_score`].
//!
//! ## Example
//!
//! ```rust
//! use htmlsanitizer::sanitizer;
//!
//! let result = sanitizer(r#"<b onclick="steal()">hi</b><script>x()</script>"#);
//!
//! assert_eq!(result.html(), "<b>hi</b>");
//! assert!(!result.is_valid());
//! assert_eq!(result.most_common_invalid_tag(), Some("script"));
//! assert!(result.security_risk_score() > 30);
//! ```

use crate::constants::{DEFAULT_CAPACITY, MAX_INVALID_TAGS_TRACKED};
use crate::utils;
use log::debug;
use serde::Serialize;
use std::collections::HashMap;

const MAX_RISK_SCORE: usize = 100;

/// Outcome of one sanitizer run.
///
/// Results are produced finalized by the sanitizer; the buffers are never
/// touched again once handed out.
///
/// ## Serialization
///
/// `SanitizeResult` implements `Serialize`, so moderation tooling can store a
/// report next to the content:
///
/// ```rust
/// use htmlsanitizer::sanitizer;
///
/// let report = serde_json::to_value(sanitizer("<b>ok</b>")).unwrap();
/// assert_eq!(report["is_valid"], true);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct SanitizeResult {
    html: String,
    text: String,
    val: String,
    invalid_tags: Vec<String>,
    invalid_tag_counts: HashMap<String, usize>,
    #[serde(skip)]
    first_seen: Vec<String>,
    #[serde(skip)]
    max_tracked: usize,
    is_valid: bool,
    #[serde(skip)]
    finalized: bool,
    total_content_length: usize,
}

impl Default for SanitizeResult {
    fn default() -> Self {
        Self::with_limit(MAX_INVALID_TAGS_TRACKED)
    }
}

impl SanitizeResult {
    /// Create an empty result that keeps at most `max_tracked` violations.
    pub(crate) fn with_limit(max_tracked: usize) -> Self {
        Self {
            html: String::with_capacity(DEFAULT_CAPACITY),
            text: String::with_capacity(DEFAULT_CAPACITY),
            val: String::with_capacity(DEFAULT_CAPACITY),
            invalid_tags: Vec::new(),
            invalid_tag_counts: HashMap::new(),
            first_seen: Vec::new(),
            max_tracked: max_tracked.max(1),
            is_valid: true,
            finalized: false,
            total_content_length: 0,
        }
    }

    /// Sanitized HTML, safe to embed in a page.
    pub fn html(&self) -> &str {
        &self.html
    }

    /// Plain text with tags removed and whitespace collapsed.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Cleaned HTML intended for storage.
    pub fn val(&self) -> &str {
        &self.val
    }

    /// `true` when no violation was recorded.
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// Recorded violations in encounter order, capped at the configured limit.
    pub fn invalid_tags(&self) -> &[String] {
        &self.invalid_tags
    }

    /// Number of recorded violations (capped like [`invalid_tags`](Self::invalid_tags)).
    pub fn invalid_tag_count(&self) -> usize {
        self.invalid_tags.len()
    }

    pub fn has_invalid_tags(&self) -> bool {
        !self.invalid_tags.is_empty()
    }

    /// The most frequently rejected tag or attribute name.
    ///
    /// Ties go to the name that was rejected first.
    pub fn most_common_invalid_tag(&self) -> Option<&str> {
        let mut best: Option<(&str, usize)> = None;
        for name in &self.first_seen {
            let count = self.invalid_tag_counts.get(name).copied().unwrap_or(0);
            if best.map_or(true, |(_, top)| count > top) {
                best = Some((name.as_str(), count));
            }
        }
        best.map(|(name, _)| name)
    }

    /// Rejection counts keyed by normalized tag or attribute name.
    ///
    /// Unlike [`invalid_tags`](Self::invalid_tags) this is not capped.
    pub fn invalid_tag_statistics(&self) -> &HashMap<String, usize> {
        &self.invalid_tag_counts
    }

    /// `true` if any HTML was produced.
    pub fn has_content(&self) -> bool {
        !self.html.is_empty()
    }

    /// Number of characters written to the HTML buffer.
    pub fn total_content_length(&self) -> usize {
        self.total_content_length
    }

    /// Risk score from 0 (clean) to 100.
    ///
    /// Ten points per recorded violation, capped at 100, plus 30 for every
    /// violation mentioning `script` or `eval`, or 20 for one mentioning
    /// `onclick` or `onerror`. The total saturates at 100.
    pub fn security_risk_score(&self) -> usize {
        if self.invalid_tags.is_empty() {
            return 0;
        }

        let mut score = (self.invalid_tags.len() * 10).min(MAX_RISK_SCORE);
        for tag in &self.invalid_tags {
            let lower = tag.to_lowercase();
            if lower.contains("script") || lower.contains("eval") {
                score = (score + 30).min(MAX_RISK_SCORE);
            } else if lower.contains("onclick") || lower.contains("onerror") {
                score = (score + 20).min(MAX_RISK_SCORE);
            }
        }
        score
    }

    pub(crate) fn append_html(&mut self, content: &str) {
        if !content.is_empty() {
            self.html.push_str(content);
            self.total_content_length += content.chars().count();
        }
    }

    /// Append a text chunk, normalizing whitespace and separating chunks with
    /// a single space.
    pub(crate) fn append_text(&mut self, content: &str) {
        let cleaned = utils::normalize_whitespace(content);
        if cleaned.is_empty() {
            return;
        }
        if !self.text.is_empty() {
            self.text.push(' ');
        }
        self.text.push_str(&cleaned);
    }

    pub(crate) fn append_val(&mut self, content: &str) {
        self.val.push_str(content);
    }

    /// Record a violation.
    pub(crate) fn add_invalid_tag(&mut self, tag: &str) {
        if tag.is_empty() {
            return;
        }
        if self.invalid_tags.len() < self.max_tracked {
            self.invalid_tags.push(tag.to_string());
        }

        let name = utils::normalize_violation_name(tag);
        debug!("rejected {:?} ({})", name, tag);
        match self.invalid_tag_counts.get_mut(&name) {
            Some(count) => *count += 1,
            None => {
                self.invalid_tag_counts.insert(name.clone(), 1);
                self.first_seen.push(name);
            }
        }
    }

    /// Compute the validity flag. Calling this more than once has no further
    /// effect.
    pub(crate) fn finalize(&mut self) {
        if self.finalized {
            return;
        }
        self.is_valid = self.invalid_tags.is_empty();
        self.finalized = true;
        debug!(
            "sanitized {} chars, {} violation(s), risk score {}",
            self.total_content_length,
            self.invalid_tags.len(),
            self.security_risk_score()
        );
    }
}
