//! The sanitizing state machine and its convenience entry points.
//!
//! [`Sanitizer`] walks the token stream once, keeping a stack of open,
//! accepted tags. Every token either becomes cleaned markup, becomes escaped
//! text, or is dropped; rejections are recorded in the [`SanitizeResult`].
//! Tags still open at the end of input are closed, so the HTML output is always
//! balanced.
//!
//! ## Example
//!
//! ```rust
//! use htmlsanitizer::{Policy, Sanitizer, SanitizerOptions};
//!
//! let sanitizer = Sanitizer::new(Policy::default(), SanitizerOptions::default())?;
//! let result = sanitizer.sanitize(r#"<p>Hello <b>world<script>alert(1)</script></p>"#);
//!
//! assert_eq!(result.html(), "<p>Hello <b>world</b></p>");
//! assert_eq!(result.text(), "Hello world");
//! assert!(!result.is_valid());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::{
    attributes::{requires_url, AttributeFilter},
    error::Result,
    options::SanitizerOptions,
    policy::{Policy, TagClass},
    result::SanitizeResult,
    tokenizer::{tokenize, Token},
    url_validator::{AbsoluteUrlValidator, UrlValidator},
    utils,
};
use log::trace;
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

static DEFAULT_SANITIZER: Lazy<Sanitizer> = Lazy::new(Sanitizer::default);

/// A configured sanitizer.
///
/// Holds only immutable configuration, so a single instance can be shared
/// across threads; every call to [`sanitize`](Sanitizer::sanitize) gets its own
/// tag stack and result.
#[derive(Clone)]
pub struct Sanitizer {
    policy: Policy,
    options: SanitizerOptions,
    url_validator: Arc<dyn UrlValidator>,
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self {
            policy: Policy::default(),
            options: SanitizerOptions::default(),
            url_validator: Arc::new(AbsoluteUrlValidator),
        }
    }
}

impl std::fmt::Debug for Sanitizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sanitizer")
            .field("policy", &self.policy)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Sanitizer {
    /// Create a sanitizer from a policy and options.
    ///
    /// # Errors
    /// Returns [`SanitizerError::InvalidScheme`](crate::SanitizerError::InvalidScheme)
    /// if the options name an illegal URL scheme.
    pub fn new(policy: Policy, options: SanitizerOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            policy,
            options,
            url_validator: Arc::new(AbsoluteUrlValidator),
        })
    }

    /// Replace the URL validator used for `href`, `src` and style `url(...)`.
    pub fn with_url_validator(mut self, validator: impl UrlValidator + 'static) -> Self {
        self.url_validator = Arc::new(validator);
        self
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn options(&self) -> &SanitizerOptions {
        &self.options
    }

    /// Sanitize `html`. Never fails; hostile input yields less output and
    /// `is_valid() == false`.
    pub fn sanitize(&self, html: &str) -> SanitizeResult {
        let mut run = Run::new(self);
        for token in tokenize(html) {
            run.step(token);
        }
        run.finish()
    }
}

/// Open, accepted tags, innermost last.
///
/// `open` counts the names on the stack so membership checks never walk it;
/// the stack is only searched for a name known to be present, and every entry
/// passed over is popped right after.
#[derive(Debug, Default)]
struct TagStack {
    names: Vec<String>,
    open: HashMap<String, usize>,
}

impl TagStack {
    fn push(&mut self, name: String) {
        *self.open.entry(name.clone()).or_insert(0) += 1;
        self.names.push(name);
    }

    fn contains(&self, name: &str) -> bool {
        self.open.contains_key(name)
    }

    /// Distance from the top of the nearest `name`, counting the top as 1
    fn depth_of(&self, name: &str) -> Option<usize> {
        if !self.contains(name) {
            return None;
        }
        self.names
            .iter()
            .rev()
            .position(|open| open == name)
            .map(|idx| idx + 1)
    }

    fn pop(&mut self) -> Option<String> {
        let name = self.names.pop()?;
        if let Some(count) = self.open.get_mut(&name) {
            *count -= 1;
            if *count == 0 {
                self.open.remove(&name);
            }
        }
        Some(name)
    }
}

/// State of one sanitizer call
struct Run<'s> {
    policy: &'s Policy,
    filter: AttributeFilter<'s>,
    stack: TagStack,
    result: SanitizeResult,
    /// Forbidden raw-text element whose content is being discarded
    skipping: Option<String>,
}

impl<'s> Run<'s> {
    fn new(sanitizer: &'s Sanitizer) -> Self {
        let options = &sanitizer.options;
        Self {
            policy: &sanitizer.policy,
            filter: AttributeFilter::new(
                sanitizer.url_validator.as_ref(),
                &options.allowed_url_schemes,
                options.rewrite_mailto,
            ),
            stack: TagStack::default(),
            result: SanitizeResult::with_limit(options.max_violations_tracked),
            skipping: None,
        }
    }

    fn step(&mut self, token: Token<'_>) {
        trace!("token {:?}", token);

        if let Some(skipped) = self.skipping.as_deref() {
            match &token {
                Token::CloseTag { name, .. } if name == skipped => self.skipping = None,
                // `</script foo>` still ends the element in a browser
                Token::Text(span) if closes_raw_text(span, skipped) => {
                    self.result.add_invalid_tag(&format!("/{}", skipped));
                    self.skipping = None;
                    return;
                }
                _ => return,
            }
        }

        match token {
            Token::Comment(raw) => self.comment(raw),
            Token::OpenTag {
                name,
                body,
                self_closing,
                raw,
            } => self.open_tag(name, body, self_closing, raw),
            Token::CloseTag { name, raw } => self.close_tag(name, raw),
            Token::Text(content) => self.text(content),
        }
    }

    fn comment(&mut self, raw: &str) {
        let terminated: Cow<'_, str> = if raw.ends_with("-->") {
            Cow::Borrowed(raw)
        } else {
            Cow::Owned(format!("{}-->", raw))
        };
        self.result.append_val(&terminated);
        self.result.add_invalid_tag(&terminated);
    }

    fn open_tag(&mut self, name: String, body: &str, self_closing: bool, raw: &str) {
        match self.policy.classify(&name) {
            TagClass::Forbidden => {
                self.result.add_invalid_tag(&format!("<{}>", name));
                if !self_closing && self.policy.is_raw_text(&name) {
                    self.skipping = Some(name);
                }
            }
            TagClass::Unknown => {
                self.result.add_invalid_tag(raw);
                self.emit_escaped(raw);
            }
            TagClass::Allowed => {
                if let Some(ancestor) = self.policy.required_ancestor(&name) {
                    if !self.stack.contains(ancestor) {
                        self.result.add_invalid_tag(&format!("<{}>", name));
                        return;
                    }
                }

                let attributes = self.filter.filter(&name, body, &mut self.result);
                if requires_url(&name) && !attributes.found_url {
                    trace!("suppressing <{}> without a valid url", name);
                    return;
                }

                let void = self.policy.is_void(&name);
                let clean = match (self_closing, void) {
                    (true, true) => format!("<{}{}/>", name, attributes.rendered),
                    // HTML parsers ignore `/>` on non-void elements
                    (true, false) => format!("<{}{}></{}>", name, attributes.rendered, name),
                    (false, _) => format!("<{}{}>", name, attributes.rendered),
                };
                self.emit_markup(&clean);

                if !(self_closing || void) {
                    self.stack.push(name);
                }
            }
        }
    }

    fn close_tag(&mut self, name: String, raw: &str) {
        if self.policy.is_void(&name) {
            self.result.add_invalid_tag(raw);
            return;
        }

        match self.policy.classify(&name) {
            TagClass::Forbidden => self.result.add_invalid_tag(&format!("/{}", name)),
            TagClass::Unknown => {
                self.result.add_invalid_tag(raw);
                self.emit_escaped(raw);
            }
            TagClass::Allowed => {
                // no matching open tag: swallowed without complaint
                let Some(depth) = self.stack.depth_of(&name) else {
                    return;
                };
                let closing: String = (0..depth)
                    .filter_map(|_| self.stack.pop())
                    .map(|open| format!("</{}>", open))
                    .collect();
                self.emit_markup(&closing);
            }
        }
    }

    fn text(&mut self, content: &str) {
        let encoded = utils::encode_quotes_and_brackets(content);
        self.result.append_val(content);
        self.result.append_html(&encoded);
        self.result.append_text(&encoded);
    }

    /// Accepted markup goes to the html and val buffers only.
    fn emit_markup(&mut self, markup: &str) {
        self.result.append_html(markup);
        self.result.append_val(markup);
    }

    /// Rejected markup is shown as text, never interpreted.
    fn emit_escaped(&mut self, raw: &str) {
        let escaped = utils::encode_quotes_and_brackets(raw);
        self.result.append_html(&escaped);
        self.result.append_val(&escaped);
    }

    fn finish(mut self) -> SanitizeResult {
        while let Some(open) = self.stack.pop() {
            let closing = format!("</{}>", open);
            self.emit_markup(&closing);
        }
        self.result.finalize();
        self.result
    }
}

/// `true` for a span such as `</script foo>` that fails the close-tag shape but
/// still ends the raw-text element `name`.
fn closes_raw_text(span: &str, name: &str) -> bool {
    let Some(rest) = span.strip_prefix("</") else {
        return false;
    };
    match (rest.get(..name.len()), rest.get(name.len()..)) {
        (Some(head), Some(tail)) if head.eq_ignore_ascii_case(name) => {
            tail.is_empty() || tail.starts_with(|c: char| c.is_whitespace() || c == '>' || c == '/')
        }
        _ => false,
    }
}

/// Sanitize with the built-in policy and return the full result.
pub fn sanitizer(html: &str) -> SanitizeResult {
    DEFAULT_SANITIZER.sanitize(html)
}

/// Sanitize with the built-in policy and return HTML safe to embed in a page.
///
/// ```rust
/// assert_eq!(htmlsanitizer::sanitize("<b>hi</b>"), "<b>hi</b>");
/// assert_eq!(htmlsanitizer::sanitize("<script>alert(1)</script>"), "");
/// ```
pub fn sanitize(html: &str) -> String {
    sanitizer(html).html().to_string()
}

/// `true` if `html` passes the built-in policy without a single violation.
///
/// ```rust
/// assert!(htmlsanitizer::is_sanitized("<p>plain <em>markup</em></p>"));
/// assert!(!htmlsanitizer::is_sanitized(r#"<img src="x" onerror="alert(1)">"#));
/// ```
pub fn is_sanitized(html: &str) -> bool {
    sanitizer(html).is_valid()
}

/// Plain text of `html` with tags removed and whitespace collapsed.
///
/// ```rust
/// assert_eq!(htmlsanitizer::get_text("<p>Hello,\n  <b>world</b></p>"), "Hello, world");
/// ```
pub fn get_text(html: &str) -> String {
    sanitizer(html).text().to_string()
}

/// Sanitize with a caller-supplied whitelist and blacklist.
///
/// Tag names are lowercased before matching; anchor the patterns (`^...$`) to
/// match whole names.
///
/// ```rust
/// use regex::Regex;
///
/// let allowed = Regex::new("^(b|i)$").unwrap();
/// let forbidden = Regex::new("^script$").unwrap();
/// let result = htmlsanitizer::sanitize_with_patterns("<b>x</b><p>y</p>", &allowed, &forbidden);
/// assert_eq!(result.html(), "<b>x</b>&lt;p&gt;y&lt;/p&gt;");
/// ```
pub fn sanitize_with_patterns(html: &str, allowed: &Regex, forbidden: &Regex) -> SanitizeResult {
    sanitize_with_policy(html, &Policy::new(allowed.clone(), forbidden.clone()))
}

/// Sanitize with a custom [`Policy`] and default options.
pub fn sanitize_with_policy(html: &str, policy: &Policy) -> SanitizeResult {
    let sanitizer = Sanitizer {
        policy: policy.clone(),
        ..Sanitizer::default()
    };
    sanitizer.sanitize(html)
}

/// Sanitize only when the content's author is untrusted.
///
/// Trusted content is returned unchanged without being scanned.
///
/// ```rust
/// use htmlsanitizer::conditionally_sanitize;
///
/// let raw = "<b>hi</b><script>x()</script>";
/// assert_eq!(conditionally_sanitize(raw, false), raw);
/// assert_eq!(conditionally_sanitize(raw, true), "<b>hi</b>");
/// ```
pub fn conditionally_sanitize(content: &str, untrusted: bool) -> Cow<'_, str> {
    if untrusted {
        Cow::Owned(sanitize(content))
    } else {
        Cow::Borrowed(content)
    }
}
