//! Tag tables, limits and compiled regular expressions shared by the sanitizer.

use once_cell::sync::Lazy;
use regex::Regex;

/// Initial capacity of each output buffer
pub const DEFAULT_CAPACITY: usize = 256;

/// Maximum number of violations kept verbatim in a result
pub const MAX_INVALID_TAGS_TRACKED: usize = 100;

/// Schemes accepted for `href`, `src` and `url(...)` values by default
pub const DEFAULT_URL_SCHEMES: [&str; 2] = ["http", "https"];

/// Tags that may appear in sanitized output
pub const DEFAULT_ALLOWED_TAGS: &[&str] = &[
    "b",
    "p",
    "i",
    "s",
    "a",
    "img",
    "table",
    "thead",
    "tbody",
    "tfoot",
    "tr",
    "th",
    "td",
    "dd",
    "dl",
    "dt",
    "em",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "li",
    "ul",
    "ol",
    "span",
    "div",
    "strike",
    "strong",
    "sub",
    "sup",
    "pre",
    "del",
    "code",
    "blockquote",
    "kbd",
    "br",
    "hr",
    "area",
    "map",
    "object",
    "embed",
    "param",
    "link",
    "form",
    "small",
    "big",
];

/// Tags that are always rejected, checked before the allowed list
pub const DEFAULT_FORBIDDEN_TAGS: &[&str] =
    &["script", "object", "embed", "link", "style", "form", "input"];

/// Elements without a closing tag
pub const VOID_TAGS: [&str; 3] = ["img", "br", "hr"];

/// Forbidden elements whose content is code rather than prose; everything up
/// to the matching close tag is discarded.
pub const RAW_TEXT_TAGS: [&str; 2] = ["script", "style"];

/// Tags that are dropped entirely unless one URL-bearing attribute validates
pub const URL_REQUIRED_TAGS: [&str; 3] = ["a", "img", "embed"];

/// `(children, required ancestor)` pairs for table structure
pub const STRUCTURAL_RULES: [(&[&str], &str); 2] = [
    (&["thead", "tbody", "tfoot", "tr"], "table"),
    (&["td", "th"], "tr"),
];

/// Compiled regular expressions used across the crate
pub struct Regexps {
    /// `<name ...>` with the name and the raw attribute body
    pub tag_start: Regex,
    /// `</name>`
    pub tag_close: Regex,
    /// `name="value"` pairs inside an attribute body
    pub attribute: Regex,
    /// `name: value;` declarations inside a style attribute
    pub style_declaration: Regex,
    /// `url(...)` references inside a style value, quoted or bare
    pub style_url: Regex,
    /// Any `url(` opening, terminated or not
    pub style_url_open: Regex,
    /// `expression(`, `eval(` and `javascript(` inside a style value
    pub forbidden_style: Regex,
    /// Plain or percentage dimensions
    pub dimension: Regex,
}

pub static REGEXPS: Lazy<Regexps> = Lazy::new(|| Regexps {
    tag_start: Regex::new(r"(?s)^<([A-Za-z0-9_]+)((?:[\s/][^>]*)?)>$").unwrap(),
    tag_close: Regex::new(r"(?s)^</([A-Za-z0-9_]+)\s*>$").unwrap(),
    attribute: Regex::new(r#"([A-Za-z0-9_:-]+)\s*=\s*"([^"]*)""#).unwrap(),
    style_declaration: Regex::new(r"([A-Za-z0-9_-]+)\s*:\s*([^;]+);?").unwrap(),
    style_url: Regex::new(r#"(?i)\burl\s*\(\s*['"]?([^)]*?)['"]?\s*\)"#).unwrap(),
    style_url_open: Regex::new(r"(?i)\burl\s*\(").unwrap(),
    forbidden_style: Regex::new(r"(?i)(?:expression|eval|javascript)\s*\(").unwrap(),
    dimension: Regex::new(r"^[0-9]+%?$").unwrap(),
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_start_requires_terminated_span() {
        let caps = REGEXPS.tag_start.captures(r#"<a href="x">"#).unwrap();
        assert_eq!(&caps[1], "a");
        assert_eq!(&caps[2], r#" href="x""#);
        assert!(REGEXPS.tag_start.captures("<div").is_none());
        assert!(REGEXPS.tag_start.captures("<my-widget>").is_none());
    }

    #[test]
    fn style_url_open_sees_unterminated_references() {
        let value = "url(a.png) URL (//evil.example/track";
        assert_eq!(REGEXPS.style_url_open.find_iter(value).count(), 2);
        assert_eq!(REGEXPS.style_url.find_iter(value).count(), 1);
    }

    #[test]
    fn forbidden_style_is_case_insensitive() {
        assert!(REGEXPS.forbidden_style.is_match("EXPRESSION(alert(1))"));
        assert!(REGEXPS.forbidden_style.is_match("eval (x)"));
        assert!(!REGEXPS.forbidden_style.is_match("red"));
    }

    #[test]
    fn dimension_accepts_digits_and_percent() {
        assert!(REGEXPS.dimension.is_match("100"));
        assert!(REGEXPS.dimension.is_match("50%"));
        assert!(!REGEXPS.dimension.is_match("10px"));
        assert!(!REGEXPS.dimension.is_match("%"));
    }
}
