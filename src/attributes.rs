//! Attribute filtering for accepted open tags.
//!
//! Every `name="value"` pair of an open tag is checked against
//! [`ATTRIBUTE_RULES`], an ordered table where the first matching rule decides
//! what happens to the attribute. Unquoted or malformed pairs never match the
//! attribute pattern and are dropped without a trace.
//!
//! | order | applies to                      | action                         |
//! |-------|---------------------------------|--------------------------------|
//! | 1     | `href` on `a`                   | [`AttributeAction::RequireUrl`] |
//! | 2     | `src` on `img`, `embed`         | [`AttributeAction::RequireUrl`] |
//! | 3     | `href`, `src` anywhere else     | [`AttributeAction::DropAlways`] |
//! | 4     | `width`, `height`               | [`AttributeAction::RequireDimension`] |
//! | 5     | `style`                         | [`AttributeAction::DelegateToStyle`] |
//! | 6     | `on*` event handlers            | [`AttributeAction::DropAlways`] |
//! | 7     | everything else                 | [`AttributeAction::EncodeAndKeep`] |

use crate::constants::{REGEXPS, URL_REQUIRED_TAGS};
use crate::result::SanitizeResult;
use crate::style::StyleValidator;
use crate::url_validator::UrlValidator;
use crate::utils;

/// What to do with an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeAction {
    /// Keep only if the value is an absolute URL with an allowed scheme
    RequireUrl,
    /// Keep only digits, optionally followed by `%`
    RequireDimension,
    /// Replace the value with the cleaned style
    DelegateToStyle,
    /// Never keep
    DropAlways,
    /// Keep with quotes and brackets encoded
    EncodeAndKeep,
}

/// One row of the attribute table
pub struct AttributeRule {
    /// Short label used in logs
    pub label: &'static str,
    /// `(tag, attribute)` predicate; both names are lowercase
    pub applies: fn(&str, &str) -> bool,
    pub action: AttributeAction,
}

fn anchor_href(tag: &str, attr: &str) -> bool {
    tag == "a" && attr == "href"
}

fn media_src(tag: &str, attr: &str) -> bool {
    matches!(tag, "img" | "embed") && attr == "src"
}

fn stray_url(_tag: &str, attr: &str) -> bool {
    matches!(attr, "href" | "src")
}

fn dimension(_tag: &str, attr: &str) -> bool {
    matches!(attr, "width" | "height")
}

fn style(_tag: &str, attr: &str) -> bool {
    attr == "style"
}

fn event_handler(_tag: &str, attr: &str) -> bool {
    attr.starts_with("on")
}

fn any(_tag: &str, _attr: &str) -> bool {
    true
}

/// Attribute rules in precedence order; the first match wins.
pub static ATTRIBUTE_RULES: [AttributeRule; 7] = [
    AttributeRule {
        label: "anchor href",
        applies: anchor_href,
        action: AttributeAction::RequireUrl,
    },
    AttributeRule {
        label: "media src",
        applies: media_src,
        action: AttributeAction::RequireUrl,
    },
    AttributeRule {
        label: "stray url",
        applies: stray_url,
        action: AttributeAction::DropAlways,
    },
    AttributeRule {
        label: "dimension",
        applies: dimension,
        action: AttributeAction::RequireDimension,
    },
    AttributeRule {
        label: "style",
        applies: style,
        action: AttributeAction::DelegateToStyle,
    },
    AttributeRule {
        label: "event handler",
        applies: event_handler,
        action: AttributeAction::DropAlways,
    },
    AttributeRule {
        label: "default",
        applies: any,
        action: AttributeAction::EncodeAndKeep,
    },
];

/// Find the rule for an attribute of `tag`. Both names must be lowercase.
pub fn rule_for(tag: &str, attr: &str) -> &'static AttributeRule {
    ATTRIBUTE_RULES
        .iter()
        .find(|rule| (rule.applies)(tag, attr))
        .unwrap_or(&ATTRIBUTE_RULES[ATTRIBUTE_RULES.len() - 1])
}

/// Tags that are suppressed unless a URL-bearing attribute validates
pub fn requires_url(tag: &str) -> bool {
    URL_REQUIRED_TAGS.contains(&tag)
}

/// Attributes that survived filtering
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FilteredAttributes {
    /// ` name="value"` pairs ready to follow the tag name
    pub rendered: String,
    /// At least one `RequireUrl` attribute validated
    pub found_url: bool,
}

/// Applies [`ATTRIBUTE_RULES`] to the attribute body of an open tag.
pub struct AttributeFilter<'a> {
    validator: &'a dyn UrlValidator,
    schemes: &'a [String],
    rewrite_mailto: bool,
}

impl<'a> AttributeFilter<'a> {
    pub fn new(validator: &'a dyn UrlValidator, schemes: &'a [String], rewrite_mailto: bool) -> Self {
        Self {
            validator,
            schemes,
            rewrite_mailto,
        }
    }

    /// Filter `body`, recording every rejected attribute in `result`.
    pub fn filter(&self, tag: &str, body: &str, result: &mut SanitizeResult) -> FilteredAttributes {
        let mut filtered = FilteredAttributes::default();

        for caps in REGEXPS.attribute.captures_iter(body) {
            let attr = caps[1].to_lowercase();
            let raw_value = &caps[2];
            let rule = rule_for(tag, &attr);
            log::trace!("<{} {}> matched rule {:?}", tag, attr, rule.label);

            let value = match rule.action {
                AttributeAction::RequireUrl => {
                    if self.is_acceptable_url(tag, raw_value) {
                        filtered.found_url = true;
                        utils::encode_attribute_value(raw_value)
                    } else {
                        result.add_invalid_tag(&format!("{} {}", attr, raw_value));
                        String::new()
                    }
                }
                AttributeAction::RequireDimension => {
                    if !REGEXPS.dimension.is_match(raw_value) {
                        result.add_invalid_tag(&format!("{} {} {}", tag, attr, raw_value));
                        continue;
                    }
                    raw_value.to_string()
                }
                AttributeAction::DelegateToStyle => {
                    StyleValidator::new(self.validator, self.schemes).clean(tag, raw_value, result)
                }
                AttributeAction::DropAlways => {
                    result.add_invalid_tag(&format!("{} {} {}", tag, attr, raw_value));
                    continue;
                }
                AttributeAction::EncodeAndKeep => utils::encode_attribute_value(raw_value),
            };

            filtered.rendered.push(' ');
            filtered.rendered.push_str(&attr);
            filtered.rendered.push_str("=\"");
            filtered.rendered.push_str(&value);
            filtered.rendered.push('"');
        }

        filtered
    }

    fn is_acceptable_url(&self, tag: &str, value: &str) -> bool {
        if self.validator.is_valid(value, self.schemes) {
            return true;
        }
        if !(self.rewrite_mailto && tag == "a") {
            return false;
        }

        // mailto:user@domain is checked as http://www.domain
        let is_mailto = value
            .get(..7)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("mailto:"));
        match value.find('@') {
            Some(at) if is_mailto => {
                let synthetic = format!("http://www.{}", &value[at + 1..]);
                self.validator.is_valid(&synthetic, &http_schemes())
            }
            _ => false,
        }
    }
}

fn http_schemes() -> [String; 1] {
    ["http".to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::url_validator::AbsoluteUrlValidator;

    fn web() -> Vec<String> {
        vec!["http".to_string(), "https".to_string()]
    }

    fn run(tag: &str, body: &str) -> (FilteredAttributes, SanitizeResult) {
        let schemes = web();
        let validator = AbsoluteUrlValidator;
        let mut result = SanitizeResult::default();
        let filtered = AttributeFilter::new(&validator, &schemes, true).filter(tag, body, &mut result);
        (filtered, result)
    }

    #[test]
    fn rule_order_decides_precedence() {
        assert_eq!(rule_for("a", "href").action, AttributeAction::RequireUrl);
        assert_eq!(rule_for("img", "src").action, AttributeAction::RequireUrl);
        assert_eq!(rule_for("div", "href").action, AttributeAction::DropAlways);
        assert_eq!(rule_for("a", "src").action, AttributeAction::DropAlways);
        assert_eq!(rule_for("img", "width").action, AttributeAction::RequireDimension);
        assert_eq!(rule_for("p", "style").action, AttributeAction::DelegateToStyle);
        assert_eq!(rule_for("p", "onmouseover").action, AttributeAction::DropAlways);
        assert_eq!(rule_for("p", "title").action, AttributeAction::EncodeAndKeep);
    }

    #[test]
    fn test_valid_href_is_kept() {
        let (filtered, result) = run("a", r#" href="http://example.com" title="home""#);
        assert_eq!(filtered.rendered, r#" href="http://example.com" title="home""#);
        assert!(filtered.found_url);
        assert!(!result.has_invalid_tags());
    }

    #[test]
    fn test_invalid_href_is_emptied() {
        let (filtered, result) = run("a", r#" href="javascript:alert(1)""#);
        assert_eq!(filtered.rendered, r#" href="""#);
        assert!(!filtered.found_url);
        assert_eq!(result.invalid_tags(), ["href javascript:alert(1)"]);
    }

    #[test]
    fn test_mailto_is_rewritten_for_validation() {
        let (filtered, result) = run("a", r#" href="mailto:joe@example.com?subject=hi""#);
        assert!(filtered.found_url);
        assert_eq!(filtered.rendered, r#" href="mailto:joe@example.com?subject=hi""#);
        assert!(!result.has_invalid_tags());

        let (filtered, _) = run("a", r#" href="MAILTO:joe@not a domain""#);
        assert!(!filtered.found_url);

        let (filtered, _) = run("a", r#" href="mailto:nobody""#);
        assert!(!filtered.found_url);
    }

    #[test]
    fn test_stray_urls_are_dropped() {
        let (filtered, result) = run("div", r#" src="http://example.com/x.js" class="c""#);
        assert_eq!(filtered.rendered, r#" class="c""#);
        assert_eq!(result.invalid_tags(), ["div src http://example.com/x.js"]);
    }

    #[test]
    fn test_dimensions() {
        let (filtered, result) = run("td", r#" width="50%" height="10px""#);
        assert_eq!(filtered.rendered, r#" width="50%""#);
        assert_eq!(result.invalid_tag_count(), 1);
    }

    #[test]
    fn test_event_handlers_never_survive() {
        let (filtered, result) = run("b", r#" OnClick="steal()" onerror="x()" title="t""#);
        assert_eq!(filtered.rendered, r#" title="t""#);
        assert_eq!(result.invalid_tag_count(), 2);
        assert!(result.invalid_tags()[0].contains("onclick"));
    }

    #[test]
    fn test_default_values_are_encoded() {
        let (filtered, _) = run("span", r#" title="<b>it's</b>""#);
        assert_eq!(filtered.rendered, r#" title="&lt;b&gt;it&#39;s&lt;/b&gt;""#);
    }

    #[test]
    fn unquoted_pairs_are_ignored() {
        let (filtered, result) = run("p", r#" class=lead onclick=alert(1) id="x""#);
        assert_eq!(filtered.rendered, r#" id="x""#);
        assert!(!result.has_invalid_tags());
    }

    #[test]
    fn test_style_is_delegated() {
        let (filtered, result) = run("p", r#" style="color:red;width:expression(x)""#);
        assert_eq!(filtered.rendered, r#" style="color:red;""#);
        assert_eq!(result.invalid_tag_count(), 1);
    }

    #[test]
    fn test_requires_url() {
        assert!(requires_url("a"));
        assert!(requires_url("img"));
        assert!(requires_url("embed"));
        assert!(!requires_url("div"));
    }
}
