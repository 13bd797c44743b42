//! Inline CSS filtering for `style` attributes.

use crate::constants::REGEXPS;
use crate::result::SanitizeResult;
use crate::url_validator::UrlValidator;
use crate::utils;

/// Filters the declarations of a `style` attribute.
///
/// A declaration is dropped (and recorded as a violation) when its value calls
/// `expression(`, `eval(` or `javascript(`, when it references a `url(...)`
/// that is not an absolute URL with an allowed scheme, or when it contains
/// markup or CSS escapes. Surviving declarations keep their order and are
/// written back as `name:value;`.
pub struct StyleValidator<'a> {
    validator: &'a dyn UrlValidator,
    schemes: &'a [String],
}

impl<'a> StyleValidator<'a> {
    pub fn new(validator: &'a dyn UrlValidator, schemes: &'a [String]) -> Self {
        Self { validator, schemes }
    }

    /// Clean a raw style value for `tag`, recording rejected declarations.
    pub fn clean(&self, tag: &str, style: &str, result: &mut SanitizeResult) -> String {
        let mut clean_style = String::new();

        for declaration in REGEXPS.style_declaration.captures_iter(style) {
            let name = declaration[1].to_lowercase();
            let value = declaration[2].trim();

            if let Some(reason) = self.rejection(value) {
                log::trace!("dropping style {}:{} ({})", name, value, reason);
                result.add_invalid_tag(&format!("{} style {}", tag, value));
                continue;
            }

            clean_style.push_str(&name);
            clean_style.push(':');
            clean_style.push_str(&utils::encode_style_value(value));
            clean_style.push(';');
        }

        clean_style
    }

    fn rejection(&self, value: &str) -> Option<&'static str> {
        // `\` escapes can spell out `expression` without matching the pattern
        if value.contains(&['<', '>', '\\'][..]) {
            return Some("markup or escape");
        }
        if REGEXPS.forbidden_style.is_match(value) {
            return Some("forbidden function");
        }
        // CSS closes a dangling `url(` at the end of the value
        let opened = REGEXPS.style_url_open.find_iter(value).count();
        if opened != REGEXPS.style_url.find_iter(value).count() {
            return Some("unterminated url");
        }
        let bad_url = REGEXPS
            .style_url
            .captures_iter(value)
            .any(|caps| !self.validator.is_valid(caps[1].trim(), self.schemes));
        if bad_url {
            return Some("invalid url");
        }
        None
    }
}
