//! String helpers for encoding and normalizing sanitizer output.

/// Encode double quotes, single quotes and angle brackets as HTML entities.
///
/// Ampersands are left alone so encoding an already encoded string is a no-op,
/// which keeps `sanitize(sanitize(x)) == sanitize(x)`.
pub fn encode_quotes_and_brackets(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    for c in source.chars() {
        match c {
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Replace line feeds, carriage returns and form feeds with a space.
pub fn remove_line_feeds(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\n' | '\r' | '\x0C' => ' ',
            _ => c,
        })
        .collect()
}

/// Encode a value for use inside a double-quoted attribute.
pub fn encode_attribute_value(value: &str) -> String {
    encode_quotes_and_brackets(&remove_line_feeds(value))
}

/// Prepare a CSS value for a double-quoted `style` attribute.
///
/// Double quotes become single quotes, which CSS treats the same way. Entity
/// encoding is not an option here: the `;` of `&quot;` would split the
/// declaration the next time the style is parsed.
pub fn encode_style_value(value: &str) -> String {
    remove_line_feeds(value).replace('"', "'")
}

/// Trim and collapse every whitespace run to a single space.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Reduce a recorded violation to the bare tag or attribute name used as the
/// frequency key: `<script>` becomes `script`, `img width 10px` becomes `img`.
pub fn normalize_violation_name(violation: &str) -> String {
    let stripped: String = violation
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | '/'))
        .collect();
    let stripped = stripped.trim();
    let name = match stripped.find(' ') {
        Some(idx) if idx > 0 => &stripped[..idx],
        _ => stripped,
    };
    name.to_lowercase()
}
