//! Lexical scanning of untrusted markup.
//!
//! [`Tokenizer`] splits the input into raw spans in a single left-to-right pass:
//! literal text runs, `<!-- ... -->` comments and `<...>` tag-like spans. An
//! unterminated comment or tag swallows the rest of the input, so the scan
//! never fails and always advances. [`Token::classify`] then turns each span
//! into a typed [`Token`].
//!
//! ```rust
//! use htmlsanitizer::{Token, Tokenizer};
//!
//! let tokens: Vec<Token> = Tokenizer::new("<b>hi</b>").map(Token::classify).collect();
//! assert_eq!(tokens.len(), 3);
//! ```

use crate::constants::REGEXPS;

const COMMENT_OPEN: &str = "<!--";
const COMMENT_CLOSE: &str = "-->";

/// Iterator over the raw lexical spans of a document.
///
/// Concatenating every span yields the input back unchanged.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn span_end(&self, start: usize, search_from: usize, marker: &str) -> usize {
        match self.input[search_from..].find(marker) {
            Some(idx) => search_from + idx + marker.len(),
            None => self.input.len(),
        }
        .max(start + 1)
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let start = self.pos;
        let rest = &self.input[start..];
        if rest.is_empty() {
            return None;
        }

        let end = if rest.starts_with(COMMENT_OPEN) {
            // `<!-->` closes immediately, as browsers treat it
            self.span_end(start, start + 2, COMMENT_CLOSE)
        } else if rest.starts_with('<') {
            self.span_end(start, start + 1, ">")
        } else {
            match rest.find('<') {
                Some(idx) => start + idx,
                None => self.input.len(),
            }
        };

        self.pos = end;
        Some(&self.input[start..end])
    }
}

/// A classified lexical span
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// `<!-- ... -->`, possibly unterminated
    Comment(&'a str),

    /// `<name attrs>` or `<name attrs/>`
    OpenTag {
        /// Lowercased tag name
        name: String,
        /// Everything between the name and the closing `>`
        body: &'a str,
        /// Written as `<name .../>` in the source
        self_closing: bool,
        raw: &'a str,
    },

    /// `</name>`
    CloseTag {
        /// Lowercased tag name
        name: String,
        raw: &'a str,
    },

    /// Literal text, including `<` runs that do not form a tag
    Text(&'a str),
}

impl<'a> Token<'a> {
    /// Classify a span produced by [`Tokenizer`].
    pub fn classify(span: &'a str) -> Self {
        if span.starts_with(COMMENT_OPEN) {
            return Token::Comment(span);
        }
        if !span.starts_with('<') {
            return Token::Text(span);
        }

        if let Some(caps) = REGEXPS.tag_start.captures(span) {
            let name = caps[1].to_lowercase();
            let body = caps.get(2).map_or("", |m| m.as_str());
            return Token::OpenTag {
                name,
                body,
                self_closing: body.trim_end().ends_with('/'),
                raw: span,
            };
        }

        if let Some(caps) = REGEXPS.tag_close.captures(span) {
            return Token::CloseTag {
                name: caps[1].to_lowercase(),
                raw: span,
            };
        }

        Token::Text(span)
    }
}

/// Tokenize and classify a whole document.
pub fn tokenize(input: &str) -> impl Iterator<Item = Token<'_>> {
    Tokenizer::new(input).map(Token::classify)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(input: &str) -> Vec<&str> {
        Tokenizer::new(input).collect()
    }

    #[test]
    fn test_splits_text_and_tags() {
        assert_eq!(
            spans("hello <b>world</b>!"),
            vec!["hello ", "<b>", "world", "</b>", "!"]
        );
    }

    #[test]
    fn test_comment_is_one_span() {
        assert_eq!(
            spans("a<!-- <b>x</b> -->c"),
            vec!["a", "<!-- <b>x</b> -->", "c"]
        );
        assert_eq!(spans("<!-->x"), vec!["<!-->", "x"]);
    }

    #[test]
    fn unterminated_spans_consume_the_rest() {
        assert_eq!(spans("x<!-- never closed <b>"), vec!["x", "<!-- never closed <b>"]);
        assert_eq!(spans("x<div class"), vec!["x", "<div class"]);
        assert_eq!(spans("<"), vec!["<"]);
    }

    #[test]
    fn spans_cover_the_input() {
        let input = "a < b > c <<i>> <!-- -- --> </ >\u{e9}";
        assert_eq!(spans(input).concat(), input);
    }

    #[test]
    fn test_classify_open_tag() {
        match Token::classify(r#"<A HREF="x">"#) {
            Token::OpenTag {
                name,
                body,
                self_closing,
                ..
            } => {
                assert_eq!(name, "a");
                assert_eq!(body, r#" HREF="x""#);
                assert!(!self_closing);
            }
            other => panic!("unexpected token {:?}", other),
        }
    }

    #[test]
    fn test_classify_self_closing() {
        match Token::classify("<br />") {
            Token::OpenTag {
                name, self_closing, ..
            } => {
                assert_eq!(name, "br");
                assert!(self_closing);
            }
            other => panic!("unexpected token {:?}", other),
        }
    }

    #[test]
    fn test_classify_close_and_text() {
        assert_eq!(
            Token::classify("</B >"),
            Token::CloseTag {
                name: "b".to_string(),
                raw: "</B >"
            }
        );
        assert_eq!(Token::classify("<div"), Token::Text("<div"));
        assert_eq!(Token::classify("<!DOCTYPE html>"), Token::Text("<!DOCTYPE html>"));
        assert_eq!(Token::classify("< b>"), Token::Text("< b>"));
        assert_eq!(Token::classify("<!-- x"), Token::Comment("<!-- x"));
    }
}
