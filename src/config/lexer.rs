//! XML-subset lexer for configuration files.
//!
//! Recognises start tags, end tags, self-closing tags and attributes.
//! Character data between tags carries no meaning in configuration files
//! and is dropped, as are the prolog (`<?xml ...?>`), comments and
//! `<!DOCTYPE ...>` declarations.

use crate::{Error, Result};

/// A token from the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub text: String,
}

/// Source span (byte offsets).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `<name`; text is the name.
    OpenTag,
    /// `</name`; text is the name.
    CloseTag,
    /// Attribute name.
    Name,
    Eq,
    /// Quoted attribute value with entities decoded.
    Value,
    /// `>`
    TagEnd,
    /// `/>`
    SelfClose,
    Eof,
}

/// Build a parse error for `file` pointing at byte `position` of `input`.
pub(crate) fn error_at(input: &str, file: &str, position: usize, message: impl std::fmt::Display) -> Error {
    let line = input[..position.min(input.len())].matches('\n').count() + 1;
    Error::Parse { file: file.to_string(), message: format!("line {line}: {message}") }
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == ':'
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | ':' | '.' | '-')
}

/// Tokenize a configuration document.
pub fn tokenize(input: &str, file: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut pos = 0usize;
    let mut in_tag = false;

    while pos < input.len() {
        let rest = &input[pos..];
        // `rest` is non-empty.
        let ch = rest.chars().next().unwrap_or_default();

        if !in_tag {
            if rest.starts_with("<?") {
                pos += skip_past(input, file, pos, "?>", "Unterminated processing instruction")?;
            } else if rest.starts_with("<!--") {
                pos += skip_past(input, file, pos, "-->", "Unterminated comment")?;
            } else if rest.starts_with("<!") {
                pos += skip_past(input, file, pos, ">", "Unterminated declaration")?;
            } else if let Some(after) = rest.strip_prefix("</") {
                let name = take_name(after);
                if name.is_empty() {
                    return Err(error_at(input, file, pos, "Expected a tag name after '</'"));
                }
                tokens.push(Token {
                    kind: TokenKind::CloseTag,
                    span: Span { start: pos, end: pos + 2 + name.len() },
                    text: name.to_string(),
                });
                pos += 2 + name.len();
                in_tag = true;
            } else if let Some(after) = rest.strip_prefix('<') {
                let name = take_name(after);
                if name.is_empty() {
                    return Err(error_at(input, file, pos, "Expected a tag name after '<'"));
                }
                tokens.push(Token {
                    kind: TokenKind::OpenTag,
                    span: Span { start: pos, end: pos + 1 + name.len() },
                    text: name.to_string(),
                });
                pos += 1 + name.len();
                in_tag = true;
            } else {
                // Character data up to the next tag.
                pos += rest.find('<').unwrap_or(rest.len());
            }
            continue;
        }

        match ch {
            c if c.is_whitespace() => pos += c.len_utf8(),
            '>' => {
                tokens.push(punct(TokenKind::TagEnd, pos, ">"));
                pos += 1;
                in_tag = false;
            }
            '/' if rest.starts_with("/>") => {
                tokens.push(punct(TokenKind::SelfClose, pos, "/>"));
                pos += 2;
                in_tag = false;
            }
            '=' => {
                tokens.push(punct(TokenKind::Eq, pos, "="));
                pos += 1;
            }
            '"' | '\'' => {
                let body = &rest[1..];
                let Some(len) = body.find(ch) else {
                    return Err(error_at(input, file, pos, "Unterminated attribute value"));
                };
                let raw = &body[..len];
                let text = decode_entities(raw).map_err(|m| error_at(input, file, pos, m))?;
                tokens.push(Token {
                    kind: TokenKind::Value,
                    span: Span { start: pos, end: pos + len + 2 },
                    text,
                });
                pos += len + 2;
            }
            c if is_name_start(c) => {
                let name = take_name(rest);
                tokens.push(Token {
                    kind: TokenKind::Name,
                    span: Span { start: pos, end: pos + name.len() },
                    text: name.to_string(),
                });
                pos += name.len();
            }
            c => return Err(error_at(input, file, pos, format!("Unexpected character '{c}' inside a tag"))),
        }
    }

    if in_tag {
        return Err(error_at(input, file, input.len(), "Unexpected end of file inside a tag"));
    }
    tokens.push(Token {
        kind: TokenKind::Eof,
        span: Span { start: input.len(), end: input.len() },
        text: String::new(),
    });
    Ok(tokens)
}

fn punct(kind: TokenKind, pos: usize, text: &str) -> Token {
    Token { kind, span: Span { start: pos, end: pos + text.len() }, text: text.to_string() }
}

fn take_name(s: &str) -> &str {
    let mut chars = s.char_indices();
    match chars.next() {
        Some((_, c)) if is_name_start(c) => {}
        _ => return "",
    }
    let end = chars.find(|&(_, c)| !is_name_char(c)).map_or(s.len(), |(i, _)| i);
    &s[..end]
}

/// Length from `pos` up to and including `terminator`.
fn skip_past(input: &str, file: &str, pos: usize, terminator: &str, message: &str) -> Result<usize> {
    input[pos..]
        .find(terminator)
        .map(|i| i + terminator.len())
        .ok_or_else(|| error_at(input, file, pos, message))
}

fn decode_entities(raw: &str) -> std::result::Result<String, String> {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let Some(semi) = after.find(';') else {
            return Err(format!("Unterminated entity in '{raw}'"));
        };
        let entity = &after[..semi];
        let decoded = match entity {
            "lt" => '<',
            "gt" => '>',
            "amp" => '&',
            "quot" => '"',
            "apos" => '\'',
            _ => {
                let code = if let Some(hex) = entity.strip_prefix("#x") {
                    u32::from_str_radix(hex, 16).ok()
                } else if let Some(dec) = entity.strip_prefix('#') {
                    dec.parse().ok()
                } else {
                    None
                };
                code.and_then(char::from_u32)
                    .ok_or_else(|| format!("Unknown entity '&{entity};'"))?
            }
        };
        out.push(decoded);
        rest = &after[semi + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input, "test.xml").unwrap().iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_self_closing_tag() {
        assert_eq!(kinds(r#"<variable name="a" value='1'/>"#), vec![
            TokenKind::OpenTag,
            TokenKind::Name,
            TokenKind::Eq,
            TokenKind::Value,
            TokenKind::Name,
            TokenKind::Eq,
            TokenKind::Value,
            TokenKind::SelfClose,
            TokenKind::Eof,
        ]);
    }

    #[test]
    fn test_skips_prolog_comments_and_text() {
        let input = "<?xml version=\"1.0\"?>\n<!-- c --><configuration> text </configuration>";
        assert_eq!(kinds(input), vec![
            TokenKind::OpenTag,
            TokenKind::TagEnd,
            TokenKind::CloseTag,
            TokenKind::TagEnd,
            TokenKind::Eof,
        ]);
    }

    #[test]
    fn test_entities() {
        let tokens = tokenize(r#"<v s="a&lt;b&amp;c&#65;&#x42;"/>"#, "f").unwrap();
        assert_eq!(tokens[3].text, "a<b&cAB");
    }

    #[test]
    fn test_errors_carry_file_and_line() {
        let err = tokenize("<a>\n<b x=\"1/>", "cfg.xml").unwrap_err();
        match err {
            Error::Parse { file, message } => {
                assert_eq!(file, "cfg.xml");
                assert!(message.starts_with("line 2:"), "{message}");
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(tokenize("<!-- open", "f").is_err());
        assert!(tokenize("<a b=\"&bogus;\"/>", "f").is_err());
        assert!(tokenize("<a", "f").is_err());
    }
}
