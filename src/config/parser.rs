//! Parser for configuration documents.
//!
//! Two stages: [`parse_document`] builds a generic element tree from the
//! token stream, then [`parse_config`] interprets that tree as
//! `<configuration>` with nested `<module>` and `<variable>` elements.

use std::collections::BTreeMap;

use super::lexer::{self, Token, TokenKind};
use crate::{Error, Result};

/// An element of the document tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
    /// Byte offset of the start tag.
    pub position: usize,
}

impl Element {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }
}

/// Parse a document into its single root element.
pub fn parse_document(input: &str, file: &str) -> Result<Element> {
    let tokens = lexer::tokenize(input, file)?;
    let mut parser = Parser { tokens: &tokens, pos: 0, input, file };
    let root = parser.parse_element()?;
    if !parser.at(TokenKind::Eof) {
        return Err(parser.error("Content after the document element"));
    }
    Ok(root)
}

struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
    input: &'t str,
    file: &'t str,
}

impl<'t> Parser<'t> {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> &Token {
        let tok = &self.tokens[self.pos.min(self.tokens.len() - 1)];
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn expect(&mut self, kind: TokenKind) -> Result<&Token> {
        if self.at(kind) {
            Ok(self.advance())
        } else {
            Err(self.error(format!("Expected {kind:?}, found {:?}", self.peek().kind)))
        }
    }

    fn error(&self, message: impl std::fmt::Display) -> Error {
        lexer::error_at(self.input, self.file, self.peek().span.start, message)
    }

    fn parse_element(&mut self) -> Result<Element> {
        let open = self.expect(TokenKind::OpenTag)?;
        let mut element = Element {
            name: open.text.clone(),
            attributes: Vec::new(),
            children: Vec::new(),
            position: open.span.start,
        };

        while self.at(TokenKind::Name) {
            let key = self.advance().text.clone();
            self.expect(TokenKind::Eq)?;
            let value = self.expect(TokenKind::Value)?.text.clone();
            if element.attribute(&key).is_some() {
                return Err(self.error(format!("Duplicate attribute '{key}'")));
            }
            element.attributes.push((key, value));
        }

        if self.at(TokenKind::SelfClose) {
            self.advance();
            return Ok(element);
        }
        self.expect(TokenKind::TagEnd)?;

        while self.at(TokenKind::OpenTag) {
            element.children.push(self.parse_element()?);
        }

        let close = self.expect(TokenKind::CloseTag)?;
        if close.text != element.name {
            let found = close.text.clone();
            return Err(self.error(format!("Mismatched end tag '{found}' for '{}'", element.name)));
        }
        self.expect(TokenKind::TagEnd)?;
        Ok(element)
    }
}

// ============================================================================
// Configuration interpretation
// ============================================================================

/// A scalar `<variable name=".." type=".." value=".."/>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarEntry {
    /// Fully qualified name including enclosing module names.
    pub name: String,
    pub type_tag: String,
    pub value: String,
}

/// An array `<variable>` with `<value index=".." value=".."/>` children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayEntry {
    pub name: String,
    pub type_tag: String,
    /// Raw values keyed by index.
    pub values: BTreeMap<usize, String>,
}

/// Raw entries of a configuration document, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigEntries {
    pub scalars: Vec<ScalarEntry>,
    pub arrays: Vec<ArrayEntry>,
}

/// Parse a configuration document into raw entries.
///
/// Type tags and values are not interpreted here.
pub fn parse_config(input: &str, file: &str) -> Result<ConfigEntries> {
    let root = parse_document(input, file)?;
    let fail = |message: String| Error::Parse { file: file.to_string(), message };

    if root.name != "configuration" {
        return Err(fail(format!("Expected 'configuration' tag instead of: {}", root.name)));
    }

    let mut entries = ConfigEntries::default();
    collect(&root, "", &mut entries, &fail)?;
    Ok(entries)
}

fn collect(
    element: &Element,
    prefix: &str,
    entries: &mut ConfigEntries,
    fail: &dyn Fn(String) -> Error,
) -> Result<()> {
    for child in &element.children {
        match child.name.as_str() {
            "variable" => parse_variable(child, prefix, entries, fail)?,
            "module" => {
                let name = child
                    .attribute("name")
                    .ok_or_else(|| fail("Missing attribute 'name' for the 'module' tag.".into()))?;
                collect(child, &format!("{prefix}{name}/"), entries, fail)?;
            }
            other => return Err(fail(format!("Unknown tag: {other}"))),
        }
    }
    Ok(())
}

fn parse_variable(
    element: &Element,
    prefix: &str,
    entries: &mut ConfigEntries,
    fail: &dyn Fn(String) -> Error,
) -> Result<()> {
    let name = element
        .attribute("name")
        .ok_or_else(|| fail("Missing attribute 'name' for the 'variable' tag.".into()))?;
    let type_tag = element
        .attribute("type")
        .ok_or_else(|| fail("Missing attribute 'type' for the 'variable' tag.".into()))?;
    let name = format!("{prefix}{name}");

    match (element.attribute("value"), element.children.is_empty()) {
        (Some(value), true) => {
            entries.scalars.push(ScalarEntry {
                name,
                type_tag: type_tag.to_string(),
                value: value.to_string(),
            });
            Ok(())
        }
        (Some(_), false) => Err(fail(format!(
            "Variable '{name}' has both a 'value' attribute and child tags."
        ))),
        (None, true) => Err(fail(
            "Each variable must have a value, either specified as an attribute or as child tags.".into(),
        )),
        (None, false) => {
            let mut values = BTreeMap::new();
            for value in &element.children {
                if value.name != "value" {
                    return Err(fail(format!("Expected 'value' tag instead of: {}", value.name)));
                }
                let index = value
                    .attribute("index")
                    .ok_or_else(|| fail("Missing attribute 'index' for the 'value' tag.".into()))?;
                let raw = value
                    .attribute("value")
                    .ok_or_else(|| fail("Missing attribute 'value' for the 'value' tag.".into()))?;
                let index: usize = index
                    .trim()
                    .parse()
                    .map_err(|_| fail(format!("Cannot parse string '{index}' as an index number")))?;
                if values.insert(index, raw.to_string()).is_some() {
                    return Err(fail(format!("Array index {index} of variable '{name}' is given twice.")));
                }
            }
            // Indices must form 0..n.
            for (expected, &found) in values.keys().enumerate() {
                if expected != found {
                    return Err(fail(format!(
                        "Array index {expected} not found, but {found} was. Sparse arrays are not supported!"
                    )));
                }
            }
            entries.arrays.push(ArrayEntry { name, type_tag: type_tag.to_string(), values });
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(err: Error) -> String {
        match err {
            Error::Parse { message, .. } => message,
            other => panic!("expected a parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_document_tree() {
        let root = parse_document(r#"<a x="1"><b/><c></c></a>"#, "f").unwrap();
        assert_eq!(root.name, "a");
        assert_eq!(root.attribute("x"), Some("1"));
        let names: Vec<_> = root.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c"]);
    }

    #[test]
    fn test_document_errors() {
        assert!(parse_document("<a></b>", "f").is_err());
        assert!(parse_document("<a/><b/>", "f").is_err());
        assert!(parse_document("<a x='1' x='2'/>", "f").is_err());
        assert!(parse_document("", "f").is_err());
    }

    #[test]
    fn test_modules_prefix_names() {
        let entries = parse_config(
            r#"<configuration>
                 <variable name="top" type="int32" value="1"/>
                 <module name="A"><module name="B">
                   <variable name="deep" type="string" value="x"/>
                 </module></module>
               </configuration>"#,
            "f",
        )
        .unwrap();
        let names: Vec<_> = entries.scalars.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["top", "A/B/deep"]);
    }

    #[test]
    fn test_array_values_in_index_order() {
        let entries = parse_config(
            r#"<configuration><variable name="arr" type="int16">
                 <value index="1" value="20"/><value index="0" value="10"/>
               </variable></configuration>"#,
            "f",
        )
        .unwrap();
        let values: Vec<_> = entries.arrays[0].values.values().cloned().collect();
        assert_eq!(values, vec!["10", "20"]);
    }

    #[test]
    fn test_structure_errors() {
        let cases = [
            ("<config/>", "Expected 'configuration' tag instead of: config"),
            ("<configuration><foo/></configuration>", "Unknown tag: foo"),
            (
                "<configuration><variable type='int8' value='1'/></configuration>",
                "Missing attribute 'name' for the 'variable' tag.",
            ),
            (
                "<configuration><variable name='a' value='1'/></configuration>",
                "Missing attribute 'type' for the 'variable' tag.",
            ),
            ("<configuration><module/></configuration>", "Missing attribute 'name' for the 'module' tag."),
            (
                "<configuration><variable name='a' type='int8'/></configuration>",
                "Each variable must have a value, either specified as an attribute or as child tags.",
            ),
            (
                "<configuration><variable name='a' type='int8'><v/></variable></configuration>",
                "Expected 'value' tag instead of: v",
            ),
            (
                "<configuration><variable name='a' type='int8'><value value='1'/></variable></configuration>",
                "Missing attribute 'index' for the 'value' tag.",
            ),
            (
                "<configuration><variable name='a' type='int8'><value index='0'/></variable></configuration>",
                "Missing attribute 'value' for the 'value' tag.",
            ),
            (
                "<configuration><variable name='a' type='int8'><value index='x' value='1'/></variable></configuration>",
                "Cannot parse string 'x' as an index number",
            ),
            (
                "<configuration><variable name='a' type='int8'><value index='0' value='1'/><value index='2' value='1'/></variable></configuration>",
                "Array index 1 not found, but 2 was. Sparse arrays are not supported!",
            ),
        ];
        for (input, expected) in cases {
            assert_eq!(message(parse_config(input, "f").unwrap_err()), expected, "input: {input}");
        }
    }

    #[test]
    fn test_value_attribute_and_children_is_ambiguous() {
        let input = "<configuration><variable name='a' type='int8' value='1'>\
                     <value index='0' value='1'/></variable></configuration>";
        assert!(message(parse_config(input, "f").unwrap_err()).contains("both"));
    }
}
