//! # Path Resolution
//!
//! Pure string algorithms over slash-separated names: character legality,
//! escaping, splitting into components and resolving relative names against
//! an absolute base. No graph access here; the graph walk that produces a
//! vertex's qualified path lives in [`qualified`].
//!
//! Path syntax accepted everywhere a module or variable name is given:
//!
//! | Form | Meaning |
//! |------|---------|
//! | `a/b` | relative to the current level |
//! | `.` | current level |
//! | `..` | one level up, error above the root |
//! | `/a` | absolute from the application root |
//!
//! Empty segments (`a//b`) and trailing slashes (`a/`) are rejected. A lone
//! `/` names the root.

pub mod qualified;

use std::fmt::Write as _;

use crate::{Error, Result};

// ============================================================================
// Names
// ============================================================================

fn is_legal_char(c: char, allow_dots_and_slashes: bool) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || (allow_dots_and_slashes && (c == '.' || c == '/'))
}

/// Check that `name` only contains `[A-Za-z0-9_]`, plus `.` and `/` when
/// `allow_dots_and_slashes` is set.
pub fn check_name(name: &str, allow_dots_and_slashes: bool) -> bool {
    name.chars().all(|c| is_legal_char(c, allow_dots_and_slashes))
}

/// Like [`check_name`] but raises a structural error naming the offender.
pub fn validate_name(name: &str, allow_dots_and_slashes: bool) -> Result<()> {
    if check_name(name, allow_dots_and_slashes) {
        return Ok(());
    }
    let allowed = if allow_dots_and_slashes {
        "alphanumeric characters, underscores, dots and slashes"
    } else {
        "alphanumeric characters and underscores"
    };
    Err(Error::Structural(format!("Illegal name '{name}': only {allowed} are allowed.")))
}

/// Replace every illegal byte by `_NNN` (decimal code). The underscore
/// itself is escaped, so [`unescape_name`] is an exact inverse.
pub fn escape_name(name: &str, allow_dots_and_slashes: bool) -> String {
    let mut escaped = String::with_capacity(name.len());
    for byte in name.bytes() {
        let c = byte as char;
        if byte.is_ascii() && c != '_' && is_legal_char(c, allow_dots_and_slashes) {
            escaped.push(c);
        } else {
            // Writing to a String cannot fail.
            let _ = write!(escaped, "_{byte:03}");
        }
    }
    escaped
}

/// Inverse of [`escape_name`].
pub fn unescape_name(escaped: &str) -> Result<String> {
    let mut bytes = Vec::with_capacity(escaped.len());
    let mut rest = escaped.as_bytes();
    while let Some((&first, tail)) = rest.split_first() {
        if first != b'_' {
            bytes.push(first);
            rest = tail;
            continue;
        }
        let code = tail
            .get(..3)
            .and_then(|digits| std::str::from_utf8(digits).ok())
            .filter(|digits| digits.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|digits| digits.parse::<u8>().ok())
            .ok_or_else(|| Error::Structural(format!("Malformed escape sequence in name '{escaped}'.")))?;
        bytes.push(code);
        rest = &tail[3..];
    }
    String::from_utf8(bytes)
        .map_err(|_| Error::Structural(format!("Escaped name '{escaped}' does not decode to UTF-8.")))
}

/// Last path segment of a qualified name.
pub fn unqualified_name(qualified: &str) -> &str {
    match qualified.rfind('/') {
        Some(i) => &qualified[i + 1..],
        None => qualified,
    }
}

/// Everything before the last path segment: `"."` for a plain name, `"/"`
/// for a name directly below the root.
pub fn path_name(qualified: &str) -> &str {
    match qualified.rfind('/') {
        None => ".",
        Some(0) => "/",
        Some(i) => &qualified[..i],
    }
}

// ============================================================================
// Components
// ============================================================================

/// One step of a parsed path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component<'a> {
    /// Leading `/`: restart at the application root.
    Root,
    /// `.`
    Current,
    /// `..`
    Parent,
    Name(&'a str),
}

/// Split a path into components, rejecting empty segments, trailing
/// slashes and illegal characters. The empty path yields no components.
pub fn components(path: &str) -> Result<Vec<Component<'_>>> {
    let mut out = Vec::new();
    let mut rest = path;
    if let Some(stripped) = rest.strip_prefix('/') {
        out.push(Component::Root);
        rest = stripped;
        if rest.is_empty() {
            return Ok(out);
        }
    } else if rest.is_empty() {
        return Ok(out);
    }
    if rest.ends_with('/') {
        return Err(Error::Structural(format!("{path}: names cannot end with /")));
    }
    for segment in rest.split('/') {
        let component = match segment {
            "" => {
                return Err(Error::Structural(format!(
                    "{path}: names cannot contain consecutive slashes"
                )));
            }
            "." => Component::Current,
            ".." => Component::Parent,
            name => {
                validate_name(name, false)?;
                Component::Name(name)
            }
        };
        out.push(component);
    }
    Ok(out)
}

// ============================================================================
// Resolution
// ============================================================================

fn escape_above_root(path: &str) -> Error {
    Error::Structural(format!("Path '{path}' escapes above the root level."))
}

fn render_absolute(segments: &[&str]) -> String {
    let mut out = String::from("/");
    out.push_str(&segments.join("/"));
    out
}

/// Resolve `child` against the absolute path `base`.
///
/// ```
/// use pvmodel::path::resolve;
/// assert_eq!(resolve("/a/b", "../c").unwrap(), "/a/c");
/// assert_eq!(resolve("/a/b", "/x").unwrap(), "/x");
/// assert!(resolve("/", "..").is_err());
/// ```
pub fn resolve(base: &str, child: &str) -> Result<String> {
    if !base.starts_with('/') {
        return Err(Error::Structural(format!("Base path '{base}' is not absolute.")));
    }
    let mut segments: Vec<&str> = Vec::new();
    for component in components(base)?.into_iter().chain(components(child)?) {
        match component {
            Component::Root => segments.clear(),
            Component::Current => {}
            Component::Parent => {
                if segments.pop().is_none() {
                    return Err(escape_above_root(child));
                }
            }
            Component::Name(name) => segments.push(name),
        }
    }
    Ok(render_absolute(&segments))
}

/// Collapse `.` and inner `..` without a base.
///
/// Absolute paths are fully resolved. Relative paths keep their leading
/// `..` segments, since those can only be resolved against a base.
pub fn normalize(path: &str) -> Result<String> {
    let mut absolute = false;
    let mut ups = 0usize;
    let mut segments: Vec<&str> = Vec::new();
    for component in components(path)? {
        match component {
            Component::Root => {
                absolute = true;
                ups = 0;
                segments.clear();
            }
            Component::Current => {}
            Component::Parent => {
                if segments.pop().is_none() {
                    if absolute {
                        return Err(escape_above_root(path));
                    }
                    ups += 1;
                }
            }
            Component::Name(name) => segments.push(name),
        }
    }
    if absolute {
        return Ok(render_absolute(&segments));
    }
    let mut parts: Vec<&str> = std::iter::repeat_n("..", ups).collect();
    parts.extend(segments);
    if parts.is_empty() {
        return Ok(".".to_string());
    }
    Ok(parts.join("/"))
}
